#![allow(async_fn_in_trait)]

use std::sync::Arc;

use crate::domain::types::{ApiKey, OtpRecord, WebhookEvent};
use crate::error::OtpServiceError;

/// Store of caller credentials.
pub trait ApiKeyRepository: Send + Sync {
    async fn insert(&self, key: &ApiKey) -> Result<(), OtpServiceError>;

    async fn find_by_key(&self, key: &str) -> Result<Option<ApiKey>, OtpServiceError>;
}

/// Store of issued passcodes. Lookups are exact-match and case-sensitive.
pub trait OtpRepository: Send + Sync {
    async fn insert(&self, otp: &OtpRecord) -> Result<(), OtpServiceError>;

    async fn find_by_code_and_id(
        &self,
        code: &str,
        id: &str,
    ) -> Result<Option<OtpRecord>, OtpServiceError>;

    async fn find_by_code_and_api_key(
        &self,
        code: &str,
        api_key: &str,
    ) -> Result<Option<OtpRecord>, OtpServiceError>;

    /// Replace the stored record with the same id.
    async fn update(&self, otp: &OtpRecord) -> Result<(), OtpServiceError>;

    /// Atomically set `used = true` where `id` matches and `used` is still false.
    /// Returns `true` only for the single caller whose write changed the row.
    async fn mark_used(&self, id: &str) -> Result<bool, OtpServiceError>;
}

/// Out-of-band delivery of verification events. `notify` must return
/// immediately; delivery outcome is never reported back to the caller.
pub trait WebhookNotifier: Send + Sync {
    fn notify(&self, url: &str, event: WebhookEvent);
}

impl<T: WebhookNotifier + ?Sized> WebhookNotifier for Arc<T> {
    fn notify(&self, url: &str, event: WebhookEvent) {
        (**self).notify(url, event)
    }
}
