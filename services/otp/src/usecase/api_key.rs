use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::domain::repository::ApiKeyRepository;
use crate::domain::types::{API_KEY_PREFIX, ApiKey};
use crate::error::OtpServiceError;
use crate::validation::{is_valid_webhook_url, non_blank};

pub const INVALID_WEBHOOK_URL: &str = "invalid webhook url: must be an absolute http(s) url";

/// `sk_` followed by 32 hex chars of a random v4 UUID.
pub fn generate_api_key() -> String {
    format!("{API_KEY_PREFIX}{}", Uuid::new_v4().simple())
}

pub struct RegisterApiKeyInput {
    pub webhook_url: Option<String>,
}

pub struct RegisterApiKeyUseCase<A: ApiKeyRepository> {
    pub api_keys: A,
}

impl<A: ApiKeyRepository> RegisterApiKeyUseCase<A> {
    pub async fn execute(&self, input: RegisterApiKeyInput) -> Result<ApiKey, OtpServiceError> {
        let webhook_url = non_blank(input.webhook_url);
        if let Some(url) = &webhook_url {
            if !is_valid_webhook_url(url) {
                return Err(OtpServiceError::InvalidInput(INVALID_WEBHOOK_URL));
            }
        }

        let record = ApiKey {
            key: generate_api_key(),
            created_at: Utc::now(),
            webhook_url,
        };
        self.api_keys.insert(&record).await?;

        info!(has_webhook = record.webhook_url.is_some(), "api key registered");
        Ok(record)
    }
}
