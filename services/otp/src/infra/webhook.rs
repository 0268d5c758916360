use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::domain::repository::WebhookNotifier;
use crate::domain::types::WebhookEvent;

/// Why a webhook delivery did not succeed. Never surfaced to API callers.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("webhook responded with {0}")]
    Status(StatusCode),
}

/// Posts verification events as JSON from a detached tokio task.
/// One attempt per event, no retry.
#[derive(Clone, Default)]
pub struct HttpWebhookNotifier {
    client: Client,
}

impl HttpWebhookNotifier {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Single delivery attempt; any non-2xx status is a failure.
    pub async fn deliver(&self, url: &str, event: &WebhookEvent) -> Result<(), WebhookError> {
        let resp = self.client.post(url).json(event).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(WebhookError::Status(status));
        }
        Ok(())
    }
}

impl WebhookNotifier for HttpWebhookNotifier {
    fn notify(&self, url: &str, event: WebhookEvent) {
        let notifier = self.clone();
        let url = url.to_owned();
        tokio::spawn(async move {
            match notifier.deliver(&url, &event).await {
                Ok(()) => debug!(otp_id = %event.otp_id, webhook_url = %url, "webhook delivered"),
                Err(e) => warn!(
                    otp_id = %event.otp_id,
                    webhook_url = %url,
                    error = %e,
                    "webhook delivery failed"
                ),
            }
        });
    }
}
