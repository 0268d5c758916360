use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::domain::repository::WebhookNotifier;
use crate::infra::db::{DbApiKeyRepository, DbOtpRepository};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub notifier: Arc<dyn WebhookNotifier>,
    /// Host embedded in magic links, fixed per deployment.
    pub magic_link_host: String,
}

impl AppState {
    pub fn api_key_repo(&self) -> DbApiKeyRepository {
        DbApiKeyRepository {
            db: self.db.clone(),
        }
    }

    pub fn otp_repo(&self) -> DbOtpRepository {
        DbOtpRepository {
            db: self.db.clone(),
        }
    }
}
