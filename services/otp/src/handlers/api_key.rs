use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::OtpServiceError;
use crate::state::AppState;
use crate::usecase::api_key::{RegisterApiKeyInput, RegisterApiKeyUseCase};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterApiKeyRequest {
    pub webhook_url: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterApiKeyResponse {
    pub api_key: String,
}

// ── POST /api-key ─────────────────────────────────────────────────────────────

pub async fn register_api_key(
    State(state): State<AppState>,
    Json(body): Json<RegisterApiKeyRequest>,
) -> Result<Json<RegisterApiKeyResponse>, OtpServiceError> {
    let usecase = RegisterApiKeyUseCase {
        api_keys: state.api_key_repo(),
    };
    let key = usecase
        .execute(RegisterApiKeyInput {
            webhook_url: body.webhook_url,
        })
        .await?;
    Ok(Json(RegisterApiKeyResponse { api_key: key.key }))
}
