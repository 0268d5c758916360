use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use simpleotp_core::serde::to_rfc3339_ms;

use crate::error::OtpServiceError;
use crate::handlers::api_key_header;
use crate::state::AppState;
use crate::usecase::otp::{
    CreateOtpInput, CreateOtpUseCase, INVALID_BODY, VerifyOtpInput, VerifyOtpUseCase,
};

// ── POST /otp ─────────────────────────────────────────────────────────────────

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOtpRequest {
    pub email: Option<String>,
    pub redirect_after_verify: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOtpResponse {
    pub id: String,
    pub code: String,
    pub magic_link: String,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub expires_at: DateTime<Utc>,
    pub email: Option<String>,
    pub redirect_after_verify: Option<String>,
}

/// The body is optional. A body that fails to parse is only reported once the
/// caller's key has been accepted.
pub async fn create_otp(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Option<Json<CreateOtpRequest>>, JsonRejection>,
) -> Result<Json<CreateOtpResponse>, OtpServiceError> {
    let usecase = CreateOtpUseCase {
        api_keys: state.api_key_repo(),
        otps: state.otp_repo(),
        magic_link_host: state.magic_link_host.clone(),
    };
    let body = match body {
        Ok(body) => body.map(|Json(b)| b).unwrap_or_default(),
        Err(rejection) => {
            usecase.authorize(api_key_header(&headers)).await?;
            tracing::debug!(error = %rejection, "rejected create otp body");
            return Err(OtpServiceError::InvalidInput(INVALID_BODY));
        }
    };
    let otp = usecase
        .execute(CreateOtpInput {
            api_key: api_key_header(&headers),
            email: body.email,
            redirect_after_verify: body.redirect_after_verify,
        })
        .await?;

    Ok(Json(CreateOtpResponse {
        id: otp.id,
        code: otp.code,
        magic_link: otp.magic_link,
        expires_at: otp.expires_at,
        email: otp.email,
        redirect_after_verify: otp.redirect_after_verify,
    }))
}

// ── GET /otp/verify ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyOtpQuery {
    pub code: Option<String>,
    pub id: Option<String>,
}

#[derive(Serialize)]
pub struct VerifyOtpResponse {
    pub message: &'static str,
}

/// Redirects with `302 Found` when the OTP carries a redirect target.
pub async fn verify_otp(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<VerifyOtpQuery>,
) -> Result<Response, OtpServiceError> {
    let usecase = VerifyOtpUseCase {
        api_keys: state.api_key_repo(),
        otps: state.otp_repo(),
        notifier: state.notifier.clone(),
    };
    let out = usecase
        .execute(VerifyOtpInput {
            code: query.code,
            id: query.id,
            api_key: api_key_header(&headers),
        })
        .await?;

    let resp = match out.redirect_after_verify {
        Some(location) => (StatusCode::FOUND, [(header::LOCATION, location)]).into_response(),
        None => Json(VerifyOtpResponse {
            message: "OTP verified",
        })
        .into_response(),
    };
    Ok(resp)
}
