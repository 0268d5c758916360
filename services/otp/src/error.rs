use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// OTP service error variants. Every rejection in the OTP lifecycle maps to one
/// of these and is returned synchronously to the caller.
#[derive(Debug, thiserror::Error)]
pub enum OtpServiceError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("{0}")]
    InvalidInput(&'static str),
    #[error("OTP not found")]
    NotFound,
    #[error("OTP already used")]
    AlreadyUsed,
    #[error("OTP expired")]
    Expired,
    #[error("invalid code")]
    CodeMismatch,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl OtpServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotFound => "OTP_NOT_FOUND",
            Self::AlreadyUsed => "OTP_ALREADY_USED",
            Self::Expired => "OTP_EXPIRED",
            Self::CodeMismatch => "CODE_MISMATCH",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::InvalidInput(_) | Self::AlreadyUsed | Self::Expired | Self::CodeMismatch => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for OtpServiceError {
    fn into_response(self) -> Response {
        // 4xx are expected client outcomes and already visible through the trace layer.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (self.status(), axum::Json(body)).into_response()
    }
}
