use axum::{
    Router,
    routing::{get, post},
};

use simpleotp_core::health::healthz;
use simpleotp_core::middleware::with_request_tracing;

use crate::handlers::{
    api_key::register_api_key,
    health::readyz,
    otp::{create_otp, verify_otp},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Registration
        .route("/api-key", post(register_api_key))
        // OTP lifecycle
        .route("/otp", post(create_otp))
        .route("/otp/verify", get(verify_otp))
        .with_state(state);
    with_request_tracing(router)
}
