pub mod api_key;
pub mod health;
pub mod otp;

use axum::http::HeaderMap;

/// Header carrying the caller's API key.
pub const X_API_KEY: &str = "x-api-key";

fn api_key_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(X_API_KEY)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}
