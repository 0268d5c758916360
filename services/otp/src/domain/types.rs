use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use simpleotp_core::serde::to_rfc3339_ms;

/// Integrating caller identified by an opaque key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKey {
    pub key: String,
    pub created_at: DateTime<Utc>,
    pub webhook_url: Option<String>,
}

/// Stored one-time passcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpRecord {
    pub id: String,
    /// Key of the caller that requested the code.
    pub api_key: String,
    pub code: String,
    pub magic_link: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub email: Option<String>,
    pub redirect_after_verify: Option<String>,
}

/// Lifecycle state of an [`OtpRecord`]. Only `used` is stored; expiry is
/// derived from timestamps at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpStatus {
    Pending,
    Verified,
    Expired,
}

impl OtpRecord {
    /// `Verified` takes precedence over `Expired`: a used code stays used.
    pub fn status_at(&self, now: DateTime<Utc>) -> OtpStatus {
        if self.used {
            OtpStatus::Verified
        } else if now > self.expires_at {
            OtpStatus::Expired
        } else {
            OtpStatus::Pending
        }
    }
}

/// Payload POSTed to the owning key's webhook after a successful verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    pub otp_id: String,
    pub email: Option<String>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub verified_at: DateTime<Utc>,
    pub redirect: Option<String>,
}

/// OTP time-to-live in seconds.
pub const OTP_TTL_SECS: i64 = 10 * 60;

/// Inclusive bounds of generated codes (always six digits).
pub const OTP_CODE_MIN: u32 = 100_000;
pub const OTP_CODE_MAX: u32 = 999_999;

/// Prefix of every issued API key.
pub const API_KEY_PREFIX: &str = "sk_";

pub fn otp_ttl() -> Duration {
    Duration::seconds(OTP_TTL_SECS)
}
