use chrono::Utc;
use rand::RngExt;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::repository::{ApiKeyRepository, OtpRepository, WebhookNotifier};
use crate::domain::types::{
    ApiKey, OTP_CODE_MAX, OTP_CODE_MIN, OtpRecord, OtpStatus, WebhookEvent, otp_ttl,
};
use crate::error::OtpServiceError;
use crate::validation::{is_valid_email, is_valid_redirect_url, non_blank};

pub const INVALID_EMAIL: &str = "invalid email format";
pub const INVALID_REDIRECT_URL: &str = "invalid redirect url: must be an absolute https url";
pub const MISSING_CODE: &str = "code is required";
pub const INVALID_BODY: &str = "invalid request body";

/// Six-digit code drawn uniformly from `OTP_CODE_MIN..=OTP_CODE_MAX`.
pub fn generate_code() -> String {
    rand::rng()
        .random_range(OTP_CODE_MIN..=OTP_CODE_MAX)
        .to_string()
}

/// 128-bit random token (122 bits of entropy) rendered as 32 lowercase hex chars.
pub fn generate_otp_id() -> String {
    Uuid::new_v4().simple().to_string()
}

pub fn build_magic_link(host: &str, id: &str, code: &str) -> String {
    format!("https://{host}/otp/verify?id={id}&code={code}")
}

// ── CreateOtp ────────────────────────────────────────────────────────────────

pub struct CreateOtpInput {
    /// Credential presented by the caller.
    pub api_key: Option<String>,
    pub email: Option<String>,
    pub redirect_after_verify: Option<String>,
}

pub struct CreateOtpUseCase<A, O>
where
    A: ApiKeyRepository,
    O: OtpRepository,
{
    pub api_keys: A,
    pub otps: O,
    pub magic_link_host: String,
}

impl<A, O> CreateOtpUseCase<A, O>
where
    A: ApiKeyRepository,
    O: OtpRepository,
{
    /// Resolves the presented key to its owner; a missing or unknown key is `Unauthorized`.
    pub async fn authorize(&self, api_key: Option<String>) -> Result<ApiKey, OtpServiceError> {
        let key = non_blank(api_key).ok_or(OtpServiceError::Unauthorized)?;
        self.api_keys
            .find_by_key(&key)
            .await?
            .ok_or(OtpServiceError::Unauthorized)
    }

    pub async fn execute(&self, input: CreateOtpInput) -> Result<OtpRecord, OtpServiceError> {
        // 1. Resolve the caller → 401 if missing or unknown
        let owner = self.authorize(input.api_key).await?;

        // 2. Validate optional inputs → 400
        let email = non_blank(input.email);
        if let Some(email) = &email {
            if !is_valid_email(email) {
                return Err(OtpServiceError::InvalidInput(INVALID_EMAIL));
            }
        }
        let redirect_after_verify = non_blank(input.redirect_after_verify);
        if let Some(url) = &redirect_after_verify {
            if !is_valid_redirect_url(url) {
                return Err(OtpServiceError::InvalidInput(INVALID_REDIRECT_URL));
            }
        }

        // 3. Mint and persist
        let id = generate_otp_id();
        let code = generate_code();
        let now = Utc::now();
        let otp = OtpRecord {
            magic_link: build_magic_link(&self.magic_link_host, &id, &code),
            id,
            api_key: owner.key,
            code,
            created_at: now,
            expires_at: now + otp_ttl(),
            used: false,
            email,
            redirect_after_verify,
        };
        self.otps.insert(&otp).await?;

        info!(otp_id = %otp.id, "otp created");
        Ok(otp)
    }
}

// ── VerifyOtp ────────────────────────────────────────────────────────────────

pub struct VerifyOtpInput {
    pub code: Option<String>,
    pub id: Option<String>,
    /// Credential presented by the caller; only consulted when `id` is absent.
    pub api_key: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct VerifyOtpOutput {
    pub otp_id: String,
    pub redirect_after_verify: Option<String>,
}

pub struct VerifyOtpUseCase<A, O, N>
where
    A: ApiKeyRepository,
    O: OtpRepository,
    N: WebhookNotifier,
{
    pub api_keys: A,
    pub otps: O,
    pub notifier: N,
}

impl<A, O, N> VerifyOtpUseCase<A, O, N>
where
    A: ApiKeyRepository,
    O: OtpRepository,
    N: WebhookNotifier,
{
    pub async fn execute(&self, input: VerifyOtpInput) -> Result<VerifyOtpOutput, OtpServiceError> {
        let code = non_blank(input.code).ok_or(OtpServiceError::InvalidInput(MISSING_CODE))?;

        // 1. Lookup: by (code, id) when an id is given, otherwise by (code, api key)
        let found = match non_blank(input.id) {
            Some(id) => self.otps.find_by_code_and_id(&code, &id).await?,
            None => {
                let key = non_blank(input.api_key).ok_or(OtpServiceError::Unauthorized)?;
                self.otps.find_by_code_and_api_key(&code, &key).await?
            }
        };
        let otp = found.ok_or(OtpServiceError::NotFound)?;

        // 2-3. State machine: used before expired
        let now = Utc::now();
        match otp.status_at(now) {
            OtpStatus::Verified => return Err(OtpServiceError::AlreadyUsed),
            OtpStatus::Expired => return Err(OtpServiceError::Expired),
            OtpStatus::Pending => {}
        }

        // 4. Lookup already matched on code; guards stores that match loosely
        if otp.code != code {
            return Err(OtpServiceError::CodeMismatch);
        }

        // 5. Pending → Verified. Losing a concurrent race reads as already used.
        if !self.otps.mark_used(&otp.id).await? {
            return Err(OtpServiceError::AlreadyUsed);
        }
        info!(otp_id = %otp.id, "otp verified");

        self.dispatch_webhook(&otp, now).await;

        Ok(VerifyOtpOutput {
            otp_id: otp.id,
            redirect_after_verify: otp.redirect_after_verify,
        })
    }

    /// Hand the event to the notifier if the owning key has a webhook. The
    /// verification has already been committed, so lookup failures are only logged.
    async fn dispatch_webhook(&self, otp: &OtpRecord, verified_at: chrono::DateTime<Utc>) {
        let owner = match self.api_keys.find_by_key(&otp.api_key).await {
            Ok(owner) => owner,
            Err(e) => {
                warn!(otp_id = %otp.id, error = %e, "could not resolve api key for webhook");
                return;
            }
        };
        let Some(url) = owner.and_then(|k| k.webhook_url) else {
            return;
        };

        self.notifier.notify(
            &url,
            WebhookEvent {
                otp_id: otp.id.clone(),
                email: otp.email.clone(),
                verified_at,
                redirect: otp.redirect_after_verify.clone(),
            },
        );
    }
}
