use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, sea_query::Expr,
};

use simpleotp_otp_schema::{api_keys, otp_codes};

use crate::domain::repository::{ApiKeyRepository, OtpRepository};
use crate::domain::types::{ApiKey, OtpRecord};
use crate::error::OtpServiceError;

// ── ApiKey repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbApiKeyRepository {
    pub db: DatabaseConnection,
}

impl ApiKeyRepository for DbApiKeyRepository {
    async fn insert(&self, key: &ApiKey) -> Result<(), OtpServiceError> {
        api_keys::ActiveModel {
            key: Set(key.key.clone()),
            created_at: Set(key.created_at),
            webhook_url: Set(key.webhook_url.clone()),
        }
        .insert(&self.db)
        .await
        .context("insert api key")?;
        Ok(())
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<ApiKey>, OtpServiceError> {
        let model = api_keys::Entity::find_by_id(key.to_owned())
            .one(&self.db)
            .await
            .context("find api key")?;
        Ok(model.map(api_key_from_model))
    }
}

fn api_key_from_model(model: api_keys::Model) -> ApiKey {
    ApiKey {
        key: model.key,
        created_at: model.created_at,
        webhook_url: model.webhook_url,
    }
}

// ── OTP repository ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOtpRepository {
    pub db: DatabaseConnection,
}

impl OtpRepository for DbOtpRepository {
    async fn insert(&self, otp: &OtpRecord) -> Result<(), OtpServiceError> {
        active_model(otp)
            .insert(&self.db)
            .await
            .context("insert otp")?;
        Ok(())
    }

    async fn find_by_code_and_id(
        &self,
        code: &str,
        id: &str,
    ) -> Result<Option<OtpRecord>, OtpServiceError> {
        let model = otp_codes::Entity::find()
            .filter(otp_codes::Column::Id.eq(id))
            .filter(otp_codes::Column::Code.eq(code))
            .one(&self.db)
            .await
            .context("find otp by code and id")?;
        Ok(model.map(otp_from_model))
    }

    async fn find_by_code_and_api_key(
        &self,
        code: &str,
        api_key: &str,
    ) -> Result<Option<OtpRecord>, OtpServiceError> {
        let model = otp_codes::Entity::find()
            .filter(otp_codes::Column::Code.eq(code))
            .filter(otp_codes::Column::ApiKey.eq(api_key))
            .one(&self.db)
            .await
            .context("find otp by code and api key")?;
        Ok(model.map(otp_from_model))
    }

    async fn update(&self, otp: &OtpRecord) -> Result<(), OtpServiceError> {
        active_model(otp)
            .update(&self.db)
            .await
            .context("update otp")?;
        Ok(())
    }

    async fn mark_used(&self, id: &str) -> Result<bool, OtpServiceError> {
        let result = otp_codes::Entity::update_many()
            .col_expr(otp_codes::Column::Used, Expr::value(true))
            .filter(otp_codes::Column::Id.eq(id))
            .filter(otp_codes::Column::Used.eq(false))
            .exec(&self.db)
            .await
            .context("mark otp used")?;
        Ok(result.rows_affected == 1)
    }
}

fn active_model(otp: &OtpRecord) -> otp_codes::ActiveModel {
    otp_codes::ActiveModel {
        id: Set(otp.id.clone()),
        api_key: Set(otp.api_key.clone()),
        code: Set(otp.code.clone()),
        magic_link: Set(otp.magic_link.clone()),
        created_at: Set(otp.created_at),
        expires_at: Set(otp.expires_at),
        used: Set(otp.used),
        email: Set(otp.email.clone()),
        redirect_after_verify: Set(otp.redirect_after_verify.clone()),
    }
}

fn otp_from_model(model: otp_codes::Model) -> OtpRecord {
    OtpRecord {
        id: model.id,
        api_key: model.api_key,
        code: model.code,
        magic_link: model.magic_link,
        created_at: model.created_at,
        expires_at: model.expires_at,
        used: model.used,
        email: model.email,
        redirect_after_verify: model.redirect_after_verify,
    }
}
