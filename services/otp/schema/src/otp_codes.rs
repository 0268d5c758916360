use sea_orm::entity::prelude::*;

/// One-time passcode issued on behalf of an API key.
/// Expires 10 minutes after creation; `used` only ever flips false → true.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "otp_codes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub api_key: String,
    pub code: String,
    pub magic_link: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub used: bool,
    pub email: Option<String>,
    pub redirect_after_verify: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
