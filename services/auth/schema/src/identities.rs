use sea_orm::entity::prelude::*;

/// Registered identity keyed by a unique email and/or a unique phone.
/// Carries the abuse counters and the block flag; created on first sign-in,
/// never deleted by the auth service.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "identities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: Option<String>,
    #[sea_orm(unique)]
    pub phone: Option<String>,
    pub failed_login_attempts: i32,
    pub otp_attempts: i32,
    pub is_blocked: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::one_time_codes::Entity")]
    OneTimeCodes,
    #[sea_orm(has_many = "super::session_tokens::Entity")]
    SessionTokens,
}

impl Related<super::one_time_codes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OneTimeCodes.def()
    }
}

impl Related<super::session_tokens::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SessionTokens.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
