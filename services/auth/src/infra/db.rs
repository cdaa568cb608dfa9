use anyhow::Context as _;
use chrono::Utc;
use sea_orm::sea_query::{Expr, ExprTrait as _};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    QueryFilter,
};
use uuid::Uuid;

use astro_auth_schema::{identities, one_time_codes, session_tokens};

use crate::domain::lockout::MAX_FAILED_LOGINS;
use crate::domain::repository::{IdentityRepository, OtpRepository, TokenRepository};
use crate::domain::types::{ContactPoint, Identity, OneTimeCode, SessionToken};
use crate::error::AuthServiceError;

// ── Identity repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbIdentityRepository {
    pub db: DatabaseConnection,
}

impl IdentityRepository for DbIdentityRepository {
    async fn find_by_contact(
        &self,
        contact: &ContactPoint,
    ) -> Result<Option<Identity>, AuthServiceError> {
        let mut by_channel = Condition::any();
        if let Some(email) = contact.email() {
            by_channel = by_channel.add(identities::Column::Email.eq(email));
        }
        if let Some(phone) = contact.phone() {
            by_channel = by_channel.add(identities::Column::Phone.eq(phone));
        }
        let model = identities::Entity::find()
            .filter(by_channel)
            .one(&self.db)
            .await
            .context("find identity by contact")?;
        Ok(model.map(identity_from_model))
    }

    async fn create(&self, identity: &Identity) -> Result<(), AuthServiceError> {
        identities::ActiveModel {
            id: Set(identity.id),
            email: Set(identity.email.clone()),
            phone: Set(identity.phone.clone()),
            failed_login_attempts: Set(identity.failed_login_attempts),
            otp_attempts: Set(identity.otp_attempts),
            is_blocked: Set(identity.is_blocked),
            created_at: Set(identity.created_at),
        }
        .insert(&self.db)
        .await
        .context("create identity")?;
        Ok(())
    }

    async fn set_blocked(&self, id: Uuid) -> Result<(), AuthServiceError> {
        identities::Entity::update_many()
            .col_expr(identities::Column::IsBlocked, Expr::value(true))
            .filter(identities::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("block identity")?;
        Ok(())
    }

    async fn increment_otp_attempts(&self, id: Uuid) -> Result<(), AuthServiceError> {
        identities::Entity::update_many()
            .col_expr(
                identities::Column::OtpAttempts,
                Expr::col(identities::Column::OtpAttempts).add(1),
            )
            .filter(identities::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("increment otp attempts")?;
        Ok(())
    }

    async fn record_failed_login(&self, id: Uuid) -> Result<(), AuthServiceError> {
        // Single statement: the increment and the threshold decision ride the
        // same write, so concurrent failures cannot under-count or miss the
        // block transition.
        identities::Entity::update_many()
            .col_expr(
                identities::Column::FailedLoginAttempts,
                Expr::col(identities::Column::FailedLoginAttempts).add(1),
            )
            .col_expr(
                identities::Column::IsBlocked,
                Expr::col(identities::Column::IsBlocked).or(
                    Expr::col(identities::Column::FailedLoginAttempts)
                        .add(1)
                        .gte(MAX_FAILED_LOGINS),
                ),
            )
            .filter(identities::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("record failed login")?;
        Ok(())
    }

    async fn reset_counters(&self, id: Uuid) -> Result<(), AuthServiceError> {
        identities::Entity::update_many()
            .col_expr(identities::Column::FailedLoginAttempts, Expr::value(0))
            .col_expr(identities::Column::OtpAttempts, Expr::value(0))
            .filter(identities::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("reset identity counters")?;
        Ok(())
    }
}

fn identity_from_model(model: identities::Model) -> Identity {
    Identity {
        id: model.id,
        email: model.email,
        phone: model.phone,
        failed_login_attempts: model.failed_login_attempts,
        otp_attempts: model.otp_attempts,
        is_blocked: model.is_blocked,
        created_at: model.created_at,
    }
}

// ── OneTimeCode repository ───────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOtpRepository {
    pub db: DatabaseConnection,
}

impl OtpRepository for DbOtpRepository {
    async fn create(&self, code: &OneTimeCode) -> Result<(), AuthServiceError> {
        one_time_codes::ActiveModel {
            id: Set(code.id),
            identity_id: Set(code.identity_id),
            code: Set(code.code.clone()),
            expires_at: Set(code.expires_at),
            created_at: Set(code.created_at),
        }
        .insert(&self.db)
        .await
        .context("create one-time code")?;
        Ok(())
    }

    async fn find_valid(
        &self,
        identity_id: Uuid,
        code: &str,
    ) -> Result<Option<OneTimeCode>, AuthServiceError> {
        let now = Utc::now();
        let model = one_time_codes::Entity::find()
            .filter(one_time_codes::Column::IdentityId.eq(identity_id))
            .filter(one_time_codes::Column::Code.eq(code))
            .filter(one_time_codes::Column::ExpiresAt.gt(now))
            .one(&self.db)
            .await
            .context("find valid one-time code")?;
        Ok(model.map(code_from_model))
    }

    async fn delete(&self, id: Uuid) -> Result<(), AuthServiceError> {
        one_time_codes::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete one-time code")?;
        Ok(())
    }
}

fn code_from_model(model: one_time_codes::Model) -> OneTimeCode {
    OneTimeCode {
        id: model.id,
        identity_id: model.identity_id,
        code: model.code,
        expires_at: model.expires_at,
        created_at: model.created_at,
    }
}

// ── SessionToken repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTokenRepository {
    pub db: DatabaseConnection,
}

impl TokenRepository for DbTokenRepository {
    async fn create(&self, token: &SessionToken) -> Result<(), AuthServiceError> {
        session_tokens::ActiveModel {
            id: Set(token.id),
            identity_id: Set(token.identity_id),
            token: Set(token.token.clone()),
            expires_at: Set(token.expires_at),
            created_at: Set(token.created_at),
        }
        .insert(&self.db)
        .await
        .context("create session token")?;
        Ok(())
    }

    async fn find_live(&self, token: &str) -> Result<Option<SessionToken>, AuthServiceError> {
        let now = Utc::now();
        let model = session_tokens::Entity::find()
            .filter(session_tokens::Column::Token.eq(token))
            .filter(session_tokens::Column::ExpiresAt.gt(now))
            .one(&self.db)
            .await
            .context("find live session token")?;
        Ok(model.map(token_from_model))
    }

    async fn delete_by_value(&self, token: &str) -> Result<bool, AuthServiceError> {
        let result = session_tokens::Entity::delete_many()
            .filter(session_tokens::Column::Token.eq(token))
            .exec(&self.db)
            .await
            .context("delete session token")?;
        Ok(result.rows_affected > 0)
    }
}

fn token_from_model(model: session_tokens::Model) -> SessionToken {
    SessionToken {
        id: model.id,
        identity_id: model.identity_id,
        token: model.token,
        expires_at: model.expires_at,
        created_at: model.created_at,
    }
}
