use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use astro_auth_types::token::JwtClaims;

use crate::domain::repository::TokenRepository;
use crate::domain::types::{SessionToken, TOKEN_TTL_SECS};
use crate::error::AuthServiceError;

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

/// Mint a bearer token for an identity: an HS256 JWT plus the durable row
/// that mirrors it. Expiry is fixed at issuance; there is no renewal.
pub fn issue_token(identity_id: Uuid, secret: &str) -> Result<SessionToken, AuthServiceError> {
    let now = Utc::now();
    let claims = JwtClaims {
        sub: identity_id.to_string(),
        exp: now_secs() + TOKEN_TTL_SECS as u64,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthServiceError::Internal(e.into()))?;
    Ok(SessionToken {
        id: Uuid::new_v4(),
        identity_id,
        token,
        expires_at: now + Duration::seconds(TOKEN_TTL_SECS),
        created_at: now,
    })
}

// ── VerifyToken ──────────────────────────────────────────────────────────────

pub struct VerifyTokenUseCase<T: TokenRepository> {
    pub tokens: T,
}

impl<T: TokenRepository> VerifyTokenUseCase<T> {
    /// Resolve a presented bearer value to its live session row. Absent,
    /// expired, and never-issued values are indistinguishable to the caller.
    pub async fn execute(&self, token_value: &str) -> Result<SessionToken, AuthServiceError> {
        self.tokens
            .find_live(token_value)
            .await?
            .ok_or(AuthServiceError::InvalidToken)
    }
}

// ── RevokeToken ──────────────────────────────────────────────────────────────

pub struct RevokeTokenUseCase<T: TokenRepository> {
    pub tokens: T,
}

impl<T: TokenRepository> RevokeTokenUseCase<T> {
    /// Delete the presented token's row. Revoking an unknown value is a no-op
    /// so sign-out stays idempotent from the client's view.
    pub async fn execute(&self, token_value: &str) -> Result<(), AuthServiceError> {
        self.tokens.delete_by_value(token_value).await?;
        Ok(())
    }
}
