#![allow(async_fn_in_trait)]

use uuid::Uuid;

use crate::domain::types::{ContactPoint, Identity, OneTimeCode, SessionToken};
use crate::error::AuthServiceError;

/// Repository for identities and their abuse counters.
///
/// Counter mutations are single atomic store updates, never a read-modify-
/// write pair, so concurrent attempts against one identity cannot
/// under-count.
pub trait IdentityRepository: Send + Sync {
    /// Find by email-or-phone match against the selector's present channels.
    async fn find_by_contact(
        &self,
        contact: &ContactPoint,
    ) -> Result<Option<Identity>, AuthServiceError>;

    async fn create(&self, identity: &Identity) -> Result<(), AuthServiceError>;

    /// Set the block flag. Never cleared by this service.
    async fn set_blocked(&self, id: Uuid) -> Result<(), AuthServiceError>;

    /// Atomically add one to `otp_attempts`.
    async fn increment_otp_attempts(&self, id: Uuid) -> Result<(), AuthServiceError>;

    /// Atomically add one to `failed_login_attempts`, raising the block flag
    /// in the same write when the incremented value reaches the threshold.
    async fn record_failed_login(&self, id: Uuid) -> Result<(), AuthServiceError>;

    /// Reset both counters to zero after a successful verification.
    async fn reset_counters(&self, id: Uuid) -> Result<(), AuthServiceError>;
}

/// Repository for one-time sign-in codes.
pub trait OtpRepository: Send + Sync {
    async fn create(&self, code: &OneTimeCode) -> Result<(), AuthServiceError>;

    /// Find an unexpired code by identity + exact code value. Several live
    /// codes may coexist for one identity; the first match wins.
    async fn find_valid(
        &self,
        identity_id: Uuid,
        code: &str,
    ) -> Result<Option<OneTimeCode>, AuthServiceError>;

    /// Remove a consumed code so it cannot be replayed.
    async fn delete(&self, id: Uuid) -> Result<(), AuthServiceError>;
}

/// Repository for issued session tokens.
pub trait TokenRepository: Send + Sync {
    async fn create(&self, token: &SessionToken) -> Result<(), AuthServiceError>;

    /// Find a row by exact token value with expiry strictly in the future.
    async fn find_live(&self, token: &str) -> Result<Option<SessionToken>, AuthServiceError>;

    /// Delete by exact token value. Returns `true` if a row was removed.
    async fn delete_by_value(&self, token: &str) -> Result<bool, AuthServiceError>;
}

/// Port for dispatching one-time codes to an identity's contact channel.
/// Delivery is exclusively out of band; codes never travel in responses.
pub trait Notifier: Send + Sync {
    async fn send_otp(&self, contact: &ContactPoint, code: &str) -> Result<(), AuthServiceError>;
}
