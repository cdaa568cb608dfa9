use chrono::{Duration, Utc};
use rand::RngExt;
use uuid::Uuid;

use crate::domain::lockout;
use crate::domain::repository::{IdentityRepository, Notifier, OtpRepository, TokenRepository};
use crate::domain::types::{ContactPoint, Identity, OTP_LEN, OTP_TTL_SECS, OneTimeCode};
use crate::error::AuthServiceError;
use crate::usecase::token::issue_token;

/// Charset for generating one-time codes (digits only, fixed length).
const CHARSET: &[u8] = b"0123456789";

fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..OTP_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

// ── RequestOtp (sign-in) ─────────────────────────────────────────────────────

pub struct RequestOtpInput {
    pub email: Option<String>,
    pub phone: Option<String>,
}

pub struct RequestOtpUseCase<I, O, N>
where
    I: IdentityRepository,
    O: OtpRepository,
    N: Notifier,
{
    pub identities: I,
    pub codes: O,
    pub notifier: N,
}

impl<I, O, N> RequestOtpUseCase<I, O, N>
where
    I: IdentityRepository,
    O: OtpRepository,
    N: Notifier,
{
    pub async fn execute(&self, input: RequestOtpInput) -> Result<(), AuthServiceError> {
        let contact = ContactPoint::new(input.email, input.phone)
            .ok_or(AuthServiceError::MissingContact)?;

        // 1. Resolve identity; first sign-in creates one with zero counters.
        let identity = match self.identities.find_by_contact(&contact).await? {
            Some(existing) => existing,
            None => {
                let fresh = Identity::new(contact);
                self.identities.create(&fresh).await?;
                fresh
            }
        };

        // 2. Block flag is checked before anything else.
        if identity.is_blocked {
            return Err(AuthServiceError::Blocked);
        }
        if lockout::otp_limit_reached(identity.otp_attempts) {
            self.identities.set_blocked(identity.id).await?;
            return Err(AuthServiceError::RateLimited);
        }

        // 3. Issue a code. Earlier unexpired codes stay valid.
        let now = Utc::now();
        let code = OneTimeCode {
            id: Uuid::new_v4(),
            identity_id: identity.id,
            code: generate_code(),
            expires_at: now + Duration::seconds(OTP_TTL_SECS),
            created_at: now,
        };
        self.codes.create(&code).await?;
        self.identities.increment_otp_attempts(identity.id).await?;

        // 4. Out-of-band delivery. The code row is already durable; a dispatch
        //    failure surfaces without rolling it back.
        let recipient = identity.contact().ok_or_else(|| {
            AuthServiceError::Internal(anyhow::anyhow!(
                "identity {} has no contact channel",
                identity.id
            ))
        })?;
        self.notifier.send_otp(&recipient, &code.code).await?;

        Ok(())
    }
}

// ── VerifyOtp (submit) ───────────────────────────────────────────────────────

pub struct VerifyOtpInput {
    /// Email or phone, as submitted by the client in a single field.
    pub username: String,
    pub code: String,
}

#[derive(Debug)]
pub struct VerifyOtpOutput {
    pub identity_id: Uuid,
    pub access_token: String,
    pub expires_at: chrono::DateTime<Utc>,
}

pub struct VerifyOtpUseCase<I, O, T>
where
    I: IdentityRepository,
    O: OtpRepository,
    T: TokenRepository,
{
    pub identities: I,
    pub codes: O,
    pub tokens: T,
    pub jwt_secret: String,
}

impl<I, O, T> VerifyOtpUseCase<I, O, T>
where
    I: IdentityRepository,
    O: OtpRepository,
    T: TokenRepository,
{
    pub async fn execute(&self, input: VerifyOtpInput) -> Result<VerifyOtpOutput, AuthServiceError> {
        let selector = ContactPoint::either(input.username);
        let identity = self
            .identities
            .find_by_contact(&selector)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if identity.is_blocked {
            return Err(AuthServiceError::Blocked);
        }

        // Any live exact match is accepted; several codes may coexist.
        let Some(matched) = self.codes.find_valid(identity.id, &input.code).await? else {
            // The counter write lands before the failure is reported. The
            // attempt that reaches the threshold still reports the code
            // failure; only later calls see Blocked.
            self.identities.record_failed_login(identity.id).await?;
            return Err(AuthServiceError::InvalidOrExpired);
        };

        self.identities.reset_counters(identity.id).await?;

        let session = issue_token(identity.id, &self.jwt_secret)?;
        self.tokens.create(&session).await?;
        self.codes.delete(matched.id).await?;

        Ok(VerifyOtpOutput {
            identity_id: identity.id,
            access_token: session.token,
            expires_at: session.expires_at,
        })
    }
}
