use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use uuid::Uuid;

use astro_auth::domain::lockout;
use astro_auth::domain::repository::{
    IdentityRepository, Notifier, OtpRepository, TokenRepository,
};
use astro_auth::domain::types::{
    ContactPoint, Identity, OTP_TTL_SECS, OneTimeCode, SessionToken,
};
use astro_auth::error::AuthServiceError;

// ── MockIdentityRepo ─────────────────────────────────────────────────────────

pub struct MockIdentityRepo {
    pub identities: Arc<Mutex<Vec<Identity>>>,
}

impl MockIdentityRepo {
    pub fn new(identities: Vec<Identity>) -> Self {
        Self {
            identities: Arc::new(Mutex::new(identities)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Shared handle to the internal list for post-execution inspection.
    pub fn handle(&self) -> Arc<Mutex<Vec<Identity>>> {
        Arc::clone(&self.identities)
    }
}

fn matches_contact(identity: &Identity, contact: &ContactPoint) -> bool {
    contact
        .email()
        .is_some_and(|e| identity.email.as_deref() == Some(e))
        || contact
            .phone()
            .is_some_and(|p| identity.phone.as_deref() == Some(p))
}

impl IdentityRepository for MockIdentityRepo {
    async fn find_by_contact(
        &self,
        contact: &ContactPoint,
    ) -> Result<Option<Identity>, AuthServiceError> {
        Ok(self
            .identities
            .lock()
            .unwrap()
            .iter()
            .find(|i| matches_contact(i, contact))
            .cloned())
    }

    async fn create(&self, identity: &Identity) -> Result<(), AuthServiceError> {
        self.identities.lock().unwrap().push(identity.clone());
        Ok(())
    }

    async fn set_blocked(&self, id: Uuid) -> Result<(), AuthServiceError> {
        if let Some(i) = self.identities.lock().unwrap().iter_mut().find(|i| i.id == id) {
            i.is_blocked = true;
        }
        Ok(())
    }

    async fn increment_otp_attempts(&self, id: Uuid) -> Result<(), AuthServiceError> {
        if let Some(i) = self.identities.lock().unwrap().iter_mut().find(|i| i.id == id) {
            i.otp_attempts += 1;
        }
        Ok(())
    }

    async fn record_failed_login(&self, id: Uuid) -> Result<(), AuthServiceError> {
        if let Some(i) = self.identities.lock().unwrap().iter_mut().find(|i| i.id == id) {
            i.failed_login_attempts += 1;
            if lockout::should_block(i.failed_login_attempts) {
                i.is_blocked = true;
            }
        }
        Ok(())
    }

    async fn reset_counters(&self, id: Uuid) -> Result<(), AuthServiceError> {
        if let Some(i) = self.identities.lock().unwrap().iter_mut().find(|i| i.id == id) {
            i.failed_login_attempts = 0;
            i.otp_attempts = 0;
        }
        Ok(())
    }
}

// ── MockOtpRepo ──────────────────────────────────────────────────────────────

pub struct MockOtpRepo {
    pub codes: Arc<Mutex<Vec<OneTimeCode>>>,
}

impl MockOtpRepo {
    pub fn new(codes: Vec<OneTimeCode>) -> Self {
        Self {
            codes: Arc::new(Mutex::new(codes)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn handle(&self) -> Arc<Mutex<Vec<OneTimeCode>>> {
        Arc::clone(&self.codes)
    }
}

impl OtpRepository for MockOtpRepo {
    async fn create(&self, code: &OneTimeCode) -> Result<(), AuthServiceError> {
        self.codes.lock().unwrap().push(code.clone());
        Ok(())
    }

    async fn find_valid(
        &self,
        identity_id: Uuid,
        code: &str,
    ) -> Result<Option<OneTimeCode>, AuthServiceError> {
        Ok(self
            .codes
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.identity_id == identity_id && c.code == code && c.is_valid())
            .cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AuthServiceError> {
        self.codes.lock().unwrap().retain(|c| c.id != id);
        Ok(())
    }
}

// ── MockTokenRepo ────────────────────────────────────────────────────────────

pub struct MockTokenRepo {
    pub tokens: Arc<Mutex<Vec<SessionToken>>>,
}

impl MockTokenRepo {
    pub fn new(tokens: Vec<SessionToken>) -> Self {
        Self {
            tokens: Arc::new(Mutex::new(tokens)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn handle(&self) -> Arc<Mutex<Vec<SessionToken>>> {
        Arc::clone(&self.tokens)
    }
}

impl TokenRepository for MockTokenRepo {
    async fn create(&self, token: &SessionToken) -> Result<(), AuthServiceError> {
        self.tokens.lock().unwrap().push(token.clone());
        Ok(())
    }

    async fn find_live(&self, token: &str) -> Result<Option<SessionToken>, AuthServiceError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.token == token && t.is_live())
            .cloned())
    }

    async fn delete_by_value(&self, token: &str) -> Result<bool, AuthServiceError> {
        let mut tokens = self.tokens.lock().unwrap();
        let before = tokens.len();
        tokens.retain(|t| t.token != token);
        Ok(tokens.len() < before)
    }
}

// ── MockNotifier ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SentOtp {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub code: String,
}

pub struct MockNotifier {
    pub sent: Arc<Mutex<Vec<SentOtp>>>,
    pub fail: bool,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(vec![])),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            sent: Arc::new(Mutex::new(vec![])),
            fail: true,
        }
    }

    pub fn handle(&self) -> Arc<Mutex<Vec<SentOtp>>> {
        Arc::clone(&self.sent)
    }
}

impl Notifier for MockNotifier {
    async fn send_otp(&self, contact: &ContactPoint, code: &str) -> Result<(), AuthServiceError> {
        if self.fail {
            return Err(AuthServiceError::NotificationFailed(anyhow::anyhow!(
                "notification service unavailable"
            )));
        }
        self.sent.lock().unwrap().push(SentOtp {
            email: contact.email().map(str::to_owned),
            phone: contact.phone().map(str::to_owned),
            code: code.to_owned(),
        });
        Ok(())
    }
}

// ── Test fixture helpers ─────────────────────────────────────────────────────

pub fn test_identity() -> Identity {
    Identity {
        id: Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap(),
        email: Some("user@example.com".to_owned()),
        phone: Some("+1234567890".to_owned()),
        failed_login_attempts: 0,
        otp_attempts: 0,
        is_blocked: false,
        created_at: Utc::now(),
    }
}

pub fn test_code(identity_id: Uuid, value: &str) -> OneTimeCode {
    OneTimeCode {
        id: Uuid::new_v4(),
        identity_id,
        code: value.to_owned(),
        expires_at: Utc::now() + Duration::seconds(OTP_TTL_SECS),
        created_at: Utc::now(),
    }
}

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";
