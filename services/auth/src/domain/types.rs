use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Email-or-phone selector. At least one channel is always present;
/// construction fails otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactPoint {
    email: Option<String>,
    phone: Option<String>,
}

impl ContactPoint {
    /// Build from optional channels. Returns `None` when both are absent.
    pub fn new(email: Option<String>, phone: Option<String>) -> Option<Self> {
        if email.is_none() && phone.is_none() {
            return None;
        }
        Some(Self { email, phone })
    }

    /// Selector matching either channel, for flows where the client submits a
    /// single username field that may hold an email or a phone number.
    pub fn either(value: String) -> Self {
        Self {
            email: Some(value.clone()),
            phone: Some(value),
        }
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn into_parts(self) -> (Option<String>, Option<String>) {
        (self.email, self.phone)
    }
}

/// Registered identity with its abuse counters. Root entity of the auth
/// store; one-time codes and session tokens each belong to exactly one.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: Uuid,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub failed_login_attempts: i32,
    pub otp_attempts: i32,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// Fresh identity created on first sign-in: zero counters, unblocked.
    pub fn new(contact: ContactPoint) -> Self {
        let (email, phone) = contact.into_parts();
        Self {
            id: Uuid::new_v4(),
            email,
            phone,
            failed_login_attempts: 0,
            otp_attempts: 0,
            is_blocked: false,
            created_at: Utc::now(),
        }
    }

    /// Contact channel(s) for code delivery. `None` only for rows that lost
    /// both channels outside this service.
    pub fn contact(&self) -> Option<ContactPoint> {
        ContactPoint::new(self.email.clone(), self.phone.clone())
    }
}

/// One-time sign-in code delivered out of band.
#[derive(Debug, Clone)]
pub struct OneTimeCode {
    pub id: Uuid,
    pub identity_id: Uuid,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl OneTimeCode {
    pub fn is_valid(&self) -> bool {
        self.expires_at > Utc::now()
    }
}

/// Issued bearer token mirrored into the durable store.
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub id: Uuid,
    pub identity_id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl SessionToken {
    pub fn is_live(&self) -> bool {
        self.expires_at > Utc::now()
    }
}

/// One-time code length in digits.
pub const OTP_LEN: usize = 6;

/// One-time code time-to-live in seconds (10 minutes).
pub const OTP_TTL_SECS: i64 = 600;

/// Session token time-to-live in seconds (24 hours). Fixed at issuance;
/// there is no renewal.
pub const TOKEN_TTL_SECS: i64 = 86_400;
