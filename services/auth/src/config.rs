use serde::Deserialize;

use astro_core::config::Config;

/// Auth service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// HMAC secret for signing session tokens. Env var: `JWT_SECRET`.
    pub jwt_secret: String,
    /// Notification service base URL for OTP delivery. Env var: `NOTIFY_URL`.
    pub notify_url: String,
    /// TCP port to listen on (default 3111). Env var: `AUTH_PORT`.
    #[serde(default = "default_auth_port")]
    pub auth_port: u16,
}

fn default_auth_port() -> u16 {
    3111
}

impl Config for AuthConfig {}
