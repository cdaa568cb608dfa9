use sea_orm::DatabaseConnection;

use crate::infra::db::{DbIdentityRepository, DbOtpRepository, DbTokenRepository};
use crate::infra::notify::HttpNotifier;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_secret: String,
    pub notify_client: reqwest::Client,
    pub notify_url: String,
}

impl AppState {
    pub fn identity_repo(&self) -> DbIdentityRepository {
        DbIdentityRepository {
            db: self.db.clone(),
        }
    }

    pub fn otp_repo(&self) -> DbOtpRepository {
        DbOtpRepository {
            db: self.db.clone(),
        }
    }

    pub fn token_repo(&self) -> DbTokenRepository {
        DbTokenRepository {
            db: self.db.clone(),
        }
    }

    pub fn notifier(&self) -> HttpNotifier {
        HttpNotifier {
            client: self.notify_client.clone(),
            base_url: self.notify_url.clone(),
        }
    }
}
