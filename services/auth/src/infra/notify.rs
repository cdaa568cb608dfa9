use serde_json::json;

use crate::domain::repository::Notifier;
use crate::domain::types::ContactPoint;
use crate::error::AuthServiceError;

/// Posts one-time codes to the platform notification service, which owns the
/// actual email/SMS delivery.
#[derive(Clone)]
pub struct HttpNotifier {
    pub client: reqwest::Client,
    pub base_url: String,
}

impl Notifier for HttpNotifier {
    async fn send_otp(&self, contact: &ContactPoint, code: &str) -> Result<(), AuthServiceError> {
        let body = json!({
            "email": contact.email(),
            "phone": contact.phone(),
            "subject": "Login OTP",
            "code": code,
        });
        let response = self
            .client
            .post(format!("{}/notifications/otp", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthServiceError::NotificationFailed(e.into()))?;
        if !response.status().is_success() {
            return Err(AuthServiceError::NotificationFailed(anyhow::anyhow!(
                "notification service returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}
