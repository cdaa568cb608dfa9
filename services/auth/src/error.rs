use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Auth service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("email or phone is required")]
    MissingContact,
    #[error("identity is blocked due to too many failed attempts")]
    Blocked,
    #[error("too many one-time code requests")]
    RateLimited,
    #[error("identity not found")]
    NotFound,
    #[error("invalid or expired one-time code")]
    InvalidOrExpired,
    #[error("invalid token")]
    InvalidToken,
    #[error("failed to dispatch one-time code")]
    NotificationFailed(#[source] anyhow::Error),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingContact => "MISSING_CONTACT",
            Self::Blocked => "BLOCKED",
            Self::RateLimited => "RATE_LIMITED",
            Self::NotFound => "NOT_FOUND",
            Self::InvalidOrExpired => "INVALID_OR_EXPIRED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::NotificationFailed(_) => "NOTIFICATION_FAILED",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MissingContact | Self::InvalidOrExpired => StatusCode::BAD_REQUEST,
            Self::Blocked | Self::RateLimited => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::NotificationFailed(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 5xx only — tower-http TraceLayer already records method/uri/status
        // for all requests. 4xx are expected client errors; logging them here
        // would be noise. Server-side failures need the error chain logged so
        // the root cause is traceable.
        match &self {
            Self::Internal(e) => tracing::error!(error = %e, kind = "INTERNAL", "internal error"),
            Self::NotificationFailed(e) => {
                tracing::error!(error = %e, kind = "NOTIFICATION_FAILED", "otp dispatch failed");
            }
            _ => {}
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
