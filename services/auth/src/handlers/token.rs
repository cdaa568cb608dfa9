use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use astro_auth_types::identity::AuthenticatedIdentity;

use crate::domain::types::SessionToken;
use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::otp::{VerifyOtpInput, VerifyOtpUseCase};
use crate::usecase::token::RevokeTokenUseCase;

// ── POST /auth/submit-otp ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SubmitOtpRequest {
    /// Email or phone, in a single field.
    pub username: String,
    pub otp: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOtpResponse {
    pub message: String,
    pub access_token: String,
}

pub async fn submit_otp(
    State(state): State<AppState>,
    Json(body): Json<SubmitOtpRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = VerifyOtpUseCase {
        identities: state.identity_repo(),
        codes: state.otp_repo(),
        tokens: state.token_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };

    let out = usecase
        .execute(VerifyOtpInput {
            username: body.username,
            code: body.otp,
        })
        .await?;

    Ok((
        StatusCode::OK,
        Json(SubmitOtpResponse {
            message: "OTP verified successfully.".to_owned(),
            access_token: out.access_token,
        }),
    ))
}

// ── GET /auth/session ────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SessionResponse {
    pub identity_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

pub async fn get_session(
    identity: AuthenticatedIdentity,
    Extension(session): Extension<SessionToken>,
) -> Json<SessionResponse> {
    Json(SessionResponse {
        identity_id: identity.identity_id,
        expires_at: session.expires_at,
    })
}

// ── DELETE /auth/token ───────────────────────────────────────────────────────

pub async fn revoke_token(
    State(state): State<AppState>,
    Extension(session): Extension<SessionToken>,
) -> Result<StatusCode, AuthServiceError> {
    let usecase = RevokeTokenUseCase {
        tokens: state.token_repo(),
    };
    usecase.execute(&session.token).await?;
    Ok(StatusCode::NO_CONTENT)
}
