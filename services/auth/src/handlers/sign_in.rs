use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::otp::{RequestOtpInput, RequestOtpUseCase};

#[derive(Deserialize)]
pub struct SignInRequest {
    pub email: Option<String>,
    pub phone: Option<String>,
}

pub async fn sign_in(
    State(state): State<AppState>,
    Json(body): Json<SignInRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = RequestOtpUseCase {
        identities: state.identity_repo(),
        codes: state.otp_repo(),
        notifier: state.notifier(),
    };
    usecase
        .execute(RequestOtpInput {
            email: body.email,
            phone: body.phone,
        })
        .await?;

    // The code itself travels out of band only.
    let body = serde_json::json!({
        "message": "OTP has been sent to your email/phone.",
    });
    Ok((StatusCode::OK, Json(body)))
}
