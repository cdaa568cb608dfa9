use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use astro_auth_types::{identity::AuthenticatedIdentity, token::validate_access_token};

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::token::VerifyTokenUseCase;

/// Gate for protected routes: resolves the bearer credential to an identity
/// and injects it into request extensions for downstream handlers. Any
/// failure short-circuits with 401 before the handler runs.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthServiceError> {
    let token_value = bearer_token(&request).ok_or(AuthServiceError::InvalidToken)?;

    // Signature check rejects garbage before the store round-trip; the store
    // row stays authoritative so revoked tokens fail even before their exp.
    validate_access_token(&token_value, &state.jwt_secret)
        .map_err(|_| AuthServiceError::InvalidToken)?;

    let session = VerifyTokenUseCase {
        tokens: state.token_repo(),
    }
    .execute(&token_value)
    .await?;

    request.extensions_mut().insert(AuthenticatedIdentity {
        identity_id: session.identity_id,
    });
    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}

fn bearer_token(request: &Request) -> Option<String> {
    let value = request.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_owned())
}
