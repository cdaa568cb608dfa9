//! Authenticated-identity extractor for protected handlers.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

/// Identity resolved by the auth middleware and injected into request
/// extensions. Protected handlers (here and in downstream services that mount
/// the middleware) extract it instead of touching tokens themselves.
///
/// Returns 401 if no identity was injected, i.e. the route was reached
/// without passing through the middleware.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedIdentity {
    pub identity_id: Uuid,
}

impl<S> FromRequestParts<S> for AuthenticatedIdentity
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // In Rust 1.82+ precise capturing, `async fn` captures lifetimes differently,
    // causing E0195. Fix: extract values synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity = parts.extensions.get::<AuthenticatedIdentity>().copied();
        async move { identity.ok_or(StatusCode::UNAUTHORIZED) }
    }
}
