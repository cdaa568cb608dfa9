use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use astro_core::health::{healthz, readyz};
use astro_core::middleware::request_id_layer;

use crate::handlers::{
    sign_in::sign_in,
    token::{get_session, revoke_token, submit_otp},
};
use crate::middleware::require_auth;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/auth/session", get(get_session))
        .route("/auth/token", delete(revoke_token))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Sign-in flow
        .route("/auth/signin", post(sign_in))
        .route("/auth/submit-otp", post(submit_otp))
        // Token-gated
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
