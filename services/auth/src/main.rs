use sea_orm::Database;
use tracing::info;

use astro_auth::config::AuthConfig;
use astro_auth::router::build_router;
use astro_auth::state::AppState;
use astro_core::config::Config as _;
use astro_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AuthConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        db,
        jwt_secret: config.jwt_secret,
        notify_client: reqwest::Client::new(),
        notify_url: config.notify_url,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("auth service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
