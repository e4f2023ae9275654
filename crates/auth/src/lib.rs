//! Authentication service: accounts, login tokens and the admin seed.

pub mod bootstrap;
pub mod config;
pub mod db;
pub mod password;
pub mod routes;
pub mod service;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use uapp_common::{db::Database, TokenService};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(db: Database, config: &config::Config) -> Self {
        let tokens = TokenService::new(
            &config.jwt_secret,
            chrono::Duration::hours(config.jwt_expiry_hours),
        );
        Self { db, tokens }
    }
}

pub fn app(state: AppState) -> Router {
    let api_router = Router::new().nest("/auth", routes::auth::router());

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_router)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

async fn health_check() -> &'static str {
    "OK"
}
