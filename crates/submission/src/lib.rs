//! Submission service: projects, remarks, summary PDFs and important dates.

pub mod config;
pub mod db;
pub mod middleware;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use uapp_common::{db::Database, TokenService};

use services::notifier::{Notifier, SmtpNotifier};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: config::Config,
    pub tokens: TokenService,
    pub notifier: Option<Arc<dyn Notifier>>,
}

impl AppState {
    pub fn new(db: Database, config: config::Config) -> anyhow::Result<Self> {
        let notifier: Option<Arc<dyn Notifier>> = match &config.email {
            Some(email) => Some(Arc::new(SmtpNotifier::new(email)?)),
            None => {
                tracing::warn!("SMTP_HOST not set, remark notifications are disabled");
                None
            }
        };

        Ok(Self {
            tokens: TokenService::verifier(&config.jwt_secret),
            db,
            config,
            notifier,
        })
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }
}

pub fn app(state: AppState) -> Router {
    let api_router = Router::new()
        .nest("/projects", routes::projects::router())
        .nest("/important-dates", routes::important_dates::router());

    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_router)
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
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
