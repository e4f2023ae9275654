use std::net::SocketAddr;

use uapp_auth::{bootstrap, config::Config, db, AppState};
use uapp_common::{db::Database, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    telemetry::init("uapp_auth=debug,uapp_common=debug,tower_http=debug");

    let config = Config::from_env()?;

    let db = Database::connect(&config.database_url).await?;
    db::run_migrations(&db).await?;

    bootstrap::ensure_admin_bootstrap(&db.pool, &config.admin).await;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = uapp_auth::app(AppState::new(db, &config));

    tracing::info!("Starting auth service on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
