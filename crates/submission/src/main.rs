use std::net::SocketAddr;

use uapp_common::{db::Database, telemetry};
use uapp_submission::{config::Config, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    telemetry::init("uapp_submission=debug,uapp_common=debug,tower_http=debug");

    let config = Config::from_env()?;

    let db = Database::connect(&config.database_url).await?;
    db::run_migrations(&db).await?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = uapp_submission::app(AppState::new(db, config)?);

    tracing::info!("Starting submission service on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
