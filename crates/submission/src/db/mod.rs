pub mod important_dates;
pub mod models;
pub mod projects;

use uapp_common::db::Database;

pub use important_dates::ImportantDateRepo;
pub use projects::ProjectRepo;

pub async fn run_migrations(db: &Database) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(&db.pool).await?;
    Ok(())
}
