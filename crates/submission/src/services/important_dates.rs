use chrono::Utc;
use sqlx::SqlitePool;
use uapp_common::error::{AppError, Result};

use crate::db::{
    models::{ImportantDate, NewImportantDate},
    ImportantDateRepo,
};

pub async fn add_date(pool: &SqlitePool, input: &NewImportantDate) -> Result<ImportantDate> {
    if input.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    Ok(ImportantDateRepo::create(pool, input).await?)
}

/// Deleting an unknown id is not an error.
pub async fn delete_date(pool: &SqlitePool, id: &str) -> Result<()> {
    if !ImportantDateRepo::delete(pool, id).await? {
        tracing::debug!(id, "Important date already absent");
    }
    Ok(())
}

pub async fn list_upcoming(pool: &SqlitePool) -> Result<Vec<ImportantDate>> {
    Ok(ImportantDateRepo::find_after(pool, Utc::now()).await?)
}
