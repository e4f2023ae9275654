use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::models::{ImportantDate, NewImportantDate};

#[derive(sqlx::FromRow)]
struct ImportantDateRow {
    id: String,
    title: String,
    description: String,
    date_ms: i64,
}

impl From<ImportantDateRow> for ImportantDate {
    fn from(row: ImportantDateRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            date: DateTime::from_timestamp_millis(row.date_ms).unwrap_or_default(),
        }
    }
}

/// Calendar entries. Dates are stored as Unix milliseconds so that
/// comparison against "now" is numeric.
pub struct ImportantDateRepo;

impl ImportantDateRepo {
    pub async fn create(
        pool: &SqlitePool,
        input: &NewImportantDate,
    ) -> Result<ImportantDate, sqlx::Error> {
        let date = ImportantDate {
            id: Uuid::new_v4().to_string(),
            title: input.title.clone(),
            description: input.description.clone(),
            date: input.date,
        };

        sqlx::query(
            "INSERT INTO important_dates (id, title, description, date_ms) VALUES (?, ?, ?, ?)",
        )
        .bind(&date.id)
        .bind(&date.title)
        .bind(&date.description)
        .bind(date.date.timestamp_millis())
        .execute(pool)
        .await?;

        Ok(date)
    }

    pub async fn delete(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM important_dates WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Entries strictly after `now`, in storage order.
    pub async fn find_after(
        pool: &SqlitePool,
        now: DateTime<Utc>,
    ) -> Result<Vec<ImportantDate>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ImportantDateRow>(
            "SELECT id, title, description, date_ms FROM important_dates WHERE date_ms > ? ORDER BY rowid",
        )
        .bind(now.timestamp_millis())
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(ImportantDate::from).collect())
    }
}
