pub mod models;

use chrono::Utc;
use sqlx::SqlitePool;
use uapp_common::{db::Database, Role};
use uuid::Uuid;

use models::User;

pub async fn run_migrations(db: &Database) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(&db.pool).await?;
    Ok(())
}

/// Persisted credentials. Usernames are unique at the schema level.
pub struct UserRepo;

impl UserRepo {
    pub async fn find_by_username(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, role, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(pool)
        .await
    }

    pub async fn any_with_role(pool: &SqlitePool, role: Role) -> Result<bool, sqlx::Error> {
        Ok(Self::count_with_role(pool, role).await? > 0)
    }

    pub async fn count_with_role(pool: &SqlitePool, role: Role) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = ?")
            .bind(role.as_str())
            .fetch_one(pool)
            .await
    }

    pub async fn create(
        pool: &SqlitePool,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, sqlx::Error> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            role: role.as_str().to_string(),
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO users (id, username, password_hash, role, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.role)
        .bind(user.created_at)
        .execute(pool)
        .await?;

        Ok(user)
    }
}
