//! Registration and login.

use sqlx::SqlitePool;
use uapp_common::{
    error::{AppError, Result},
    Role, TokenService,
};

use crate::{
    db::UserRepo,
    password::{hash_password, verify_password},
};

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub role: Role,
}

/// Creates a student account. The raw password is never stored.
pub async fn register(pool: &SqlitePool, username: &str, password: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(AppError::Validation("Username is required".to_string()));
    }
    if password.is_empty() {
        return Err(AppError::Validation("Password is required".to_string()));
    }

    if UserRepo::find_by_username(pool, username).await?.is_some() {
        return Err(AppError::DuplicateUser(username.to_string()));
    }

    let password_hash = hash_password(password)?;

    // A concurrent registration can still win the race; the unique index decides.
    match UserRepo::create(pool, username, &password_hash, Role::Student).await {
        Ok(user) => {
            tracing::info!(username = %user.username, "User registered");
            Ok(())
        }
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(AppError::DuplicateUser(username.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn login(
    pool: &SqlitePool,
    tokens: &TokenService,
    username: &str,
    password: &str,
) -> Result<LoginOutcome> {
    let user = UserRepo::find_by_username(pool, username)
        .await?
        .ok_or(AppError::Authentication)?;

    if !verify_password(password, &user.password_hash)? {
        return Err(AppError::Authentication);
    }

    let role = user.role();
    let token = tokens.issue(&user.username, role)?;

    Ok(LoginOutcome { token, role })
}
