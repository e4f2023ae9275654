//! One-time creation of the first administrator at startup.

use sqlx::SqlitePool;
use uapp_common::{error::Result, Role};

use crate::{config::AdminSeed, db::UserRepo, password::hash_password};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    AdminAlreadyPresent,
    NotConfigured,
    UsernameTaken(String),
    Created(String),
}

/// Seeds an ADMIN user from `seed` unless an administrator already exists.
/// Never overwrites an existing account.
pub async fn ensure_admin(pool: &SqlitePool, seed: &AdminSeed) -> Result<BootstrapOutcome> {
    if UserRepo::any_with_role(pool, Role::Admin).await? {
        tracing::info!("Admin user already present, skipping admin seed");
        return Ok(BootstrapOutcome::AdminAlreadyPresent);
    }

    let Some((username, password)) = seed.credentials() else {
        tracing::warn!(
            "No admin user found and ADMIN_USERNAME/ADMIN_PASSWORD not provided; \
             create an admin user manually or set the environment variables"
        );
        return Ok(BootstrapOutcome::NotConfigured);
    };

    if UserRepo::find_by_username(pool, username).await?.is_some() {
        tracing::warn!(
            username,
            "A non-admin user with the admin username already exists, not creating admin"
        );
        return Ok(BootstrapOutcome::UsernameTaken(username.to_string()));
    }

    let password_hash = hash_password(password)?;
    UserRepo::create(pool, username, &password_hash, Role::Admin).await?;
    tracing::info!(username, "Admin user created from environment");

    Ok(BootstrapOutcome::Created(username.to_string()))
}

/// Startup wrapper: failures are logged and swallowed.
pub async fn ensure_admin_bootstrap(pool: &SqlitePool, seed: &AdminSeed) {
    if let Err(e) = ensure_admin(pool, seed).await {
        tracing::error!(error = %e, "Failed to initialize admin user");
    }
}
