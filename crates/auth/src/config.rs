use std::env;

use anyhow::{bail, Context};

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub admin: AdminSeed,
}

/// Credentials for the first administrator, both optional.
#[derive(Clone, Default)]
pub struct AdminSeed {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl AdminSeed {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    /// Both values present and not blank.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(u), Some(p)) if !u.trim().is_empty() && !p.trim().is_empty() => Some((u, p)),
            _ => None,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if jwt_secret.trim().is_empty() {
            bail!("JWT_SECRET must not be empty");
        }

        Ok(Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8081),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./data/auth.db?mode=rwc".to_string()),
            jwt_secret,
            jwt_expiry_hours: env::var("JWT_EXPIRY_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(10),
            admin: AdminSeed {
                username: env::var("ADMIN_USERNAME").ok(),
                password: env::var("ADMIN_PASSWORD").ok(),
            },
        })
    }
}
