use chrono::{DateTime, Utc};
use serde::Serialize;
use uapp_common::Role;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Rows are constrained to known roles; anything else is treated as a student.
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or(Role::Student)
    }
}
