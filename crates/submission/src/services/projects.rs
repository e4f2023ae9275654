//! Project submission workflow.
//!
//! Authorization rules:
//! - `list_mine` gives the literal username `admin` every project.
//! - `list_for_admin` and `add_remark` ask the token service, which checks
//!   the role claim first and only falls back to the username.
//! - `delete_project` is owner-only, with no admin override.

use chrono::Utc;
use sqlx::SqlitePool;
use uapp_common::{
    error::{AppError, Result},
    token::is_legacy_admin_username,
    TokenService,
};

use super::notifier::Notifier;
use crate::db::{
    models::{Project, ProjectFields, Remark},
    ProjectRepo,
};

/// Author recorded on every remark.
pub const REMARK_AUTHOR: &str = "admin";

fn validate(fields: &ProjectFields) -> Result<()> {
    if fields.title.trim().is_empty() {
        return Err(AppError::Validation("Project title is required".to_string()));
    }
    Ok(())
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Project {id} not found"))
}

pub async fn create_project(
    pool: &SqlitePool,
    fields: &ProjectFields,
    summary_pdf: Option<&[u8]>,
    creator: &str,
) -> Result<Project> {
    validate(fields)?;

    let project = ProjectRepo::create(pool, fields, summary_pdf, creator).await?;
    tracing::info!(project_id = %project.id, created_by = creator, "Project created");
    Ok(project)
}

/// Absent `summary_pdf` keeps whatever PDF is already stored.
pub async fn update_project(
    pool: &SqlitePool,
    id: &str,
    fields: &ProjectFields,
    summary_pdf: Option<&[u8]>,
) -> Result<Project> {
    validate(fields)?;

    ProjectRepo::update(pool, id, fields, summary_pdf)
        .await?
        .ok_or_else(|| not_found(id))
}

pub async fn get_project(pool: &SqlitePool, id: &str) -> Result<Project> {
    ProjectRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

pub async fn list_mine(pool: &SqlitePool, username: &str) -> Result<Vec<Project>> {
    if is_legacy_admin_username(username) {
        return list_all(pool).await;
    }
    Ok(ProjectRepo::find_by_creator(pool, username).await?)
}

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Project>> {
    Ok(ProjectRepo::find_all(pool).await?)
}

pub async fn list_for_admin(
    pool: &SqlitePool,
    tokens: &TokenService,
    token: &str,
) -> Result<Vec<Project>> {
    if !tokens.is_admin(token)? {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }
    list_all(pool).await
}

pub async fn delete_project(pool: &SqlitePool, id: &str, requester: &str) -> Result<()> {
    let project = get_project(pool, id).await?;

    if project.created_by != requester {
        return Err(AppError::Forbidden(
            "Only the creator can delete this project".to_string(),
        ));
    }

    if !ProjectRepo::delete(pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(project_id = id, deleted_by = requester, "Project deleted");
    Ok(())
}

/// Appends an admin remark and notifies the project email, if any.
/// Notification failures are logged and never fail the remark.
pub async fn add_remark(
    pool: &SqlitePool,
    tokens: &TokenService,
    notifier: Option<&dyn Notifier>,
    id: &str,
    text: &str,
    token: &str,
) -> Result<Project> {
    if !tokens.is_admin(token)? {
        return Err(AppError::Forbidden(
            "Only an admin can add remarks".to_string(),
        ));
    }
    if text.trim().is_empty() {
        return Err(AppError::Validation("Remark text is required".to_string()));
    }

    let remark = Remark {
        text: text.to_string(),
        author: REMARK_AUTHOR.to_string(),
        created_at: Utc::now(),
    };
    if !ProjectRepo::append_remark(pool, id, &remark).await? {
        return Err(not_found(id));
    }

    let project = get_project(pool, id).await?;

    if let Some(email) = project.notification_email() {
        match notifier {
            Some(notifier) => {
                if let Err(e) = notifier
                    .send_remark_notification(email, &project.title, text)
                    .await
                {
                    tracing::warn!(project_id = id, error = %e, "Remark notification failed");
                }
            }
            None => {
                tracing::debug!(project_id = id, "Email not configured, skipping notification");
            }
        }
    }

    Ok(project)
}

/// Raw bytes of the stored summary PDF.
pub async fn get_pdf(pool: &SqlitePool, id: &str) -> Result<Vec<u8>> {
    match ProjectRepo::summary_pdf(pool, id).await? {
        Some(Some(pdf)) => Ok(pdf),
        Some(None) => Err(AppError::NotFound(format!("Project {id} has no PDF"))),
        None => Err(not_found(id)),
    }
}
