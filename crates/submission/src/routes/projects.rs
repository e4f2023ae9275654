use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, Response, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uapp_common::error::{AppError, Result};

use crate::{
    db::models::{Project, ProjectFields},
    middleware::auth::{AuthUser, BearerToken},
    services::projects as workflow,
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route("/my", get(list_my_projects))
        .route("/admin", get(list_projects_for_admin))
        .route(
            "/:id",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/:id/pdf", get(get_pdf))
        .route("/:id/remarks", post(add_remark))
}

#[derive(Debug, Deserialize)]
pub struct AddRemarkRequest {
    pub text: String,
}

/// The two parts of a project upload: `project` (JSON) and `file` (PDF).
pub struct ProjectUpload {
    pub fields: ProjectFields,
    pub pdf: Option<Vec<u8>>,
}

pub async fn read_project_upload(mut multipart: Multipart) -> Result<ProjectUpload> {
    let mut fields = None;
    let mut pdf = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read multipart field: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read part {name}: {e}")))?;

        match name.as_str() {
            "project" => {
                let parsed = serde_json::from_slice::<ProjectFields>(&data)
                    .map_err(|e| AppError::BadRequest(format!("Invalid project part: {e}")))?;
                fields = Some(parsed);
            }
            // An empty file part means "no new file".
            "file" if !data.is_empty() => pdf = Some(data.to_vec()),
            _ => {}
        }
    }

    let fields =
        fields.ok_or_else(|| AppError::BadRequest("Missing project part".to_string()))?;

    Ok(ProjectUpload { fields, pdf })
}

async fn create_project(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> Result<Json<Project>> {
    let upload = read_project_upload(multipart).await?;
    let project = workflow::create_project(
        &state.db.pool,
        &upload.fields,
        upload.pdf.as_deref(),
        &user.username,
    )
    .await?;
    Ok(Json(project))
}

async fn list_my_projects(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Project>>> {
    Ok(Json(
        workflow::list_mine(&state.db.pool, &user.username).await?,
    ))
}

async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Project>> {
    let upload = read_project_upload(multipart).await?;
    let project =
        workflow::update_project(&state.db.pool, &id, &upload.fields, upload.pdf.as_deref())
            .await?;
    Ok(Json(project))
}

async fn get_pdf(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response<Body>> {
    let pdf = workflow::get_pdf(&state.db.pool, &id).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(header::CONTENT_DISPOSITION, "inline; filename=\"summary.pdf\"")
        .body(Body::from(pdf))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}

async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Project>> {
    Ok(Json(workflow::get_project(&state.db.pool, &id).await?))
}

async fn list_projects(State(state): State<AppState>) -> Result<Json<Vec<Project>>> {
    Ok(Json(workflow::list_all(&state.db.pool).await?))
}

async fn list_projects_for_admin(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<Vec<Project>>> {
    Ok(Json(
        workflow::list_for_admin(&state.db.pool, &state.tokens, &token).await?,
    ))
}

async fn delete_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    workflow::delete_project(&state.db.pool, &id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_remark(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path(id): Path<String>,
    Json(body): Json<AddRemarkRequest>,
) -> Result<Json<Project>> {
    let project = workflow::add_remark(
        &state.db.pool,
        &state.tokens,
        state.notifier.as_deref(),
        &id,
        &body.text,
        &token,
    )
    .await?;
    Ok(Json(project))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::FromRequest, http::Request};

    const BOUNDARY: &str = "upload-boundary";

    fn part(name: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
        let mut out = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        out.extend_from_slice(data);
        out.extend_from_slice(b"\r\n");
        out
    }

    async fn upload(parts: Vec<Vec<u8>>) -> Result<ProjectUpload> {
        let mut body = parts.concat();
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        let multipart = Multipart::from_request(request, &()).await.unwrap();
        read_project_upload(multipart).await
    }

    fn project_part() -> Vec<u8> {
        part(
            "project",
            "application/json",
            br#"{"title":"Campus Nav","startDate":"2024-01-15","finalSubmissionDate":"2024-05-30"}"#,
        )
    }

    #[tokio::test]
    async fn empty_file_part_counts_as_absent() {
        let upload = upload(vec![project_part(), part("file", "application/pdf", b"")])
            .await
            .unwrap();
        assert_eq!(upload.fields.title, "Campus Nav");
        assert!(upload.pdf.is_none());
    }

    #[tokio::test]
    async fn file_part_is_kept() {
        let upload = upload(vec![part("file", "application/pdf", b"%PDF-1.4"), project_part()])
            .await
            .unwrap();
        assert_eq!(upload.pdf.as_deref(), Some(&b"%PDF-1.4"[..]));
    }

    #[tokio::test]
    async fn missing_project_part_is_bad_request() {
        let result = upload(vec![part("file", "application/pdf", b"%PDF-1.4")]).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn malformed_project_part_is_bad_request() {
        let result = upload(vec![part("project", "application/json", b"{not json")]).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
