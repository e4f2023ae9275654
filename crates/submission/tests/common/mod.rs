#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method, Request, Response,
    },
    Router,
};
use chrono::{Duration, NaiveDate};
use http_body_util::BodyExt;
use tower::ServiceExt;
use uapp_common::{db::Database, Role, TokenService};
use uapp_submission::{
    config::Config,
    db::{self, models::ProjectFields},
    services::notifier::{Notifier, NotifyError},
    AppState,
};

pub const TEST_SECRET: &str = "integration-test-secret-with-enough-bytes";
pub const BOUNDARY: &str = "----uapp-test-boundary";

pub fn test_config() -> Config {
    Config {
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        max_upload_bytes: 1024 * 1024,
        email: None,
    }
}

pub async fn test_state() -> AppState {
    let db = Database::connect_in_memory()
        .await
        .expect("in-memory database should open");
    db::run_migrations(&db)
        .await
        .expect("migrations should apply");
    AppState::new(db, test_config()).expect("state should build without SMTP")
}

/// Signs tokens the way the auth service does.
pub fn issuer() -> TokenService {
    TokenService::new(TEST_SECRET, Duration::hours(1))
}

pub fn token_for(username: &str, role: Role) -> String {
    issuer().issue(username, role).unwrap()
}

pub fn sample_fields(title: &str) -> ProjectFields {
    ProjectFields {
        title: title.to_string(),
        description: "A project".to_string(),
        students: vec!["Alice".to_string(), "Bob".to_string()],
        guide_name: "Dr. Rao".to_string(),
        co_guide_name: None,
        email: None,
        github_repo: Some("https://github.com/example/repo".to_string()),
        start_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        final_submission_date: NaiveDate::from_ymd_opt(2024, 5, 30).unwrap(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentNotification {
    pub to: String,
    pub project_title: String,
    pub remark: String,
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<SentNotification>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_remark_notification(
        &self,
        to: &str,
        project_title: &str,
        remark: &str,
    ) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(SentNotification {
            to: to.to_string(),
            project_title: project_title.to_string(),
            remark: remark.to_string(),
        });
        Ok(())
    }
}

pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send_remark_notification(
        &self,
        _to: &str,
        _project_title: &str,
        _remark: &str,
    ) -> Result<(), NotifyError> {
        Err(NotifyError::Build("relay unavailable".to_string()))
    }
}

pub fn recording_notifier() -> Arc<RecordingNotifier> {
    Arc::new(RecordingNotifier::default())
}

/// Builds a multipart body with a JSON `project` part and optional `file` part.
pub fn multipart_body(project: &serde_json::Value, pdf: Option<&[u8]>) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"project\"\r\n");
    body.extend_from_slice(b"Content-Type: application/json\r\n\r\n");
    body.extend_from_slice(project.to_string().as_bytes());
    body.extend_from_slice(b"\r\n");

    if let Some(pdf) = pdf {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            b"Content-Disposition: form-data; name=\"file\"; filename=\"summary.pdf\"\r\n",
        );
        body.extend_from_slice(b"Content-Type: application/pdf\r\n\r\n");
        body.extend_from_slice(pdf);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn project_json(title: &str, email: Option<&str>) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "description": "Campus navigation app",
        "students": ["Alice", "Bob"],
        "guideName": "Dr. Rao",
        "email": email,
        "githubRepo": "https://github.com/example/repo",
        "startDate": "2024-01-15",
        "finalSubmissionDate": "2024-05-30"
    })
}

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    content_type: Option<&str>,
    body: Body,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    if let Some(content_type) = content_type {
        builder = builder.header(CONTENT_TYPE, content_type);
    }
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, Method::GET, uri, token, None, Body::empty()).await
}

pub async fn delete(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, Method::DELETE, uri, token, None, Body::empty()).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send(
        app,
        Method::POST,
        uri,
        token,
        Some("application/json"),
        Body::from(body.to_string()),
    )
    .await
}

pub async fn send_multipart(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Vec<u8>,
) -> Response<Body> {
    send(
        app,
        method,
        uri,
        token,
        Some(&format!("multipart/form-data; boundary={BOUNDARY}")),
        Body::from(body),
    )
    .await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("body should be JSON")
}
