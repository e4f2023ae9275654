use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use uapp_common::{error::Result, Role};

use crate::{service, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub role: Role,
}

async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<&'static str> {
    service::register(&state.db.pool, &body.username, &body.password).await?;
    Ok("User registered successfully")
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let outcome =
        service::login(&state.db.pool, &state.tokens, &body.username, &body.password).await?;

    Ok(Json(AuthResponse {
        token: outcome.token,
        role: outcome.role,
    }))
}
