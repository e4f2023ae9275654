use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use uapp_common::error::Result;

use crate::{
    db::models::{ImportantDate, NewImportantDate},
    services::important_dates as dates,
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_upcoming).post(add_date))
        .route("/:id", delete(delete_date))
}

async fn add_date(
    State(state): State<AppState>,
    Json(body): Json<NewImportantDate>,
) -> Result<Json<ImportantDate>> {
    Ok(Json(dates::add_date(&state.db.pool, &body).await?))
}

async fn delete_date(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    dates::delete_date(&state.db.pool, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_upcoming(State(state): State<AppState>) -> Result<Json<Vec<ImportantDate>>> {
    Ok(Json(dates::list_upcoming(&state.db.pool).await?))
}
