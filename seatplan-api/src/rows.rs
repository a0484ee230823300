use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateRowRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CreateRowResponse {
    /// `None` when a row with that name already existed.
    pub row_uuid: Option<Uuid>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/rows", post(create_row))
        .route("/v1/rows/{name}", delete(delete_row))
}

async fn create_row(
    State(state): State<AppState>,
    Json(req): Json<CreateRowRequest>,
) -> AppResult<(StatusCode, Json<CreateRowResponse>)> {
    let row_uuid = state.session.lock().await.add_row(&req.name).await?;
    let status = if row_uuid.is_some() {
        info!("Created row '{}'", req.name);
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(CreateRowResponse { row_uuid })))
}

async fn delete_row(State(state): State<AppState>, Path(name): Path<String>) -> AppResult<StatusCode> {
    let mut session = state.session.lock().await;
    if !session.delete_row(&name).await? && !session.is_read_only() {
        return Err(AppError::NotFound(format!("Row '{}' not found", name)));
    }
    Ok(StatusCode::NO_CONTENT)
}
