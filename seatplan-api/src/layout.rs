use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use seatplan_core::EditMode;
use seatplan_layout::{LayoutDocument, LayoutSession, SeatView};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppResult;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct RowResponse {
    pub row_uuid: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct LayoutResponse {
    pub project_id: i64,
    pub read_only: bool,
    pub show_row_name: bool,
    pub show_device: bool,
    pub rows: Vec<RowResponse>,
    pub seats: Vec<SeatView>,
}

impl LayoutResponse {
    fn from_session(session: &LayoutSession) -> Self {
        Self {
            project_id: session.project_id(),
            read_only: session.is_read_only(),
            show_row_name: session.show_row_name,
            show_device: session.show_device,
            rows: session
                .rows()
                .iter()
                .map(|row| RowResponse {
                    row_uuid: row.uuid(),
                    name: row.name.clone(),
                })
                .collect(),
            seats: session.seat_views(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ModeRequest {
    pub read_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct DisplayRequest {
    pub show_row_name: Option<bool>,
    pub show_device: Option<bool>,
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/layout", get(get_layout))
        .route("/v1/layout/reload", post(reload_layout))
        .route("/v1/mode", put(set_mode))
        .route("/v1/display", put(set_display))
        .route("/v1/document", get(export_document).put(import_document))
}

async fn get_layout(State(state): State<AppState>) -> Json<LayoutResponse> {
    let session = state.session.lock().await;
    Json(LayoutResponse::from_session(&session))
}

async fn reload_layout(State(state): State<AppState>) -> AppResult<Json<LayoutResponse>> {
    let mut session = state.session.lock().await;
    session.reload().await?;
    Ok(Json(LayoutResponse::from_session(&session)))
}

async fn set_mode(State(state): State<AppState>, Json(req): Json<ModeRequest>) -> StatusCode {
    let mode = if req.read_only { EditMode::View } else { EditMode::Edit };
    state.session.lock().await.set_mode(mode);
    StatusCode::NO_CONTENT
}

async fn set_display(State(state): State<AppState>, Json(req): Json<DisplayRequest>) -> StatusCode {
    let mut session = state.session.lock().await;
    if let Some(show) = req.show_row_name {
        session.show_row_name = show;
    }
    if let Some(show) = req.show_device {
        session.show_device = show;
    }
    StatusCode::NO_CONTENT
}

async fn export_document(State(state): State<AppState>) -> Json<LayoutDocument> {
    Json(state.session.lock().await.export_document())
}

async fn import_document(
    State(state): State<AppState>,
    Json(document): Json<LayoutDocument>,
) -> AppResult<StatusCode> {
    state.session.lock().await.import_document(document).await?;
    Ok(StatusCode::NO_CONTENT)
}
