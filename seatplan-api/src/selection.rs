use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use seatplan_shared::Rect;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppResult;
use crate::state::AppState;

/// A rubber-band drag from `start` to `end`, in any direction.
#[derive(Debug, Deserialize)]
pub struct RectSelectRequest {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    #[serde(default)]
    pub additive: bool,
}

#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    pub selected: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub selected: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/selection", get(get_selection).delete(clear_selection))
        .route("/v1/selection/rect", post(select_by_rect))
        .route("/v1/selection/seats/{id}", post(select_seat))
        .route("/v1/selection/seats/{id}/toggle", post(toggle_seat))
}

async fn get_selection(State(state): State<AppState>) -> Json<SelectionResponse> {
    let session = state.session.lock().await;
    Json(SelectionResponse {
        selected: session.selection().members().to_vec(),
    })
}

async fn select_by_rect(
    State(state): State<AppState>,
    Json(req): Json<RectSelectRequest>,
) -> AppResult<Json<SelectionResponse>> {
    let rect = Rect::from_corners((req.start_x, req.start_y), (req.end_x, req.end_y));
    let mut session = state.session.lock().await;
    session.select_by_rect(rect, req.additive).await?;
    Ok(Json(SelectionResponse {
        selected: session.selection().members().to_vec(),
    }))
}

async fn select_seat(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<SelectionResponse>> {
    let mut session = state.session.lock().await;
    session.select_seat(id).await?;
    Ok(Json(SelectionResponse {
        selected: session.selection().members().to_vec(),
    }))
}

async fn toggle_seat(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<ToggleResponse>> {
    let selected = state.session.lock().await.toggle_seat(id).await?;
    Ok(Json(ToggleResponse { selected }))
}

async fn clear_selection(State(state): State<AppState>) -> AppResult<Json<SelectionResponse>> {
    let mut session = state.session.lock().await;
    session.clear_selection().await?;
    Ok(Json(SelectionResponse {
        selected: session.selection().members().to_vec(),
    }))
}
