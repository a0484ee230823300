use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use seatplan_layout::{Alignment, ArrangeParams, SpacingAxis};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::AppResult;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AlignRequest {
    pub alignment: Alignment,
}

#[derive(Debug, Deserialize)]
pub struct RotateRequest {
    pub delta: f64,
}

#[derive(Debug, Deserialize)]
pub struct SpacingRequest {
    pub axis: SpacingAxis,
    pub spacing: f64,
}

#[derive(Debug, Deserialize)]
pub struct NumberingRequest {
    pub start: i64,
    #[serde(default = "default_increment")]
    pub increment: bool,
}

fn default_increment() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct DragRequest {
    pub dx: f64,
    pub dy: f64,
}

#[derive(Debug, Serialize)]
pub struct ConflictResponse {
    pub seat_uuid: Uuid,
    pub position_x: f64,
    pub position_y: f64,
    pub attempts: u32,
}

#[derive(Debug, Serialize)]
pub struct DragResponse {
    pub conflicts: Vec<ConflictResponse>,
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/arrange/align", post(align))
        .route("/v1/arrange/rotate", post(rotate))
        .route("/v1/arrange/spacing", post(spacing))
        .route("/v1/arrange/auto", post(auto_arrange))
        .route("/v1/arrange/drag", post(drag))
        .route("/v1/numbering", post(set_numbers))
}

async fn align(State(state): State<AppState>, Json(req): Json<AlignRequest>) -> AppResult<StatusCode> {
    state.session.lock().await.align(req.alignment).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn rotate(State(state): State<AppState>, Json(req): Json<RotateRequest>) -> AppResult<StatusCode> {
    state.session.lock().await.rotate_selected(req.delta).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn spacing(State(state): State<AppState>, Json(req): Json<SpacingRequest>) -> AppResult<StatusCode> {
    state.session.lock().await.set_spacing(req.axis, req.spacing).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn auto_arrange(State(state): State<AppState>, Json(params): Json<ArrangeParams>) -> AppResult<StatusCode> {
    state.session.lock().await.auto_arrange(params).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn drag(State(state): State<AppState>, Json(req): Json<DragRequest>) -> AppResult<Json<DragResponse>> {
    let conflicts = state.session.lock().await.drag_selected(req.dx, req.dy).await?;
    if !conflicts.is_empty() {
        warn!("Drag left {} seat(s) overlapping", conflicts.len());
    }

    Ok(Json(DragResponse {
        conflicts: conflicts
            .into_iter()
            .map(|c| ConflictResponse {
                seat_uuid: c.seat_uuid,
                position_x: c.position_x,
                position_y: c.position_y,
                attempts: c.attempts,
            })
            .collect(),
    }))
}

async fn set_numbers(State(state): State<AppState>, Json(req): Json<NumberingRequest>) -> AppResult<StatusCode> {
    state.session.lock().await.set_seat_numbers(req.start, req.increment).await?;
    Ok(StatusCode::NO_CONTENT)
}
