use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};
use seatplan_layout::{SeatUpdate, SeatView};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSeatRequest {
    pub position_x: f64,
    pub position_y: f64,
}

#[derive(Debug, Serialize)]
pub struct CreateSeatResponse {
    pub seat_uuid: Option<Uuid>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/seats", post(create_seat))
        .route("/v1/seats/{id}", put(update_seat).get(get_seat).delete(delete_seat))
}

async fn create_seat(
    State(state): State<AppState>,
    Json(req): Json<CreateSeatRequest>,
) -> AppResult<(StatusCode, Json<CreateSeatResponse>)> {
    let seat_uuid = state
        .session
        .lock()
        .await
        .add_empty_seat(req.position_x, req.position_y)
        .await?;
    let status = if seat_uuid.is_some() { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(CreateSeatResponse { seat_uuid })))
}

async fn get_seat(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<SeatView>> {
    state
        .session
        .lock()
        .await
        .seat_view(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Seat {} not found", id)))
}

async fn update_seat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<SeatUpdate>,
) -> AppResult<StatusCode> {
    state.session.lock().await.update_seat(id, &update).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_seat(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    state.session.lock().await.delete_seat(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
