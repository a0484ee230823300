use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use seatplan_core::LayoutError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    Layout(LayoutError),
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Layout(err) => {
                let status = match &err {
                    LayoutError::CapacityExceeded { .. }
                    | LayoutError::DuplicateSeatKey { .. }
                    | LayoutError::ConstraintViolation(_) => StatusCode::CONFLICT,
                    LayoutError::SeatNotFound(_) => StatusCode::NOT_FOUND,
                    LayoutError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
                    LayoutError::PersistenceFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                if status == StatusCode::INTERNAL_SERVER_ERROR {
                    tracing::error!("Internal Server Error: {}", err);
                }
                (status, err.to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<LayoutError> for AppError {
    fn from(err: LayoutError) -> Self {
        Self::Layout(err)
    }
}

pub type AppResult<T> = Result<T, AppError>;
