pub mod models;
pub mod repository;

pub use models::{canonical_seat_number, AttendanceStatus, Device, EditMode, Person, Row, Seat, MAX_SEATS};
pub use repository::{InMemoryLayoutRepository, LayoutRepository, LayoutSnapshot, SaveReceipt};

use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("Seat limit of {limit} reached")]
    CapacityExceeded { limit: usize },
    #[error("Seat (row: {row}, number: {number}) already exists")]
    DuplicateSeatKey { row: String, number: String },
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("Seat not found: {0}")]
    SeatNotFound(Uuid),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),
}

/// A dragged seat that could not be nudged clear of its neighbours.
///
/// Non-fatal: the drag still commits, with the seat at its last attempted
/// position.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Seat {seat_uuid} still overlaps another seat at ({position_x}, {position_y}) after {attempts} attempts")]
pub struct PlacementConflict {
    pub seat_uuid: Uuid,
    pub position_x: f64,
    pub position_y: f64,
    pub attempts: u32,
}

pub type LayoutResult<T> = Result<T, LayoutError>;
