pub mod geometry;
pub mod models;

pub use geometry::{Rect, GRID_SIZE, SEAT_HEIGHT, SEAT_WIDTH};
pub use models::events::{LayoutEvent, SeatField};
