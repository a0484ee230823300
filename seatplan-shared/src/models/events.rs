use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Seat property touched by a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatField {
    Row,
    Number,
    PositionX,
    PositionY,
    Angle,
    Person,
}

/// Change notification published by a layout session.
///
/// Observers use these to refresh their view; the engine never waits on or
/// reacts to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutEvent {
    RowAdded { row_uuid: Uuid, name: String },
    RowRemoved { row_uuid: Uuid, name: String },
    SeatAdded { seat_uuid: Uuid },
    SeatRemoved { seat_uuid: Uuid },
    SeatChanged { seat_uuid: Uuid, fields: Vec<SeatField> },
    SelectionChanged { selected: Vec<Uuid> },
    ModeChanged { read_only: bool },
    LayoutLoaded { project_id: i64, rows: usize, seats: usize },
    LayoutSaved { project_id: i64, at: DateTime<Utc> },
}

impl LayoutEvent {
    pub fn seat_changed(seat_uuid: Uuid, fields: &[SeatField]) -> Self {
        LayoutEvent::SeatChanged {
            seat_uuid,
            fields: fields.to_vec(),
        }
    }

    /// Short name used as the SSE event tag.
    pub fn kind(&self) -> &'static str {
        match self {
            LayoutEvent::RowAdded { .. } => "row_added",
            LayoutEvent::RowRemoved { .. } => "row_removed",
            LayoutEvent::SeatAdded { .. } => "seat_added",
            LayoutEvent::SeatRemoved { .. } => "seat_removed",
            LayoutEvent::SeatChanged { .. } => "seat_changed",
            LayoutEvent::SelectionChanged { .. } => "selection_changed",
            LayoutEvent::ModeChanged { .. } => "mode_changed",
            LayoutEvent::LayoutLoaded { .. } => "layout_loaded",
            LayoutEvent::LayoutSaved { .. } => "layout_saved",
        }
    }
}
