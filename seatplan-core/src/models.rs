use seatplan_shared::Rect;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::{LayoutError, LayoutResult};

/// Hard ceiling on seats in one layout.
pub const MAX_SEATS: usize = 1000;

/// Normalise a seat number to the form the store keeps.
///
/// Seat numbers are stored in an integer-affinity column, which turns every
/// numeric spelling of a whole number (`"07"`, `"+7"`, `"7.0"`, `" 7 "`)
/// into the same integer. Numbers are brought to that form before they are
/// compared or stored, so uniqueness in memory and in the store agree.
/// Non-numeric numbers such as `"12A"` are kept (trimmed). Numeric values
/// that are not whole `i64`s cannot be stored faithfully and are rejected.
/// A blank number means none.
pub fn canonical_seat_number(raw: &str) -> LayoutResult<Option<String>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Ok(Some(n.to_string()));
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => {
            if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
                Ok(Some((v as i64).to_string()))
            } else {
                Err(LayoutError::InvalidArgument(format!(
                    "seat number '{}' must be a whole number or text",
                    raw
                )))
            }
        }
        _ => Ok(Some(trimmed.to_string())),
    }
}

/// Session mode. In `View` every mutating operation is a no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EditMode {
    View,
    #[default]
    Edit,
}

/// A named row that seats can be linked to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    uuid: Uuid,
    pub name: String,
}

impl Row {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
        }
    }

    /// Rebuild a row read back from storage.
    pub fn restore(uuid: Uuid, name: impl Into<String>) -> Self {
        Self {
            uuid,
            name: name.into(),
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }
}

/// Participant attendance status. Unknown stored values are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AttendanceStatus {
    #[default]
    Absent,
    Present,
    Other(String),
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttendanceStatus::Absent => write!(f, "Absent"),
            AttendanceStatus::Present => write!(f, "Present"),
            AttendanceStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

impl From<String> for AttendanceStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Absent" => AttendanceStatus::Absent,
            "Present" => AttendanceStatus::Present,
            _ => AttendanceStatus::Other(value),
        }
    }
}

impl From<AttendanceStatus> for String {
    fn from(value: AttendanceStatus) -> Self {
        value.to_string()
    }
}

/// A device carried by a participant. `specific_data` is an opaque JSON
/// string the engine never interprets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    device_uuid: Uuid,
    pub type_uuid: String,
    pub specific_data: String,
}

impl Device {
    pub fn new(type_uuid: impl Into<String>, specific_data: impl Into<String>) -> Self {
        Self {
            device_uuid: Uuid::new_v4(),
            type_uuid: type_uuid.into(),
            specific_data: specific_data.into(),
        }
    }

    pub fn restore(device_uuid: Uuid, type_uuid: impl Into<String>, specific_data: impl Into<String>) -> Self {
        Self {
            device_uuid,
            type_uuid: type_uuid.into(),
            specific_data: specific_data.into(),
        }
    }

    pub fn device_uuid(&self) -> Uuid {
        self.device_uuid
    }
}

/// The occupant of a seat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Assigned by the store on first save; `None` while transient.
    pub participant_id: Option<i64>,
    pub name: String,
    pub device: Option<Device>,
    pub is_attending: bool,
    pub is_online: bool,
    pub status: AttendanceStatus,
}

impl Person {
    pub fn new(name: impl Into<String>, device: Option<Device>) -> Self {
        Self {
            participant_id: None,
            name: name.into(),
            device,
            is_attending: false,
            is_online: false,
            status: AttendanceStatus::Absent,
        }
    }
}

/// A seat on the canvas.
///
/// The row name and selection flag are not stored here: both are derived by
/// the layout from its row index and selection set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    seat_uuid: Uuid,
    pub row_uuid: Option<Uuid>,
    pub number: Option<String>,
    pub position_x: f64,
    pub position_y: f64,
    pub angle: f64,
    pub person: Option<Person>,
}

impl Seat {
    pub fn new(position_x: f64, position_y: f64) -> Self {
        Self::restore(Uuid::new_v4(), position_x, position_y)
    }

    /// Rebuild a seat read back from storage.
    pub fn restore(seat_uuid: Uuid, position_x: f64, position_y: f64) -> Self {
        Self {
            seat_uuid,
            row_uuid: None,
            number: None,
            position_x,
            position_y,
            angle: 0.0,
            person: None,
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.seat_uuid
    }

    pub fn footprint(&self) -> Rect {
        Rect::footprint(self.position_x, self.position_y)
    }

    /// Rotate by `delta` degrees. The result keeps the sign of the sum
    /// (`370 -> 10`, `-370 -> -10`).
    pub fn rotate(&mut self, delta: f64) {
        self.angle = (self.angle + delta) % 360.0;
    }
}
