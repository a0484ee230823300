use seatplan_core::{LayoutError, LayoutResult, LayoutSnapshot, Row, MAX_SEATS};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::layout::{Layout, SeatUpdate};

/// Flat, identity-free form of a layout: row names plus seat records.
///
/// Written and read wholesale. It carries no referential guarantees of its
/// own, so [`LayoutDocument::into_layout`] re-validates capacity and seat
/// keys before anything is replaced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    pub rows: Vec<String>,
    pub seats: Vec<DocumentSeat>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSeat {
    pub row_name: String,
    pub number: Option<String>,
    pub position_x: f64,
    pub position_y: f64,
    pub angle: f64,
    pub person_name: Option<String>,
    pub device_type: Option<String>,
    pub device_number: Option<String>,
}

impl LayoutDocument {
    pub fn from_layout(layout: &Layout) -> Self {
        let seats = layout
            .seats()
            .iter()
            .map(|seat| {
                let device = seat.person.as_ref().and_then(|p| p.device.as_ref());
                DocumentSeat {
                    row_name: layout.row_name(seat).to_string(),
                    number: seat.number.clone(),
                    position_x: seat.position_x,
                    position_y: seat.position_y,
                    angle: seat.angle,
                    person_name: seat.person.as_ref().map(|p| p.name.clone()),
                    device_type: device.map(|d| d.type_uuid.clone()),
                    device_number: device.map(|d| d.specific_data.clone()),
                }
            })
            .collect();

        Self {
            rows: layout.rows().iter().map(|r| r.name.clone()).collect(),
            seats,
        }
    }

    /// Rebuild a layout with fresh identities. Seats naming a row that is
    /// not listed end up unlinked; duplicate row names collapse to one row.
    pub fn into_layout(self) -> LayoutResult<Layout> {
        if self.seats.len() > MAX_SEATS {
            return Err(LayoutError::CapacityExceeded { limit: MAX_SEATS });
        }

        let mut seen = HashSet::new();
        let rows: Vec<Row> = self
            .rows
            .into_iter()
            .filter(|name| !name.trim().is_empty() && seen.insert(name.clone()))
            .map(Row::new)
            .collect();
        let mut layout = Layout::from_snapshot(LayoutSnapshot {
            rows,
            seats: Vec::new(),
        });

        for record in self.seats {
            let seat_uuid = layout.add_seat(record.position_x, record.position_y)?;
            let update = SeatUpdate {
                row_name: record.row_name,
                number: record.number.unwrap_or_default(),
                person_name: record.person_name.unwrap_or_default(),
                device_type: record.device_type.unwrap_or_default(),
                device_number: record.device_number.unwrap_or_default(),
            };
            layout.update_seat(seat_uuid, &update)?;
            if let Some(seat) = layout.seat_mut(seat_uuid) {
                seat.angle = record.angle;
            }
        }
        Ok(layout)
    }
}
