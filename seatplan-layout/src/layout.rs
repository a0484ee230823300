use seatplan_core::{
    canonical_seat_number, Device, LayoutError, LayoutResult, LayoutSnapshot, Person, Row, Seat,
    MAX_SEATS,
};
use seatplan_shared::SeatField;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Edit applied by [`Layout::update_seat`]. Empty strings mean "clear".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeatUpdate {
    pub row_name: String,
    pub number: String,
    pub person_name: String,
    pub device_type: String,
    pub device_number: String,
}

/// The working copy of one project's rows and seats.
///
/// Row names are resolved through `row_index` on demand, so a seat's row
/// name can never drift from its row.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    rows: Vec<Row>,
    seats: Vec<Seat>,
    row_index: HashMap<Uuid, usize>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a layout from stored state. Seat links to rows that no longer
    /// exist are dropped.
    pub fn from_snapshot(snapshot: LayoutSnapshot) -> Self {
        let mut layout = Self {
            rows: snapshot.rows,
            seats: snapshot.seats,
            row_index: HashMap::new(),
        };
        layout.reindex_rows();

        let index = &layout.row_index;
        for seat in layout.seats.iter_mut() {
            if seat.row_uuid.is_some_and(|uuid| !index.contains_key(&uuid)) {
                seat.row_uuid = None;
            }
        }
        layout
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub(crate) fn seats_mut(&mut self) -> &mut [Seat] {
        &mut self.seats
    }

    pub fn seat(&self, seat_uuid: Uuid) -> Option<&Seat> {
        self.seats.iter().find(|s| s.uuid() == seat_uuid)
    }

    pub(crate) fn seat_mut(&mut self, seat_uuid: Uuid) -> Option<&mut Seat> {
        self.seats.iter_mut().find(|s| s.uuid() == seat_uuid)
    }

    pub fn row(&self, row_uuid: Uuid) -> Option<&Row> {
        self.row_index.get(&row_uuid).map(|&i| &self.rows[i])
    }

    pub fn row_by_name(&self, name: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.name == name)
    }

    /// Name of the row the seat belongs to, or `""` when unlinked.
    pub fn row_name(&self, seat: &Seat) -> &str {
        seat.row_uuid
            .and_then(|uuid| self.row(uuid))
            .map(|row| row.name.as_str())
            .unwrap_or("")
    }

    /// Whether a seat other than `except` already carries `(row_name, number)`.
    /// Numbers are compared in canonical form, the way the store keys them.
    pub fn key_taken(&self, except: Uuid, row_name: &str, number: &str) -> bool {
        let Ok(Some(wanted)) = canonical_seat_number(number) else {
            return false;
        };
        self.seats.iter().any(|s| {
            s.uuid() != except
                && self.row_name(s) == row_name
                && s.number
                    .as_deref()
                    .is_some_and(|n| canonical_seat_number(n).ok().flatten().as_deref() == Some(wanted.as_str()))
        })
    }

    /// Append a row. Returns `None` when a row of that name already exists.
    pub fn add_row(&mut self, name: &str) -> LayoutResult<Option<&Row>> {
        if name.trim().is_empty() {
            return Err(LayoutError::InvalidArgument("row name must not be empty".to_string()));
        }
        if self.row_by_name(name).is_some() {
            return Ok(None);
        }

        self.rows.push(Row::new(name));
        self.reindex_rows();
        Ok(self.rows.last())
    }

    /// Remove a row that no seat references. Returns `None` for unknown names.
    pub fn delete_row(&mut self, name: &str) -> LayoutResult<Option<Row>> {
        let Some(position) = self.rows.iter().position(|r| r.name == name) else {
            return Ok(None);
        };

        let row_uuid = self.rows[position].uuid();
        let linked = self.seats.iter().filter(|s| s.row_uuid == Some(row_uuid)).count();
        if linked > 0 {
            return Err(LayoutError::ConstraintViolation(format!(
                "row '{}' still has {} seat(s) assigned",
                name, linked
            )));
        }

        let row = self.rows.remove(position);
        self.reindex_rows();
        Ok(Some(row))
    }

    pub fn add_seat(&mut self, position_x: f64, position_y: f64) -> LayoutResult<Uuid> {
        if self.seats.len() >= MAX_SEATS {
            return Err(LayoutError::CapacityExceeded { limit: MAX_SEATS });
        }
        check_finite(&[position_x, position_y])?;

        let seat = Seat::new(position_x, position_y);
        let seat_uuid = seat.uuid();
        self.seats.push(seat);
        Ok(seat_uuid)
    }

    pub fn remove_seat(&mut self, seat_uuid: Uuid) -> LayoutResult<Seat> {
        let position = self
            .seats
            .iter()
            .position(|s| s.uuid() == seat_uuid)
            .ok_or(LayoutError::SeatNotFound(seat_uuid))?;
        Ok(self.seats.remove(position))
    }

    /// Relink, renumber and reoccupy a seat.
    ///
    /// The occupant is always replaced by a fresh `Person`, so a previous
    /// participant id, attendance, online flag and status do not survive an
    /// edit.
    pub fn update_seat(&mut self, seat_uuid: Uuid, update: &SeatUpdate) -> LayoutResult<Vec<SeatField>> {
        if self.seat(seat_uuid).is_none() {
            return Err(LayoutError::SeatNotFound(seat_uuid));
        }
        let number = canonical_seat_number(&update.number)?;
        if let Some(number) = number.as_deref() {
            if !update.row_name.is_empty() && self.key_taken(seat_uuid, &update.row_name, number) {
                return Err(LayoutError::DuplicateSeatKey {
                    row: update.row_name.clone(),
                    number: number.to_string(),
                });
            }
        }

        let row_uuid = self.row_by_name(&update.row_name).map(Row::uuid);
        let person = if update.person_name.is_empty() {
            None
        } else {
            let device = (!update.device_type.is_empty())
                .then(|| Device::new(update.device_type.as_str(), update.device_number.as_str()));
            Some(Person::new(update.person_name.as_str(), device))
        };

        let seat = self
            .seat_mut(seat_uuid)
            .ok_or(LayoutError::SeatNotFound(seat_uuid))?;
        seat.row_uuid = row_uuid;
        seat.number = number;
        seat.person = person;

        Ok(vec![SeatField::Row, SeatField::Number, SeatField::Person])
    }

    /// Record a participant id handed out by the store.
    pub(crate) fn assign_participant(&mut self, seat_uuid: Uuid, participant_id: i64) {
        if let Some(person) = self.seat_mut(seat_uuid).and_then(|s| s.person.as_mut()) {
            person.participant_id = Some(participant_id);
        }
    }

    fn reindex_rows(&mut self) {
        self.row_index = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| (row.uuid(), i))
            .collect();
    }
}

pub(crate) fn check_finite(values: &[f64]) -> LayoutResult<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(LayoutError::InvalidArgument("coordinates must be finite numbers".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(row: &str, number: &str, person: &str) -> SeatUpdate {
        SeatUpdate {
            row_name: row.to_string(),
            number: number.to_string(),
            person_name: person.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_row_is_idempotent_by_name() {
        let mut layout = Layout::new();
        let uuid = layout.add_row("A").unwrap().unwrap().uuid();

        assert!(layout.add_row("A").unwrap().is_none());
        assert_eq!(layout.rows().len(), 1);
        assert_eq!(layout.row(uuid).unwrap().name, "A");
        assert!(matches!(layout.add_row("  "), Err(LayoutError::InvalidArgument(_))));
    }

    #[test]
    fn test_capacity_limit() {
        let mut layout = Layout::new();
        for i in 0..MAX_SEATS {
            layout.add_seat(i as f64, 0.0).unwrap();
        }

        let result = layout.add_seat(0.0, 0.0);
        assert!(matches!(result, Err(LayoutError::CapacityExceeded { limit: 1000 })));
        assert_eq!(layout.seats().len(), MAX_SEATS);
    }

    #[test]
    fn test_delete_row_with_seats_is_rejected() {
        let mut layout = Layout::new();
        layout.add_row("A").unwrap();
        layout.add_row("B").unwrap();
        let seat = layout.add_seat(0.0, 0.0).unwrap();
        layout.update_seat(seat, &update("A", "1", "")).unwrap();

        let result = layout.delete_row("A");
        assert!(matches!(result, Err(LayoutError::ConstraintViolation(_))));
        assert_eq!(layout.rows().len(), 2);

        assert!(layout.delete_row("B").unwrap().is_some());
        assert!(layout.delete_row("missing").unwrap().is_none());
        assert_eq!(layout.row_name(layout.seat(seat).unwrap()), "A");
    }

    #[test]
    fn test_update_seat_rejects_duplicate_key() {
        let mut layout = Layout::new();
        layout.add_row("A").unwrap();
        let first = layout.add_seat(0.0, 0.0).unwrap();
        let second = layout.add_seat(100.0, 0.0).unwrap();
        layout.update_seat(first, &update("A", "1", "Ada")).unwrap();

        let result = layout.update_seat(second, &update("A", "1", "Grace"));
        assert!(matches!(result, Err(LayoutError::DuplicateSeatKey { .. })));
        let untouched = layout.seat(second).unwrap();
        assert!(untouched.number.is_none());
        assert!(untouched.person.is_none());

        // Re-saving the same key on the same seat is fine.
        layout.update_seat(first, &update("A", "1", "Ada")).unwrap();
    }

    #[test]
    fn test_numeric_spellings_share_one_key() {
        let mut layout = Layout::new();
        layout.add_row("A").unwrap();
        let first = layout.add_seat(0.0, 0.0).unwrap();
        let second = layout.add_seat(100.0, 0.0).unwrap();

        layout.update_seat(first, &update("A", "07", "")).unwrap();
        assert_eq!(layout.seat(first).unwrap().number.as_deref(), Some("7"));

        for spelling in ["7", "+7", "7.0"] {
            let result = layout.update_seat(second, &update("A", spelling, ""));
            assert!(matches!(result, Err(LayoutError::DuplicateSeatKey { .. })), "{}", spelling);
        }
        assert!(matches!(
            layout.update_seat(second, &update("A", "7.5", "")),
            Err(LayoutError::InvalidArgument(_))
        ));
        assert!(layout.seat(second).unwrap().number.is_none());

        // A hand-set spelling is still caught.
        layout.seat_mut(second).unwrap().number = Some("8".to_string());
        assert!(layout.key_taken(first, "A", "008"));
    }

    #[test]
    fn test_update_seat_unknown_row_clears_link() {
        let mut layout = Layout::new();
        layout.add_row("A").unwrap();
        let seat = layout.add_seat(0.0, 0.0).unwrap();
        layout.update_seat(seat, &update("A", "3", "")).unwrap();

        layout.update_seat(seat, &update("Z", "", "")).unwrap();
        let seat = layout.seat(seat).unwrap();
        assert_eq!(seat.row_uuid, None);
        assert_eq!(seat.number, None);
        assert_eq!(layout.row_name(seat), "");
    }

    #[test]
    fn test_update_seat_replaces_person_wholesale() {
        let mut layout = Layout::new();
        let seat_uuid = layout.add_seat(0.0, 0.0).unwrap();
        let edit = SeatUpdate {
            person_name: "Ada".to_string(),
            device_type: "tablet".to_string(),
            device_number: "{\"no\":\"12\"}".to_string(),
            ..Default::default()
        };
        layout.update_seat(seat_uuid, &edit).unwrap();
        layout.assign_participant(seat_uuid, 42);

        layout.update_seat(seat_uuid, &edit).unwrap();
        let person = layout.seat(seat_uuid).unwrap().person.as_ref().unwrap();
        assert_eq!(person.participant_id, None);
        assert_eq!(person.device.as_ref().unwrap().specific_data, "{\"no\":\"12\"}");

        layout.update_seat(seat_uuid, &SeatUpdate::default()).unwrap();
        assert!(layout.seat(seat_uuid).unwrap().person.is_none());
    }

    #[test]
    fn test_from_snapshot_drops_dangling_row_links() {
        let row = Row::new("A");
        let mut linked = Seat::new(0.0, 0.0);
        linked.row_uuid = Some(row.uuid());
        let mut dangling = Seat::new(100.0, 0.0);
        dangling.row_uuid = Some(Uuid::new_v4());

        let layout = Layout::from_snapshot(LayoutSnapshot {
            rows: vec![row],
            seats: vec![linked, dangling],
        });
        assert_eq!(layout.row_name(&layout.seats()[0]), "A");
        assert_eq!(layout.seats()[1].row_uuid, None);
    }
}
