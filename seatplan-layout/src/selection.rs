use seatplan_core::Seat;
use seatplan_shared::Rect;
use uuid::Uuid;

/// The current set of selected seats, in the order they were selected.
///
/// A seat counts as selected exactly when its id is a member here; nothing
/// else stores a selection flag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    members: Vec<Uuid>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, seat_uuid: Uuid) -> bool {
        self.members.contains(&seat_uuid)
    }

    pub fn members(&self) -> &[Uuid] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Add a seat. Returns `false` when it was already selected.
    pub fn insert(&mut self, seat_uuid: Uuid) -> bool {
        if self.contains(seat_uuid) {
            return false;
        }
        self.members.push(seat_uuid);
        true
    }

    pub fn remove(&mut self, seat_uuid: Uuid) -> bool {
        let before = self.members.len();
        self.members.retain(|m| *m != seat_uuid);
        before != self.members.len()
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    /// Flip membership of one seat. Returns whether it is now selected.
    pub fn toggle(&mut self, seat_uuid: Uuid) -> bool {
        if self.remove(seat_uuid) {
            false
        } else {
            self.members.push(seat_uuid);
            true
        }
    }

    /// Plain click: keep the selection if the seat is already part of it,
    /// otherwise select only this seat.
    pub fn select_only(&mut self, seat_uuid: Uuid) {
        if !self.contains(seat_uuid) {
            self.members.clear();
            self.members.push(seat_uuid);
        }
    }

    /// Rubber-band selection over seat footprints.
    ///
    /// Without `additive` the previous selection is replaced; with it, hits
    /// are added and everything already selected stays selected. A rectangle
    /// with negative extents covers the same area as its normalized form.
    pub fn select_by_rect(&mut self, seats: &[Seat], rect: &Rect, additive: bool) {
        let rect = rect.normalized();
        if !additive {
            self.members.clear();
        }
        for seat in seats {
            if seat.footprint().intersects(&rect) {
                self.insert(seat.uuid());
            } else if !additive {
                self.remove(seat.uuid());
            }
        }
    }

    /// Positions of the selected seats within `seats`, in selection order.
    pub fn indices(&self, seats: &[Seat]) -> Vec<usize> {
        self.members
            .iter()
            .filter_map(|m| seats.iter().position(|s| s.uuid() == *m))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seats_at(points: &[(f64, f64)]) -> Vec<Seat> {
        points.iter().map(|&(x, y)| Seat::new(x, y)).collect()
    }

    #[test]
    fn test_rect_covering_one_footprint_selects_one_seat() {
        let seats = seats_at(&[(0.0, 0.0), (200.0, 0.0), (0.0, 200.0)]);
        let mut selection = Selection::new();

        selection.select_by_rect(&seats, &Rect::new(0.0, 0.0, 80.0, 60.0), false);
        assert_eq!(selection.members(), &[seats[0].uuid()]);
        assert!(!selection.contains(seats[1].uuid()));
        assert!(!selection.contains(seats[2].uuid()));
    }

    #[test]
    fn test_non_additive_replaces_previous_selection() {
        let seats = seats_at(&[(0.0, 0.0), (200.0, 0.0)]);
        let mut selection = Selection::new();
        selection.insert(seats[1].uuid());

        selection.select_by_rect(&seats, &Rect::new(10.0, 10.0, 5.0, 5.0), false);
        assert_eq!(selection.members(), &[seats[0].uuid()]);
    }

    #[test]
    fn test_additive_keeps_previous_selection() {
        let seats = seats_at(&[(0.0, 0.0), (200.0, 0.0)]);
        let mut selection = Selection::new();
        selection.insert(seats[1].uuid());

        selection.select_by_rect(&seats, &Rect::new(10.0, 10.0, 5.0, 5.0), true);
        selection.select_by_rect(&seats, &Rect::new(10.0, 10.0, 5.0, 5.0), true);
        assert_eq!(selection.members(), &[seats[1].uuid(), seats[0].uuid()]);
    }

    #[test]
    fn test_toggle_and_select_only() {
        let seats = seats_at(&[(0.0, 0.0), (200.0, 0.0)]);
        let (a, b) = (seats[0].uuid(), seats[1].uuid());
        let mut selection = Selection::new();

        assert!(selection.toggle(a));
        assert!(selection.toggle(b));
        assert!(!selection.toggle(a));
        assert_eq!(selection.members(), &[b]);

        selection.select_only(b);
        assert_eq!(selection.members(), &[b]);
        selection.select_only(a);
        assert_eq!(selection.members(), &[a]);
    }

    #[test]
    fn test_inverted_rect_selects_the_same_seats() {
        let seats = seats_at(&[(0.0, 0.0), (200.0, 0.0), (0.0, 300.0)]);
        let mut upright = Selection::new();
        upright.select_by_rect(&seats, &Rect::new(0.0, 0.0, 150.0, 100.0), false);

        // Same area, dragged from bottom-right to top-left.
        let mut inverted = Selection::new();
        inverted.select_by_rect(&seats, &Rect::new(150.0, 100.0, -150.0, -100.0), false);

        assert_eq!(upright.members(), &[seats[0].uuid()]);
        assert_eq!(inverted.members(), upright.members());
    }

    #[test]
    fn test_indices_follow_selection_order() {
        let seats = seats_at(&[(0.0, 0.0), (100.0, 0.0), (200.0, 0.0)]);
        let mut selection = Selection::new();
        selection.insert(seats[2].uuid());
        selection.insert(seats[0].uuid());
        selection.insert(uuid::Uuid::new_v4());

        assert_eq!(selection.indices(&seats), vec![2, 0]);
    }
}
