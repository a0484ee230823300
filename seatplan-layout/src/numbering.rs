use seatplan_core::{LayoutError, LayoutResult};
use uuid::Uuid;

use crate::layout::Layout;
use crate::selection::Selection;
use crate::spatial::reading_order;

/// Assigns consecutive numbers to the selection in reading order.
#[derive(Debug, Clone, Copy)]
pub struct NumberingAssigner {
    start: i64,
    step: i64,
}

impl NumberingAssigner {
    pub fn new(start: i64, increment: bool) -> Self {
        Self {
            start,
            step: if increment { 1 } else { -1 },
        }
    }

    /// Number the selected seats `start, start ± 1, ...` sorted by (y, x).
    ///
    /// Each number is checked against every other seat in the same row
    /// before it is written. The first collision aborts the pass with
    /// `DuplicateSeatKey`; seats numbered before it keep their new numbers,
    /// and their ids are left in `renumbered`.
    pub fn run(&self, layout: &mut Layout, selection: &Selection, renumbered: &mut Vec<Uuid>) -> LayoutResult<()> {
        let mut order = selection.indices(layout.seats());
        order.sort_by(|&a, &b| reading_order(&layout.seats()[a], &layout.seats()[b]));

        let mut current = self.start;
        for (n, &i) in order.iter().enumerate() {
            let seat = &layout.seats()[i];
            let seat_uuid = seat.uuid();
            let number = current.to_string();
            let row_name = layout.row_name(seat);

            if !row_name.is_empty() && layout.key_taken(seat_uuid, row_name, &number) {
                return Err(LayoutError::DuplicateSeatKey {
                    row: row_name.to_string(),
                    number,
                });
            }

            layout.seats_mut()[i].number = Some(number);
            renumbered.push(seat_uuid);

            if n + 1 < order.len() {
                current = current.checked_add(self.step).ok_or_else(|| {
                    LayoutError::InvalidArgument("seat number out of range".to_string())
                })?;
            }
        }
        Ok(())
    }
}
