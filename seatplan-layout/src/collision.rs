use seatplan_core::{PlacementConflict, Seat};
use seatplan_shared::GRID_SIZE;
use uuid::Uuid;

use crate::selection::Selection;

/// Nudges tried per seat before giving up.
pub const MAX_NUDGES: u32 = 10;

/// Moves the selection and pushes moved seats off their neighbours.
pub struct CollisionResolver;

impl CollisionResolver {
    /// Translate the selection by `(dx, dy)` snapped to the grid, then nudge
    /// each moved seat one grid unit at a time along the dominant drag axis
    /// until its footprint is clear, at most [`MAX_NUDGES`] times.
    ///
    /// Seats that are still overlapping are reported back, left at their
    /// last position.
    pub fn drag(seats: &mut [Seat], selection: &Selection, dx: f64, dy: f64) -> (Vec<Uuid>, Vec<PlacementConflict>) {
        let indices = selection.indices(seats);
        let dx = snap(dx);
        let dy = snap(dy);
        for &i in &indices {
            seats[i].position_x += dx;
            seats[i].position_y += dy;
        }

        let (step_x, step_y) = nudge_step(dx, dy);
        let mut conflicts = Vec::new();
        for &i in &indices {
            let mut attempts = 0;
            while attempts < MAX_NUDGES && Self::collides(seats, i) {
                seats[i].position_x += step_x;
                seats[i].position_y += step_y;
                attempts += 1;
            }
            if Self::collides(seats, i) {
                conflicts.push(PlacementConflict {
                    seat_uuid: seats[i].uuid(),
                    position_x: seats[i].position_x,
                    position_y: seats[i].position_y,
                    attempts,
                });
            }
        }

        let moved = indices.iter().map(|&i| seats[i].uuid()).collect();
        (moved, conflicts)
    }

    /// Whether the seat at `index` overlaps any other seat's footprint.
    pub fn collides(seats: &[Seat], index: usize) -> bool {
        let footprint = seats[index].footprint();
        seats
            .iter()
            .enumerate()
            .any(|(j, other)| j != index && footprint.intersects(&other.footprint()))
    }
}

fn snap(delta: f64) -> f64 {
    (delta / GRID_SIZE).round() * GRID_SIZE
}

/// One grid unit along the axis with the larger movement, in the direction
/// of travel; `+x` when nothing moved.
fn nudge_step(dx: f64, dy: f64) -> (f64, f64) {
    if dy.abs() > dx.abs() {
        (0.0, GRID_SIZE.copysign(dy))
    } else if dx < 0.0 {
        (-GRID_SIZE, 0.0)
    } else {
        (GRID_SIZE, 0.0)
    }
}
