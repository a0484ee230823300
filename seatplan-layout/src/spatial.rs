use seatplan_core::Seat;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

use crate::selection::Selection;

/// Seats whose perpendicular coordinates differ by at most this much are
/// treated as one line when spacing.
pub const LINE_TOLERANCE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpacingAxis {
    Horizontal,
    Vertical,
}

/// Grid parameters for [`SpatialEngine::auto_arrange`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrangeParams {
    pub spacing_x: f64,
    pub spacing_y: f64,
    pub max_width: f64,
}

impl Default for ArrangeParams {
    fn default() -> Self {
        Self {
            spacing_x: 90.0,
            spacing_y: 70.0,
            max_width: 800.0,
        }
    }
}

/// Deterministic geometric edits over a set of seats.
pub struct SpatialEngine;

impl SpatialEngine {
    /// Snap every selected seat to the extreme edge of the selection.
    pub fn align(seats: &mut [Seat], selection: &Selection, alignment: Alignment) -> Vec<Uuid> {
        let indices = selection.indices(seats);
        if indices.is_empty() {
            return Vec::new();
        }

        let coordinate = |seat: &Seat| match alignment {
            Alignment::Left | Alignment::Right => seat.position_x,
            Alignment::Top | Alignment::Bottom => seat.position_y,
        };
        let values = indices.iter().map(|&i| coordinate(&seats[i]));
        let target = match alignment {
            Alignment::Left | Alignment::Top => values.fold(f64::INFINITY, f64::min),
            Alignment::Right | Alignment::Bottom => values.fold(f64::NEG_INFINITY, f64::max),
        };

        for &i in &indices {
            match alignment {
                Alignment::Left | Alignment::Right => seats[i].position_x = target,
                Alignment::Top | Alignment::Bottom => seats[i].position_y = target,
            }
        }
        indices.iter().map(|&i| seats[i].uuid()).collect()
    }

    pub fn rotate(seats: &mut [Seat], selection: &Selection, delta: f64) -> Vec<Uuid> {
        selection
            .indices(seats)
            .into_iter()
            .map(|i| {
                seats[i].rotate(delta);
                seats[i].uuid()
            })
            .collect()
    }

    /// Re-space the selection along one axis in a single reading-order pass.
    ///
    /// Horizontal spacing walks seats by (y, x); a new line begins whenever
    /// y moves more than [`LINE_TOLERANCE`] from the current line's anchor.
    /// Every line restarts at the x of the first seat in the walk. Vertical
    /// spacing is the same with the axes swapped.
    pub fn apply_spacing(seats: &mut [Seat], selection: &Selection, axis: SpacingAxis, spacing: f64) -> Vec<Uuid> {
        let mut order = selection.indices(seats);
        if order.is_empty() {
            return Vec::new();
        }

        // (primary, perpendicular)
        let coords = |seat: &Seat| match axis {
            SpacingAxis::Horizontal => (seat.position_x, seat.position_y),
            SpacingAxis::Vertical => (seat.position_y, seat.position_x),
        };
        order.sort_by(|&a, &b| {
            let (pa, qa) = coords(&seats[a]);
            let (pb, qb) = coords(&seats[b]);
            qa.total_cmp(&qb).then(pa.total_cmp(&pb))
        });

        let (line_start, mut anchor) = coords(&seats[order[0]]);
        let mut index = 0.0;
        for &i in &order {
            let (_, perpendicular) = coords(&seats[i]);
            if (perpendicular - anchor).abs() > LINE_TOLERANCE {
                anchor = perpendicular;
                index = 0.0;
            }
            let position = line_start + index * spacing;
            match axis {
                SpacingAxis::Horizontal => seats[i].position_x = position,
                SpacingAxis::Vertical => seats[i].position_y = position,
            }
            index += 1.0;
        }
        order.iter().map(|&i| seats[i].uuid()).collect()
    }

    /// Lay out every seat, in collection order, on a wrapping grid from the
    /// origin.
    pub fn auto_arrange(seats: &mut [Seat], params: &ArrangeParams) -> Vec<Uuid> {
        let (mut x, mut y) = (0.0, 0.0);
        for seat in seats.iter_mut() {
            seat.position_x = x;
            seat.position_y = y;
            x += params.spacing_x;
            if x >= params.max_width - params.spacing_x {
                x = 0.0;
                y += params.spacing_y;
            }
        }
        seats.iter().map(Seat::uuid).collect()
    }
}

/// Reading order: top to bottom, then left to right.
pub(crate) fn reading_order(a: &Seat, b: &Seat) -> Ordering {
    a.position_y
        .total_cmp(&b.position_y)
        .then(a.position_x.total_cmp(&b.position_x))
}
