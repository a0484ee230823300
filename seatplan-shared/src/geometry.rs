use serde::{Deserialize, Serialize};

/// Width of the footprint every seat occupies on the canvas.
pub const SEAT_WIDTH: f64 = 80.0;
/// Height of the footprint every seat occupies on the canvas.
pub const SEAT_HEIGHT: f64 = 60.0;
/// Snap unit for drags and collision nudges.
pub const GRID_SIZE: f64 = 10.0;

/// Axis-aligned rectangle in canvas coordinates (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Build a rectangle from two opposite corners, in any drag direction.
    pub fn from_corners(a: (f64, f64), b: (f64, f64)) -> Self {
        let x = a.0.min(b.0);
        let y = a.1.min(b.1);
        Self {
            x,
            y,
            width: (a.0 - b.0).abs(),
            height: (a.1 - b.1).abs(),
        }
    }

    /// The same area with non-negative width and height.
    pub fn normalized(&self) -> Self {
        Self::from_corners((self.x, self.y), (self.x + self.width, self.y + self.height))
    }

    /// The footprint of a seat anchored at `(x, y)`.
    pub fn footprint(x: f64, y: f64) -> Self {
        Self::new(x, y, SEAT_WIDTH, SEAT_HEIGHT)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Edge-inclusive intersection: rectangles that only touch still intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        other.x <= self.right()
            && other.right() >= self.x
            && other.y <= self.bottom()
            && other.bottom() >= self.y
    }
}
