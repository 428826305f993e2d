//! 2D point in view-pixel space.

use serde::{Deserialize, Serialize};

/// Immutable 2D coordinate in view-pixel space.
///
/// Points have no identity beyond their value; all operations return new
/// points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Return a copy of this point shifted by the given deltas.
    pub fn move_by(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_by() {
        let p = Point::new(1.0, 2.0).move_by(3.0, -1.0);
        assert_eq!(p, Point::new(4.0, 1.0));
    }

    #[test]
    fn test_distance() {
        let d = Point::new(0.0, 0.0).distance_to(Point::new(3.0, 4.0));
        assert!((d - 5.0).abs() < f32::EPSILON);
    }
}
