//! Quadrilaterals: rotated image bounds and the viewport they must cover.

use super::{LineSegment, Point};

/// Area-sum tolerance (px²) for the point-containment test. Absorbs the
/// floating-point drift accumulated by repeated incremental matrix
/// composition.
pub const AREA_COMPARE_EPS: f32 = 10.0;

/// A quadrilateral given by its four corners in clockwise order.
///
/// Both the (possibly rotated) image bounds and the viewport are expressed
/// this way for containment geometry. Corner order is `top_left`,
/// `top_right`, `bottom_right`, `bottom_left` of the unrotated shape; the
/// names keep their meaning under rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
}

impl Quad {
    pub fn new(top_left: Point, top_right: Point, bottom_right: Point, bottom_left: Point) -> Self {
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        }
    }

    /// Midpoint of the diagonal corner pair.
    pub fn center(&self) -> Point {
        Point::new(
            (self.top_right.x + self.bottom_left.x) / 2.0,
            (self.top_right.y + self.bottom_left.y) / 2.0,
        )
    }

    /// Return a copy translated by the given deltas.
    pub fn move_by(&self, dx: f32, dy: f32) -> Self {
        Self {
            top_left: self.top_left.move_by(dx, dy),
            top_right: self.top_right.move_by(dx, dy),
            bottom_right: self.bottom_right.move_by(dx, dy),
            bottom_left: self.bottom_left.move_by(dx, dy),
        }
    }

    /// The four border edges, traversed clockwise starting at the top edge.
    pub fn clockwise_borders(&self) -> [LineSegment; 4] {
        [
            LineSegment::new(self.top_left, self.top_right),
            LineSegment::new(self.top_right, self.bottom_right),
            LineSegment::new(self.bottom_right, self.bottom_left),
            LineSegment::new(self.bottom_left, self.top_left),
        ]
    }

    /// The four corners in clockwise order, matching
    /// [`Quad::clockwise_borders`].
    pub fn clockwise_corners(&self) -> [Point; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// Area-sum containment test.
    ///
    /// A point is inside iff the four triangles it forms with the corners sum
    /// to the quad's own area within [`AREA_COMPARE_EPS`].
    pub fn contains_point(&self, p: Point) -> bool {
        fn triangle_area(p1: Point, p2: Point, p3: Point) -> f32 {
            ((p2.x - p1.x) * (p3.y - p1.y) - (p3.x - p1.x) * (p2.y - p1.y)).abs() / 2.0
        }

        let area = triangle_area(self.top_left, self.top_right, self.bottom_left) * 2.0;
        let point_area = triangle_area(self.top_left, self.top_right, p)
            + triangle_area(self.top_left, self.bottom_left, p)
            + triangle_area(self.bottom_left, self.bottom_right, p)
            + triangle_area(self.top_right, self.bottom_right, p);
        (area - point_area).abs() < AREA_COMPARE_EPS
    }

    /// True when every corner of `other` lies inside this quad.
    pub fn contains_quad(&self, other: &Quad) -> bool {
        self.contains_point(other.top_left)
            && self.contains_point(other.top_right)
            && self.contains_point(other.bottom_left)
            && self.contains_point(other.bottom_right)
    }
}
