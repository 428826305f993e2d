//! Directed line segments with intersection and projection queries.

use super::Point;

/// Length-sum tolerance (view px) used to decide whether a projected foot
/// lies on the segment or past one of its endpoints.
pub const NEAREST_POINT_EPS: f32 = 1.0;

/// Two nearly-parallel segments are treated as non-intersecting below this
/// cross-product magnitude.
const PARALLEL_EPS: f32 = 1e-6;

/// Directed segment from `p1` to `p2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub p1: Point,
    pub p2: Point,
}

impl LineSegment {
    pub fn new(p1: Point, p2: Point) -> Self {
        Self { p1, p2 }
    }

    pub fn length(&self) -> f32 {
        self.p1.distance_to(self.p2)
    }

    /// The segment's direction vector `p2 - p1`.
    pub fn transition(&self) -> (f32, f32) {
        (self.p2.x - self.p1.x, self.p2.y - self.p1.y)
    }

    /// Intersection point of two segments.
    ///
    /// Solves the parametric system for the two supporting lines and accepts
    /// the solution only when both parameters fall inside `[0, 1]`. Parallel
    /// or degenerate segments yield `None`; the result is always finite.
    ///
    /// See <https://en.wikipedia.org/wiki/Intersection_(Euclidean_geometry)#Two_line_segments>
    pub fn intersect(&self, other: &LineSegment) -> Option<Point> {
        let (rx, ry) = self.transition();
        let (sx, sy) = other.transition();

        let denom = rx * sy - ry * sx;
        if denom.abs() <= PARALLEL_EPS {
            return None;
        }

        let qpx = other.p1.x - self.p1.x;
        let qpy = other.p1.y - self.p1.y;

        let t = (qpx * sy - qpy * sx) / denom;
        if !(0.0..=1.0).contains(&t) {
            return None;
        }
        let u = (qpx * ry - qpy * rx) / denom;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        Some(Point::new(self.p1.x + t * rx, self.p1.y + t * ry))
    }

    /// Segment from `target` to the orthogonal projection of `target` onto
    /// this segment's supporting line.
    ///
    /// The foot is derived from the law-of-cosines split of the segment:
    /// `w2 = (d2² + L² − d1²) / 2L`, where `d1`/`d2` are the distances from
    /// `target` to the endpoints and `L` the segment length. The foot is not
    /// clamped to the segment; callers needing segment-bounded behavior use
    /// [`LineSegment::nearest_point_to`]. `None` for zero-length segments.
    pub fn normal_from(&self, target: Point) -> Option<LineSegment> {
        let d1 = self.p1.distance_to(target);
        let d2 = self.p2.distance_to(target);
        let len = self.length();
        if len <= f32::EPSILON {
            return None;
        }

        let weight2 = (d2 * d2 + len * len - d1 * d1) / (2.0 * len);
        let weight1 = len - weight2;
        let weight = weight1 / (weight1 + weight2);
        let foot = Point::new(
            self.p1.x + (self.p2.x - self.p1.x) * weight,
            self.p1.y + (self.p2.y - self.p1.y) * weight,
        );
        Some(LineSegment::new(target, foot))
    }

    /// Point on this segment nearest to `target`.
    ///
    /// Returns the normal foot when it lies on the segment (the two
    /// sub-lengths sum to the total length within [`NEAREST_POINT_EPS`]),
    /// otherwise the closer endpoint.
    pub fn nearest_point_to(&self, target: Point) -> Option<Point> {
        let foot = self.normal_from(target)?.p2;
        let len = self.length();
        let len_p1 = self.p1.distance_to(foot);
        let len_p2 = self.p2.distance_to(foot);
        if (len_p1 + len_p2 - len).abs() < NEAREST_POINT_EPS {
            return Some(foot);
        }
        Some(if len_p1 > len_p2 { self.p2 } else { self.p1 })
    }
}
