//! Immutable 2D affine transform matrix.
//!
//! The engine composes every gesture into one affine matrix mapping raw image
//! pixels into viewport-local view pixels. The matrix is a value type: every
//! "mutation" returns a new matrix, so previous/current transform snapshots
//! never alias.
//!
//! A point `(x, y)` maps to:
//!
//! ```text
//! x' = a * x + b * y + tx
//! y' = c * x + d * y + ty
//! ```
//!
//! Rotation follows screen coordinates (y down): a positive angle rotates
//! clockwise on screen.

use crate::geometry::{Point, Quad};
use serde::{Deserialize, Serialize};

/// Determinants below this magnitude are treated as non-invertible.
const INVERT_EPS: f32 = 1e-8;

/// 2x3 affine matrix `[a b tx; c d ty]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineMatrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineMatrix {
    pub fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Pure (possibly non-uniform) scale about the origin.
    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            a: sx,
            b: 0.0,
            c: 0.0,
            d: sy,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Apply `post` after this matrix: `result = post ∘ self`.
    pub fn post_concat(&self, post: &AffineMatrix) -> Self {
        Self {
            a: post.a * self.a + post.b * self.c,
            b: post.a * self.b + post.b * self.d,
            c: post.c * self.a + post.d * self.c,
            d: post.c * self.b + post.d * self.d,
            tx: post.a * self.tx + post.b * self.ty + post.tx,
            ty: post.c * self.tx + post.d * self.ty + post.ty,
        }
    }

    /// Translate after the current transform.
    pub fn post_translate(&self, dx: f32, dy: f32) -> Self {
        Self {
            tx: self.tx + dx,
            ty: self.ty + dy,
            ..*self
        }
    }

    /// Uniform scale about a pivot, applied after the current transform.
    pub fn post_scale(&self, s: f32, px: f32, py: f32) -> Self {
        let post = Self {
            a: s,
            b: 0.0,
            c: 0.0,
            d: s,
            tx: (1.0 - s) * px,
            ty: (1.0 - s) * py,
        };
        self.post_concat(&post)
    }

    /// Clockwise rotation about a pivot, applied after the current transform.
    pub fn post_rotate(&self, degrees: f32, px: f32, py: f32) -> Self {
        let rad = degrees.to_radians();
        let (sin, cos) = rad.sin_cos();
        let post = Self {
            a: cos,
            b: -sin,
            c: sin,
            d: cos,
            tx: px - cos * px + sin * py,
            ty: py - sin * px - cos * py,
        };
        self.post_concat(&post)
    }

    /// Copy with the translation components replaced.
    pub fn with_translation(&self, tx: f32, ty: f32) -> Self {
        Self { tx, ty, ..*self }
    }

    pub fn map_point(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.b * p.y + self.tx,
            self.c * p.x + self.d * p.y + self.ty,
        )
    }

    /// Map the axis-aligned rect `(0,0)-(width,height)` to a quad.
    pub fn map_rect_corners(&self, width: f32, height: f32) -> Quad {
        Quad::new(
            self.map_point(Point::new(0.0, 0.0)),
            self.map_point(Point::new(width, 0.0)),
            self.map_point(Point::new(width, height)),
            self.map_point(Point::new(0.0, height)),
        )
    }

    /// Axis-aligned bounding box of the mapped rect `(0,0)-(width,height)`,
    /// as `(left, top, right, bottom)`.
    pub fn map_rect_bounds(&self, width: f32, height: f32) -> (f32, f32, f32, f32) {
        let quad = self.map_rect_corners(width, height);
        let xs = [
            quad.top_left.x,
            quad.top_right.x,
            quad.bottom_right.x,
            quad.bottom_left.x,
        ];
        let ys = [
            quad.top_left.y,
            quad.top_right.y,
            quad.bottom_right.y,
            quad.bottom_left.y,
        ];
        let left = xs.iter().copied().fold(f32::INFINITY, f32::min);
        let right = xs.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let top = ys.iter().copied().fold(f32::INFINITY, f32::min);
        let bottom = ys.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        (left, top, right, bottom)
    }

    /// Inverse transform, or `None` when the matrix is singular.
    pub fn invert(&self) -> Option<Self> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() <= INVERT_EPS {
            return None;
        }
        Some(Self {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            tx: (self.b * self.ty - self.d * self.tx) / det,
            ty: (self.c * self.tx - self.a * self.ty) / det,
        })
    }

    /// The six affine components as `[a, b, tx, c, d, ty]`, the row-major
    /// layout rendering hosts expect.
    pub fn values(&self) -> [f32; 6] {
        [self.a, self.b, self.tx, self.c, self.d, self.ty]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_point_eq(actual: Point, expected: Point) {
        assert!(
            (actual.x - expected.x).abs() < 1e-3 && (actual.y - expected.y).abs() < 1e-3,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn test_identity_maps_points_unchanged() {
        let m = AffineMatrix::identity();
        assert_point_eq(m.map_point(Point::new(3.0, -7.0)), Point::new(3.0, -7.0));
    }

    #[test]
    fn test_post_translate() {
        let m = AffineMatrix::identity().post_translate(5.0, -2.0);
        assert_point_eq(m.map_point(Point::new(1.0, 1.0)), Point::new(6.0, -1.0));
    }

    #[test]
    fn test_post_scale_keeps_pivot_fixed() {
        let m = AffineMatrix::identity().post_scale(2.0, 10.0, 20.0);
        assert_point_eq(m.map_point(Point::new(10.0, 20.0)), Point::new(10.0, 20.0));
        assert_point_eq(m.map_point(Point::new(11.0, 20.0)), Point::new(12.0, 20.0));
    }

    #[test]
    fn test_post_rotate_90_about_origin() {
        let m = AffineMatrix::identity().post_rotate(90.0, 0.0, 0.0);
        // Clockwise in y-down screen space: (1, 0) -> (0, 1).
        assert_point_eq(m.map_point(Point::new(1.0, 0.0)), Point::new(0.0, 1.0));
    }

    #[test]
    fn test_post_rotate_keeps_pivot_fixed() {
        let m = AffineMatrix::identity().post_rotate(37.0, 4.0, 9.0);
        assert_point_eq(m.map_point(Point::new(4.0, 9.0)), Point::new(4.0, 9.0));
    }

    #[test]
    fn test_rotation_composes_to_full_turn() {
        let mut m = AffineMatrix::identity();
        for _ in 0..4 {
            m = m.post_rotate(90.0, 50.0, 50.0);
        }
        assert_point_eq(m.map_point(Point::new(10.0, 20.0)), Point::new(10.0, 20.0));
    }

    #[test]
    fn test_with_translation_replaces_offsets() {
        let m = AffineMatrix::scale(2.0, 2.0)
            .post_translate(7.0, 8.0)
            .with_translation(1.0, 2.0);
        assert_eq!(m.tx, 1.0);
        assert_eq!(m.ty, 2.0);
        assert_eq!(m.a, 2.0);
    }

    #[test]
    fn test_invert_round_trip() {
        let m = AffineMatrix::scale(2.0, 2.0)
            .post_rotate(30.0, 5.0, 5.0)
            .post_translate(12.0, -4.0);
        let inv = m.invert().unwrap();
        let p = Point::new(17.0, 23.0);
        assert_point_eq(inv.map_point(m.map_point(p)), p);
    }

    #[test]
    fn test_invert_singular() {
        let m = AffineMatrix::scale(0.0, 1.0);
        assert!(m.invert().is_none());
    }

    #[test]
    fn test_map_rect_bounds_rotated() {
        let m = AffineMatrix::identity().post_rotate(45.0, 0.0, 0.0);
        let (left, top, right, bottom) = m.map_rect_bounds(10.0, 10.0);
        let half_diag = 10.0 * std::f32::consts::SQRT_2 / 2.0;
        assert!((left - -half_diag).abs() < 1e-3);
        assert!((right - half_diag).abs() < 1e-3);
        assert!(top.abs() < 1e-3);
        assert!((bottom - 10.0 * std::f32::consts::SQRT_2).abs() < 1e-3);
    }

    #[test]
    fn test_values_layout() {
        let m = AffineMatrix {
            a: 1.0,
            b: 2.0,
            c: 3.0,
            d: 4.0,
            tx: 5.0,
            ty: 6.0,
        };
        assert_eq!(m.values(), [1.0, 2.0, 5.0, 3.0, 4.0, 6.0]);
    }
}
