//! 2D geometry kernel: points, line segments, and quadrilaterals.
//!
//! These are the primitives the boundary-correction engine runs on. The
//! viewport is axis-aligned, but the image bounds become an arbitrary rotated
//! quadrilateral as soon as the user rotates, so containment and projection
//! queries have to work on quads rather than rects.
//!
//! All functions are pure and operate on `f32` view-pixel coordinates.
//! Degenerate inputs (parallel segments, zero-length segments) yield `None`
//! rather than non-finite coordinates.

mod line;
mod point;
mod quad;

pub use line::{LineSegment, NEAREST_POINT_EPS};
pub use point::Point;
pub use quad::{Quad, AREA_COMPARE_EPS};
