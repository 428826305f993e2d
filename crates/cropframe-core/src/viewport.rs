//! Viewport rect, layout fitting, and crop-shape selection.
//!
//! The viewport is the fixed crop window the surrounding layout positions
//! over the image. The engine never moves it; it only receives updates when
//! the layout changes. [`Viewport::calculate`] reproduces the standard
//! layout policy: center a maximal rect of the requested aspect ratio inside
//! the measured area, inset by a uniform offset.

use crate::geometry::{Point, Quad};
use serde::{Deserialize, Serialize};

/// Axis-aligned crop window in view-pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Viewport {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Fit a viewport of aspect `aspect_x : aspect_y` into a measured area of
    /// `width` x `height` pixels, inset by `offset` on every side, centered.
    pub fn calculate(width: f32, height: f32, offset: f32, aspect_x: u32, aspect_y: u32) -> Self {
        let x = width * 0.5;
        let y = height * 0.5;

        let max_width = width - offset * 2.0;
        let max_height = height - offset * 2.0;

        let (desired_width, desired_height) = if max_width < max_height {
            (max_width, max_width * aspect_y as f32 / aspect_x as f32)
        } else if max_width > max_height {
            (max_height * aspect_x as f32 / aspect_y as f32, max_height)
        } else {
            (max_width, max_height)
        };

        let mut result_width = max_width;
        let mut result_height = max_width * desired_height / desired_width;
        if result_height > max_height {
            result_height = max_height;
            result_width = desired_width * max_height / desired_height;
        }

        Self {
            left: x - result_width / 2.0,
            top: y - result_height / 2.0,
            right: x + result_width / 2.0,
            bottom: y + result_height / 2.0,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center_x(&self) -> f32 {
        (self.left + self.right) / 2.0
    }

    pub fn center_y(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// The viewport as a quad for containment geometry.
    pub fn to_quad(&self) -> Quad {
        Quad::new(
            Point::new(self.left, self.top),
            Point::new(self.right, self.top),
            Point::new(self.right, self.bottom),
            Point::new(self.left, self.bottom),
        )
    }
}

/// Shape of the crop window. Selection is data: the renderer asks for a
/// clearing instruction instead of subclassing an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CropShape {
    Rect,
    #[default]
    Oval,
}

/// Geometry-clearing instruction for the overlay renderer: which region of
/// the dimmed overlay to punch out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ClearInstruction {
    /// Clear the full viewport rect.
    Rect(Viewport),
    /// Clear the ellipse inscribed in the viewport rect.
    Oval(Viewport),
}

impl CropShape {
    pub fn clear_instruction(&self, viewport: Viewport) -> ClearInstruction {
        match self {
            CropShape::Rect => ClearInstruction::Rect(viewport),
            CropShape::Oval => ClearInstruction::Oval(viewport),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_square_in_landscape() {
        let vp = Viewport::calculate(400.0, 200.0, 0.0, 1, 1);
        assert_eq!(vp.width(), 200.0);
        assert_eq!(vp.height(), 200.0);
        assert_eq!(vp.center_x(), 200.0);
        assert_eq!(vp.center_y(), 100.0);
    }

    #[test]
    fn test_calculate_square_in_portrait() {
        let vp = Viewport::calculate(200.0, 400.0, 0.0, 1, 1);
        assert_eq!(vp.width(), 200.0);
        assert_eq!(vp.height(), 200.0);
    }

    #[test]
    fn test_calculate_respects_offset() {
        let vp = Viewport::calculate(400.0, 400.0, 50.0, 1, 1);
        assert_eq!(vp.left, 50.0);
        assert_eq!(vp.top, 50.0);
        assert_eq!(vp.right, 350.0);
        assert_eq!(vp.bottom, 350.0);
    }

    #[test]
    fn test_calculate_wide_aspect() {
        let vp = Viewport::calculate(500.0, 400.0, 0.0, 2, 1);
        assert_eq!(vp.width(), 500.0);
        assert_eq!(vp.height(), 250.0);
    }

    #[test]
    fn test_calculate_tall_aspect_clamps_to_height() {
        let vp = Viewport::calculate(400.0, 200.0, 0.0, 1, 2);
        assert_eq!(vp.height(), 200.0);
        assert_eq!(vp.width(), 100.0);
    }

    #[test]
    fn test_to_quad_corners() {
        let vp = Viewport::new(10.0, 20.0, 110.0, 220.0);
        let quad = vp.to_quad();
        assert_eq!(quad.top_left, Point::new(10.0, 20.0));
        assert_eq!(quad.bottom_right, Point::new(110.0, 220.0));
        assert_eq!(quad.center(), Point::new(60.0, 120.0));
    }

    #[test]
    fn test_clear_instruction_matches_shape() {
        let vp = Viewport::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(
            CropShape::Rect.clear_instruction(vp),
            ClearInstruction::Rect(vp)
        );
        assert_eq!(
            CropShape::Oval.clear_instruction(vp),
            ClearInstruction::Oval(vp)
        );
    }
}
