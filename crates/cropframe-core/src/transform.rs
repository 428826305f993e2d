//! Serializable transform snapshots.
//!
//! [`CropTransformation`] captures the user-visible transform state (scale,
//! focus offset, rotation) compactly enough to persist and re-apply on a
//! different viewport size. [`BitmapTransformation`] is the crop-extraction
//! result: the affine mapping from original image pixels to the output
//! bitmap, plus the sizes that validate and dimension that mapping.

use crate::matrix::AffineMatrix;
use serde::{Deserialize, Serialize};

/// Persistence snapshot of the engine's transform state.
///
/// `focus_offset` is the vector from the viewport center to the image-bounds
/// center, in view pixels. Re-applied via
/// [`CropEngine::set_transformation`](crate::engine::CropEngine::set_transformation).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropTransformation {
    pub scale: f32,
    pub focus_offset: (f32, f32),
    pub rotation_angle: f32,
}

impl CropTransformation {
    pub fn new(scale: f32, focus_offset: (f32, f32), rotation_angle: f32) -> Self {
        Self {
            scale,
            focus_offset,
            rotation_angle,
        }
    }
}

impl Default for CropTransformation {
    fn default() -> Self {
        Self {
            scale: 1.0,
            focus_offset: (0.0, 0.0),
            rotation_angle: 0.0,
        }
    }
}

/// Integer pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Affine mapping from original image pixel space to the cropped output
/// bitmap, with the expected input size and the output bitmap size.
///
/// Computed on demand by
/// [`CropEngine::crop_transform`](crate::engine::CropEngine::crop_transform);
/// consumed by a bitmap-sampling collaborator such as
/// [`sample::render_crop`](crate::sample::render_crop).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BitmapTransformation {
    pub matrix: AffineMatrix,
    pub input_size: Size,
    pub output_size: Size,
}
