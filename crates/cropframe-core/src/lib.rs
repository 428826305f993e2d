//! Cropframe Core - Interactive crop geometry engine
//!
//! This crate implements the geometry behind an interactive image cropper:
//! a user pans, pinch-zooms, and rotates an image beneath a fixed crop
//! viewport, and the engine keeps the viewport covered by the image, decides
//! how much to auto-scale after a rotation, opportunistically relaxes the
//! minimum zoom when the rotated geometry allows it, and finally derives the
//! pixel-accurate affine mapping from the original image to the cropped
//! output bitmap.
//!
//! The engine decodes no gestures, renders nothing, and loads no images;
//! those collaborators talk to it through [`engine::GestureEvent`],
//! [`viewport::Viewport`] updates, the matrix accessor, and
//! [`engine::CropEngine::crop_transform`].
//!
//! # Module Structure
//!
//! - `geometry` - points, segments, quads: intersection, projection,
//!   containment
//! - `matrix` - immutable 2D affine matrix value type
//! - `viewport` - crop window rect, layout fitting, crop shapes
//! - `transform` - serializable transform snapshot and crop result
//! - `engine` - transform state, gesture updates, boundary correction,
//!   animation tasks, crop extraction
//! - `sample` - reference CPU sampler applying a crop result to pixels

pub mod engine;
pub mod geometry;
pub mod matrix;
pub mod sample;
pub mod transform;
pub mod viewport;

pub use engine::{
    CropEngine, EngineConfig, EngineError, GestureEvent, GesturePhase, RestoreStyle, ScaleMode,
};
pub use geometry::{LineSegment, Point, Quad};
pub use matrix::AffineMatrix;
pub use sample::render_crop;
pub use transform::{BitmapTransformation, CropTransformation, Size};
pub use viewport::{ClearInstruction, CropShape, Viewport};
