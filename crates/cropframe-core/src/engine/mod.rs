//! The crop engine: affine transform state and gesture-applied updates.
//!
//! [`CropEngine`] owns the single [`AffineMatrix`] mapping raw image pixels
//! into viewport-local view pixels, plus the scale/rotation bookkeeping
//! around it. Gesture collaborators feed it decoded [`GestureEvent`]s; after
//! every mutation the boundary-correction pass keeps the viewport covered by
//! the image (see [`correction`]), and a single registered subscriber is
//! notified of the new transform.
//!
//! # Coordinate spaces
//!
//! The matrix lives in *content space*: the origin is the viewport's
//! top-left corner and the viewport spans `(0,0)..(width,height)`. Gesture
//! coordinates are expected in this space. [`CropEngine::image_bounds`]
//! shifts the mapped image quad by the viewport's layout offset into view
//! space, where containment geometry runs against the viewport rect.
//!
//! # Animation
//!
//! Fling and animated zoom are cooperative tasks advanced only by
//! [`CropEngine::tick`]; the engine owns no timers. Starting a new drag,
//! pinch, or fling cancels the task in flight.

mod animation;
mod correction;

pub use animation::RestoreStyle;

use crate::geometry::{Point, Quad};
use crate::matrix::AffineMatrix;
use crate::transform::{BitmapTransformation, CropTransformation, Size};
use crate::viewport::Viewport;
use animation::{FlingScroller, Task, ZoomAnimation};
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default soft scale bounds: scale 1.0 means the image exactly covers the
/// viewport under [`ScaleMode::CenterCrop`].
pub const DEFAULT_MIN_ZOOM: f32 = 1.0;
pub const DEFAULT_MAX_ZOOM: f32 = 5.0;

/// Elastic overshoot multipliers: how far past the soft bounds an active
/// pinch may stretch before snapping back on release.
pub const SUPER_MIN_MULTIPLIER: f32 = 0.75;
pub const SUPER_MAX_MULTIPLIER: f32 = 1.25;

/// Scale deltas within this epsilon of 1.0 count as "no change" for
/// animation stepping and auto-scale decisions.
pub const SCALE_EPS: f32 = 0.001;

/// Rotation auto-scale ratios at or below this threshold are ignored.
pub const UPSCALING_ROTATION_THRESHOLD: f32 = 1.0;

const NO_ROTATION_ANGLE: f32 = 0.0;

/// Errors reported by the engine. Mutating operations without a bound image
/// are silent no-ops; queries fail explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("no image is bound to the engine")]
    NoImageBound,
    #[error("unsupported configuration: {0}")]
    UnsupportedConfiguration(String),
    #[error("transformation expects input size {expected_width}x{expected_height}, got {actual_width}x{actual_height}")]
    SizeMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },
}

/// How the image is initially fitted to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScaleMode {
    /// No scaling; image centered at its natural size.
    Center,
    /// Uniform scale so the image covers the viewport (may crop).
    #[default]
    CenterCrop,
    /// Uniform scale down (never up) so the image fits inside the viewport.
    CenterInside,
    /// Uniform scale so the image fits inside the viewport.
    FitCenter,
    /// Non-uniform scale filling the viewport exactly; aspect not preserved.
    FitXy,
}

/// Tunable engine constants. The defaults reproduce the stock interactive
/// feel; tests inject custom values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub super_min_multiplier: f32,
    pub super_max_multiplier: f32,
    /// Duration of double-tap and snap-back zoom animations.
    pub zoom_animation_ms: f32,
    /// Duration of the coverage-restoring upscale after a rotation.
    pub rotation_upscale_ms: f32,
    /// Fling deceleration in view px/s².
    pub fling_deceleration: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            super_min_multiplier: SUPER_MIN_MULTIPLIER,
            super_max_multiplier: SUPER_MAX_MULTIPLIER,
            zoom_animation_ms: 300.0,
            rotation_upscale_ms: 200.0,
            fling_deceleration: 2000.0,
        }
    }
}

/// Exactly one gesture phase is active at a time. A new drag, pinch, or
/// fling cancels any in-flight fling or animated zoom before starting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    Dragging,
    PinchZooming,
    Flinging,
    AnimatingZoom,
}

/// Decoded gesture events, as delivered by the gesture-decoding
/// collaborator. Coordinates are viewport-local view pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    PanDelta { dx: f32, dy: f32 },
    ScaleDelta { factor: f32, focus_x: f32, focus_y: f32 },
    RotateBy { angle_degrees: f32 },
    FlingStart { velocity_x: f32, velocity_y: f32 },
    DoubleTapZoomTo { target_scale: f32, focus_x: f32, focus_y: f32 },
    /// All pointers lifted: ends a drag or pinch, snapping elastic overshoot
    /// back into the soft scale bounds.
    Release,
}

/// Single-subscriber transform notification.
pub type TransformListener = Box<dyn FnMut(&CropTransformation)>;

/// Interactive crop geometry engine.
///
/// Create one per image view, bind an image, feed it gesture events and
/// layout viewport updates, and query [`CropEngine::crop_transform`] when
/// the user confirms the crop.
pub struct CropEngine {
    config: EngineConfig,
    image_size: Option<Size>,
    viewport: Viewport,
    scale_mode: ScaleMode,

    matrix: AffineMatrix,
    current_zoom: f32,
    rotation_angle: f32,
    min_zoom: f32,
    max_zoom: f32,
    super_min_zoom: f32,
    super_max_zoom: f32,
    /// Image size (view px) when stretched to fit the viewport at zoom 1.
    match_width: f32,
    match_height: f32,

    phase: GesturePhase,
    task: Option<Task>,
    listener: Option<TransformListener>,
}

impl std::fmt::Debug for CropEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CropEngine")
            .field("image_size", &self.image_size)
            .field("viewport", &self.viewport)
            .field("scale_mode", &self.scale_mode)
            .field("matrix", &self.matrix)
            .field("current_zoom", &self.current_zoom)
            .field("rotation_angle", &self.rotation_angle)
            .field("min_zoom", &self.min_zoom)
            .field("max_zoom", &self.max_zoom)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl Default for CropEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl CropEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            image_size: None,
            viewport: Viewport::default(),
            scale_mode: ScaleMode::default(),
            matrix: AffineMatrix::identity(),
            current_zoom: config.min_zoom,
            rotation_angle: NO_ROTATION_ANGLE,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            super_min_zoom: config.super_min_multiplier * config.min_zoom,
            super_max_zoom: config.super_max_multiplier * config.max_zoom,
            match_width: 0.0,
            match_height: 0.0,
            phase: GesturePhase::Idle,
            task: None,
            listener: None,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn current_zoom(&self) -> f32 {
        self.current_zoom
    }

    pub fn rotation_angle(&self) -> f32 {
        self.rotation_angle
    }

    pub fn min_zoom(&self) -> f32 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> f32 {
        self.max_zoom
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// True while a fling or animated zoom is in flight and the host should
    /// keep delivering ticks.
    pub fn is_animating(&self) -> bool {
        matches!(
            self.phase,
            GesturePhase::Flinging | GesturePhase::AnimatingZoom
        )
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scale_mode(&self) -> ScaleMode {
        self.scale_mode
    }

    pub fn is_zoomed(&self) -> bool {
        self.current_zoom != 1.0
    }

    /// The current affine matrix (content space), for the rendering
    /// collaborator.
    pub fn matrix(&self) -> AffineMatrix {
        self.matrix
    }

    /// Displayed image size in view pixels at the current zoom.
    pub(crate) fn image_width(&self) -> f32 {
        self.match_width * self.current_zoom
    }

    pub(crate) fn image_height(&self) -> f32 {
        self.match_height * self.current_zoom
    }

    pub(crate) fn view_width(&self) -> f32 {
        self.viewport.width()
    }

    pub(crate) fn view_height(&self) -> f32 {
        self.viewport.height()
    }

    /// The image bounds quad in view space, or `None` while no image is
    /// bound.
    pub fn image_bounds(&self) -> Option<Quad> {
        let size = self.image_size?;
        let quad = self
            .matrix
            .map_rect_corners(size.width as f32, size.height as f32);
        Some(quad.move_by(self.viewport.left, self.viewport.top))
    }

    pub fn set_min_zoom(&mut self, min: f32) {
        self.min_zoom = min;
        self.super_min_zoom = self.config.super_min_multiplier * min;
    }

    pub fn set_max_zoom(&mut self, max: f32) {
        self.max_zoom = max;
        self.super_max_zoom = self.config.super_max_multiplier * max;
    }

    pub fn set_scale_mode(&mut self, mode: ScaleMode) {
        self.scale_mode = mode;
        if self.image_size.is_some() {
            self.fit_image_to_view();
            self.notify();
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Bind an image by its original pixel size, resetting the transform to
    /// scale 1, centered, unrotated.
    pub fn bind_image(&mut self, width: u32, height: u32) {
        self.image_size = Some(Size::new(width, height));
        self.cancel_task();
        self.set_min_zoom(self.config.min_zoom);
        self.set_max_zoom(self.config.max_zoom);
        self.fit_image_to_view();
        self.notify();
    }

    /// Update the viewport from the layout collaborator. The current
    /// transform snapshot is re-applied against the new viewport.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        let was_fitted = self.match_width > 0.0 && self.match_height > 0.0;
        self.viewport = viewport;
        if self.image_size.is_none() || viewport.is_empty() {
            return;
        }
        let snapshot = self.transformation();
        self.fit_image_to_view();
        if was_fitted && snapshot != CropTransformation::default() {
            self.set_transformation(snapshot);
        }
        self.notify();
    }

    /// Reset zoom to 1 and recenter, preserving rotation.
    pub fn reset_zoom(&mut self) {
        if self.image_size.is_none() {
            return;
        }
        let rotation = self.rotation_angle;
        self.fit_image_to_view();
        if rotation != NO_ROTATION_ANGLE {
            self.matrix =
                self.matrix
                    .post_rotate(rotation, self.view_width() / 2.0, self.view_height() / 2.0);
            self.rotation_angle = rotation;
        }
        self.notify();
    }

    /// Stretch and center the image to the viewport per the scale mode.
    /// Resets zoom and rotation.
    fn fit_image_to_view(&mut self) {
        let Some(size) = self.image_size else {
            return;
        };
        if self.viewport.is_empty() || size.width == 0 || size.height == 0 {
            return;
        }
        let image_width = size.width as f32;
        let image_height = size.height as f32;

        let fit_x = self.view_width() / image_width;
        let fit_y = self.view_height() / image_height;
        let (scale_x, scale_y) = match self.scale_mode {
            ScaleMode::Center => (1.0, 1.0),
            ScaleMode::CenterCrop => {
                let s = fit_x.max(fit_y);
                (s, s)
            }
            ScaleMode::CenterInside => {
                let s = 1.0_f32.min(fit_x.min(fit_y));
                (s, s)
            }
            ScaleMode::FitCenter => {
                let s = fit_x.min(fit_y);
                (s, s)
            }
            ScaleMode::FitXy => (fit_x, fit_y),
        };

        let redundant_x = self.view_width() - scale_x * image_width;
        let redundant_y = self.view_height() - scale_y * image_height;
        self.match_width = scale_x * image_width;
        self.match_height = scale_y * image_height;

        self.matrix =
            AffineMatrix::scale(scale_x, scale_y).post_translate(redundant_x / 2.0, redundant_y / 2.0);
        self.current_zoom = 1.0;
        self.rotation_angle = NO_ROTATION_ANGLE;
        self.fix_trans();
    }

    // ------------------------------------------------------------------
    // Gesture-applied updates
    // ------------------------------------------------------------------

    /// Dispatch a decoded gesture event.
    pub fn apply_event(&mut self, event: GestureEvent) {
        match event {
            GestureEvent::PanDelta { dx, dy } => self.apply_pan(dx, dy),
            GestureEvent::ScaleDelta {
                factor,
                focus_x,
                focus_y,
            } => {
                self.begin_pinch();
                self.apply_scale(factor, Point::new(focus_x, focus_y), true);
                self.try_lower_min_scale();
            }
            GestureEvent::RotateBy { angle_degrees } => {
                self.apply_rotation(angle_degrees, RestoreStyle::Instant);
            }
            GestureEvent::FlingStart {
                velocity_x,
                velocity_y,
            } => self.start_fling(velocity_x, velocity_y),
            GestureEvent::DoubleTapZoomTo {
                target_scale,
                focus_x,
                focus_y,
            } => self.start_double_tap_zoom(target_scale, Point::new(focus_x, focus_y)),
            GestureEvent::Release => self.release(),
        }
    }

    /// Pan by the given deltas. Axes along which the image already fits
    /// inside the viewport are dropped (no overscroll).
    pub fn apply_pan(&mut self, dx: f32, dy: f32) {
        if self.image_size.is_none() {
            return;
        }
        self.cancel_task();
        self.phase = GesturePhase::Dragging;

        let fix_dx = fix_drag_trans(dx, self.view_width(), self.image_width());
        let fix_dy = fix_drag_trans(dy, self.view_height(), self.image_height());
        if fix_dx != 0.0 || fix_dy != 0.0 {
            self.matrix = self.matrix.post_translate(fix_dx, fix_dy);
            self.fix_trans();
        }
        self.notify();
    }

    /// Multiply the scale by `factor` about `focus` (viewport-local).
    ///
    /// With `elastic` the scale may overshoot into
    /// `[super_min_zoom, super_max_zoom]`; otherwise it clamps to
    /// `[min_zoom, max_zoom]`. When clamped, the applied factor is reduced
    /// proportionally so the focus point still maps consistently.
    pub fn apply_scale(&mut self, factor: f32, focus: Point, elastic: bool) {
        if self.image_size.is_none() {
            return;
        }
        self.scale_image(factor, focus.x, focus.y, elastic);
        self.notify();
    }

    pub(crate) fn scale_image(&mut self, delta: f32, focus_x: f32, focus_y: f32, elastic: bool) {
        let (lower, upper) = if elastic {
            (self.super_min_zoom, self.super_max_zoom)
        } else {
            (self.min_zoom, self.max_zoom)
        };

        let orig_zoom = self.current_zoom;
        let mut applied = delta;
        self.current_zoom *= delta;
        if self.current_zoom > upper {
            self.current_zoom = upper;
            applied = upper / orig_zoom;
        } else if self.current_zoom < lower {
            self.current_zoom = lower;
            applied = lower / orig_zoom;
        }

        self.matrix = self.matrix.post_scale(applied, focus_x, focus_y);
        self.fix_scale_trans();
    }

    /// Rotate by `angle_degrees` clockwise about the viewport center, then
    /// restore coverage per `restore`.
    pub fn apply_rotation(&mut self, angle_degrees: f32, restore: RestoreStyle) {
        if self.image_size.is_none() || angle_degrees == NO_ROTATION_ANGLE {
            return;
        }
        self.matrix = self.matrix.post_rotate(
            angle_degrees,
            self.view_width() / 2.0,
            self.view_height() / 2.0,
        );
        self.rotation_angle = (self.rotation_angle + angle_degrees).rem_euclid(360.0);

        match restore {
            RestoreStyle::None => {}
            RestoreStyle::Instant => self.fix_zoom_after_rotation(|engine, delta| {
                engine.scale_image(
                    delta,
                    engine.view_width() / 2.0,
                    engine.view_height() / 2.0,
                    false,
                );
                engine.fix_trans();
                engine.set_min_zoom(engine.current_zoom);
            }),
            RestoreStyle::Animated => self.fix_zoom_after_rotation(|engine, delta| {
                let target = engine.max_zoom.min(engine.current_zoom * delta);
                let focus = Point::new(engine.view_width() / 2.0, engine.view_height() / 2.0);
                let anim = ZoomAnimation::new(
                    engine,
                    target,
                    focus,
                    true,
                    engine.config.rotation_upscale_ms,
                    false,
                );
                engine.task = Some(Task::Zoom(anim));
                engine.phase = GesturePhase::AnimatingZoom;
                engine.set_min_zoom(target);
            }),
        }
        self.notify();
    }

    /// Set zoom to `scale` with the image point at fraction
    /// `(focus_x, focus_y)` (0..1 over the image) centered in the viewport.
    pub fn set_zoom(&mut self, scale: f32, focus_x: f32, focus_y: f32) {
        if self.image_size.is_none() {
            return;
        }
        self.reset_zoom();
        self.scale_image(scale, self.view_width() / 2.0, self.view_height() / 2.0, true);
        self.matrix = self.matrix.with_translation(
            -(focus_x * self.image_width() - self.view_width() / 2.0),
            -(focus_y * self.image_height() - self.view_height() / 2.0),
        );
        self.fix_trans();
        self.notify();
    }

    fn begin_pinch(&mut self) {
        self.cancel_task();
        self.phase = GesturePhase::PinchZooming;
    }

    /// End of a drag or pinch. Elastic overshoot animates back to the
    /// nearest soft bound.
    pub fn release(&mut self) {
        if matches!(
            self.phase,
            GesturePhase::Dragging | GesturePhase::PinchZooming
        ) {
            self.phase = GesturePhase::Idle;
        }

        let target = if self.current_zoom > self.max_zoom {
            Some(self.max_zoom)
        } else if self.current_zoom < self.min_zoom {
            Some(self.min_zoom)
        } else {
            None
        };
        if let Some(target_zoom) = target {
            let focus = Point::new(self.view_width() / 2.0, self.view_height() / 2.0);
            let anim = ZoomAnimation::new(
                self,
                target_zoom,
                focus,
                true,
                self.config.zoom_animation_ms,
                true,
            );
            self.task = Some(Task::Zoom(anim));
            self.phase = GesturePhase::AnimatingZoom;
        }
    }

    fn start_fling(&mut self, velocity_x: f32, velocity_y: f32) {
        if self.image_size.is_none() {
            return;
        }
        self.cancel_task();
        let scroller = FlingScroller::new(self, velocity_x, velocity_y);
        self.task = Some(Task::Fling(scroller));
        self.phase = GesturePhase::Flinging;
    }

    fn start_double_tap_zoom(&mut self, target_scale: f32, focus: Point) {
        if self.image_size.is_none() || self.phase != GesturePhase::Idle {
            return;
        }
        let target = target_scale.clamp(self.min_zoom, self.max_zoom);
        let anim = ZoomAnimation::new(
            self,
            target,
            focus,
            false,
            self.config.zoom_animation_ms,
            true,
        );
        self.task = Some(Task::Zoom(anim));
        self.phase = GesturePhase::AnimatingZoom;
    }

    pub(crate) fn cancel_task(&mut self) {
        if self.task.take().is_some() {
            debug!("cancelled in-flight animation task");
            self.phase = GesturePhase::Idle;
        }
    }

    /// Advance the active animation task by `dt_ms` of frame time. Returns
    /// `true` while a task remains active, so hosts can keep scheduling
    /// ticks.
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        let Some(mut task) = self.task.take() else {
            return false;
        };
        let finished = match &mut task {
            Task::Zoom(anim) => self.step_zoom_animation(anim, dt_ms),
            Task::Fling(scroller) => self.step_fling(scroller, dt_ms),
        };
        self.notify();
        if finished {
            self.phase = GesturePhase::Idle;
            false
        } else {
            self.task = Some(task);
            true
        }
    }

    // ------------------------------------------------------------------
    // Snapshots
    // ------------------------------------------------------------------

    /// Serializable snapshot of the current transform.
    pub fn transformation(&self) -> CropTransformation {
        let offset = self.focus_offset();
        CropTransformation::new(self.current_zoom, offset, self.rotation_angle)
    }

    /// Re-apply a previously captured snapshot: reset zoom, scale, rotate
    /// instantly, then pan to the stored focus offset, in that order.
    ///
    /// Intended for restoring onto a freshly bound engine (rotation starts
    /// at zero there, so the snapshot's absolute angle applies directly).
    pub fn set_transformation(&mut self, transformation: CropTransformation) {
        if self.image_size.is_none() {
            return;
        }
        self.set_zoom(transformation.scale, 0.5, 0.5);
        self.apply_rotation(transformation.rotation_angle, RestoreStyle::Instant);
        self.move_focus_by(
            transformation.focus_offset.0,
            transformation.focus_offset.1,
        );
    }

    fn move_focus_by(&mut self, dx: f32, dy: f32) {
        self.matrix = self.matrix.post_translate(dx, dy);
        self.notify();
    }

    /// Offset from the viewport center to the image-bounds center.
    fn focus_offset(&self) -> (f32, f32) {
        let center = self
            .image_bounds()
            .map(|bounds| bounds.center())
            .unwrap_or_else(|| Point::new(self.viewport.center_x(), self.viewport.center_y()));
        (
            center.x - self.viewport.center_x(),
            center.y - self.viewport.center_y(),
        )
    }

    /// Image point under the viewport center, as fractions of the original
    /// image dimensions.
    pub fn scroll_position(&self) -> Option<(f32, f32)> {
        let size = self.image_size?;
        let point = self.transform_coord_touch_to_bitmap(
            self.view_width() / 2.0,
            self.view_height() / 2.0,
            true,
        )?;
        Some((point.x / size.width as f32, point.y / size.height as f32))
    }

    /// The visible part of the image as a rect normalized to the original
    /// image dimensions: `(left, top, right, bottom)` in 0..1.
    pub fn zoomed_rect(&self) -> Result<(f32, f32, f32, f32), EngineError> {
        if self.scale_mode == ScaleMode::FitXy {
            return Err(EngineError::UnsupportedConfiguration(
                "zoomed_rect is not supported with ScaleMode::FitXy".into(),
            ));
        }
        let size = self.image_size.ok_or(EngineError::NoImageBound)?;
        let top_left = self
            .transform_coord_touch_to_bitmap(0.0, 0.0, true)
            .ok_or(EngineError::NoImageBound)?;
        let bottom_right = self
            .transform_coord_touch_to_bitmap(self.view_width(), self.view_height(), true)
            .ok_or(EngineError::NoImageBound)?;
        let w = size.width as f32;
        let h = size.height as f32;
        Ok((
            top_left.x / w,
            top_left.y / h,
            bottom_right.x / w,
            bottom_right.y / h,
        ))
    }

    /// Map a viewport-local coordinate into original-image pixel space.
    pub(crate) fn transform_coord_touch_to_bitmap(
        &self,
        x: f32,
        y: f32,
        clip_to_bitmap: bool,
    ) -> Option<Point> {
        let size = self.image_size?;
        let orig_w = size.width as f32;
        let orig_h = size.height as f32;
        let mut final_x = (x - self.matrix.tx) * orig_w / self.image_width();
        let mut final_y = (y - self.matrix.ty) * orig_h / self.image_height();
        if clip_to_bitmap {
            final_x = final_x.clamp(0.0, orig_w);
            final_y = final_y.clamp(0.0, orig_h);
        }
        Some(Point::new(final_x, final_y))
    }

    /// Inverse of [`CropEngine::transform_coord_touch_to_bitmap`].
    pub(crate) fn transform_coord_bitmap_to_touch(&self, bx: f32, by: f32) -> Option<Point> {
        let size = self.image_size?;
        let px = bx / size.width as f32;
        let py = by / size.height as f32;
        Some(Point::new(
            self.matrix.tx + self.image_width() * px,
            self.matrix.ty + self.image_height() * py,
        ))
    }

    // ------------------------------------------------------------------
    // Crop extraction
    // ------------------------------------------------------------------

    /// Derive the affine mapping from original image pixels to the output
    /// crop bitmap, plus the output bitmap's pixel size.
    pub fn crop_transform(&self) -> Result<BitmapTransformation, EngineError> {
        let size = self.image_size.ok_or(EngineError::NoImageBound)?;
        let (left, _top, right, _bottom) = self
            .matrix
            .map_rect_bounds(size.width as f32, size.height as f32);
        let bounds_width = right - left;
        if bounds_width <= 0.0 {
            return Err(EngineError::UnsupportedConfiguration(
                "image bounds are empty".into(),
            ));
        }
        let multiplier = size.width as f32 / bounds_width;

        let output_size = Size::new(
            (self.view_width() * multiplier).round() as u32,
            (self.view_height() * multiplier).round() as u32,
        );
        Ok(BitmapTransformation {
            matrix: self.matrix.post_scale(multiplier, 0.0, 0.0),
            input_size: size,
            output_size,
        })
    }

    // ------------------------------------------------------------------
    // Notification
    // ------------------------------------------------------------------

    /// Register the single transform subscriber, replacing any previous one.
    pub fn set_transform_listener(&mut self, listener: impl FnMut(&CropTransformation) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_transform_listener(&mut self) {
        self.listener = None;
    }

    pub(crate) fn notify(&mut self) {
        if self.listener.is_none() || self.image_size.is_none() {
            return;
        }
        let snapshot = self.transformation();
        if let Some(listener) = self.listener.as_mut() {
            listener(&snapshot);
        }
    }

    pub(crate) fn has_rotation(&self) -> bool {
        self.rotation_angle != NO_ROTATION_ANGLE
    }
}

/// Drop drag deltas along an axis where the content already fits the view.
fn fix_drag_trans(delta: f32, view_size: f32, content_size: f32) -> f32 {
    if content_size <= view_size {
        0.0
    } else {
        delta
    }
}

#[cfg(test)]
mod tests;
