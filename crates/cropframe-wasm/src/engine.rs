//! WASM bindings for the crop engine.
//!
//! `WasmCropEngine` wraps a `CropEngine` instance and maps the decoded
//! gesture entry points, the per-frame tick, and the snapshot/crop accessors
//! into JavaScript-friendly signatures. Structured values cross the boundary
//! via `serde-wasm-bindgen`; the affine matrix crosses as a `Float32Array`
//! of `[a, b, tx, c, d, ty]`.

use cropframe_core::engine::{CropEngine, EngineConfig, GestureEvent, RestoreStyle};
use cropframe_core::{CropTransformation, Viewport};
use js_sys::Float32Array;
use wasm_bindgen::prelude::*;

/// Coverage-restore behavior after a rotation, mirrored for JavaScript.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsRestoreStyle {
    None,
    Instant,
    Animated,
}

impl From<JsRestoreStyle> for RestoreStyle {
    fn from(style: JsRestoreStyle) -> Self {
        match style {
            JsRestoreStyle::None => RestoreStyle::None,
            JsRestoreStyle::Instant => RestoreStyle::Instant,
            JsRestoreStyle::Animated => RestoreStyle::Animated,
        }
    }
}

/// Interactive crop engine for JavaScript hosts.
#[wasm_bindgen]
pub struct WasmCropEngine {
    inner: CropEngine,
}

impl Default for WasmCropEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl WasmCropEngine {
    /// Create an engine with the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmCropEngine {
        WasmCropEngine {
            inner: CropEngine::default(),
        }
    }

    /// Create an engine with a custom configuration object
    /// (`{min_zoom, max_zoom, ...}`, see `EngineConfig`).
    pub fn with_config(config: JsValue) -> Result<WasmCropEngine, JsValue> {
        let config: EngineConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        Ok(WasmCropEngine {
            inner: CropEngine::new(config),
        })
    }

    /// Bind an image by its original pixel dimensions.
    pub fn bind_image(&mut self, width: u32, height: u32) {
        self.inner.bind_image(width, height);
    }

    /// Update the crop viewport in view-pixel coordinates.
    pub fn set_viewport_rect(&mut self, left: f32, top: f32, right: f32, bottom: f32) {
        self.inner.set_viewport(Viewport::new(left, top, right, bottom));
    }

    // ------------------------------------------------------------------
    // Gesture entry points (coordinates are viewport-local view pixels)
    // ------------------------------------------------------------------

    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.inner.apply_event(GestureEvent::PanDelta { dx, dy });
    }

    pub fn pinch(&mut self, factor: f32, focus_x: f32, focus_y: f32) {
        self.inner.apply_event(GestureEvent::ScaleDelta {
            factor,
            focus_x,
            focus_y,
        });
    }

    pub fn rotate_by(&mut self, angle_degrees: f32, restore: JsRestoreStyle) {
        self.inner.apply_rotation(angle_degrees, restore.into());
    }

    pub fn fling(&mut self, velocity_x: f32, velocity_y: f32) {
        self.inner.apply_event(GestureEvent::FlingStart {
            velocity_x,
            velocity_y,
        });
    }

    pub fn double_tap_zoom(&mut self, target_scale: f32, focus_x: f32, focus_y: f32) {
        self.inner.apply_event(GestureEvent::DoubleTapZoomTo {
            target_scale,
            focus_x,
            focus_y,
        });
    }

    /// All pointers lifted.
    pub fn release(&mut self) {
        self.inner.apply_event(GestureEvent::Release);
    }

    /// Advance the active animation by `dt_ms` of frame time. Returns `true`
    /// while an animation remains active, so the host keeps scheduling
    /// `requestAnimationFrame`.
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        self.inner.tick(dt_ms)
    }

    pub fn is_animating(&self) -> bool {
        self.inner.is_animating()
    }

    // ------------------------------------------------------------------
    // State accessors
    // ------------------------------------------------------------------

    /// The current affine matrix as `[a, b, tx, c, d, ty]`.
    pub fn matrix(&self) -> Float32Array {
        Float32Array::from(self.inner.matrix().values().as_slice())
    }

    #[wasm_bindgen(getter)]
    pub fn current_zoom(&self) -> f32 {
        self.inner.current_zoom()
    }

    #[wasm_bindgen(getter)]
    pub fn min_zoom(&self) -> f32 {
        self.inner.min_zoom()
    }

    #[wasm_bindgen(getter)]
    pub fn max_zoom(&self) -> f32 {
        self.inner.max_zoom()
    }

    #[wasm_bindgen(getter)]
    pub fn rotation_angle(&self) -> f32 {
        self.inner.rotation_angle()
    }

    /// Serializable transform snapshot
    /// (`{scale, focus_offset, rotation_angle}`).
    pub fn transformation(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.transformation())
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Restore a previously captured transform snapshot.
    pub fn set_transformation(&mut self, snapshot: JsValue) -> Result<(), JsValue> {
        let snapshot: CropTransformation = serde_wasm_bindgen::from_value(snapshot)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        self.inner.set_transformation(snapshot);
        Ok(())
    }

    /// Derive the crop extraction transform:
    /// `{matrix, input_size, output_size}`.
    pub fn crop_transform(&self) -> Result<JsValue, JsValue> {
        let crop = self
            .inner
            .crop_transform()
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        serde_wasm_bindgen::to_value(&crop).map_err(|err| JsValue::from_str(&err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_engine() -> WasmCropEngine {
        let mut engine = WasmCropEngine::new();
        engine.set_viewport_rect(0.0, 0.0, 100.0, 100.0);
        engine.bind_image(200, 100);
        engine
    }

    #[test]
    fn test_pan_moves_matrix() {
        let mut engine = ready_engine();
        engine.pan(-20.0, 0.0);
        assert_eq!(engine.inner.matrix().tx, -70.0);
    }

    #[test]
    fn test_pinch_and_release_snap_back() {
        let mut engine = ready_engine();
        engine.pinch(10.0, 50.0, 50.0);
        assert!(engine.current_zoom() > engine.max_zoom());

        engine.release();
        assert!(engine.is_animating());
        for _ in 0..200 {
            if !engine.tick(16.0) {
                break;
            }
        }
        assert!((engine.current_zoom() - engine.max_zoom()).abs() < 1e-3);
    }

    #[test]
    fn test_rotate_restores_coverage() {
        let mut engine = ready_engine();
        engine.rotate_by(45.0, JsRestoreStyle::Instant);
        assert!((engine.current_zoom() - 2.0_f32.sqrt()).abs() < 1e-3);
        assert!((engine.rotation_angle() - 45.0).abs() < 1e-4);
    }

    #[test]
    fn test_crop_transform_identity() {
        let mut engine = WasmCropEngine::new();
        engine.set_viewport_rect(0.0, 0.0, 200.0, 100.0);
        engine.bind_image(400, 200);

        let crop = engine.inner.crop_transform().unwrap();
        assert_eq!(crop.output_size.width, 400);
        assert_eq!(crop.output_size.height, 200);
    }

    #[test]
    fn test_crop_transform_without_image_fails() {
        let engine = WasmCropEngine::new();
        assert!(engine.inner.crop_transform().is_err());
    }
}
