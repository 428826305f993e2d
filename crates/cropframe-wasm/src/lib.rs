//! Cropframe WASM - WebAssembly bindings for the Cropframe crop engine
//!
//! This crate exposes the `cropframe-core` geometry engine to
//! JavaScript/TypeScript hosts. The host owns gesture decoding (pointer
//! events), rendering (canvas/CSS transforms), and pixel extraction; the
//! engine owns the transform state and the coverage geometry.
//!
//! # Module Structure
//!
//! - `engine` - the `WasmCropEngine` class wrapping `CropEngine`
//!
//! # Usage
//!
//! ```typescript
//! import init, { WasmCropEngine, fit_viewport } from '@cropframe/wasm';
//!
//! await init();
//!
//! const engine = new WasmCropEngine();
//! engine.set_viewport_rect(0, 0, 300, 300);
//! engine.bind_image(4000, 3000);
//!
//! // Pointer events, decoded by the host:
//! engine.pan(dx, dy);
//! engine.pinch(scaleFactor, focusX, focusY);
//! engine.release();
//!
//! // Per-frame, while engine.tick(dt) returns true:
//! ctx.setTransform(...engine.matrix());
//! ```

use wasm_bindgen::prelude::*;

mod engine;

pub use engine::{JsRestoreStyle, WasmCropEngine};

use cropframe_core::Viewport;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Future: Set up panic hook for better error messages in browser console
    // when console_error_panic_hook feature is added
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Compute the aspect-fitted viewport for a measured layout area.
///
/// Returns `{left, top, right, bottom}`.
#[wasm_bindgen]
pub fn fit_viewport(
    width: f32,
    height: f32,
    offset: f32,
    aspect_x: u32,
    aspect_y: u32,
) -> Result<JsValue, JsValue> {
    let viewport = Viewport::calculate(width, height, offset, aspect_x, aspect_y);
    serde_wasm_bindgen::to_value(&viewport).map_err(|err| JsValue::from_str(&err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
