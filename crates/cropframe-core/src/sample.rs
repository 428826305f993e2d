//! Reference bitmap-sampling collaborator.
//!
//! [`render_crop`] applies a [`BitmapTransformation`] produced by the engine
//! to an RGBA pixel buffer: for each output pixel the inverse transform
//! finds the contributing source location, which is sampled bilinearly.
//! Out-of-bounds samples are transparent. The engine itself never touches
//! pixels; this function is the collaborator hosts can use when they have no
//! faster sampler (GPU, canvas) available.

use crate::engine::EngineError;
use crate::transform::BitmapTransformation;
use image::{Rgba, RgbaImage};

/// Render the cropped output bitmap for a transformation.
///
/// Fails with [`EngineError::SizeMismatch`] when `source` does not match the
/// transformation's expected input size, and with
/// [`EngineError::UnsupportedConfiguration`] when the transform is singular.
pub fn render_crop(
    source: &RgbaImage,
    transformation: &BitmapTransformation,
) -> Result<RgbaImage, EngineError> {
    let (src_w, src_h) = source.dimensions();
    if src_w != transformation.input_size.width || src_h != transformation.input_size.height {
        return Err(EngineError::SizeMismatch {
            expected_width: transformation.input_size.width,
            expected_height: transformation.input_size.height,
            actual_width: src_w,
            actual_height: src_h,
        });
    }

    let inverse = transformation.matrix.invert().ok_or_else(|| {
        EngineError::UnsupportedConfiguration("crop transform is not invertible".into())
    })?;

    let out_w = transformation.output_size.width.max(1);
    let out_h = transformation.output_size.height.max(1);
    let mut output = RgbaImage::new(out_w, out_h);

    for dst_y in 0..out_h {
        for dst_x in 0..out_w {
            let src_x = inverse.a * dst_x as f32 + inverse.b * dst_y as f32 + inverse.tx;
            let src_y = inverse.c * dst_x as f32 + inverse.d * dst_y as f32 + inverse.ty;
            output.put_pixel(dst_x, dst_y, sample_bilinear(source, src_x, src_y));
        }
    }

    Ok(output)
}

/// Sample a pixel with bilinear interpolation, transparent outside the
/// source bounds.
fn sample_bilinear(source: &RgbaImage, x: f32, y: f32) -> Rgba<u8> {
    let (w, h) = source.dimensions();
    if x < 0.0 || y < 0.0 || x > (w - 1) as f32 || y > (h - 1) as f32 {
        return Rgba([0, 0, 0, 0]);
    }

    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);

    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let p00 = source.get_pixel(x0, y0).0;
    let p10 = source.get_pixel(x1, y0).0;
    let p01 = source.get_pixel(x0, y1).0;
    let p11 = source.get_pixel(x1, y1).0;

    let mut result = [0u8; 4];
    for channel in 0..4 {
        let value = p00[channel] as f32 * (1.0 - fx) * (1.0 - fy)
            + p10[channel] as f32 * fx * (1.0 - fy)
            + p01[channel] as f32 * (1.0 - fx) * fy
            + p11[channel] as f32 * fx * fy;
        result[channel] = value.clamp(0.0, 255.0).round() as u8;
    }
    Rgba(result)
}
