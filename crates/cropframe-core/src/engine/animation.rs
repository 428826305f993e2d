//! Cooperative per-frame animation tasks: animated zoom and fling.
//!
//! Tasks hold their own progress state and are advanced only when the host
//! calls [`CropEngine::tick`](super::CropEngine::tick) with elapsed frame
//! time. Nothing self-schedules; cancellation is dropping the task. Tests
//! drive ticks with fixed steps instead of timers.

use super::{CropEngine, SCALE_EPS};
use crate::geometry::Point;

/// How coverage is restored after a rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestoreStyle {
    /// No correction; the caller accepts transient under-coverage.
    #[default]
    None,
    /// Scale up immediately.
    Instant,
    /// Scale up over a short ease-in-out animation.
    Animated,
}

/// The single active animation task, gated by the gesture phase.
#[derive(Debug)]
pub(crate) enum Task {
    Zoom(ZoomAnimation),
    Fling(FlingScroller),
}

/// Ease-in-ease-out interpolation over `t` in 0..1.
pub(crate) fn ease_in_out(t: f32) -> f32 {
    (1.0 - (std::f32::consts::PI * t).cos()) / 2.0
}

/// Animated zoom toward a target scale, keeping the focused image point on
/// an interpolated path from its start position to the viewport center.
#[derive(Debug)]
pub(crate) struct ZoomAnimation {
    elapsed_ms: f32,
    duration_ms: f32,
    start_zoom: f32,
    target_zoom: f32,
    /// Focus in original-image pixel coordinates.
    bitmap_focus: Point,
    start_touch: Point,
    end_touch: Point,
    stretch_elastic: bool,
    fix_trans_on_scale: bool,
}

impl ZoomAnimation {
    pub(crate) fn new(
        engine: &CropEngine,
        target_zoom: f32,
        focus: Point,
        stretch_elastic: bool,
        duration_ms: f32,
        fix_trans_on_scale: bool,
    ) -> Self {
        let bitmap_focus = engine
            .transform_coord_touch_to_bitmap(focus.x, focus.y, false)
            .unwrap_or(focus);
        let start_touch = engine
            .transform_coord_bitmap_to_touch(bitmap_focus.x, bitmap_focus.y)
            .unwrap_or(focus);
        let end_touch = Point::new(engine.view_width() / 2.0, engine.view_height() / 2.0);
        Self {
            elapsed_ms: 0.0,
            duration_ms,
            start_zoom: engine.current_zoom,
            target_zoom,
            bitmap_focus,
            start_touch,
            end_touch,
            stretch_elastic,
            fix_trans_on_scale,
        }
    }
}

/// Constant-deceleration scroller for fling translation.
///
/// The axis bounds are widened by the rotation-dependent extents of the
/// image so a rotated image can fling across its full travel; per-frame
/// boundary correction still clamps precisely.
#[derive(Debug)]
pub(crate) struct FlingScroller {
    velocity_x: f32,
    velocity_y: f32,
    start_x: f32,
    start_y: f32,
    min_x: f32,
    max_x: f32,
    min_y: f32,
    max_y: f32,
    duration_s: f32,
    pub(crate) elapsed_s: f32,
    pub(crate) curr_x: f32,
    pub(crate) curr_y: f32,
}

impl FlingScroller {
    pub(crate) fn new(engine: &CropEngine, velocity_x: f32, velocity_y: f32) -> Self {
        let start_x = engine.matrix.tx;
        let start_y = engine.matrix.ty;

        let (sin, cos) = engine.rotation_angle.to_radians().sin_cos();
        let image_width = engine.image_width();
        let image_height = engine.image_height();
        let view_width = engine.view_width();
        let view_height = engine.view_height();

        let (min_x, max_x) = if image_width > view_width {
            let width_weight = -image_width * cos;
            let min_width_weight = if cos > 0.0 { width_weight } else { 0.0 };
            let max_width_weight = if cos < 0.0 { width_weight } else { 0.0 };

            let height_weight = image_height * sin;
            let min_height_weight = if sin < 0.0 { height_weight } else { 0.0 };
            let max_height_weight = if sin > 0.0 { height_weight } else { 0.0 };

            (
                view_width + min_width_weight + min_height_weight,
                image_width + max_width_weight + max_height_weight,
            )
        } else {
            (start_x, start_x)
        };

        let (min_y, max_y) = if image_height > view_height {
            let height_weight = -image_height * cos;
            let min_height_weight = if cos > 0.0 { height_weight } else { 0.0 };
            let max_height_weight = if cos < 0.0 { height_weight } else { 0.0 };

            let width_weight = -image_width * sin;
            let min_width_weight = if sin > 0.0 { width_weight } else { 0.0 };
            let max_width_weight = if sin < 0.0 { width_weight } else { 0.0 };

            (
                view_height + min_width_weight + min_height_weight,
                image_height + max_width_weight + max_height_weight,
            )
        } else {
            (start_y, start_y)
        };

        let speed = (velocity_x * velocity_x + velocity_y * velocity_y).sqrt();
        let duration_s = speed / engine.config.fling_deceleration;

        Self {
            velocity_x,
            velocity_y,
            start_x,
            start_y,
            min_x,
            max_x,
            min_y,
            max_y,
            duration_s,
            elapsed_s: 0.0,
            curr_x: start_x,
            curr_y: start_y,
        }
    }

    /// Position at `t` seconds: the velocity decays linearly to zero over
    /// the fling duration.
    pub(crate) fn position_at(&self, t_s: f32) -> (f32, f32) {
        let t = t_s.min(self.duration_s);
        let travel = if self.duration_s > 0.0 {
            t - t * t / (2.0 * self.duration_s)
        } else {
            0.0
        };
        (
            (self.start_x + self.velocity_x * travel).clamp(self.min_x, self.max_x),
            (self.start_y + self.velocity_y * travel).clamp(self.min_y, self.max_y),
        )
    }

    pub(crate) fn finished(&self) -> bool {
        self.elapsed_s >= self.duration_s
    }
}

impl CropEngine {
    /// One frame of an animated zoom. Returns `true` when finished.
    pub(crate) fn step_zoom_animation(&mut self, anim: &mut ZoomAnimation, dt_ms: f32) -> bool {
        anim.elapsed_ms += dt_ms;
        let progress = if anim.duration_ms > 0.0 {
            (anim.elapsed_ms / anim.duration_ms).min(1.0)
        } else {
            1.0
        };
        let t = ease_in_out(progress);

        let zoom = anim.start_zoom + t * (anim.target_zoom - anim.start_zoom);
        let delta = zoom / self.current_zoom;
        self.scale_image(delta, anim.bitmap_focus.x, anim.bitmap_focus.y, anim.stretch_elastic);

        // Insignificant scale deltas penalize the per-step translation; the
        // remaining inaccuracy is fixed on the final step.
        let no_scale_this_step = (delta - 1.0).abs() < SCALE_EPS;
        let partial_translate = !anim.fix_trans_on_scale && no_scale_this_step;
        let translate_weight = if partial_translate { 1.0 - t } else { 1.0 };

        let target_x = anim.start_touch.x + t * (anim.end_touch.x - anim.start_touch.x);
        let target_y = anim.start_touch.y + t * (anim.end_touch.y - anim.start_touch.y);
        if let Some(current) =
            self.transform_coord_bitmap_to_touch(anim.bitmap_focus.x, anim.bitmap_focus.y)
        {
            self.matrix = self.matrix.post_translate(
                (target_x - current.x) * translate_weight,
                (target_y - current.y) * translate_weight,
            );
        }

        let finished = progress >= 1.0;
        if anim.fix_trans_on_scale || (partial_translate && finished) {
            self.fix_scale_trans();
        }
        finished
    }

    /// One frame of a fling. Returns `true` when the scroller reports
    /// finished.
    pub(crate) fn step_fling(&mut self, scroller: &mut FlingScroller, dt_ms: f32) -> bool {
        scroller.elapsed_s += dt_ms / 1000.0;
        let (new_x, new_y) = scroller.position_at(scroller.elapsed_s);
        let dx = new_x - scroller.curr_x;
        let dy = new_y - scroller.curr_y;
        scroller.curr_x = new_x;
        scroller.curr_y = new_y;

        if dx != 0.0 || dy != 0.0 {
            self.matrix = self.matrix.post_translate(dx, dy);
            self.fix_trans();
        }
        scroller.finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_endpoints() {
        assert!(ease_in_out(0.0).abs() < 1e-6);
        assert!((ease_in_out(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_ease_midpoint_and_symmetry() {
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-6);
        let a = ease_in_out(0.25);
        let b = ease_in_out(0.75);
        assert!((a + b - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_ease_is_monotonic() {
        let mut prev = ease_in_out(0.0);
        for i in 1..=20 {
            let next = ease_in_out(i as f32 / 20.0);
            assert!(next >= prev);
            prev = next;
        }
    }
}
