//! Boundary correction: keep the viewport covered by the image.
//!
//! Two regimes. Unrotated, coverage reduces to an O(1) per-axis clamp of the
//! translation. Rotated, both shapes are quads and the minimal corrective
//! translation is found geometrically: the viewport center is walked along
//! the normals from its corners to the image borders, edge by edge, which
//! accumulates a closed "gravity region" polygon of admissible center
//! positions; projecting the real center onto that polygon gives the
//! smallest displacement that restores containment, with no iterative
//! solver.
//!
//! Rotation also drives the scale bounds: after a rotation the image may
//! need upscaling to cover the viewport corners
//! ([`CropEngine::fix_zoom_after_rotation`]), and conversely, when the
//! rotated image is larger than it needs to be, the minimum zoom can be
//! relaxed ([`CropEngine::try_lower_min_scale`]).

use super::{CropEngine, DEFAULT_MIN_ZOOM, UPSCALING_ROTATION_THRESHOLD};
use crate::geometry::{LineSegment, Point};
use log::debug;
use std::cmp::Ordering;

impl CropEngine {
    /// Boundary check and fix for the current matrix.
    pub(crate) fn fix_trans(&mut self) {
        if !self.has_rotation() {
            self.remove_extra_trans();
        } else {
            self.fix_boundaries();
        }
    }

    /// Axis-aligned path: clamp each translation axis independently.
    fn remove_extra_trans(&mut self) {
        let fix_x = fix_trans_for_axis(self.matrix.tx, self.view_width(), self.image_width());
        let fix_y = fix_trans_for_axis(self.matrix.ty, self.view_height(), self.image_height());
        if fix_x != 0.0 || fix_y != 0.0 {
            self.matrix = self.matrix.post_translate(fix_x, fix_y);
        }
    }

    /// [`CropEngine::fix_trans`] plus centering along axes where the image
    /// is smaller than the viewport. Rotated translations are handled by
    /// [`CropEngine::fix_boundaries`] instead.
    pub(crate) fn fix_scale_trans(&mut self) {
        self.fix_trans();
        if self.has_rotation() {
            return;
        }
        let mut tx = self.matrix.tx;
        let mut ty = self.matrix.ty;
        if self.image_width() < self.view_width() {
            tx = (self.view_width() - self.image_width()) / 2.0;
        }
        if self.image_height() < self.view_height() {
            ty = (self.view_height() - self.image_height()) / 2.0;
        }
        self.matrix = self.matrix.with_translation(tx, ty);
    }

    /// Rotated path: minimal-displacement translation restoring
    /// `viewport ⊆ image`.
    fn fix_boundaries(&mut self) {
        let Some(image) = self.image_bounds() else {
            return;
        };
        let viewport_quad = self.viewport.to_quad();
        if image.contains_quad(&viewport_quad) {
            return;
        }

        let viewport_center = viewport_quad.center();
        let image_center = image.center();
        let centered_port = viewport_quad.move_by(
            image_center.x - viewport_center.x,
            image_center.y - viewport_center.y,
        );

        let borders = image.clockwise_borders();
        let corners = centered_port.clockwise_corners();

        // Start the rectangle traversal at the corner nearest to the last
        // border, so corner order stays aligned with clockwise border order.
        let Some(nearest_normal) = corners
            .iter()
            .filter_map(|corner| borders[3].normal_from(*corner))
            .min_by(|a, b| compare_lengths(a, b))
        else {
            return;
        };
        let start_index = corners
            .iter()
            .position(|corner| *corner == nearest_normal.p1)
            .map_or(corners.len(), |i| i + 1);

        let mut queue: Vec<Point> = corners[start_index..]
            .iter()
            .chain(corners[..start_index].iter())
            .copied()
            .collect();
        // Precondition: one traversal corner per image border.
        debug_assert_eq!(queue.len(), borders.len());

        let mut temp_center = follow(centered_port.center(), &nearest_normal);
        for corner in &mut queue {
            *corner = follow(*corner, &nearest_normal);
        }

        // Walk each border's normal in turn, accumulating the gravity-region
        // boundary segments between successive center positions.
        let mut availability: Vec<LineSegment> = Vec::with_capacity(borders.len());
        let mut last_point: Option<Point> = None;
        for border in &borders {
            if queue.is_empty() {
                break;
            }
            let corner = queue.remove(0);
            let Some(normal) = border.normal_from(corner) else {
                continue;
            };

            temp_center = follow(temp_center, &normal);
            for remaining in &mut queue {
                *remaining = follow(*remaining, &normal);
            }

            if let Some(previous) = last_point {
                availability.push(LineSegment::new(previous, temp_center));
            }
            last_point = Some(temp_center);
        }
        if let (Some(previous), Some(first)) = (last_point, availability.first().copied()) {
            availability.push(LineSegment::new(previous, first.p1));
        }

        let nearest_pivot = availability
            .iter()
            .filter_map(|segment| segment.nearest_point_to(viewport_center))
            .min_by(|a, b| {
                a.distance_to(viewport_center)
                    .partial_cmp(&b.distance_to(viewport_center))
                    .unwrap_or(Ordering::Equal)
            });
        if let Some(pivot) = nearest_pivot {
            let dx = viewport_center.x - pivot.x;
            let dy = viewport_center.y - pivot.y;
            debug!("rotated boundary fix: translating by ({dx:.2}, {dy:.2})");
            self.matrix = self.matrix.post_translate(dx, dy);
        }
    }

    /// Restore coverage after a rotation by upscaling, via `strategy`.
    ///
    /// The required factor is the worst-case ratio of a viewport
    /// half-diagonal to the distance from the viewport center to the image
    /// border it crosses. When the viewport is already covered, tries to
    /// relax the minimum zoom instead.
    pub(crate) fn fix_zoom_after_rotation(&mut self, strategy: impl FnOnce(&mut Self, f32)) {
        let Some(image) = self.image_bounds() else {
            return;
        };
        if image.contains_quad(&self.viewport.to_quad()) {
            self.try_lower_min_scale();
            return;
        }

        let center = Point::new(self.viewport.center_x(), self.viewport.center_y());
        let borders = image.clockwise_borders();
        let mut required: Option<f32> = None;

        for corner in self.viewport.to_quad().clockwise_corners() {
            let diagonal = LineSegment::new(center, corner);
            for border in &borders {
                let Some(hit) = diagonal.intersect(border) else {
                    continue;
                };
                let shortened = LineSegment::new(center, hit);
                if shortened.length() <= f32::EPSILON {
                    continue;
                }
                let ratio = diagonal.length() / shortened.length();
                required = Some(required.map_or(ratio, |max| max.max(ratio)));
            }
        }

        if let Some(scale) = required.filter(|scale| *scale > UPSCALING_ROTATION_THRESHOLD) {
            debug!("rotation left viewport uncovered, upscaling by {scale:.4}");
            strategy(self, scale);
        }
    }

    /// When the rotated image is larger than the viewport needs, lower the
    /// minimum zoom so the user can zoom further out, never below 1.0 and
    /// never allowing under-coverage.
    pub(crate) fn try_lower_min_scale(&mut self) {
        let Some(image) = self.image_bounds() else {
            return;
        };
        if !image.contains_quad(&self.viewport.to_quad()) {
            return;
        }

        let center = Point::new(self.viewport.center_x(), self.viewport.center_y());
        let distant = self.image_width().max(self.image_height());
        let borders = image.clockwise_borders();
        let mut minimum: Option<f32> = None;

        for corner in self.viewport.to_quad().clockwise_corners() {
            let diagonal = LineSegment::new(center, corner);
            // Extend the center-to-corner ray past the image bounds so it
            // meets a border.
            let outgoing = LineSegment::new(center, vector_distant_point(&diagonal, distant));
            let corner_distance = diagonal.length();
            if corner_distance <= f32::EPSILON {
                continue;
            }
            for border in &borders {
                let Some(hit) = outgoing.intersect(border) else {
                    continue;
                };
                let ratio = center.distance_to(hit) / corner_distance;
                minimum = Some(minimum.map_or(ratio, |min| min.min(ratio)));
            }
        }

        if let Some(ratio) = minimum.filter(|ratio| *ratio > UPSCALING_ROTATION_THRESHOLD) {
            let new_min = (self.current_zoom / ratio).max(DEFAULT_MIN_ZOOM);
            debug!("relaxing min zoom to {new_min:.4}");
            self.set_min_zoom(new_min);
        }
    }
}

/// Translation correction for one axis: keep the content edge at or past
/// the view edge, or pin a smaller content to the near edge.
fn fix_trans_for_axis(trans: f32, view_size: f32, content_size: f32) -> f32 {
    let (min_trans, max_trans) = if content_size <= view_size {
        (0.0, view_size - content_size)
    } else {
        (view_size - content_size, 0.0)
    };

    if trans < min_trans {
        return -trans + min_trans;
    }
    if trans > max_trans {
        return -trans + max_trans;
    }
    0.0
}

fn compare_lengths(a: &LineSegment, b: &LineSegment) -> Ordering {
    a.length()
        .partial_cmp(&b.length())
        .unwrap_or(Ordering::Equal)
}

/// Move a point by a segment's direction vector.
fn follow(point: Point, vector: &LineSegment) -> Point {
    let (dx, dy) = vector.transition();
    point.move_by(dx, dy)
}

/// A point far along the segment's direction, used to turn a
/// center-to-corner segment into an outgoing ray.
fn vector_distant_point(line: &LineSegment, distant: f32) -> Point {
    let dx = line.p2.x - line.p1.x;
    if dx == 0.0 {
        return Point::new(line.p1.x, distant);
    }
    let slope = (line.p2.y - line.p1.y) / dx;
    let new_x = distant * dx.signum();
    let new_y = new_x * slope;
    Point::new(line.p1.x + new_x, line.p1.y + new_y)
}
