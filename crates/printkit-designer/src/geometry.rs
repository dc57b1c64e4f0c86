//! Pure geometry for the design canvas.
//!
//! Handles fitting the garment mockup into the fixed logical canvas, mapping
//! a variant's print area (given in mockup-image pixels) onto that fit, and
//! clamping object positions and boxes to the resulting safe zone. Everything
//! here is deterministic and side-effect free.

use printkit_core::constants::{DESIGN_CANVAS_HEIGHT, DESIGN_CANVAS_WIDTH};
use printkit_core::Variant;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in design units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Creates a new rectangle.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Whether `other` lies entirely inside this rectangle (with tolerance).
    pub fn contains(&self, other: &Rect) -> bool {
        const EPS: f64 = 1e-6;
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.x + other.width <= self.x + self.width + EPS
            && other.y + other.height <= self.y + self.height + EPS
    }
}

/// The rectangle, in design units, inside which all artwork must remain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafeZone {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SafeZone {
    /// The safe zone as a plain rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Center point of the zone.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Letterboxed placement of the mockup image inside the logical canvas.
///
/// `scale` converts mockup-image pixels to design units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundFit {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub scale: f64,
}

/// Fits an image of `image_w x image_h` pixels into the logical canvas,
/// preserving aspect ratio and centering the result.
pub fn fit_background(image_w: f64, image_h: f64) -> BackgroundFit {
    fit_into(image_w, image_h, DESIGN_CANVAS_WIDTH, DESIGN_CANVAS_HEIGHT)
}

/// Fits an image into an arbitrary canvas size. Exposed for tests; the
/// designer always uses the fixed logical canvas.
pub fn fit_into(image_w: f64, image_h: f64, canvas_w: f64, canvas_h: f64) -> BackgroundFit {
    let scale = (canvas_w / image_w).min(canvas_h / image_h);
    let width = image_w * scale;
    let height = image_h * scale;
    BackgroundFit {
        x: (canvas_w - width) / 2.0,
        y: (canvas_h - height) / 2.0,
        width,
        height,
        scale,
    }
}

/// Maps a variant's print area from mockup-image pixels into design units.
///
/// Returns `None` when the source image dimensions are unusable.
pub fn compute_safe_zone(
    variant: &Variant,
    fit: &BackgroundFit,
    source_w: f64,
    source_h: f64,
) -> Option<SafeZone> {
    if source_w <= 0.0 || source_h <= 0.0 {
        return None;
    }
    let sx = fit.width / source_w;
    let sy = fit.height / source_h;
    Some(SafeZone {
        x: fit.x + variant.print_area_left * sx,
        y: fit.y + variant.print_area_top * sy,
        width: variant.print_area_width * sx,
        height: variant.print_area_height * sy,
    })
}

/// Clamps a `w x h` box's top-left so the box lies inside the zone.
///
/// A box larger than the zone pins to the zone origin.
pub fn clamp_position(x: f64, y: f64, w: f64, h: f64, zone: &SafeZone) -> (f64, f64) {
    let cx = if w >= zone.width {
        zone.x
    } else {
        x.clamp(zone.x, zone.x + zone.width - w)
    };
    let cy = if h >= zone.height {
        zone.y
    } else {
        y.clamp(zone.y, zone.y + zone.height - h)
    };
    (cx, cy)
}

/// Resize-path clamp. A box smaller than `min_size` on either side is
/// returned as-is (lenient policy: the attempt is not reported as an error);
/// otherwise the position is clamped so the resized box stays in the zone.
pub fn clamp_box(b: Rect, zone: &SafeZone, min_size: f64) -> Rect {
    if b.width < min_size || b.height < min_size {
        return b;
    }
    let (x, y) = clamp_position(b.x, b.y, b.width, b.height, zone);
    Rect::new(x, y, b.width, b.height)
}

/// The corners of a `w x h` box rotated by `rotation_deg` about its anchor.
///
/// `center_anchored` selects the pivot: the box center (text items) or the
/// box top-left (image items). `(ax, ay)` is the anchor's world position.
pub fn rotated_corners(
    ax: f64,
    ay: f64,
    w: f64,
    h: f64,
    rotation_deg: f64,
    center_anchored: bool,
) -> [(f64, f64); 4] {
    let r = rotation_deg.to_radians();
    let (sin, cos) = r.sin_cos();
    let locals: [(f64, f64); 4] = if center_anchored {
        [
            (-w / 2.0, -h / 2.0),
            (w / 2.0, -h / 2.0),
            (w / 2.0, h / 2.0),
            (-w / 2.0, h / 2.0),
        ]
    } else {
        [(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)]
    };
    locals.map(|(lx, ly)| (ax + lx * cos - ly * sin, ay + lx * sin + ly * cos))
}

/// Axis-aligned bounding box of a set of corner points.
pub fn aabb_of(corners: &[(f64, f64)]) -> Rect {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(x, y) in corners {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
}

/// Rotation-adjusted bounding box of an anchored box.
pub fn rotated_aabb(
    ax: f64,
    ay: f64,
    w: f64,
    h: f64,
    rotation_deg: f64,
    center_anchored: bool,
) -> Rect {
    aabb_of(&rotated_corners(ax, ay, w, h, rotation_deg, center_anchored))
}

/// Whether a point lies inside an anchored, rotated box. Used for hit tests.
pub fn point_in_rotated_box(
    px: f64,
    py: f64,
    ax: f64,
    ay: f64,
    w: f64,
    h: f64,
    rotation_deg: f64,
    center_anchored: bool,
) -> bool {
    // Inverse-rotate the point into the box's local frame.
    let r = (-rotation_deg).to_radians();
    let (sin, cos) = r.sin_cos();
    let dx = px - ax;
    let dy = py - ay;
    let lx = dx * cos - dy * sin;
    let ly = dx * sin + dy * cos;
    if center_anchored {
        lx >= -w / 2.0 && lx <= w / 2.0 && ly >= -h / 2.0 && ly <= h / 2.0
    } else {
        lx >= 0.0 && lx <= w && ly >= 0.0 && ly <= h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_background_letterboxes_vertically() {
        let fit = fit_background(1000.0, 1000.0);
        assert_eq!(fit.width, 520.0);
        assert_eq!(fit.height, 520.0);
        assert_eq!(fit.x, 0.0);
        assert_eq!(fit.y, 85.0);
        assert!((fit.scale - 0.52).abs() < 1e-12);
    }

    #[test]
    fn rotated_aabb_quarter_turn_swaps_sides() {
        let bb = rotated_aabb(0.0, 0.0, 100.0, 40.0, 90.0, true);
        assert!((bb.width - 40.0).abs() < 1e-9);
        assert!((bb.height - 100.0).abs() < 1e-9);
    }
}
