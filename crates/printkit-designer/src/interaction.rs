//! Pointer interaction state machine.
//!
//! Translates pointer gestures (click-to-select, drag, handle-resize,
//! rotate, click-outside-to-deselect) into session mutations, applying
//! safe-zone clamping at every step. Pointer input arrives in stage pixels
//! and is divided by the stage scale before anything else happens.
//!
//! States: idle, selected, dragging, transforming. Dragging clamps the live
//! rotation-adjusted bounding box on every move; transforming accumulates
//! scale/rotation relative to the gesture start and commits once, on
//! release.

use printkit_core::constants::{
    HANDLE_SIZE_PX, MAX_FONT_SIZE, MIN_FONT_SIZE, MIN_IMAGE_DIMENSION, MIN_RESIZE_UNITS,
    ROTATE_HANDLE_OFFSET,
};
use printkit_core::DesignError;
use tracing::debug;

use crate::canvas::DesignCanvas;
use crate::font_manager;
use crate::geometry::{self, Rect, SafeZone};
use crate::model::{DesignItem, ObjectPatch};

/// A grabbable handle on the selection overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
    Rotate,
}

impl Handle {
    const CORNERS: [Handle; 4] = [
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomRight,
        Handle::BottomLeft,
    ];

    /// Local corner position as (sign_x, sign_y) in [0, 1] box coordinates.
    fn corner_signs(self) -> Option<(f64, f64)> {
        match self {
            Handle::TopLeft => Some((0.0, 0.0)),
            Handle::TopRight => Some((1.0, 0.0)),
            Handle::BottomRight => Some((1.0, 1.0)),
            Handle::BottomLeft => Some((0.0, 1.0)),
            Handle::Rotate => None,
        }
    }

    fn opposite(self) -> Handle {
        match self {
            Handle::TopLeft => Handle::BottomRight,
            Handle::TopRight => Handle::BottomLeft,
            Handle::BottomRight => Handle::TopLeft,
            Handle::BottomLeft => Handle::TopRight,
            Handle::Rotate => Handle::Rotate,
        }
    }
}

/// World positions of the selection handles for the selected object.
#[derive(Debug, Clone)]
pub struct HandleLayout {
    /// Corner handles in [top-left, top-right, bottom-right, bottom-left]
    /// order, rotated with the object.
    pub corners: [(Handle, (f64, f64)); 4],
    /// Rotate handle above the top edge.
    pub rotate: (f64, f64),
}

/// Geometry captured at transform start, plus the accumulated gesture.
#[derive(Debug, Clone)]
struct TransformStart {
    handle: Handle,
    /// World position of the corner opposite the grabbed one.
    fixed: (f64, f64),
    /// Local offset of the grabbed corner from the fixed one (unrotated).
    grab_local: (f64, f64),
    /// World center of the object at gesture start.
    pivot: (f64, f64),
    /// Pointer angle at gesture start, radians, relative to the pivot.
    start_angle: f64,
    start_rotation: f64,
    scale_x: f64,
    scale_y: f64,
    rotation: f64,
}

/// Interaction state.
#[derive(Debug, Clone)]
enum State {
    Idle,
    Selected {
        id: String,
    },
    Dragging {
        id: String,
        grab_dx: f64,
        grab_dy: f64,
    },
    Transforming {
        id: String,
        start: TransformStart,
    },
}

/// The interaction controller. Operates on a canvas passed per call so the
/// canvas can be shared with the checkout side independently.
#[derive(Debug)]
pub struct InteractionController {
    state: State,
    stage_scale: f64,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            stage_scale: 1.0,
        }
    }

    /// Updates the stage pixel scale (from `DesignCanvas::stage_size_for`).
    pub fn set_stage_scale(&mut self, scale: f64) {
        if scale > 0.0 {
            self.stage_scale = scale;
        }
    }

    pub fn stage_scale(&self) -> f64 {
        self.stage_scale
    }

    /// Whether a drag or transform gesture is in progress.
    pub fn is_gesturing(&self) -> bool {
        matches!(
            self.state,
            State::Dragging { .. } | State::Transforming { .. }
        )
    }

    /// The id the state machine currently considers active.
    pub fn active_id(&self) -> Option<&str> {
        match &self.state {
            State::Idle => None,
            State::Selected { id }
            | State::Dragging { id, .. }
            | State::Transforming { id, .. } => Some(id),
        }
    }

    /// Handle positions for the selected object, in design units.
    pub fn handle_layout(&self, canvas: &DesignCanvas) -> Option<HandleLayout> {
        let item = canvas.session().selected()?;
        let (w, h) = canvas.item_size(item);
        let (anchor, center_anchored) = item_anchor(item);
        let corners_pos =
            geometry::rotated_corners(anchor.0, anchor.1, w, h, item.rotation(), center_anchored);
        let corners = [
            (Handle::TopLeft, corners_pos[0]),
            (Handle::TopRight, corners_pos[1]),
            (Handle::BottomRight, corners_pos[2]),
            (Handle::BottomLeft, corners_pos[3]),
        ];
        // Rotate handle sits above the rotated top edge at a fixed on-screen
        // distance.
        let offset = ROTATE_HANDLE_OFFSET / self.stage_scale;
        let top_mid = (
            (corners_pos[0].0 + corners_pos[1].0) / 2.0,
            (corners_pos[0].1 + corners_pos[1].1) / 2.0,
        );
        let r = item.rotation().to_radians();
        let rotate = (top_mid.0 + offset * r.sin(), top_mid.1 - offset * r.cos());
        Some(HandleLayout { corners, rotate })
    }

    /// Pointer press at stage pixel coordinates.
    pub fn pointer_down(
        &mut self,
        canvas: &mut DesignCanvas,
        stage_x: f64,
        stage_y: f64,
    ) -> Result<(), DesignError> {
        canvas.require_zone()?;
        let (px, py) = self.to_design(stage_x, stage_y);

        // Handles of the current selection win over object bodies.
        if let Some(handle) = self.hit_handle(canvas, px, py) {
            if let Some(id) = canvas.session().selected_id().map(str::to_string) {
                if let Some(start) = self.transform_start(canvas, &id, handle, px, py) {
                    debug!(id = %id, ?handle, "transform begin");
                    self.state = State::Transforming { id, start };
                    return Ok(());
                }
            }
        }

        match canvas.hit_test(px, py) {
            Some(item) => {
                let id = item.id().to_string();
                let (anchor, _) = item_anchor(item);
                canvas.session_mut().select(Some(&id));
                self.state = State::Dragging {
                    id,
                    grab_dx: px - anchor.0,
                    grab_dy: py - anchor.1,
                };
            }
            None => {
                canvas.session_mut().select(None);
                self.state = State::Idle;
            }
        }
        Ok(())
    }

    /// Pointer movement at stage pixel coordinates.
    pub fn pointer_move(
        &mut self,
        canvas: &mut DesignCanvas,
        stage_x: f64,
        stage_y: f64,
    ) -> Result<(), DesignError> {
        let zone = canvas.require_zone()?;
        let (px, py) = self.to_design(stage_x, stage_y);
        match &mut self.state {
            State::Dragging { id, grab_dx, grab_dy } => {
                let id = id.clone();
                let candidate = (px - *grab_dx, py - *grab_dy);
                move_clamped(canvas, &id, candidate, &zone);
            }
            State::Transforming { start, .. } => {
                match start.handle {
                    Handle::Rotate => {
                        let angle = (py - start.pivot.1).atan2(px - start.pivot.0);
                        start.rotation =
                            start.start_rotation + (angle - start.start_angle).to_degrees();
                    }
                    _ => {
                        // Project the pointer onto the unrotated axes of the
                        // fixed corner's frame.
                        let r = (-start.start_rotation).to_radians();
                        let (sin, cos) = r.sin_cos();
                        let dx = px - start.fixed.0;
                        let dy = py - start.fixed.1;
                        let lx = dx * cos - dy * sin;
                        let ly = dx * sin + dy * cos;
                        if start.grab_local.0.abs() > f64::EPSILON {
                            start.scale_x = lx / start.grab_local.0;
                        }
                        if start.grab_local.1.abs() > f64::EPSILON {
                            start.scale_y = ly / start.grab_local.1;
                        }
                    }
                }
            }
            State::Idle | State::Selected { .. } => {}
        }
        Ok(())
    }

    /// Pointer release. Commits the gesture in progress.
    pub fn pointer_up(&mut self, canvas: &mut DesignCanvas) -> Result<(), DesignError> {
        let zone = canvas.require_zone()?;
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Dragging { id, .. } => {
                // Moves were clamped live; the final position is already
                // committed.
                self.state = State::Selected { id };
            }
            State::Transforming { id, start } => {
                self.commit_transform(canvas, &id, &start, &zone);
                self.state = State::Selected { id };
            }
            State::Idle => {}
            State::Selected { id } => self.state = State::Selected { id },
        }
        Ok(())
    }

    /// Centers the selected object horizontally in the safe zone. Images
    /// center by box, text by its pivot.
    pub fn center_horizontally(&mut self, canvas: &mut DesignCanvas) -> Result<(), DesignError> {
        let zone = canvas.require_zone()?;
        let Some(item) = canvas.session().selected().cloned() else {
            return Ok(());
        };
        let x = match &item {
            DesignItem::Image(img) => zone.x + (zone.width - img.width) / 2.0,
            DesignItem::Text(_) => zone.center().0,
        };
        let patch = ObjectPatch {
            x: Some(x),
            ..ObjectPatch::default()
        };
        canvas.session_mut().update_object(item.id(), &patch);
        Ok(())
    }

    /// Centers the selected object vertically in the safe zone.
    pub fn center_vertically(&mut self, canvas: &mut DesignCanvas) -> Result<(), DesignError> {
        let zone = canvas.require_zone()?;
        let Some(item) = canvas.session().selected().cloned() else {
            return Ok(());
        };
        let y = match &item {
            DesignItem::Image(img) => zone.y + (zone.height - img.height) / 2.0,
            DesignItem::Text(_) => zone.center().1,
        };
        let patch = ObjectPatch {
            y: Some(y),
            ..ObjectPatch::default()
        };
        canvas.session_mut().update_object(item.id(), &patch);
        Ok(())
    }

    /// Moves the selected object by a design-unit delta, clamped like a drag.
    pub fn nudge_selected(
        &mut self,
        canvas: &mut DesignCanvas,
        dx: f64,
        dy: f64,
    ) -> Result<(), DesignError> {
        let zone = canvas.require_zone()?;
        let Some(item) = canvas.session().selected() else {
            return Ok(());
        };
        let id = item.id().to_string();
        let (anchor, _) = item_anchor(item);
        move_clamped(canvas, &id, (anchor.0 + dx, anchor.1 + dy), &zone);
        Ok(())
    }

    /// Deletes the selected object and returns to idle.
    pub fn delete_selected(&mut self, canvas: &mut DesignCanvas) -> Result<(), DesignError> {
        canvas.require_zone()?;
        if let Some(id) = canvas.session().selected_id().map(str::to_string) {
            debug!(id = %id, "delete selected");
            canvas.session_mut().remove_object(&id);
        }
        self.state = State::Idle;
        Ok(())
    }

    fn to_design(&self, stage_x: f64, stage_y: f64) -> (f64, f64) {
        (stage_x / self.stage_scale, stage_y / self.stage_scale)
    }

    fn hit_handle(&self, canvas: &DesignCanvas, px: f64, py: f64) -> Option<Handle> {
        let layout = self.handle_layout(canvas)?;
        let threshold = HANDLE_SIZE_PX / self.stage_scale;
        let near = |pos: (f64, f64)| (px - pos.0).hypot(py - pos.1) <= threshold;
        if near(layout.rotate) {
            return Some(Handle::Rotate);
        }
        layout
            .corners
            .iter()
            .find(|(_, pos)| near(*pos))
            .map(|(h, _)| *h)
    }

    fn transform_start(
        &self,
        canvas: &DesignCanvas,
        id: &str,
        handle: Handle,
        px: f64,
        py: f64,
    ) -> Option<TransformStart> {
        let item = canvas.session().get(id)?;
        let (w, h) = canvas.item_size(item);
        let (anchor, center_anchored) = item_anchor(item);
        let corners =
            geometry::rotated_corners(anchor.0, anchor.1, w, h, item.rotation(), center_anchored);
        let pivot = (
            (corners[0].0 + corners[2].0) / 2.0,
            (corners[0].1 + corners[2].1) / 2.0,
        );

        let (fixed, grab_local) = match handle.corner_signs() {
            Some((sx, sy)) => {
                let fixed_idx = Handle::CORNERS
                    .iter()
                    .position(|&c| c == handle.opposite())
                    .unwrap_or(0);
                let (ox, oy) = handle.opposite().corner_signs().unwrap_or((0.0, 0.0));
                // Local offset of the grabbed corner from the fixed one,
                // before rotation.
                let grab_local = ((sx - ox) * w, (sy - oy) * h);
                (corners[fixed_idx], grab_local)
            }
            None => (pivot, (0.0, 0.0)),
        };

        let start_angle = (py - pivot.1).atan2(px - pivot.0);
        Some(TransformStart {
            handle,
            fixed,
            grab_local,
            pivot,
            start_angle,
            start_rotation: item.rotation(),
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: item.rotation(),
        })
    }

    /// Applies the accumulated gesture to the model, resetting the visual
    /// scale to identity by folding it into the stored size (images) or font
    /// size (text).
    fn commit_transform(
        &self,
        canvas: &mut DesignCanvas,
        id: &str,
        start: &TransformStart,
        zone: &SafeZone,
    ) {
        let Some(item) = canvas.session().get(id).cloned() else {
            return;
        };
        match item {
            DesignItem::Image(img) => {
                let mut new_w = (img.width * start.scale_x).max(MIN_IMAGE_DIMENSION);
                let mut new_h = (img.height * start.scale_y).max(MIN_IMAGE_DIMENSION);
                let rotation = start.rotation;
                // A box whose rotated footprint exceeds the zone can never be
                // clamped into it; cap the size first, keeping the aspect.
                let footprint = geometry::rotated_aabb(0.0, 0.0, new_w, new_h, rotation, false);
                let cap = (zone.width / footprint.width).min(zone.height / footprint.height);
                if cap < 1.0 {
                    new_w = (new_w * cap).max(MIN_IMAGE_DIMENSION);
                    new_h = (new_h * cap).max(MIN_IMAGE_DIMENSION);
                }
                let anchor = match start.handle.corner_signs() {
                    // Keep the grabbed gesture's fixed corner fixed.
                    Some(_) => {
                        let (ox, oy) = start
                            .handle
                            .opposite()
                            .corner_signs()
                            .unwrap_or((0.0, 0.0));
                        anchor_from_fixed(start.fixed, (ox * new_w, oy * new_h), rotation)
                    }
                    // Rotation pivots about the center.
                    None => anchor_from_fixed(
                        start.pivot,
                        (new_w / 2.0, new_h / 2.0),
                        rotation,
                    ),
                };
                let bb = geometry::rotated_aabb(anchor.0, anchor.1, new_w, new_h, rotation, false);
                let cb = geometry::clamp_box(bb, zone, MIN_RESIZE_UNITS);
                let patch = ObjectPatch {
                    x: Some(anchor.0 + cb.x - bb.x),
                    y: Some(anchor.1 + cb.y - bb.y),
                    width: Some(new_w),
                    height: Some(new_h),
                    rotation: Some(rotation),
                    ..ObjectPatch::default()
                };
                canvas.session_mut().update_object(id, &patch);
            }
            DesignItem::Text(text) => {
                // Text reflows: only the X scale factor feeds the font size.
                let new_font = (text.font_size * start.scale_x).clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
                let rotation = start.rotation;
                let (new_w, new_h) =
                    font_manager::measure_text(&text.text, new_font, &text.font_family);
                let center = match start.handle.corner_signs() {
                    Some(_) => {
                        let (ox, oy) = start
                            .handle
                            .opposite()
                            .corner_signs()
                            .unwrap_or((0.0, 0.0));
                        // Corner offsets relative to the center, same signs
                        // as at gesture start.
                        anchor_from_fixed(
                            start.fixed,
                            ((ox - 0.5) * new_w, (oy - 0.5) * new_h),
                            rotation,
                        )
                    }
                    None => start.pivot,
                };
                let bb = geometry::rotated_aabb(center.0, center.1, new_w, new_h, rotation, true);
                let (cx, cy) = geometry::clamp_position(bb.x, bb.y, bb.width, bb.height, zone);
                let patch = ObjectPatch {
                    x: Some(center.0 + cx - bb.x),
                    y: Some(center.1 + cy - bb.y),
                    rotation: Some(rotation),
                    font_size: Some(new_font),
                    ..ObjectPatch::default()
                };
                canvas.session_mut().update_object(id, &patch);
            }
        }
    }
}

/// The anchor position of an item and whether it is center-anchored.
fn item_anchor(item: &DesignItem) -> ((f64, f64), bool) {
    match item {
        DesignItem::Image(img) => ((img.x, img.y), false),
        DesignItem::Text(text) => ((text.x, text.y), true),
    }
}

/// World anchor position such that `fixed_world = anchor + R(rot) * local`.
fn anchor_from_fixed(fixed_world: (f64, f64), local: (f64, f64), rotation_deg: f64) -> (f64, f64) {
    let r = rotation_deg.to_radians();
    let (sin, cos) = r.sin_cos();
    (
        fixed_world.0 - (local.0 * cos - local.1 * sin),
        fixed_world.1 - (local.0 * sin + local.1 * cos),
    )
}

/// Moves an item's anchor to `candidate`, clamping its rotation-adjusted
/// bounding box into the zone, and commits the clamped position.
fn move_clamped(canvas: &mut DesignCanvas, id: &str, candidate: (f64, f64), zone: &SafeZone) {
    let Some(item) = canvas.session().get(id) else {
        return;
    };
    let (w, h) = canvas.item_size(item);
    let (_, center_anchored) = item_anchor(item);
    let rotation = item.rotation();
    let bb: Rect = geometry::rotated_aabb(candidate.0, candidate.1, w, h, rotation, center_anchored);
    let (cx, cy) = geometry::clamp_position(bb.x, bb.y, bb.width, bb.height, zone);
    let patch = ObjectPatch::position(candidate.0 + cx - bb.x, candidate.1 + cy - bb.y);
    canvas.session_mut().update_object(id, &patch);
}
