//! Design session: the ordered object list and current selection.
//!
//! The session is the sole source of truth for placed artwork. Z-order is
//! insertion order. Every mutation touches only the supplied id, which keeps
//! the operations total over the session and leaves room for an undo layer
//! on top later.

use printkit_core::constants::{
    DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_IMAGE_SIZE, DEFAULT_TEXT, DEFAULT_TEXT_FILL,
    DUPLICATE_OFFSET,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::font_manager;
use crate::geometry::{self, SafeZone};
use crate::model::{DesignItem, ImageItem, ObjectPatch, TextItem};

/// The in-memory design state for one product/variant visit.
///
/// Created empty when a product is loaded, discarded when the designer is
/// left. Only the rasterized export and a JSON snapshot of `objects` ever
/// leave the process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DesignSession {
    objects: Vec<DesignItem>,
    selected_id: Option<String>,
}

fn new_object_id() -> String {
    // Opaque, never reused after deletion.
    Uuid::new_v4().to_string()
}

impl DesignSession {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Objects in z-order (first drawn first).
    pub fn objects(&self) -> &[DesignItem] {
        &self.objects
    }

    /// The currently selected object id, if any.
    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    /// The currently selected object, if any.
    pub fn selected(&self) -> Option<&DesignItem> {
        let id = self.selected_id.as_deref()?;
        self.get(id)
    }

    /// Looks up an object by id.
    pub fn get(&self, id: &str) -> Option<&DesignItem> {
        self.objects.iter().find(|o| o.id() == id)
    }

    /// Places a new image, sized to a square of min(240, zone width) and
    /// centered in the safe zone. The new object becomes selected.
    pub fn add_image(&mut self, url: impl Into<String>, zone: &SafeZone) -> &ImageItem {
        let size = DEFAULT_IMAGE_SIZE.min(zone.width);
        let item = ImageItem {
            id: new_object_id(),
            url: url.into(),
            x: zone.x + (zone.width - size) / 2.0,
            y: zone.y + (zone.height - size) / 2.0,
            width: size,
            height: size,
            rotation: 0.0,
        };
        let id = item.id.clone();
        debug!(id = %id, "add image");
        self.objects.push(DesignItem::Image(item));
        self.selected_id = Some(id);
        match self.objects.last() {
            Some(DesignItem::Image(img)) => img,
            _ => unreachable!("just pushed an image item"),
        }
    }

    /// Places a new text item with the default content, centered (by its
    /// pivot) in the safe zone. The new object becomes selected.
    pub fn add_text(&mut self, zone: &SafeZone) -> &TextItem {
        let (cx, cy) = zone.center();
        let item = TextItem {
            id: new_object_id(),
            text: DEFAULT_TEXT.to_string(),
            x: cx,
            y: cy,
            rotation: 0.0,
            font_size: DEFAULT_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            fill_color: DEFAULT_TEXT_FILL.to_string(),
        };
        let id = item.id.clone();
        debug!(id = %id, "add text");
        self.objects.push(DesignItem::Text(item));
        self.selected_id = Some(id);
        match self.objects.last() {
            Some(DesignItem::Text(text)) => text,
            _ => unreachable!("just pushed a text item"),
        }
    }

    /// Applies a patch to the object with the given id. Unknown ids are a
    /// no-op; the id and kind of the object never change.
    pub fn update_object(&mut self, id: &str, patch: &ObjectPatch) {
        match self.objects.iter_mut().find(|o| o.id() == id) {
            Some(item) => patch.apply(item),
            None => debug!(id = %id, "update for unknown object ignored"),
        }
    }

    /// Removes the object with the given id. Removing the selected object
    /// clears the selection; other removals leave it untouched.
    pub fn remove_object(&mut self, id: &str) {
        self.objects.retain(|o| o.id() != id);
        if self.selected_id.as_deref() == Some(id) {
            self.selected_id = None;
        }
    }

    /// Selects an object, or clears the selection. Selecting an unknown id
    /// is a no-op.
    pub fn select(&mut self, id: Option<&str>) {
        match id {
            Some(id) if self.get(id).is_some() => self.selected_id = Some(id.to_string()),
            Some(id) => debug!(id = %id, "select of unknown object ignored"),
            None => self.selected_id = None,
        }
    }

    /// Clones the selected object with a fresh id, offset by a fixed amount
    /// and clamped into the zone. The clone becomes selected.
    pub fn duplicate_selected(&mut self, zone: &SafeZone) -> Option<String> {
        let mut clone = self.selected()?.clone();
        let id = new_object_id();
        match &mut clone {
            DesignItem::Image(img) => {
                img.id = id.clone();
                let (x, y) = geometry::clamp_position(
                    img.x + DUPLICATE_OFFSET,
                    img.y + DUPLICATE_OFFSET,
                    img.width,
                    img.height,
                    zone,
                );
                img.x = x;
                img.y = y;
            }
            DesignItem::Text(text) => {
                text.id = id.clone();
                let (w, h) =
                    font_manager::measure_text(&text.text, text.font_size, &text.font_family);
                let (x, y) = geometry::clamp_position(
                    text.x - w / 2.0 + DUPLICATE_OFFSET,
                    text.y - h / 2.0 + DUPLICATE_OFFSET,
                    w,
                    h,
                    zone,
                );
                text.x = x + w / 2.0;
                text.y = y + h / 2.0;
            }
        }
        self.objects.push(clone);
        self.selected_id = Some(id.clone());
        Some(id)
    }

    /// Moves the object to the top of the z-order.
    pub fn bring_to_front(&mut self, id: &str) {
        if let Some(pos) = self.objects.iter().position(|o| o.id() == id) {
            let item = self.objects.remove(pos);
            self.objects.push(item);
        }
    }

    /// Moves the object to the bottom of the z-order.
    pub fn send_to_back(&mut self, id: &str) {
        if let Some(pos) = self.objects.iter().position(|o| o.id() == id) {
            let item = self.objects.remove(pos);
            self.objects.insert(0, item);
        }
    }

    /// JSON snapshot of the object list, as embedded in order payloads.
    pub fn snapshot_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.objects).unwrap_or(serde_json::Value::Array(vec![]))
    }
}
