//! Design object model.
//!
//! A placed item is either an image or a text block. The two kinds form a
//! closed sum type; every consumer (renderer, serializer, transform-commit
//! handler) matches exhaustively so a new item kind surfaces at compile time
//! at every switch site.

use serde::{Deserialize, Serialize};

/// An image placed on the canvas.
///
/// `x, y` is the top-left anchor in design units; rotation (degrees) pivots
/// about that anchor. `url` references an uploaded asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageItem {
    pub id: String,
    pub url: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
}

/// A text block placed on the canvas.
///
/// `x, y` is the visual center; the rendered box is derived from font
/// metrics, so width/height are never stored. Rotation pivots about the
/// center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextItem {
    pub id: String,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub font_size: f64,
    pub font_family: String,
    pub fill_color: String,
}

/// A placed design object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DesignItem {
    Image(ImageItem),
    Text(TextItem),
}

impl DesignItem {
    /// The object's opaque id.
    pub fn id(&self) -> &str {
        match self {
            DesignItem::Image(img) => &img.id,
            DesignItem::Text(text) => &text.id,
        }
    }

    /// The object's rotation in degrees.
    pub fn rotation(&self) -> f64 {
        match self {
            DesignItem::Image(img) => img.rotation,
            DesignItem::Text(text) => text.rotation,
        }
    }

    pub fn as_image(&self) -> Option<&ImageItem> {
        match self {
            DesignItem::Image(img) => Some(img),
            DesignItem::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextItem> {
        match self {
            DesignItem::Image(_) => None,
            DesignItem::Text(text) => Some(text),
        }
    }
}

/// A partial update applied to an existing object.
///
/// Fields left `None` keep their current value. The object's id and kind can
/// never change through a patch; fields that do not apply to the object's
/// kind are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub text: Option<String>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub fill_color: Option<String>,
}

impl ObjectPatch {
    /// A patch that only moves the object.
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Merge this patch into an item, kind-aware.
    pub(crate) fn apply(&self, item: &mut DesignItem) {
        match item {
            DesignItem::Image(img) => {
                if let Some(x) = self.x {
                    img.x = x;
                }
                if let Some(y) = self.y {
                    img.y = y;
                }
                if let Some(width) = self.width {
                    img.width = width;
                }
                if let Some(height) = self.height {
                    img.height = height;
                }
                if let Some(rotation) = self.rotation {
                    img.rotation = rotation;
                }
            }
            DesignItem::Text(text) => {
                if let Some(x) = self.x {
                    text.x = x;
                }
                if let Some(y) = self.y {
                    text.y = y;
                }
                if let Some(rotation) = self.rotation {
                    text.rotation = rotation;
                }
                if let Some(content) = &self.text {
                    text.text = content.clone();
                }
                if let Some(font_size) = self.font_size {
                    text.font_size = font_size;
                }
                if let Some(font_family) = &self.font_family {
                    text.font_family = font_family.clone();
                }
                if let Some(fill_color) = &self.fill_color {
                    text.fill_color = fill_color.clone();
                }
            }
        }
    }
}
