//! The design canvas surface.
//!
//! Owns the session, the decoded assets, and the layout derived from the
//! loaded product/variant: the letterboxed background fit and the safe zone.
//! The logical canvas is fixed at 520x680 design units; the on-screen stage
//! is that surface under a single uniform scale factor.

use std::sync::Arc;

use printkit_core::constants::{
    DESIGN_CANVAS_HEIGHT, DESIGN_CANVAS_WIDTH, STAGE_PADDING_FACTOR,
};
use printkit_core::{DesignError, Product, Variant};
use tracing::{debug, info};

use crate::assets::{AssetStore, PreparedImage};
use crate::font_manager;
use crate::geometry::{self, BackgroundFit, Rect, SafeZone};
use crate::model::{DesignItem, ImageItem, TextItem};
use crate::session::DesignSession;

/// On-screen stage dimensions for a given container, plus the uniform
/// design-unit -> pixel scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageSize {
    pub width: f64,
    pub height: f64,
    pub scale: f64,
}

/// One entry of the non-owning node table: the rendered bounding box of an
/// object for the current pass. Rebuilt on demand; the session's object list
/// stays the sole source of truth.
#[derive(Debug, Clone)]
pub struct NodeBox {
    pub id: String,
    pub aabb: Rect,
}

/// The design canvas: session + assets + derived layout.
#[derive(Debug, Clone, Default)]
pub struct DesignCanvas {
    session: DesignSession,
    assets: AssetStore,
    product: Option<Product>,
    variant_id: Option<String>,
    fit: Option<BackgroundFit>,
    zone: Option<SafeZone>,
}

impl DesignCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &DesignSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut DesignSession {
        &mut self.session
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    pub fn assets_mut(&mut self) -> &mut AssetStore {
        &mut self.assets
    }

    pub fn product(&self) -> Option<&Product> {
        self.product.as_ref()
    }

    /// The active variant, if a product is loaded.
    pub fn variant(&self) -> Option<&Variant> {
        let product = self.product.as_ref()?;
        product.variant(self.variant_id.as_deref()?)
    }

    pub fn background_fit(&self) -> Option<&BackgroundFit> {
        self.fit.as_ref()
    }

    pub fn safe_zone(&self) -> Option<&SafeZone> {
        self.zone.as_ref()
    }

    /// The decoded background mockup for the active variant.
    pub fn background_image(&self) -> Option<Arc<PreparedImage>> {
        let variant = self.variant()?;
        self.assets.get(&variant.front_image)
    }

    /// Loads a product and selects one of its variants. The variant's mockup
    /// must already be present in the asset store for the layout to resolve;
    /// the session is reset for the new visit.
    pub fn load_product(&mut self, product: Product, variant_id: &str) -> Result<(), DesignError> {
        if product.variant(variant_id).is_none() {
            return Err(DesignError::NotReady {
                what: format!("variant {variant_id}"),
            });
        }
        info!(product = %product.id, variant = %variant_id, "product loaded");
        self.product = Some(product);
        self.variant_id = Some(variant_id.to_string());
        self.session = DesignSession::new();
        self.refresh_layout();
        Ok(())
    }

    /// Switches to another variant of the loaded product. Placed objects are
    /// kept; the layout is recomputed for the new mockup.
    pub fn select_variant(&mut self, variant_id: &str) -> Result<(), DesignError> {
        let known = self
            .product
            .as_ref()
            .map(|p| p.variant(variant_id).is_some())
            .unwrap_or(false);
        if !known {
            return Err(DesignError::NotReady {
                what: format!("variant {variant_id}"),
            });
        }
        self.variant_id = Some(variant_id.to_string());
        self.refresh_layout();
        Ok(())
    }

    /// Recomputes the background fit and safe zone. Called only when the
    /// product, variant, or background asset changes, which keeps the zone
    /// immutable between those events.
    pub fn refresh_layout(&mut self) {
        self.fit = None;
        self.zone = None;
        let Some(variant) = self.variant().cloned() else {
            return;
        };
        let Some(bg) = self.assets.get(&variant.front_image) else {
            debug!(url = %variant.front_image, "background asset not decoded yet");
            return;
        };
        let fit = geometry::fit_background(bg.width as f64, bg.height as f64);
        self.zone = geometry::compute_safe_zone(&variant, &fit, bg.width as f64, bg.height as f64);
        self.fit = Some(fit);
        debug!(zone = ?self.zone, "layout refreshed");
    }

    /// Stage size for an available container, preserving the 520:680 aspect
    /// ratio and leaving a padding margin.
    pub fn stage_size_for(container_w: f64, container_h: f64) -> StageSize {
        let avail_w = container_w * STAGE_PADDING_FACTOR;
        let avail_h = container_h * STAGE_PADDING_FACTOR;
        let scale = (avail_w / DESIGN_CANVAS_WIDTH).min(avail_h / DESIGN_CANVAS_HEIGHT);
        StageSize {
            width: DESIGN_CANVAS_WIDTH * scale,
            height: DESIGN_CANVAS_HEIGHT * scale,
            scale,
        }
    }

    /// The safe zone, or a refusal when no product/variant is loaded.
    pub fn require_zone(&self) -> Result<SafeZone, DesignError> {
        self.zone.ok_or(DesignError::SafeZoneUnset)
    }

    /// Places a new image asset. Refused until a safe zone exists.
    pub fn add_image(&mut self, url: impl Into<String>) -> Result<String, DesignError> {
        let zone = self.require_zone()?;
        Ok(self.session.add_image(url, &zone).id.clone())
    }

    /// Places a new default text item. Refused until a safe zone exists.
    pub fn add_text(&mut self) -> Result<String, DesignError> {
        let zone = self.require_zone()?;
        Ok(self.session.add_text(&zone).id.clone())
    }

    /// Rotation-adjusted bounding box of an item, in design units.
    pub fn item_aabb(&self, item: &DesignItem) -> Rect {
        match item {
            DesignItem::Image(img) => image_aabb(img),
            DesignItem::Text(text) => text_aabb(text),
        }
    }

    /// Unrotated size of an item (text measured from font metrics).
    pub fn item_size(&self, item: &DesignItem) -> (f64, f64) {
        match item {
            DesignItem::Image(img) => (img.width, img.height),
            DesignItem::Text(text) => {
                font_manager::measure_text(&text.text, text.font_size, &text.font_family)
            }
        }
    }

    /// Rebuilds the node table for the current object list.
    pub fn node_boxes(&self) -> Vec<NodeBox> {
        self.session
            .objects()
            .iter()
            .map(|item| NodeBox {
                id: item.id().to_string(),
                aabb: self.item_aabb(item),
            })
            .collect()
    }

    /// Topmost object under a point, in design units. `None` means the empty
    /// canvas (which clears selection when clicked).
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&DesignItem> {
        self.session.objects().iter().rev().find(|item| match item {
            DesignItem::Image(img) => geometry::point_in_rotated_box(
                x, y, img.x, img.y, img.width, img.height, img.rotation, false,
            ),
            DesignItem::Text(text) => {
                let (w, h) =
                    font_manager::measure_text(&text.text, text.font_size, &text.font_family);
                geometry::point_in_rotated_box(x, y, text.x, text.y, w, h, text.rotation, true)
            }
        })
    }
}

fn image_aabb(img: &ImageItem) -> Rect {
    geometry::rotated_aabb(img.x, img.y, img.width, img.height, img.rotation, false)
}

fn text_aabb(text: &TextItem) -> Rect {
    let (w, h) = font_manager::measure_text(&text.text, text.font_size, &text.font_family);
    geometry::rotated_aabb(text.x, text.y, w, h, text.rotation, true)
}
