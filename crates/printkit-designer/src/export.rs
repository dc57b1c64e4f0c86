//! Preview export pipeline.
//!
//! Rasterizes the current canvas at an elevated pixel density and wraps the
//! PNG bytes in a named file for upload. Refuses up front when the canvas,
//! product, or variant is absent; nothing is rendered in that case.

use std::io::Cursor;

use printkit_core::constants::EXPORT_PIXEL_RATIO;
use printkit_core::ExportError;
use tracing::info;

use crate::canvas::DesignCanvas;
use crate::renderer::{self, RenderMode};

/// A rasterized, named preview ready for upload.
#[derive(Debug, Clone)]
pub struct ExportedPreview {
    /// `design_<productId>_<variantId>.png`
    pub file_name: String,
    pub png_bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Exports the canvas at the default pixel ratio (2x).
pub fn export_preview(canvas: &DesignCanvas) -> Result<ExportedPreview, ExportError> {
    export_preview_with_ratio(canvas, EXPORT_PIXEL_RATIO)
}

/// Exports the canvas at an explicit pixel ratio (settings override).
pub fn export_preview_with_ratio(
    canvas: &DesignCanvas,
    pixel_ratio: f64,
) -> Result<ExportedPreview, ExportError> {
    let product = canvas.product().ok_or_else(|| ExportError::NotReady {
        missing: "product".to_string(),
    })?;
    let variant = canvas.variant().ok_or_else(|| ExportError::NotReady {
        missing: "variant".to_string(),
    })?;
    if canvas.background_fit().is_none() {
        return Err(ExportError::NotReady {
            missing: "canvas".to_string(),
        });
    }
    let file_name = format!("design_{}_{}.png", product.id, variant.id);

    let image = renderer::render_to_image(canvas, pixel_ratio, RenderMode::Export).map_err(|e| {
        ExportError::Encode {
            reason: e.to_string(),
        }
    })?;
    let (width, height) = image.dimensions();

    let mut png_bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png_bytes), image::ImageFormat::Png)
        .map_err(|e| ExportError::Encode {
            reason: e.to_string(),
        })?;

    info!(file = %file_name, width, height, bytes = png_bytes.len(), "preview exported");
    Ok(ExportedPreview {
        file_name,
        png_bytes,
        width,
        height,
    })
}
