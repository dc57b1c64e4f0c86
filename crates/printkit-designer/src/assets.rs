//! Decoded image assets shared across the canvas.
//!
//! The store maps asset URLs to decoded, premultiplied RGBA buffers so the
//! renderer can blit them straight into a tiny-skia pixmap. The store never
//! fetches anything itself; bytes arrive from whatever transport the host
//! uses and are decoded once here.

use std::collections::HashMap;
use std::sync::Arc;

use printkit_core::DesignError;
use tracing::debug;

/// A decoded image ready for compositing (premultiplied RGBA8).
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    /// Premultiplied RGBA, row-major, `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

impl PreparedImage {
    /// Decodes encoded image bytes (PNG, JPEG, ...) for the given URL.
    pub fn from_bytes(url: &str, bytes: &[u8]) -> Result<Self, DesignError> {
        let decoded = image::load_from_memory(bytes).map_err(|e| DesignError::AssetDecode {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        let mut pixels = rgba.into_raw();
        premultiply(&mut pixels);
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A solid-color image. Used for placeholders and in tests.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut px = rgba;
        let a = px[3] as u16;
        for c in &mut px[..3] {
            *c = ((*c as u16 * a) / 255) as u8;
        }
        let pixels = px
            .iter()
            .copied()
            .cycle()
            .take((width * height * 4) as usize)
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// View as a tiny-skia pixmap for compositing.
    pub fn to_pixmap(&self) -> Option<tiny_skia::Pixmap> {
        let size = tiny_skia::IntSize::from_wh(self.width, self.height)?;
        tiny_skia::Pixmap::from_vec(self.pixels.clone(), size)
    }
}

fn premultiply(pixels: &mut [u8]) {
    for px in pixels.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 255 {
            continue;
        }
        px[0] = ((px[0] as u16 * a) / 255) as u8;
        px[1] = ((px[1] as u16 * a) / 255) as u8;
        px[2] = ((px[2] as u16 * a) / 255) as u8;
    }
}

/// URL-keyed store of decoded assets.
#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    images: HashMap<String, Arc<PreparedImage>>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes and stores encoded bytes under a URL.
    pub fn insert_bytes(&mut self, url: impl Into<String>, bytes: &[u8]) -> Result<(), DesignError> {
        let url = url.into();
        let prepared = PreparedImage::from_bytes(&url, bytes)?;
        debug!(url = %url, width = prepared.width, height = prepared.height, "asset decoded");
        self.images.insert(url, Arc::new(prepared));
        Ok(())
    }

    /// Stores an already-decoded image under a URL.
    pub fn insert(&mut self, url: impl Into<String>, prepared: PreparedImage) {
        self.images.insert(url.into(), Arc::new(prepared));
    }

    /// Looks up a decoded asset.
    pub fn get(&self, url: &str) -> Option<Arc<PreparedImage>> {
        self.images.get(url).cloned()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.images.contains_key(url)
    }
}
