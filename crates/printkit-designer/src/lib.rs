//! PrintKit Designer Crate
//!
//! The design canvas engine: coordinate geometry, the design object model
//! and session, asset and font handling, rendering, pointer interaction, and
//! preview export. The logical canvas is a fixed 520x680 design-unit surface
//! onto which a garment mockup is letterboxed; all placed artwork is
//! constrained to the variant's printable safe zone.

pub mod assets;
pub mod canvas;
pub mod export;
pub mod font_manager;
pub mod geometry;
pub mod interaction;
pub mod model;
pub mod renderer;
pub mod session;

pub use assets::{AssetStore, PreparedImage};
pub use canvas::{DesignCanvas, NodeBox, StageSize};
pub use export::{export_preview, export_preview_with_ratio, ExportedPreview};
pub use geometry::{BackgroundFit, Rect, SafeZone};
pub use interaction::{Handle, HandleLayout, InteractionController};
pub use model::{DesignItem, ImageItem, ObjectPatch, TextItem};
pub use renderer::{render_canvas, render_to_image, RenderMode};
pub use session::DesignSession;
