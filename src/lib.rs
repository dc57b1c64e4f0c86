//! # PrintKit
//!
//! A Rust-based design canvas engine for print-on-demand products:
//! - Safe-zone constrained placement of images and text on garment mockups
//! - Fixed 520x680 design-unit canvas with uniform stage scaling
//! - Pointer interaction: select, drag, resize, rotate, delete
//! - 2x preview export for cart and order submission
//! - Checkout orchestration with an auth-gate continuation
//!
//! ## Architecture
//!
//! PrintKit is organized as a workspace with multiple crates:
//!
//! 1. **printkit-core** - Errors, constants, product catalog model
//! 2. **printkit-designer** - Geometry, object model, canvas, interaction,
//!    rendering, export
//! 3. **printkit-commerce** - Commerce/auth collaborator contracts and the
//!    checkout orchestrator
//! 4. **printkit-settings** - Configuration loading and persistence
//! 5. **printkit** - Facade crate and headless demo binary

pub use printkit_designer as designer;

pub use printkit_core::{
    CheckoutError, CommerceError, DesignError, Error, ExportError, Product, Result, Variant,
};

pub use printkit_designer::{
    export_preview, export_preview_with_ratio, AssetStore, BackgroundFit, DesignCanvas,
    DesignItem, DesignSession, ExportedPreview, Handle, ImageItem, InteractionController,
    ObjectPatch, PreparedImage, Rect, RenderMode, SafeZone, StageSize, TextItem,
};

pub use printkit_commerce::{
    client_design_id, AddToCartRequest, AssetUpload, AuthGate, AuthService, AuthStatus, AuthUser,
    CartDesign, CheckoutOrchestrator, CheckoutOutcome, CommerceApi, CreateOrderRequest,
    OrderDesign, OrderItem, OrderReceipt, PendingCheckout, ShippingDetails, UploadedAsset,
};

pub use printkit_settings::{Config, SettingsManager};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
