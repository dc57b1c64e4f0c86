//! PrintKit Core Crate
//!
//! Shared foundation for the PrintKit workspace: the unified error taxonomy,
//! design-canvas constants, and the read-only product catalog model consumed
//! from the commerce API.

pub mod catalog;
pub mod constants;
pub mod error;

pub use catalog::{Product, Variant};
pub use error::{
    CheckoutError, CommerceError, DesignError, Error, ExportError, Result,
};
