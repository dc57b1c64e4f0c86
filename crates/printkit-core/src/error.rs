//! Error handling for PrintKit
//!
//! Provides comprehensive error types for all layers of the application:
//! - Design errors (canvas/safe-zone related)
//! - Export errors (preview rasterization)
//! - Commerce errors (asset upload, cart, order submission)
//! - Checkout errors (orchestration and validation)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Design error type
///
/// Represents refusals raised by the design canvas: operations attempted
/// before a product/variant is loaded, references to unknown objects, and
/// asset/font resolution failures.
#[derive(Error, Debug, Clone)]
pub enum DesignError {
    /// No safe zone is loaded (product/variant/background absent)
    #[error("Safe zone not set: load a product and variant first")]
    SafeZoneUnset,

    /// A required piece of canvas state is missing
    #[error("Canvas not ready: {what} missing")]
    NotReady {
        /// The missing piece of state.
        what: String,
    },

    /// The referenced design object does not exist
    #[error("Unknown design object: {id}")]
    UnknownObject {
        /// The id that was not found.
        id: String,
    },

    /// An image asset could not be decoded
    #[error("Failed to decode asset {url}: {reason}")]
    AssetDecode {
        /// The asset URL that failed to decode.
        url: String,
        /// The reason the decode failed.
        reason: String,
    },

    /// A requested font family could not be resolved
    #[error("Font family not available: {family}")]
    FontUnavailable {
        /// The font family that could not be resolved.
        family: String,
    },
}

/// Export error type
///
/// Represents failures of the preview export pipeline.
#[derive(Error, Debug, Clone)]
pub enum ExportError {
    /// The canvas is not in an exportable state
    #[error("Export not ready: {missing} missing")]
    NotReady {
        /// The missing prerequisite (canvas, product, or variant).
        missing: String,
    },

    /// PNG encoding failed
    #[error("Failed to encode preview: {reason}")]
    Encode {
        /// The reason the encode failed.
        reason: String,
    },
}

/// Commerce error type
///
/// Represents errors returned by the external commerce API:
/// asset uploads, cart mutations, and order creation.
#[derive(Error, Debug, Clone)]
pub enum CommerceError {
    /// Asset upload failed
    #[error("Upload failed: {reason}")]
    UploadFailed {
        /// The reason the upload failed.
        reason: String,
    },

    /// Cart or order submission failed
    #[error("Submit failed: {reason}")]
    SubmitFailed {
        /// The reason the submission failed.
        reason: String,
    },

    /// The requested product does not exist
    #[error("Product unavailable: {id}")]
    ProductUnavailable {
        /// The product id that was not found.
        id: String,
    },
}

/// Checkout error type
///
/// Represents failures of the checkout orchestration. `AlreadyInFlight` is
/// an internal guard outcome; callers observe it as a silent no-op rather
/// than a surfaced failure.
#[derive(Error, Debug)]
pub enum CheckoutError {
    /// A required shipping field is empty
    #[error("Validation failed: {field} is required")]
    ValidationFailed {
        /// The field that failed validation.
        field: String,
    },

    /// The same action is already in flight
    #[error("{action} already in flight")]
    AlreadyInFlight {
        /// The action that is already running.
        action: String,
    },

    /// Preview export failed
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Commerce API call failed
    #[error(transparent)]
    Commerce(#[from] CommerceError),
}

/// Main error type for PrintKit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Design error
    #[error(transparent)]
    Design(#[from] DesignError),

    /// Export error
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Commerce error
    #[error(transparent)]
    Commerce(#[from] CommerceError),

    /// Checkout error
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a not-ready refusal (no network call was attempted)
    pub fn is_not_ready(&self) -> bool {
        matches!(
            self,
            Error::Design(DesignError::SafeZoneUnset)
                | Error::Design(DesignError::NotReady { .. })
                | Error::Export(ExportError::NotReady { .. })
                | Error::Checkout(CheckoutError::Export(ExportError::NotReady { .. }))
        )
    }

    /// Check if this is a design error
    pub fn is_design_error(&self) -> bool {
        matches!(self, Error::Design(_))
    }

    /// Check if this is a commerce error
    pub fn is_commerce_error(&self) -> bool {
        matches!(self, Error::Commerce(_) | Error::Checkout(CheckoutError::Commerce(_)))
    }

    /// Check if this is a checkout validation failure
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Error::Checkout(CheckoutError::ValidationFailed { .. }))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

// Conversions between error types are automatic via `from` implementations
