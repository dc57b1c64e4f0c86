//! Shared constants for the design canvas.
//!
//! All lengths are in design units unless the name says pixels. The logical
//! canvas is a fixed 520x680 surface; on-screen pixel size is derived from it
//! via a uniform stage scale.

/// Logical canvas width in design units.
pub const DESIGN_CANVAS_WIDTH: f64 = 520.0;

/// Logical canvas height in design units.
pub const DESIGN_CANVAS_HEIGHT: f64 = 680.0;

/// Fraction of the available container used by the stage.
pub const STAGE_PADDING_FACTOR: f64 = 0.9;

/// Resize requests producing a box smaller than this are left unclamped.
pub const MIN_RESIZE_UNITS: f64 = 20.0;

/// Hard floor for a committed image dimension.
pub const MIN_IMAGE_DIMENSION: f64 = 5.0;

/// Minimum committed font size.
pub const MIN_FONT_SIZE: f64 = 12.0;

/// Maximum committed font size.
pub const MAX_FONT_SIZE: f64 = 100.0;

/// Default side of a newly placed image (capped by the safe zone width).
pub const DEFAULT_IMAGE_SIZE: f64 = 240.0;

/// Default font size of a newly placed text item.
pub const DEFAULT_FONT_SIZE: f64 = 36.0;

/// Default content of a newly placed text item.
pub const DEFAULT_TEXT: &str = "Your text";

/// Default font family of a newly placed text item.
pub const DEFAULT_FONT_FAMILY: &str = "Roboto";

/// Default fill color of a newly placed text item.
pub const DEFAULT_TEXT_FILL: &str = "#ffffff";

/// Pixel density multiplier used by the export pipeline.
pub const EXPORT_PIXEL_RATIO: f64 = 2.0;

/// On-screen size of a selection handle, in stage pixels.
pub const HANDLE_SIZE_PX: f64 = 12.0;

/// Distance of the rotate handle above the selection box, in stage pixels.
pub const ROTATE_HANDLE_OFFSET: f64 = 28.0;

/// Offset applied to a duplicated object, in design units.
pub const DUPLICATE_OFFSET: f64 = 16.0;
