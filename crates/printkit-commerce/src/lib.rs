//! PrintKit Commerce Crate
//!
//! Contracts for the external commerce and auth collaborators, plus the
//! checkout orchestrator that sequences authenticate -> rasterize -> upload
//! -> submit with an auth-gate continuation and per-action re-entrancy
//! guards.

pub mod api;
pub mod auth;
pub mod checkout;

pub use api::{
    client_design_id, AddToCartRequest, AssetUpload, CartDesign, CommerceApi, CreateOrderRequest,
    OrderDesign, OrderItem, OrderReceipt, UploadedAsset,
};
pub use auth::{AuthGate, AuthService, AuthStatus, AuthUser};
pub use checkout::{CheckoutOrchestrator, CheckoutOutcome, PendingCheckout, ShippingDetails};
