//! Checkout orchestration.
//!
//! Both entry actions, add-to-cart and place-order, follow the same
//! gate-then-act protocol: ensure the session is authenticated (suspending
//! into the auth gate otherwise), validate preconditions, guard against
//! re-entrancy, rasterize the canvas, upload the preview, and submit to the
//! commerce API. Failures are terminal for the attempt and leave all local
//! design state untouched; there are no automatic retries.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use printkit_core::{CheckoutError, CommerceError, ExportError};
use printkit_designer::{export_preview, DesignCanvas, ExportedPreview};
use tracing::{debug, info, warn};

use crate::api::{
    client_design_id, AddToCartRequest, AssetUpload, CartDesign, CommerceApi, CreateOrderRequest,
    OrderDesign, OrderItem,
};
use crate::auth::{AuthGate, AuthService, AuthStatus};

/// Shipping form contents for an order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingDetails {
    pub customer_name: String,
    pub customer_phone: String,
    pub region: String,
    pub address: String,
}

impl ShippingDetails {
    /// All fields must be non-empty before an order is submitted.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let fields = [
            ("customer_name", &self.customer_name),
            ("customer_phone", &self.customer_phone),
            ("region", &self.region),
            ("address", &self.address),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(CheckoutError::ValidationFailed {
                    field: name.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// An action suspended in the auth gate, resumed after login.
#[derive(Debug, Clone)]
pub enum PendingCheckout {
    AddToCart,
    PlaceOrder(ShippingDetails),
}

/// Result of triggering a checkout action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// The submission went through.
    Completed,
    /// The action is parked in the auth gate awaiting login.
    AuthPending,
    /// The trigger was dropped: duplicate while in flight, no pending
    /// action to resume, or the studio was torn down mid-flight.
    Ignored,
}

/// Sequences export -> upload -> submit, gated on authentication.
///
/// Holds only a weak handle to the shared canvas: a completion that lands
/// after the designer is torn down is discarded instead of mutating
/// disposed state.
pub struct CheckoutOrchestrator {
    api: Arc<dyn CommerceApi>,
    auth: Arc<dyn AuthService>,
    gate: AuthGate,
    studio: Weak<Mutex<DesignCanvas>>,
    adding_to_cart: AtomicBool,
    ordering: AtomicBool,
    shipping_form_open: AtomicBool,
}

impl CheckoutOrchestrator {
    pub fn new(
        api: Arc<dyn CommerceApi>,
        auth: Arc<dyn AuthService>,
        studio: &Arc<Mutex<DesignCanvas>>,
    ) -> Self {
        Self {
            api,
            auth,
            gate: AuthGate::new(),
            studio: Arc::downgrade(studio),
            adding_to_cart: AtomicBool::new(false),
            ordering: AtomicBool::new(false),
            shipping_form_open: AtomicBool::new(false),
        }
    }

    pub fn gate(&self) -> &AuthGate {
        &self.gate
    }

    pub fn open_shipping_form(&self) {
        self.shipping_form_open.store(true, Ordering::SeqCst);
    }

    pub fn close_shipping_form(&self) {
        self.shipping_form_open.store(false, Ordering::SeqCst);
    }

    pub fn is_shipping_form_open(&self) -> bool {
        self.shipping_form_open.load(Ordering::SeqCst)
    }

    /// Adds the current design to the cart.
    pub async fn add_to_cart(&self) -> Result<CheckoutOutcome, CheckoutError> {
        if self.auth.status().await != AuthStatus::Authenticated {
            debug!("not authenticated; parking add-to-cart in the auth gate");
            self.gate.open(PendingCheckout::AddToCart);
            return Ok(CheckoutOutcome::AuthPending);
        }
        self.check_canvas_ready()?;
        if self.adding_to_cart.swap(true, Ordering::SeqCst) {
            let err = CheckoutError::AlreadyInFlight {
                action: "add_to_cart".to_string(),
            };
            debug!(%err, "duplicate trigger ignored");
            return Ok(CheckoutOutcome::Ignored);
        }
        let result = self.perform_add_to_cart().await;
        self.adding_to_cart.store(false, Ordering::SeqCst);
        result
    }

    /// Places an order with the given shipping details.
    pub async fn place_order(
        &self,
        shipping: &ShippingDetails,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        if self.auth.status().await != AuthStatus::Authenticated {
            debug!("not authenticated; parking place-order in the auth gate");
            self.gate.open(PendingCheckout::PlaceOrder(shipping.clone()));
            return Ok(CheckoutOutcome::AuthPending);
        }
        shipping.validate()?;
        self.check_canvas_ready()?;
        if self.ordering.swap(true, Ordering::SeqCst) {
            let err = CheckoutError::AlreadyInFlight {
                action: "place_order".to_string(),
            };
            debug!(%err, "duplicate trigger ignored");
            return Ok(CheckoutOutcome::Ignored);
        }
        let result = self.perform_place_order(shipping).await;
        self.ordering.store(false, Ordering::SeqCst);
        result
    }

    /// Resumes whatever action the auth gate holds. Called once the auth
    /// service reports a successful login.
    pub async fn resume_pending(&self) -> Result<CheckoutOutcome, CheckoutError> {
        match self.gate.take_pending() {
            Some(PendingCheckout::AddToCart) => self.add_to_cart().await,
            Some(PendingCheckout::PlaceOrder(shipping)) => self.place_order(&shipping).await,
            None => Ok(CheckoutOutcome::Ignored),
        }
    }

    fn check_canvas_ready(&self) -> Result<(), CheckoutError> {
        let Some(studio) = self.studio.upgrade() else {
            return Err(ExportError::NotReady {
                missing: "canvas".to_string(),
            }
            .into());
        };
        let canvas = studio.lock();
        if canvas.product().is_none() {
            return Err(ExportError::NotReady {
                missing: "product".to_string(),
            }
            .into());
        }
        if canvas.variant().is_none() {
            return Err(ExportError::NotReady {
                missing: "variant".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Exports the preview and captures the ids needed for the payload,
    /// without holding the canvas lock across any await point.
    fn snapshot_for_submit(
        &self,
    ) -> Result<(ExportedPreview, String, String, f64, serde_json::Value), CheckoutError> {
        let Some(studio) = self.studio.upgrade() else {
            return Err(ExportError::NotReady {
                missing: "canvas".to_string(),
            }
            .into());
        };
        let canvas = studio.lock();
        let preview = export_preview(&canvas)?;
        let product_id = canvas
            .product()
            .map(|p| p.id.clone())
            .unwrap_or_default();
        let (variant_id, price) = canvas
            .variant()
            .map(|v| (v.id.clone(), v.price))
            .unwrap_or_default();
        let objects = canvas.session().snapshot_json();
        Ok((preview, product_id, variant_id, price, objects))
    }

    async fn perform_add_to_cart(&self) -> Result<CheckoutOutcome, CheckoutError> {
        let (preview, product_id, variant_id, _, _) = self.snapshot_for_submit()?;
        let upload = AssetUpload::png(&preview.file_name, preview.png_bytes);
        let uploaded = self.api.upload_asset(upload).await?;

        let design = CartDesign {
            product_id,
            variant_id: variant_id.clone(),
            client_design_id: client_design_id(),
        };
        let front_design = encode_design(&design)?;
        let request = AddToCartRequest {
            variant_id,
            quantity: 1,
            front_design,
            front_preview_url: uploaded.url,
        };
        self.api.add_to_cart(request).await?;

        if self.studio.upgrade().is_none() {
            debug!("studio torn down during add-to-cart; completion discarded");
            return Ok(CheckoutOutcome::Ignored);
        }
        info!("design added to cart");
        Ok(CheckoutOutcome::Completed)
    }

    async fn perform_place_order(
        &self,
        shipping: &ShippingDetails,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let (preview, product_id, variant_id, price, objects) = self.snapshot_for_submit()?;
        let upload = AssetUpload::png(&preview.file_name, preview.png_bytes);
        let uploaded = self.api.upload_asset(upload).await?;

        let design = OrderDesign {
            objects,
            product_id,
            variant_id: variant_id.clone(),
        };
        let front_design = encode_design(&design)?;
        let quantity = 1u32;
        let request = CreateOrderRequest {
            customer_name: shipping.customer_name.clone(),
            customer_phone: shipping.customer_phone.clone(),
            region: shipping.region.clone(),
            address: shipping.address.clone(),
            total_price: price * quantity as f64,
            items: vec![OrderItem {
                variant_id,
                quantity,
                price,
                front_design,
                front_preview_url: uploaded.url,
            }],
        };
        let receipt = self.api.create_order(request).await?;

        if self.studio.upgrade().is_none() {
            debug!(order = %receipt.order_id, "studio torn down during order; completion discarded");
            return Ok(CheckoutOutcome::Ignored);
        }
        info!(order = %receipt.order_id, "order placed");
        self.close_shipping_form();
        Ok(CheckoutOutcome::Completed)
    }
}

fn encode_design<T: serde::Serialize>(design: &T) -> Result<String, CheckoutError> {
    serde_json::to_string(design).map_err(|e| {
        warn!(error = %e, "design payload serialization failed");
        CommerceError::SubmitFailed {
            reason: e.to_string(),
        }
        .into()
    })
}
