//! Integration tests for the checkout orchestrator: auth gating, re-entrancy
//! guards, payload shape, and failure handling.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use printkit_commerce::{
    AddToCartRequest, AssetUpload, AuthService, AuthStatus, AuthUser, CheckoutOrchestrator,
    CheckoutOutcome, CommerceApi, CreateOrderRequest, OrderDesign, OrderReceipt, ShippingDetails,
    UploadedAsset,
};
use printkit_core::{CheckoutError, CommerceError, Product, Variant};
use printkit_designer::{DesignCanvas, PreparedImage};

#[derive(Default)]
struct MockCommerce {
    uploads: AtomicUsize,
    cart_calls: AtomicUsize,
    order_calls: AtomicUsize,
    fail_upload: bool,
    last_cart: Mutex<Option<AddToCartRequest>>,
    last_order: Mutex<Option<CreateOrderRequest>>,
}

#[async_trait]
impl CommerceApi for MockCommerce {
    async fn get_product(&self, _id: &str) -> Result<Product, CommerceError> {
        Err(CommerceError::ProductUnavailable {
            id: "unused".to_string(),
        })
    }

    async fn upload_asset(&self, upload: AssetUpload) -> Result<UploadedAsset, CommerceError> {
        // Yield long enough for a concurrent duplicate trigger to land while
        // this one is in flight.
        tokio::time::sleep(Duration::from_millis(10)).await;
        self.uploads.fetch_add(1, Ordering::SeqCst);
        if self.fail_upload {
            return Err(CommerceError::UploadFailed {
                reason: "storage offline".to_string(),
            });
        }
        Ok(UploadedAsset {
            url: format!("https://cdn.example.com/{}", upload.file_name),
        })
    }

    async fn add_to_cart(&self, request: AddToCartRequest) -> Result<(), CommerceError> {
        self.cart_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_cart.lock() = Some(request);
        Ok(())
    }

    async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<OrderReceipt, CommerceError> {
        self.order_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_order.lock() = Some(request);
        Ok(OrderReceipt {
            order_id: "order-1".to_string(),
        })
    }
}

struct MockAuth {
    status: Mutex<AuthStatus>,
}

impl MockAuth {
    fn new(status: AuthStatus) -> Self {
        Self {
            status: Mutex::new(status),
        }
    }

    fn set(&self, status: AuthStatus) {
        *self.status.lock() = status;
    }
}

#[async_trait]
impl AuthService for MockAuth {
    async fn status(&self) -> AuthStatus {
        *self.status.lock()
    }

    async fn current_user(&self) -> Option<AuthUser> {
        (*self.status.lock() == AuthStatus::Authenticated).then(|| AuthUser {
            id: "u1".to_string(),
            email: "user@example.com".to_string(),
            display_name: "Test User".to_string(),
        })
    }
}

fn ready_canvas() -> DesignCanvas {
    let product = Product {
        id: "p1".to_string(),
        name: "Classic Tee".to_string(),
        variants: vec![Variant {
            id: "v1".to_string(),
            price: 29.0,
            color: "black".to_string(),
            size: "L".to_string(),
            front_image: "asset://mockup".to_string(),
            print_area_left: 100.0,
            print_area_top: 100.0,
            print_area_width: 800.0,
            print_area_height: 800.0,
        }],
    };
    let mut canvas = DesignCanvas::new();
    canvas
        .assets_mut()
        .insert("asset://mockup", PreparedImage::solid(1000, 1000, [30, 30, 30, 255]));
    canvas
        .assets_mut()
        .insert("asset://logo", PreparedImage::solid(400, 400, [200, 60, 60, 255]));
    canvas.load_product(product, "v1").unwrap();
    canvas.add_image("asset://logo").unwrap();
    canvas
}

fn shipping() -> ShippingDetails {
    ShippingDetails {
        customer_name: "Ada".to_string(),
        customer_phone: "+10000000000".to_string(),
        region: "North".to_string(),
        address: "1 Main St".to_string(),
    }
}

fn orchestrator(
    api: Arc<MockCommerce>,
    auth: Arc<MockAuth>,
) -> (CheckoutOrchestrator, Arc<Mutex<DesignCanvas>>) {
    let studio = Arc::new(Mutex::new(ready_canvas()));
    let orch = CheckoutOrchestrator::new(api, auth, &studio);
    (orch, studio)
}

#[tokio::test]
async fn test_unauthenticated_trigger_parks_in_auth_gate() {
    let api = Arc::new(MockCommerce::default());
    let auth = Arc::new(MockAuth::new(AuthStatus::Unauthenticated));
    let (orch, _studio) = orchestrator(api.clone(), auth);

    let outcome = orch.add_to_cart().await.unwrap();
    assert_eq!(outcome, CheckoutOutcome::AuthPending);
    assert!(orch.gate().has_pending());
    assert_eq!(api.uploads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_resume_after_login_completes_exactly_once() {
    let api = Arc::new(MockCommerce::default());
    let auth = Arc::new(MockAuth::new(AuthStatus::Unauthenticated));
    let (orch, _studio) = orchestrator(api.clone(), auth.clone());

    orch.add_to_cart().await.unwrap();
    auth.set(AuthStatus::Authenticated);

    let outcome = orch.resume_pending().await.unwrap();
    assert_eq!(outcome, CheckoutOutcome::Completed);
    assert_eq!(api.uploads.load(Ordering::SeqCst), 1);
    assert_eq!(api.cart_calls.load(Ordering::SeqCst), 1);
    assert!(!orch.gate().has_pending());

    // Nothing left to resume.
    let outcome = orch.resume_pending().await.unwrap();
    assert_eq!(outcome, CheckoutOutcome::Ignored);
    assert_eq!(api.cart_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_reopening_gate_replaces_pending_action() {
    let api = Arc::new(MockCommerce::default());
    let auth = Arc::new(MockAuth::new(AuthStatus::Unauthenticated));
    let (orch, _studio) = orchestrator(api.clone(), auth.clone());

    orch.add_to_cart().await.unwrap();
    orch.place_order(&shipping()).await.unwrap();
    auth.set(AuthStatus::Authenticated);

    // Only the latest action survives in the slot.
    orch.resume_pending().await.unwrap();
    assert_eq!(api.cart_calls.load(Ordering::SeqCst), 0);
    assert_eq!(api.order_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_duplicate_trigger_while_in_flight_is_ignored() {
    let api = Arc::new(MockCommerce::default());
    let auth = Arc::new(MockAuth::new(AuthStatus::Authenticated));
    let (orch, _studio) = orchestrator(api.clone(), auth);

    let (a, b) = tokio::join!(orch.add_to_cart(), orch.add_to_cart());
    let outcomes = [a.unwrap(), b.unwrap()];
    assert!(outcomes.contains(&CheckoutOutcome::Completed));
    assert!(outcomes.contains(&CheckoutOutcome::Ignored));
    assert_eq!(api.uploads.load(Ordering::SeqCst), 1);
    assert_eq!(api.cart_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_cart_payload_shape() {
    let api = Arc::new(MockCommerce::default());
    let auth = Arc::new(MockAuth::new(AuthStatus::Authenticated));
    let (orch, _studio) = orchestrator(api.clone(), auth);

    orch.add_to_cart().await.unwrap();
    let request = api.last_cart.lock().clone().unwrap();
    assert_eq!(request.variant_id, "v1");
    assert_eq!(request.quantity, 1);
    assert_eq!(
        request.front_preview_url,
        "https://cdn.example.com/design_p1_v1.png"
    );
    // frontDesign is a JSON string carrying ids and a client design id.
    let design: serde_json::Value = serde_json::from_str(&request.front_design).unwrap();
    assert_eq!(design["productId"], "p1");
    assert_eq!(design["variantId"], "v1");
    assert!(design["clientDesignId"].as_str().unwrap().contains('-'));
}

#[tokio::test]
async fn test_order_payload_and_shipping_form_closes() {
    let api = Arc::new(MockCommerce::default());
    let auth = Arc::new(MockAuth::new(AuthStatus::Authenticated));
    let (orch, _studio) = orchestrator(api.clone(), auth);
    orch.open_shipping_form();

    let outcome = orch.place_order(&shipping()).await.unwrap();
    assert_eq!(outcome, CheckoutOutcome::Completed);
    assert!(!orch.is_shipping_form_open());

    let request = api.last_order.lock().clone().unwrap();
    assert_eq!(request.customer_name, "Ada");
    assert_eq!(request.total_price, 29.0);
    assert_eq!(request.items.len(), 1);
    let item = &request.items[0];
    assert_eq!(item.quantity, 1);
    assert_eq!(item.price, 29.0);
    // frontDesign embeds the full object snapshot.
    let design: OrderDesign = serde_json::from_str(&item.front_design).unwrap();
    assert_eq!(design.product_id, "p1");
    assert_eq!(design.objects.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_order_validation_rejects_blank_fields() {
    let api = Arc::new(MockCommerce::default());
    let auth = Arc::new(MockAuth::new(AuthStatus::Authenticated));
    let (orch, _studio) = orchestrator(api.clone(), auth);

    let mut details = shipping();
    details.customer_phone = "   ".to_string();
    let err = orch.place_order(&details).await.unwrap_err();
    match err {
        CheckoutError::ValidationFailed { field } => assert_eq!(field, "customer_phone"),
        other => panic!("expected validation failure, got {other:?}"),
    }
    assert_eq!(api.uploads.load(Ordering::SeqCst), 0);
    assert_eq!(api.order_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_upload_failure_is_terminal_and_preserves_design() {
    let api = Arc::new(MockCommerce {
        fail_upload: true,
        ..MockCommerce::default()
    });
    let auth = Arc::new(MockAuth::new(AuthStatus::Authenticated));
    let (orch, studio) = orchestrator(api.clone(), auth);
    let objects_before = studio.lock().session().snapshot_json();

    let err = orch.add_to_cart().await.unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::Commerce(CommerceError::UploadFailed { .. })
    ));
    assert_eq!(api.cart_calls.load(Ordering::SeqCst), 0);
    // No retry, and local state is untouched.
    assert_eq!(studio.lock().session().snapshot_json(), objects_before);

    // The guard was released: a later attempt is not treated as a duplicate.
    let err = orch.add_to_cart().await.unwrap_err();
    assert!(matches!(err, CheckoutError::Commerce(_)));
}

#[tokio::test]
async fn test_torn_down_studio_refuses_trigger() {
    let api = Arc::new(MockCommerce::default());
    let auth = Arc::new(MockAuth::new(AuthStatus::Authenticated));
    let (orch, studio) = orchestrator(api.clone(), auth);
    drop(studio);

    let err = orch.add_to_cart().await.unwrap_err();
    assert!(matches!(err, CheckoutError::Export(_)));
    assert_eq!(api.uploads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unready_canvas_refuses_trigger() {
    let api = Arc::new(MockCommerce::default());
    let auth = Arc::new(MockAuth::new(AuthStatus::Authenticated));
    let studio = Arc::new(Mutex::new(DesignCanvas::new()));
    let orch = CheckoutOrchestrator::new(api.clone(), auth, &studio);

    let err = orch.add_to_cart().await.unwrap_err();
    assert!(matches!(err, CheckoutError::Export(_)));
    assert_eq!(api.uploads.load(Ordering::SeqCst), 0);
}
