//! Commerce API contract and payload types.
//!
//! The designer core owns no wire protocol; it consumes this trait and
//! produces two outbound artifacts: a JSON snapshot of the placed objects
//! and a rasterized preview image. Payload field names follow the wire
//! contract (camelCase JSON).

use async_trait::async_trait;
use printkit_core::{CommerceError, Product};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A file handed to `upload_asset`.
#[derive(Debug, Clone)]
pub struct AssetUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl AssetUpload {
    /// Wraps PNG bytes as an upload.
    pub fn png(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            content_type: "image/png".to_string(),
        }
    }
}

/// The persisted location of an uploaded asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedAsset {
    pub url: String,
}

/// The design descriptor embedded in a cart line's `frontDesign` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartDesign {
    pub product_id: String,
    pub variant_id: String,
    pub client_design_id: String,
}

/// The full design embedded in an order line's `frontDesign` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDesign {
    pub objects: serde_json::Value,
    pub product_id: String,
    pub variant_id: String,
}

/// Cart-add request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub variant_id: String,
    pub quantity: u32,
    /// JSON-encoded [`CartDesign`].
    pub front_design: String,
    pub front_preview_url: String,
}

/// One line of an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub variant_id: String,
    pub quantity: u32,
    pub price: f64,
    /// JSON-encoded [`OrderDesign`].
    pub front_design: String,
    pub front_preview_url: String,
}

/// Order-create request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer_name: String,
    pub customer_phone: String,
    pub region: String,
    pub address: String,
    pub total_price: f64,
    pub items: Vec<OrderItem>,
}

/// Server acknowledgement of a created order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub order_id: String,
}

/// The external commerce collaborator.
#[async_trait]
pub trait CommerceApi: Send + Sync {
    async fn get_product(&self, id: &str) -> Result<Product, CommerceError>;
    async fn upload_asset(&self, upload: AssetUpload) -> Result<UploadedAsset, CommerceError>;
    async fn add_to_cart(&self, request: AddToCartRequest) -> Result<(), CommerceError>;
    async fn create_order(&self, request: CreateOrderRequest) -> Result<OrderReceipt, CommerceError>;
}

/// Best-effort unique client-side design id: millisecond timestamp plus a
/// random suffix. Not a collision-proof identifier.
pub fn client_design_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", millis, &suffix[..8])
}
