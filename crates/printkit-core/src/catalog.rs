//! Product catalog model.
//!
//! Read-only types delivered by the commerce API. Field names follow the
//! wire contract (camelCase JSON). The print area of a variant is expressed
//! in the mockup image's own pixel space; the designer converts it into
//! design units before it becomes the safe zone.

use serde::{Deserialize, Serialize};

/// A purchasable variant of a product (color/size combination).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    /// Variant identifier.
    pub id: String,
    /// Unit price.
    pub price: f64,
    /// Garment color name.
    pub color: String,
    /// Garment size label.
    pub size: String,
    /// URL of the front mockup image.
    pub front_image: String,
    /// Left edge of the printable area, in mockup-image pixels.
    pub print_area_left: f64,
    /// Top edge of the printable area, in mockup-image pixels.
    pub print_area_top: f64,
    /// Width of the printable area, in mockup-image pixels.
    pub print_area_width: f64,
    /// Height of the printable area, in mockup-image pixels.
    pub print_area_height: f64,
}

/// A customizable product with its variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Available variants.
    pub variants: Vec<Variant>,
}

impl Product {
    /// Look up a variant by id.
    pub fn variant(&self, id: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_round_trips_camel_case() {
        let json = r#"{
            "id": "v1",
            "price": 29.5,
            "color": "black",
            "size": "L",
            "frontImage": "https://cdn.example.com/shirt-black.png",
            "printAreaLeft": 100,
            "printAreaTop": 100,
            "printAreaWidth": 800,
            "printAreaHeight": 800
        }"#;
        let variant: Variant = serde_json::from_str(json).unwrap();
        assert_eq!(variant.front_image, "https://cdn.example.com/shirt-black.png");
        assert_eq!(variant.print_area_left, 100.0);

        let back = serde_json::to_value(&variant).unwrap();
        assert!(back.get("printAreaWidth").is_some());
        assert!(back.get("print_area_width").is_none());
    }

    #[test]
    fn product_variant_lookup() {
        let product = Product {
            id: "p1".into(),
            name: "Classic Tee".into(),
            variants: vec![],
        };
        assert!(product.variant("missing").is_none());
    }
}
