//! Tests for the canvas surface: product/variant lifecycle, layout
//! derivation, and stage sizing.

use printkit_core::{DesignError, Product, Variant};
use printkit_designer::{DesignCanvas, PreparedImage};

fn variant(id: &str, front_image: &str) -> Variant {
    Variant {
        id: id.to_string(),
        price: 29.0,
        color: "black".to_string(),
        size: "L".to_string(),
        front_image: front_image.to_string(),
        print_area_left: 100.0,
        print_area_top: 100.0,
        print_area_width: 800.0,
        print_area_height: 800.0,
    }
}

fn product() -> Product {
    Product {
        id: "p1".to_string(),
        name: "Classic Tee".to_string(),
        variants: vec![
            variant("v1", "asset://mockup-black"),
            variant("v2", "asset://mockup-white"),
        ],
    }
}

fn canvas_with_assets() -> DesignCanvas {
    let mut canvas = DesignCanvas::new();
    canvas
        .assets_mut()
        .insert("asset://mockup-black", PreparedImage::solid(1000, 1000, [30, 30, 30, 255]));
    canvas
        .assets_mut()
        .insert("asset://mockup-white", PreparedImage::solid(500, 1000, [240, 240, 240, 255]));
    canvas
        .assets_mut()
        .insert("asset://logo", PreparedImage::solid(400, 400, [200, 60, 60, 255]));
    canvas
}

#[test]
fn test_load_product_derives_layout() {
    let mut canvas = canvas_with_assets();
    canvas.load_product(product(), "v1").unwrap();

    let fit = canvas.background_fit().unwrap();
    assert_eq!(fit.y, 85.0);
    let zone = canvas.safe_zone().unwrap();
    assert!((zone.x - 52.0).abs() < 1e-9);
    assert!((zone.y - 137.0).abs() < 1e-9);
}

#[test]
fn test_load_product_rejects_unknown_variant() {
    let mut canvas = canvas_with_assets();
    assert!(matches!(
        canvas.load_product(product(), "v9"),
        Err(DesignError::NotReady { .. })
    ));
    assert!(canvas.product().is_none());
}

#[test]
fn test_load_product_resets_session() {
    let mut canvas = canvas_with_assets();
    canvas.load_product(product(), "v1").unwrap();
    canvas.add_image("asset://logo").unwrap();

    canvas.load_product(product(), "v1").unwrap();
    assert!(canvas.session().objects().is_empty());
    assert_eq!(canvas.session().selected_id(), None);
}

#[test]
fn test_select_variant_keeps_objects_and_recomputes_layout() {
    let mut canvas = canvas_with_assets();
    canvas.load_product(product(), "v1").unwrap();
    let id = canvas.add_image("asset://logo").unwrap();

    canvas.select_variant("v2").unwrap();
    assert_eq!(canvas.variant().unwrap().id, "v2");
    assert!(canvas.session().get(&id).is_some());

    // The white mockup is tall, so the fit changes shape.
    let fit = canvas.background_fit().unwrap();
    assert_eq!(fit.y, 0.0);
    assert!((fit.width - 340.0).abs() < 1e-9);
}

#[test]
fn test_layout_unset_until_background_asset_arrives() {
    let mut canvas = DesignCanvas::new();
    canvas.load_product(product(), "v1").unwrap();
    assert!(canvas.background_fit().is_none());
    assert!(canvas.safe_zone().is_none());
    assert!(canvas.require_zone().is_err());

    // The asset arrives later; a layout refresh resolves the zone.
    canvas
        .assets_mut()
        .insert("asset://mockup-black", PreparedImage::solid(1000, 1000, [30, 30, 30, 255]));
    canvas.refresh_layout();
    assert!(canvas.safe_zone().is_some());
}

#[test]
fn test_stage_size_preserves_aspect_with_padding() {
    let stage = DesignCanvas::stage_size_for(1000.0, 1000.0);
    // 90% of the container, limited by height.
    assert!((stage.height - 900.0).abs() < 1e-9);
    assert!((stage.width / stage.height - 520.0 / 680.0).abs() < 1e-9);
    assert!((stage.scale - stage.width / 520.0).abs() < 1e-12);

    let wide = DesignCanvas::stage_size_for(2000.0, 700.0);
    assert!((wide.height - 630.0).abs() < 1e-9);
    assert!(wide.width <= 2000.0 * 0.9);
}

#[test]
fn test_node_boxes_mirror_object_list() {
    let mut canvas = canvas_with_assets();
    canvas.load_product(product(), "v1").unwrap();
    let a = canvas.add_image("asset://logo").unwrap();
    let b = canvas.add_text().unwrap();

    let nodes = canvas.node_boxes();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].id, a);
    assert_eq!(nodes[1].id, b);
    let zone = canvas.safe_zone().unwrap();
    assert!(zone.rect().contains(&nodes[0].aabb));
}

#[test]
fn test_hit_test_misses_background() {
    let mut canvas = canvas_with_assets();
    canvas.load_product(product(), "v1").unwrap();
    canvas.add_image("asset://logo").unwrap();

    // Inside the mockup but outside every object.
    assert!(canvas.hit_test(60.0, 145.0).is_none());
    // Inside the default image placement.
    assert!(canvas.hit_test(260.0, 345.0).is_some());
}
