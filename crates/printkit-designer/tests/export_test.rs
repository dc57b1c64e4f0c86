//! Tests for the preview export pipeline.

use printkit_core::{ExportError, Product, Variant};
use printkit_designer::{export_preview, export_preview_with_ratio, DesignCanvas, PreparedImage};

fn product() -> Product {
    Product {
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
    }
}

fn ready_canvas() -> DesignCanvas {
    let mut canvas = DesignCanvas::new();
    canvas
        .assets_mut()
        .insert("asset://mockup", PreparedImage::solid(1000, 1000, [30, 30, 30, 255]));
    canvas
        .assets_mut()
        .insert("asset://logo", PreparedImage::solid(400, 400, [200, 60, 60, 255]));
    canvas.load_product(product(), "v1").unwrap();
    canvas
}

#[test]
fn test_export_refused_without_product() {
    let canvas = DesignCanvas::new();
    match export_preview(&canvas) {
        Err(ExportError::NotReady { missing }) => assert_eq!(missing, "product"),
        other => panic!("expected NotReady, got {other:?}"),
    }
}

#[test]
fn test_export_refused_without_background() {
    // Product loaded but the mockup asset was never decoded: no fit, no
    // render.
    let mut canvas = DesignCanvas::new();
    canvas.load_product(product(), "v1").unwrap();
    assert!(matches!(
        export_preview(&canvas),
        Err(ExportError::NotReady { .. })
    ));
}

#[test]
fn test_export_produces_named_png_at_double_density() {
    let mut canvas = ready_canvas();
    canvas.add_image("asset://logo").unwrap();
    canvas.add_text().unwrap();

    let preview = export_preview(&canvas).unwrap();
    assert_eq!(preview.file_name, "design_p1_v1.png");
    // 520x680 design units at pixel ratio 2.
    assert_eq!(preview.width, 1040);
    assert_eq!(preview.height, 1360);

    let decoded = image::load_from_memory(&preview.png_bytes).unwrap();
    assert_eq!(decoded.width(), 1040);
    assert_eq!(decoded.height(), 1360);
}

#[test]
fn test_export_honors_custom_pixel_ratio() {
    let canvas = ready_canvas();
    let preview = export_preview_with_ratio(&canvas, 1.0).unwrap();
    assert_eq!(preview.width, 520);
    assert_eq!(preview.height, 680);
}

#[test]
fn test_export_of_empty_design_still_renders_mockup() {
    // No objects placed: the export is just the letterboxed mockup.
    let canvas = ready_canvas();
    let preview = export_preview_with_ratio(&canvas, 1.0).unwrap();
    let decoded = image::load_from_memory(&preview.png_bytes).unwrap().to_rgba8();
    // Center of the mockup area carries the mockup color, not the stage
    // background.
    let px = decoded.get_pixel(260, 340);
    assert_eq!(&px.0[..3], &[30, 30, 30]);
}
