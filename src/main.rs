//! Headless demo: builds a small design on a synthetic mockup and writes
//! the exported preview PNG to the current directory.

use anyhow::Context;
use printkit::designer::font_manager;
use printkit::{
    init_logging, DesignCanvas, InteractionController, PreparedImage, Product, SettingsManager,
    Variant, VERSION,
};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_logging()?;
    info!(version = VERSION, "printkit demo starting");

    let settings = SettingsManager::load();
    font_manager::set_extra_font_dirs(settings.config().fonts.extra_font_dirs.clone());

    let product = Product {
        id: "demo-shirt".to_string(),
        name: "Demo Tee".to_string(),
        variants: vec![Variant {
            id: "demo-black-l".to_string(),
            price: 29.0,
            color: "black".to_string(),
            size: "L".to_string(),
            front_image: "asset://mockup-front".to_string(),
            print_area_left: 100.0,
            print_area_top: 100.0,
            print_area_width: 800.0,
            print_area_height: 800.0,
        }],
    };

    let mut canvas = DesignCanvas::new();
    canvas
        .assets_mut()
        .insert("asset://mockup-front", PreparedImage::solid(1000, 1000, [40, 40, 46, 255]));
    canvas
        .assets_mut()
        .insert("asset://logo", PreparedImage::solid(400, 400, [231, 76, 60, 255]));
    canvas
        .load_product(product, "demo-black-l")
        .context("loading demo product")?;

    canvas.add_image("asset://logo").context("placing image")?;
    let mut controller = InteractionController::new();
    controller
        .center_horizontally(&mut canvas)
        .context("centering image")?;

    canvas.add_text().context("placing text")?;
    controller
        .center_vertically(&mut canvas)
        .context("centering text")?;

    let ratio = settings.config().export.pixel_ratio;
    let preview = printkit::export_preview_with_ratio(&canvas, ratio)?;
    std::fs::write(&preview.file_name, &preview.png_bytes)
        .with_context(|| format!("writing {}", preview.file_name))?;
    info!(
        file = %preview.file_name,
        width = preview.width,
        height = preview.height,
        "preview written"
    );

    Ok(())
}
