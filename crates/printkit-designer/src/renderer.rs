//! Canvas renderer.
//!
//! Rasterizes the design canvas to a pixmap using tiny-skia: background
//! mockup, safe-zone guide, placed objects in insertion order, and the
//! selection overlay. Display mode draws the guide and overlay; export mode
//! produces the print-ready artwork only.
//!
//! Features:
//! - Anti-aliased compositing with bilinear image sampling
//! - Text rasterization through rusttype at the output pixel density
//! - A single uniform design-unit -> pixel scale

use printkit_core::constants::{
    DESIGN_CANVAS_HEIGHT, DESIGN_CANVAS_WIDTH, HANDLE_SIZE_PX, ROTATE_HANDLE_OFFSET,
};
use printkit_core::DesignError;
use rusttype::{point as rt_point, Scale as FontScale};
use tiny_skia::{
    Color, FillRule, FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, Rect as SkRect,
    Stroke, StrokeDash, Transform,
};
use tracing::debug;

use crate::canvas::DesignCanvas;
use crate::font_manager;
use crate::geometry;
use crate::model::{DesignItem, ImageItem, TextItem};

/// What the rasterization is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// On-screen stage: guide outline and selection overlay included.
    Display,
    /// Print-ready preview: artwork only.
    Export,
}

fn stage_bg_color() -> Color {
    Color::from_rgba8(245, 245, 245, 255)
}
fn guide_color() -> Color {
    Color::from_rgba8(255, 255, 255, 200)
}
fn selection_color() -> Color {
    Color::from_rgba8(64, 158, 255, 255)
}
fn placeholder_color() -> Color {
    Color::from_rgba8(189, 195, 199, 255)
}

/// Renders the canvas at the given design-unit -> pixel scale.
pub fn render_canvas(
    canvas: &DesignCanvas,
    scale: f64,
    mode: RenderMode,
) -> Result<Pixmap, DesignError> {
    let width = (DESIGN_CANVAS_WIDTH * scale).round() as u32;
    let height = (DESIGN_CANVAS_HEIGHT * scale).round() as u32;
    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| DesignError::NotReady {
        what: format!("render surface {width}x{height}"),
    })?;
    pixmap.fill(stage_bg_color());
    let s = scale as f32;

    // Background mockup, letterboxed. Non-interactive.
    if let (Some(fit), Some(bg)) = (canvas.background_fit(), canvas.background_image()) {
        if let Some(src) = bg.to_pixmap() {
            let t = Transform::from_scale((fit.scale * scale) as f32, (fit.scale * scale) as f32)
                .post_translate((fit.x * scale) as f32, (fit.y * scale) as f32);
            let paint = PixmapPaint {
                quality: FilterQuality::Bilinear,
                ..PixmapPaint::default()
            };
            pixmap.draw_pixmap(0, 0, src.as_ref(), &paint, t, None);
        }
    }

    // Safe-zone guide. Visual aid only, never exported.
    if mode == RenderMode::Display {
        if let Some(zone) = canvas.safe_zone() {
            draw_dashed_rect(
                &mut pixmap,
                (zone.x * scale) as f32,
                (zone.y * scale) as f32,
                (zone.width * scale) as f32,
                (zone.height * scale) as f32,
            );
        }
    }

    // Objects in insertion order.
    for item in canvas.session().objects() {
        match item {
            DesignItem::Image(img) => draw_image(&mut pixmap, canvas, img, s, mode),
            DesignItem::Text(text) => draw_text(&mut pixmap, text, scale, mode),
        }
    }

    if mode == RenderMode::Display {
        if let Some(selected) = canvas.session().selected() {
            draw_selection_overlay(&mut pixmap, canvas, selected, scale);
        }
    }

    Ok(pixmap)
}

/// Renders to an RGBA image (straight alpha).
pub fn render_to_image(
    canvas: &DesignCanvas,
    scale: f64,
    mode: RenderMode,
) -> Result<image::RgbaImage, DesignError> {
    let pixmap = render_canvas(canvas, scale, mode)?;
    let width = pixmap.width();
    let height = pixmap.height();
    let mut out = image::RgbaImage::new(width, height);
    for (px, out_px) in pixmap.pixels().iter().zip(out.pixels_mut()) {
        let c = px.demultiply();
        *out_px = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Ok(out)
}

fn draw_image(pixmap: &mut Pixmap, canvas: &DesignCanvas, img: &ImageItem, s: f32, mode: RenderMode) {
    let asset = canvas.assets().get(&img.url);
    let Some(asset) = asset else {
        debug!(url = %img.url, "asset missing; drawing placeholder");
        if mode == RenderMode::Display {
            draw_placeholder(pixmap, img, s);
        }
        return;
    };
    let Some(src) = asset.to_pixmap() else {
        return;
    };
    let sx = (img.width as f32 * s) / asset.width as f32;
    let sy = (img.height as f32 * s) / asset.height as f32;
    let t = Transform::from_scale(sx, sy)
        .post_concat(Transform::from_rotate(img.rotation as f32))
        .post_translate(img.x as f32 * s, img.y as f32 * s);
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    pixmap.draw_pixmap(0, 0, src.as_ref(), &paint, t, None);
}

fn draw_placeholder(pixmap: &mut Pixmap, img: &ImageItem, s: f32) {
    let Some(rect) = SkRect::from_xywh(0.0, 0.0, img.width as f32 * s, img.height as f32 * s)
    else {
        return;
    };
    let path = PathBuilder::from_rect(rect);
    let mut paint = Paint::default();
    paint.set_color(placeholder_color());
    paint.anti_alias = true;
    let t = Transform::from_rotate(img.rotation as f32)
        .post_translate(img.x as f32 * s, img.y as f32 * s);
    pixmap.fill_path(&path, &paint, FillRule::Winding, t, None);
}

fn draw_text(pixmap: &mut Pixmap, text: &TextItem, scale: f64, mode: RenderMode) {
    let Some(font) = font_manager::get_font_for(&text.font_family) else {
        debug!(family = %text.font_family, "no font face; skipping text raster");
        if mode == RenderMode::Display {
            draw_text_outline(pixmap, text, scale);
        }
        return;
    };
    let (w, h) = font_manager::measure_text(&text.text, text.font_size, &text.font_family);
    let buf_w = (w * scale).ceil().max(1.0) as u32;
    let buf_h = (h * scale).ceil().max(1.0) as u32;
    let Some(mut buf) = Pixmap::new(buf_w, buf_h) else {
        return;
    };

    let (r, g, b, a) = parse_hex_color(&text.fill_color);
    let font_scale = FontScale::uniform((text.font_size * scale) as f32);
    let v = font.v_metrics(font_scale);
    let line_height = v.ascent - v.descent + v.line_gap;

    let data = buf.data_mut();
    for (line_idx, line) in text.text.split('\n').enumerate() {
        let baseline = v.ascent + line_idx as f32 * line_height;
        for glyph in font.layout(line, font_scale, rt_point(0.0, baseline)) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                let px = bb.min.x + gx as i32;
                let py = bb.min.y + gy as i32;
                if px < 0 || py < 0 || px >= buf_w as i32 || py >= buf_h as i32 {
                    return;
                }
                let idx = ((py as u32 * buf_w + px as u32) * 4) as usize;
                let alpha = (coverage * a as f32) as u16;
                // Premultiplied source-over on a transparent buffer.
                data[idx] = ((r as u16 * alpha) / 255).max(data[idx] as u16) as u8;
                data[idx + 1] = ((g as u16 * alpha) / 255).max(data[idx + 1] as u16) as u8;
                data[idx + 2] = ((b as u16 * alpha) / 255).max(data[idx + 2] as u16) as u8;
                data[idx + 3] = alpha.max(data[idx + 3] as u16) as u8;
            });
        }
    }

    // x, y is the visual center; rotation pivots there.
    let t = Transform::from_translate(-(buf_w as f32) / 2.0, -(buf_h as f32) / 2.0)
        .post_concat(Transform::from_rotate(text.rotation as f32))
        .post_translate((text.x * scale) as f32, (text.y * scale) as f32);
    pixmap.draw_pixmap(0, 0, buf.as_ref(), &PixmapPaint::default(), t, None);
}

fn draw_text_outline(pixmap: &mut Pixmap, text: &TextItem, scale: f64) {
    let (w, h) = font_manager::measure_text(&text.text, text.font_size, &text.font_family);
    let corners = geometry::rotated_corners(text.x, text.y, w, h, text.rotation, true);
    stroke_polygon(pixmap, &corners, scale, placeholder_color(), None);
}

fn draw_dashed_rect(pixmap: &mut Pixmap, x: f32, y: f32, w: f32, h: f32) {
    let Some(rect) = SkRect::from_xywh(x, y, w, h) else {
        return;
    };
    let path = PathBuilder::from_rect(rect);
    let mut paint = Paint::default();
    paint.set_color(guide_color());
    paint.anti_alias = true;
    let stroke = Stroke {
        width: 1.5,
        dash: StrokeDash::new(vec![8.0, 6.0], 0.0),
        ..Stroke::default()
    };
    pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
}

fn draw_selection_overlay(
    pixmap: &mut Pixmap,
    canvas: &DesignCanvas,
    item: &DesignItem,
    scale: f64,
) {
    let (w, h) = canvas.item_size(item);
    let (anchor, center_anchored) = match item {
        DesignItem::Image(img) => ((img.x, img.y), false),
        DesignItem::Text(text) => ((text.x, text.y), true),
    };
    let corners = geometry::rotated_corners(anchor.0, anchor.1, w, h, item.rotation(), center_anchored);

    stroke_polygon(pixmap, &corners, scale, selection_color(), None);

    // Corner handles at a fixed on-screen size.
    let half = (HANDLE_SIZE_PX / 2.0) as f32;
    let mut paint = Paint::default();
    paint.set_color(selection_color());
    paint.anti_alias = true;
    for &(cx, cy) in &corners {
        let px = (cx * scale) as f32;
        let py = (cy * scale) as f32;
        if let Some(rect) = SkRect::from_xywh(px - half, py - half, half * 2.0, half * 2.0) {
            let path = PathBuilder::from_rect(rect);
            pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }
    }

    // Rotate handle above the rotated top edge.
    let top_mid = (
        (corners[0].0 + corners[1].0) / 2.0,
        (corners[0].1 + corners[1].1) / 2.0,
    );
    let r = item.rotation().to_radians();
    let offset = ROTATE_HANDLE_OFFSET / scale;
    let rotate = (top_mid.0 + offset * r.sin(), top_mid.1 - offset * r.cos());
    if let Some(circle) =
        PathBuilder::from_circle((rotate.0 * scale) as f32, (rotate.1 * scale) as f32, half)
    {
        pixmap.fill_path(&circle, &paint, FillRule::Winding, Transform::identity(), None);
    }
}

fn stroke_polygon(
    pixmap: &mut Pixmap,
    corners: &[(f64, f64); 4],
    scale: f64,
    color: Color,
    dash: Option<StrokeDash>,
) {
    let mut pb = PathBuilder::new();
    pb.move_to((corners[0].0 * scale) as f32, (corners[0].1 * scale) as f32);
    for &(cx, cy) in &corners[1..] {
        pb.line_to((cx * scale) as f32, (cy * scale) as f32);
    }
    pb.close();
    let Some(path) = pb.finish() else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    let stroke = Stroke {
        width: 1.5,
        dash,
        ..Stroke::default()
    };
    pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
}

fn parse_hex_color(hex: &str) -> (u8, u8, u8, u8) {
    let s = hex.trim_start_matches('#');
    let parse = |range: std::ops::Range<usize>| u8::from_str_radix(s.get(range).unwrap_or("ff"), 16);
    match s.len() {
        6 => (
            parse(0..2).unwrap_or(255),
            parse(2..4).unwrap_or(255),
            parse(4..6).unwrap_or(255),
            255,
        ),
        8 => (
            parse(0..2).unwrap_or(255),
            parse(2..4).unwrap_or(255),
            parse(4..6).unwrap_or(255),
            parse(6..8).unwrap_or(255),
        ),
        _ => (255, 255, 255, 255),
    }
}
