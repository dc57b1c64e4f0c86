//! Unit tests for background fitting, safe-zone mapping, and clamping.

use printkit_core::Variant;
use printkit_designer::geometry::{
    clamp_box, clamp_position, compute_safe_zone, fit_background, rotated_aabb, Rect, SafeZone,
};
use proptest::prelude::*;

fn variant() -> Variant {
    Variant {
        id: "v1".to_string(),
        price: 29.0,
        color: "black".to_string(),
        size: "L".to_string(),
        front_image: "asset://mockup".to_string(),
        print_area_left: 100.0,
        print_area_top: 100.0,
        print_area_width: 800.0,
        print_area_height: 800.0,
    }
}

fn zone() -> SafeZone {
    SafeZone {
        x: 52.0,
        y: 137.0,
        width: 416.0,
        height: 416.0,
    }
}

#[test]
fn test_fit_background_square_source() {
    // 1000x1000 into 520x680: limited by width.
    let fit = fit_background(1000.0, 1000.0);
    assert_eq!(fit.width, 520.0);
    assert_eq!(fit.height, 520.0);
    assert_eq!(fit.x, 0.0);
    assert_eq!(fit.y, 85.0);
}

#[test]
fn test_fit_background_tall_source() {
    // 500x1000 into 520x680: limited by height.
    let fit = fit_background(500.0, 1000.0);
    assert!((fit.height - 680.0).abs() < 1e-9);
    assert!((fit.width - 340.0).abs() < 1e-9);
    assert!((fit.x - 90.0).abs() < 1e-9);
    assert_eq!(fit.y, 0.0);
}

#[test]
fn test_safe_zone_mapping() {
    let fit = fit_background(1000.0, 1000.0);
    let zone = compute_safe_zone(&variant(), &fit, 1000.0, 1000.0).unwrap();
    assert!((zone.x - 52.0).abs() < 1e-9, "zone.x = {}", zone.x);
    assert!((zone.y - 137.0).abs() < 1e-9, "zone.y = {}", zone.y);
    assert!((zone.width - 416.0).abs() < 1e-9);
    assert!((zone.height - 416.0).abs() < 1e-9);
}

#[test]
fn test_safe_zone_idempotent_for_unchanged_inputs() {
    let fit = fit_background(1000.0, 1000.0);
    let first = compute_safe_zone(&variant(), &fit, 1000.0, 1000.0).unwrap();
    let second = compute_safe_zone(&variant(), &fit, 1000.0, 1000.0).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_safe_zone_requires_valid_source() {
    let fit = fit_background(1000.0, 1000.0);
    assert!(compute_safe_zone(&variant(), &fit, 0.0, 1000.0).is_none());
    assert!(compute_safe_zone(&variant(), &fit, 1000.0, -1.0).is_none());
}

#[test]
fn test_clamp_position_pulls_box_back_into_zone() {
    // Dragging a 240x240 image to (-50,-50) clamps to the zone origin.
    let (x, y) = clamp_position(-50.0, -50.0, 240.0, 240.0, &zone());
    assert_eq!((x, y), (52.0, 137.0));
}

#[test]
fn test_clamp_position_far_side() {
    let z = zone();
    let (x, y) = clamp_position(900.0, 900.0, 240.0, 240.0, &z);
    assert_eq!(x, z.x + z.width - 240.0);
    assert_eq!(y, z.y + z.height - 240.0);
}

#[test]
fn test_clamp_position_oversized_box_pins_to_origin() {
    let (x, y) = clamp_position(200.0, 200.0, 500.0, 500.0, &zone());
    assert_eq!((x, y), (52.0, 137.0));
}

#[test]
fn test_clamp_box_lenient_below_min_size() {
    // Below the 20-unit threshold the box comes back untouched.
    let b = Rect::new(-10.0, -10.0, 15.0, 30.0);
    let out = clamp_box(b, &zone(), 20.0);
    assert_eq!(out, b);
}

#[test]
fn test_clamp_box_repositions_above_min_size() {
    let b = Rect::new(-10.0, -10.0, 100.0, 100.0);
    let out = clamp_box(b, &zone(), 20.0);
    assert_eq!(out.x, 52.0);
    assert_eq!(out.y, 137.0);
    assert_eq!(out.width, 100.0);
    assert_eq!(out.height, 100.0);
}

#[test]
fn test_rotated_aabb_of_axis_aligned_box() {
    let bb = rotated_aabb(10.0, 20.0, 100.0, 50.0, 0.0, false);
    assert_eq!(bb, Rect::new(10.0, 20.0, 100.0, 50.0));
}

#[test]
fn test_rotated_aabb_grows_under_rotation() {
    let bb = rotated_aabb(0.0, 0.0, 100.0, 100.0, 45.0, true);
    let expected = 100.0 * std::f64::consts::SQRT_2;
    assert!((bb.width - expected).abs() < 1e-9);
    assert!((bb.height - expected).abs() < 1e-9);
}

proptest! {
    #[test]
    fn prop_clamped_position_keeps_box_in_zone(
        x in -2000.0..2000.0f64,
        y in -2000.0..2000.0f64,
        w in 1.0..400.0f64,
        h in 1.0..400.0f64,
    ) {
        let z = zone();
        let (cx, cy) = clamp_position(x, y, w, h, &z);
        prop_assert!(z.rect().contains(&Rect::new(cx, cy, w, h)));
    }

    #[test]
    fn prop_clamped_box_above_min_stays_in_zone(
        x in -2000.0..2000.0f64,
        y in -2000.0..2000.0f64,
        w in 20.0..400.0f64,
        h in 20.0..400.0f64,
    ) {
        let z = zone();
        let out = clamp_box(Rect::new(x, y, w, h), &z, 20.0);
        prop_assert!(z.rect().contains(&out));
        prop_assert_eq!(out.width, w);
        prop_assert_eq!(out.height, h);
    }
}
