#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Point ---

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_distance_three_four_five() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(3.0, 4.0);
    assert!(approx_eq(a.distance_to(b), 5.0));
    assert!(approx_eq(b.distance_to(a), 5.0));
}

#[test]
fn point_serde_shape() {
    let json = serde_json::to_value(Point::new(1.5, -2.0)).unwrap();
    assert_eq!(json, serde_json::json!({ "x": 1.5, "y": -2.0 }));
}

// --- Camera defaults ---

#[test]
fn camera_default_is_identity() {
    let cam = Camera::default();
    assert_eq!(cam.offset, Point::new(0.0, 0.0));
    assert_eq!(cam.scale, 1.0);
}

// --- conversions ---

#[test]
fn screen_to_world_identity() {
    let cam = Camera::default();
    let world = cam.screen_to_world(Point::new(50.0, 75.0));
    assert!(point_approx_eq(world, Point::new(50.0, 75.0)));
}

#[test]
fn screen_to_world_with_offset_and_scale() {
    let cam = Camera::new(Point::new(100.0, 50.0), 2.0);
    let world = cam.screen_to_world(Point::new(140.0, 90.0));
    assert!(point_approx_eq(world, Point::new(20.0, 20.0)));
}

#[test]
fn world_to_screen_inverts_screen_to_world() {
    let cam = Camera::new(Point::new(-30.0, 12.5), 0.75);
    let screen = Point::new(321.0, 123.0);
    let back = cam.world_to_screen(cam.screen_to_world(screen));
    assert!(point_approx_eq(back, screen));
}

#[test]
fn camera_validity() {
    assert!(Camera::default().is_valid());
    assert!(Camera::new(Point::new(-5.0, 3.0), 0.25).is_valid());
    assert!(!Camera::new(Point::default(), 0.0).is_valid());
    assert!(!Camera::new(Point::default(), -1.0).is_valid());
    assert!(!Camera::new(Point::default(), f64::INFINITY).is_valid());
    assert!(!Camera::new(Point::new(f64::NAN, 0.0), 1.0).is_valid());
}
