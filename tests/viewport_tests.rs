// Host-side tests for viewport sizing, camera and orbit controls.

#![allow(dead_code)]
mod common;

use common::core::orbit::OrbitControls;
use common::core::viewport::{Camera, Viewport};
use glam::Vec3;

#[test]
fn aspect_follows_css_size() {
    let v = Viewport::new(1600.0, 900.0, 1.0);
    assert!((v.aspect() - 16.0 / 9.0).abs() < 1e-6);
}

#[test]
fn pixel_ratio_is_capped_at_two() {
    let v = Viewport::new(800.0, 600.0, 3.0);
    assert_eq!(v.pixel_ratio(), 2.0);
    assert_eq!(v.backing_size(), (1600, 1200));

    let v = Viewport::new(800.0, 600.0, 1.5);
    assert_eq!(v.pixel_ratio(), 1.5);
    assert_eq!(v.backing_size(), (1200, 900));
}

#[test]
fn degenerate_viewports_stay_usable() {
    let v = Viewport::new(0.0, 0.0, f64::NAN);
    assert_eq!(v.pixel_ratio(), 1.0);
    assert_eq!(v.backing_size(), (1, 1));
    assert!(v.aspect().is_finite());
}

#[test]
fn camera_picks_up_viewport_aspect() {
    let mut cam = Camera::perspective(75.0, 1.0, 0.001, 10.0);
    cam.apply_viewport(&Viewport::new(1200.0, 600.0, 2.0));
    assert_eq!(cam.aspect, 2.0);
    assert_eq!(cam.forward(), Vec3::new(0.0, 0.0, -1.0));
    // Target projects to the center of clip space.
    let clip = cam.projection_matrix() * cam.view_matrix() * cam.target.extend(1.0);
    assert!((clip.x / clip.w).abs() < 1e-6 && (clip.y / clip.w).abs() < 1e-6);
}

#[test]
fn orbit_starts_at_the_given_eye() {
    let orbit = OrbitControls::new(Vec3::new(0.0, 0.0, 1.0), Vec3::ZERO, 0.1, 5.0);
    assert!((orbit.eye() - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-5);
    assert_eq!(orbit.radius(), 1.0);
}

#[test]
fn full_height_drag_is_one_revolution() {
    let mut orbit = OrbitControls::new(Vec3::new(0.0, 0.0, 1.0), Vec3::ZERO, 0.1, 5.0);
    orbit.rotate(600.0, 0.0, 600.0);
    assert!((orbit.eye() - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-4);

    orbit.rotate(150.0, 0.0, 600.0);
    let eye = orbit.eye();
    assert!((eye.length() - 1.0).abs() < 1e-5);
    assert!((eye - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-4);
}

#[test]
fn vertical_drag_never_flips_over_the_pole() {
    let mut orbit = OrbitControls::new(Vec3::new(0.0, 0.0, 1.0), Vec3::ZERO, 0.1, 5.0);
    orbit.rotate(0.0, 10_000.0, 600.0);
    let eye = orbit.eye();
    assert!(eye.y > 0.99);
    orbit.rotate(0.0, -20_000.0, 600.0);
    assert!(orbit.eye().y < -0.99);
}

#[test]
fn wheel_zoom_is_clamped() {
    let mut orbit = OrbitControls::new(Vec3::new(0.0, 0.0, 1.0), Vec3::ZERO, 0.1, 5.0);
    orbit.zoom(-100.0);
    assert!((orbit.radius() - 0.95).abs() < 1e-6);
    orbit.zoom(100.0);
    assert!((orbit.radius() - 1.0).abs() < 1e-6);
    for _ in 0..200 {
        orbit.zoom(-1.0);
    }
    assert_eq!(orbit.radius(), 0.1);
    for _ in 0..200 {
        orbit.zoom(1.0);
    }
    assert_eq!(orbit.radius(), 5.0);
}

#[test]
fn disabled_controls_ignore_input() {
    let mut orbit = OrbitControls::new(Vec3::new(0.0, 0.0, 1.0), Vec3::ZERO, 0.1, 5.0);
    orbit.enabled = false;
    orbit.rotate(100.0, 100.0, 600.0);
    orbit.zoom(-1.0);
    assert!((orbit.eye() - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-5);
}
