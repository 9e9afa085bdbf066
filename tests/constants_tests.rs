// Host-side tests for constants and their mathematical relationships.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod core_constants {
    include!("../src/core/constants.rs");
}

use constants::*;
use core_constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn ring_geometry_is_consistent() {
    assert!(MIN_RADIUS > 0.0);
    assert!(MIN_RADIUS < MAX_RADIUS);
    // The model is fitted to the inner ring.
    assert_eq!(MODEL_TARGET_RADIUS, MIN_RADIUS);
    assert!(MODEL_LIFT > 0.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn density_range_fits_webaudio_fft_limits() {
    assert!(MIN_PARTICLE_DENSITY <= MAX_PARTICLE_DENSITY);
    // AnalyserNode accepts fftSize in [32, 32768].
    assert_eq!(1u32 << MIN_PARTICLE_DENSITY, 32);
    assert_eq!(1u32 << MAX_PARTICLE_DENSITY, 32768);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn sprite_falloff_is_ordered() {
    assert!(SPRITE_RADIUS > 0.0 && SPRITE_RADIUS <= 0.5);
    assert!(FALLOFF_START < FALLOFF_END);
    assert_eq!(MAGNITUDE_MAX, u8::MAX as f32);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn camera_frustum_contains_the_scene() {
    assert!(CAMERA_NEAR > 0.0 && CAMERA_NEAR < CAMERA_FAR);
    assert!(CAMERA_FOV_DEGREES > 0.0 && CAMERA_FOV_DEGREES < 180.0);
    assert!(CAMERA_Z > CAMERA_NEAR && CAMERA_Z < CAMERA_FAR);
    // Orbit dolly stays inside the far plane.
    assert!(ORBIT_MIN_DISTANCE > CAMERA_NEAR);
    assert!(ORBIT_MAX_DISTANCE < CAMERA_FAR);
    assert!(ORBIT_MIN_DISTANCE <= CAMERA_Z && CAMERA_Z <= ORBIT_MAX_DISTANCE);
    assert!(ORBIT_ZOOM_STEP > 0.0 && ORBIT_ZOOM_STEP < 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn renderer_and_audio_constants_are_sane() {
    assert!(MAX_PIXEL_RATIO >= 1.0);
    assert!(CLEAR_COLOR.iter().all(|c| (0.0..=1.0).contains(c)));
    assert!(PANNER_REF_DISTANCE > 0.0 && PANNER_REF_DISTANCE < PANNER_MAX_DISTANCE);
    assert!(PANNER_ROLLOFF >= 0.0);
    assert!(STEM_GAIN > 0.0);
}
