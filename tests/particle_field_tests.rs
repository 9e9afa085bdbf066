// Host-side tests for ring layout, the particle field and its vertex program.

#![allow(dead_code)]
mod common;

use common::core::constants::{MAX_RADIUS, MIN_RADIUS};
use common::core::error::VizError;
use common::core::field::{point_size_px, ring_alpha, rotate_xz, sprite_covers, ParticleField};
use common::core::layout::RingParticleLayout;
use common::core::program::{ParticleProgram, ProgramCache, ProgramConstants};

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

#[test]
fn mirrored_slots_for_a_single_ring_of_eight() {
    let layout = RingParticleLayout::new(1, 8, MIN_RADIUS, MAX_RADIUS, 10.0).unwrap();
    let slots: Vec<usize> = (0..8).map(|p| layout.history_slot(0, p)).collect();
    assert_eq!(slots, vec![0, 1, 2, 3, 3, 2, 1, 0]);
}

#[test]
fn slots_stay_inside_history_for_every_vertex() {
    for density in 5..=9 {
        let layout = RingParticleLayout::from_density(10, density, 10.0).unwrap();
        let half = layout.particles_per_ring() as usize / 2;
        for v in 0..layout.vertex_count() {
            let (ring, particle) = layout.split_vertex(v);
            let slot = layout.history_slot(ring, particle);
            assert!(slot < layout.history_len());
            // Each ring reads only its own half-ring block.
            assert_eq!(slot / half, ring as usize);
        }
    }
}

#[test]
fn density_six_sizes_analyser_and_history() {
    let layout = RingParticleLayout::from_density(10, 6, 10.0).unwrap();
    assert_eq!(layout.fft_size(), 64);
    assert_eq!(layout.frequency_bin_count(), 32);
    assert_eq!(layout.history_len(), 320);
    assert_eq!(layout.vertex_count(), 640);
}

#[test]
fn layout_rejects_bad_configuration() {
    assert!(matches!(
        RingParticleLayout::from_density(0, 6, 10.0),
        Err(VizError::InvalidConfig { field: "number_of_rings", .. })
    ));
    assert!(matches!(
        RingParticleLayout::from_density(10, 4, 10.0),
        Err(VizError::InvalidConfig { field: "particle_density", .. })
    ));
    assert!(matches!(
        RingParticleLayout::from_density(10, 16, 10.0),
        Err(VizError::InvalidConfig { field: "particle_density", .. })
    ));
    assert!(matches!(
        RingParticleLayout::from_density(10, 6, 0.0),
        Err(VizError::InvalidConfig { field: "point_size", .. })
    ));
    assert!(RingParticleLayout::new(1, 12, MIN_RADIUS, MAX_RADIUS, 1.0).is_err());
    assert!(RingParticleLayout::new(1, 8, MAX_RADIUS, MIN_RADIUS, 1.0).is_err());
}

#[test]
fn positions_are_deterministic_and_on_their_rings() {
    let layout = RingParticleLayout::from_density(10, 6, 10.0).unwrap();
    let a = layout.generate_positions();
    let b = layout.generate_positions();
    assert_eq!(a, b);
    assert_eq!(a.len(), 10 * 64 * 3);

    for v in 0..layout.vertex_count() {
        let (ring, _) = layout.split_vertex(v);
        let p = &a[v * 3..v * 3 + 3];
        assert_eq!(p[1], 0.0);
        let r = (p[0] * p[0] + p[2] * p[2]).sqrt();
        assert!(approx(r, layout.ring_radius(ring)), "vertex {v} radius {r}");
    }
    assert!(approx(layout.ring_radius(0), MIN_RADIUS));
    assert!(layout.ring_radius(9) < MAX_RADIUS);
}

#[test]
fn field_update_pushes_frames_and_time() {
    let layout = RingParticleLayout::from_density(2, 5, 10.0).unwrap();
    let mut field = ParticleField::new(layout, 0.15);
    assert_eq!(field.history().len(), 32);

    let frame = vec![255u8; 16];
    field.update(1.5, &frame).unwrap();
    assert_eq!(field.time(), 1.5);
    assert_eq!(&field.history().as_slice()[..16], &frame[..]);
    // Ring 0 reads slots 0..16, all loud now.
    assert!(approx(field.displacement(0), 0.15));
    // Ring 1 reads slots 16..32, still silent.
    assert_eq!(field.displacement(32), 0.0);

    let err = field.update(2.0, &[0u8; 33]).unwrap_err();
    assert!(matches!(err, VizError::ConfigurationMismatch { expected: 32, actual: 33 }));
    assert_eq!(field.time(), 1.5);
}

#[test]
fn displaced_vertex_rotates_with_its_ring() {
    let layout = RingParticleLayout::from_density(3, 5, 10.0).unwrap();
    let mut field = ParticleField::new(layout, 0.15);
    field.update(2.0, &[]).unwrap();

    let v = 2 * 32; // first particle of ring 2
    let rest = &field.positions()[v * 3..v * 3 + 3];
    let angle = 2.0 * (2.0 * 0.06 + 0.5);
    let (x, z) = rotate_xz(rest[0], rest[2], angle);
    let moved = field.displaced_vertex(v);
    assert!(approx(moved.x, x) && approx(moved.z, z));
    assert_eq!(moved.y, 0.0);
    // Rotation preserves the ring radius.
    let r = (moved.x * moved.x + moved.z * moved.z).sqrt();
    assert!(approx(r, layout.ring_radius(2)));
}

#[test]
fn rotate_matches_column_major_mat2() {
    let (x, z) = rotate_xz(1.0, 0.0, std::f32::consts::FRAC_PI_2);
    assert!(approx(x, 0.0) && approx(z, -1.0));
    let (x, z) = rotate_xz(0.0, 1.0, std::f32::consts::FRAC_PI_2);
    assert!(approx(x, 1.0) && approx(z, 0.0));
}

#[test]
fn sprite_shading_helpers() {
    assert!(sprite_covers([0.5, 0.5]));
    assert!(sprite_covers([1.0, 0.5]));
    assert!(!sprite_covers([1.0, 1.0]));
    assert_eq!(ring_alpha(0.0), 1.0);
    assert_eq!(ring_alpha(0.35), 1.0);
    assert_eq!(ring_alpha(0.5), 0.0);
    let mid = ring_alpha(0.425);
    assert!(mid > 0.0 && mid < 1.0);
    assert!(approx(point_size_px(10.0, -2.0), 5.0));
}

#[test]
fn program_bakes_layout_constants() {
    let layout = RingParticleLayout::from_density(10, 6, 10.0).unwrap();
    let program = ParticleProgram::compile(ProgramConstants::new(&layout, 0.15));
    let src = program.source();
    assert!(src.contains("const PARTICLES_PER_RING: u32 = 64u;"));
    assert!(src.contains("const HALF_RING: i32 = 32;"));
    assert!(src.contains("const NUMBER_OF_RINGS: u32 = 10u;"));
    assert!(src.contains("const HISTORY_LEN: u32 = 320u;"));
    assert!(src.contains("const POINT_SIZE: f32 = 10.0;"));
    assert!(src.contains("const AMPLITUDE: f32 = 0.15;"));
    assert!(!src.contains("{{"));
}

#[test]
fn program_cache_shares_and_rebuilds() {
    let small = RingParticleLayout::from_density(10, 6, 10.0).unwrap();
    let large = RingParticleLayout::from_density(10, 7, 10.0).unwrap();
    let mut cache: ProgramCache<String> = ProgramCache::default();

    let first = cache
        .get_or_build(ProgramConstants::new(&small, 0.15), |p| p.source().to_string())
        .clone();
    let again = cache
        .get_or_build(ProgramConstants::new(&small, 0.15), |_| panic!("should be cached"))
        .clone();
    assert_eq!(first, again);
    assert_eq!(cache.builds(), 1);

    let rebuilt = cache
        .get_or_build(ProgramConstants::new(&large, 0.15), |p| p.source().to_string())
        .clone();
    assert_ne!(first, rebuilt);
    assert_eq!(cache.builds(), 2);
    assert_eq!(cache.len(), 2);

    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn field_program_matches_its_layout() {
    let layout = RingParticleLayout::from_density(4, 5, 8.0).unwrap();
    let field = ParticleField::new(layout, 0.3);
    assert!(field.program().is_compatible(&ProgramConstants::new(&layout, 0.3)));
    assert!(!field.program().is_compatible(&ProgramConstants::new(&layout, 0.2)));
    assert_eq!(field.constants().history_len() as usize, field.history().len());
}
