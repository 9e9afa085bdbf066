// Host-side tests for decoded mesh handling and model placement.

#![allow(dead_code)]
mod common;

use common::core::error::VizError;
use common::core::mesh::{BoundingSphere, MeshData, ModelPlacement};
use glam::Vec3;

// Unit right triangle in the XY plane, counter-clockwise seen from +Z.
const TRIANGLE: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];

#[test]
fn missing_indices_mean_a_plain_triangle_list() {
    let mesh = MeshData::from_flat(&TRIANGLE, None, None).unwrap();
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.indices, vec![0, 1, 2]);
}

#[test]
fn missing_normals_are_computed_from_faces() {
    let mesh = MeshData::from_flat(&TRIANGLE, None, None).unwrap();
    for n in &mesh.normals {
        assert!((Vec3::from(*n) - Vec3::Z).length() < 1e-6);
    }
}

#[test]
fn provided_normals_are_kept() {
    let normals = [0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0];
    let mesh = MeshData::from_flat(&TRIANGLE, Some(&normals), Some(vec![0, 1, 2])).unwrap();
    assert!(mesh.normals.iter().all(|n| *n == [0.0, 1.0, 0.0]));
}

#[test]
fn malformed_buffers_are_rejected() {
    assert!(matches!(
        MeshData::from_flat(&[], None, None),
        Err(VizError::InvalidConfig { field: "positions", .. })
    ));
    assert!(matches!(
        MeshData::from_flat(&TRIANGLE[..8], None, None),
        Err(VizError::InvalidConfig { field: "positions", .. })
    ));
    assert!(matches!(
        MeshData::from_flat(&TRIANGLE, None, Some(vec![0, 1])),
        Err(VizError::InvalidConfig { field: "indices", .. })
    ));
    assert!(matches!(
        MeshData::from_flat(&TRIANGLE, None, Some(vec![0, 1, 3])),
        Err(VizError::InvalidConfig { field: "indices", .. })
    ));
}

#[test]
fn interleaved_layout_is_position_then_normal() {
    let mesh = MeshData::from_flat(&TRIANGLE, None, None).unwrap();
    let data = mesh.interleaved();
    assert_eq!(data.len(), 3 * 6);
    assert_eq!(&data[6..9], &[1.0, 0.0, 0.0]);
    assert!((data[11] - 1.0).abs() < 1e-6);
}

#[test]
fn bounding_sphere_centers_on_the_box() {
    let positions = [-1.0, 2.0, 0.0, 3.0, 2.0, 0.0, 1.0, 4.0, 0.0];
    let mesh = MeshData::from_flat(&positions, None, None).unwrap();
    let s = mesh.bounding_sphere();
    assert_eq!(s.center, Vec3::new(1.0, 3.0, 0.0));
    assert!((s.radius - 5.0_f32.sqrt()).abs() < 1e-6);
}

#[test]
fn placement_scales_to_inner_ring_and_lifts() {
    let placement = ModelPlacement::fit(BoundingSphere {
        center: Vec3::new(2.0, 0.0, 0.0),
        radius: 3.0,
    });
    assert!((placement.scale - 0.05).abs() < 1e-7);
    let m = placement.local_matrix(0.0);
    assert!((m.transform_point3(Vec3::new(2.0, 0.0, 0.0)) - Vec3::new(0.0, 0.05, 0.0)).length() < 1e-6);
    // A point on the sphere lands on the inner-ring radius.
    let edge = m.transform_point3(Vec3::new(5.0, 0.0, 0.0));
    assert!(((edge - Vec3::new(0.0, 0.05, 0.0)).length() - 0.15).abs() < 1e-6);
}

#[test]
fn spin_rotates_about_vertical_axis() {
    let placement = ModelPlacement::fit(BoundingSphere {
        center: Vec3::ZERO,
        radius: 0.15,
    });
    let m = placement.local_matrix(std::f32::consts::FRAC_PI_2);
    let p = m.transform_point3(Vec3::new(0.15, 0.0, 0.0));
    assert!((p - Vec3::new(0.0, 0.05, -0.15)).length() < 1e-6);
}

#[test]
fn degenerate_mesh_keeps_unit_scale() {
    let placement = ModelPlacement::fit(BoundingSphere {
        center: Vec3::ONE,
        radius: 0.0,
    });
    assert_eq!(placement.scale, 1.0);
}
