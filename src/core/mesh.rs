use glam::{Mat4, Quat, Vec3};

use super::constants::{MODEL_LIFT, MODEL_TARGET_RADIUS};
use super::error::VizError;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

/// Decoded triangle mesh handed over by the host's mesh decoder.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Build from flat arrays. Missing indices mean a non-indexed triangle list;
    /// missing normals are recomputed from the faces.
    pub fn from_flat(
        positions: &[f32],
        normals: Option<&[f32]>,
        indices: Option<Vec<u32>>,
    ) -> Result<Self, VizError> {
        if positions.is_empty() || positions.len() % 3 != 0 {
            return Err(VizError::invalid(
                "positions",
                format!("expected a non-empty multiple of 3 floats, got {}", positions.len()),
            ));
        }
        let positions: Vec<[f32; 3]> = positions.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();
        let indices = indices.unwrap_or_else(|| (0..positions.len() as u32).collect());
        if indices.len() % 3 != 0 {
            return Err(VizError::invalid("indices", "not a triangle list"));
        }
        if let Some(bad) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(VizError::invalid(
                "indices",
                format!("index {bad} out of range for {} vertices", positions.len()),
            ));
        }
        let mut mesh = Self {
            positions,
            normals: Vec::new(),
            indices,
        };
        match normals {
            Some(n) if n.len() == mesh.positions.len() * 3 => {
                mesh.normals = n.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();
            }
            _ => mesh.compute_vertex_normals(),
        }
        Ok(mesh)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Area-weighted smooth normals.
    pub fn compute_vertex_normals(&mut self) {
        let mut acc = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let pa = Vec3::from(self.positions[a]);
            let pb = Vec3::from(self.positions[b]);
            let pc = Vec3::from(self.positions[c]);
            let n = (pb - pa).cross(pc - pa);
            acc[a] += n;
            acc[b] += n;
            acc[c] += n;
        }
        self.normals = acc
            .into_iter()
            .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
            .collect();
    }

    /// Sphere centered on the bounding box, radius to the farthest vertex.
    pub fn bounding_sphere(&self) -> BoundingSphere {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for p in &self.positions {
            let p = Vec3::from(*p);
            min = min.min(p);
            max = max.max(p);
        }
        if self.positions.is_empty() {
            return BoundingSphere {
                center: Vec3::ZERO,
                radius: 0.0,
            };
        }
        let center = (min + max) * 0.5;
        let radius = self
            .positions
            .iter()
            .map(|p| center.distance_squared(Vec3::from(*p)))
            .fold(0.0_f32, f32::max)
            .sqrt();
        BoundingSphere { center, radius }
    }

    /// Interleaved `position, normal` vertex data.
    pub fn interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.positions.len() * 6);
        for (p, n) in self.positions.iter().zip(&self.normals) {
            out.extend_from_slice(p);
            out.extend_from_slice(n);
        }
        out
    }
}

/// Where the decorative model sits inside its stem group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelPlacement {
    pub center: Vec3,
    pub scale: f32,
    pub lift: f32,
}

impl ModelPlacement {
    /// Center the model and scale it so its bounding sphere matches the inner ring.
    pub fn fit(bounds: BoundingSphere) -> Self {
        let scale = if bounds.radius > f32::EPSILON {
            MODEL_TARGET_RADIUS / bounds.radius
        } else {
            log::warn!("[mesh] degenerate bounding sphere; keeping unit scale");
            1.0
        };
        Self {
            center: bounds.center,
            scale,
            lift: MODEL_LIFT,
        }
    }

    /// Model matrix relative to the stem group for a spin angle about +Y.
    pub fn local_matrix(&self, spin: f32) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, self.lift, 0.0))
            * Mat4::from_quat(Quat::from_rotation_y(spin))
            * Mat4::from_scale(Vec3::splat(self.scale))
            * Mat4::from_translation(-self.center)
    }
}
