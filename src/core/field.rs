use glam::Vec3;

use super::constants::{FALLOFF_END, FALLOFF_START, MAGNITUDE_MAX, SPRITE_RADIUS};
use super::error::VizError;
use super::history::FrequencyHistory;
use super::layout::RingParticleLayout;
use super::program::{ParticleProgram, ProgramConstants};

/// CPU side of a stem's particle rings: static rest positions, the per-frame
/// uniform set `{time, history}` and the program those uniforms feed.
pub struct ParticleField {
    layout: RingParticleLayout,
    amplitude: f32,
    positions: Vec<f32>,
    history: FrequencyHistory,
    time: f32,
    program: ParticleProgram,
}

impl ParticleField {
    pub fn new(layout: RingParticleLayout, amplitude: f32) -> Self {
        let positions = layout.generate_positions();
        let history = FrequencyHistory::new(layout.history_len());
        let program = ParticleProgram::compile(ProgramConstants::new(&layout, amplitude));
        log::debug!(
            "[field] {} rings x {} particles, history {}",
            layout.number_of_rings(),
            layout.particles_per_ring(),
            history.len()
        );
        Self {
            layout,
            amplitude,
            positions,
            history,
            time: 0.0,
            program,
        }
    }

    pub fn update(&mut self, time: f32, frame: &[u8]) -> Result<(), VizError> {
        self.history.update(frame)?;
        self.time = time;
        Ok(())
    }

    #[inline]
    pub fn layout(&self) -> &RingParticleLayout {
        &self.layout
    }
    #[inline]
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }
    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }
    #[inline]
    pub fn history(&self) -> &FrequencyHistory {
        &self.history
    }
    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }
    #[inline]
    pub fn program(&self) -> &ParticleProgram {
        &self.program
    }

    pub fn constants(&self) -> ProgramConstants {
        *self.program.constants()
    }

    pub fn vertex_count(&self) -> usize {
        self.layout.vertex_count()
    }

    /// Vertical displacement of a vertex from the current history.
    pub fn displacement(&self, vertex: usize) -> f32 {
        let (ring, particle) = self.layout.split_vertex(vertex);
        let slot = self.layout.history_slot(ring, particle);
        self.amplitude * self.history.as_slice()[slot] as f32 / MAGNITUDE_MAX
    }

    /// Object-space position the vertex program produces for `vertex`:
    /// displaced first, then rotated with its ring.
    pub fn displaced_vertex(&self, vertex: usize) -> Vec3 {
        let (ring, _) = self.layout.split_vertex(vertex);
        let base = &self.positions[vertex * 3..vertex * 3 + 3];
        let angle = self.layout.ring_rotation(ring, self.time);
        let (x, z) = rotate_xz(base[0], base[2], angle);
        Vec3::new(x, self.displacement(vertex), z)
    }
}

/// Rotation used by the vertex program, `mat2(c, -s, s, c) * v` in GLSL terms.
#[inline]
pub fn rotate_xz(x: f32, z: f32, angle: f32) -> (f32, f32) {
    let (s, c) = angle.sin_cos();
    (c * x + s * z, -s * x + c * z)
}

/// Perspective point size in pixels for a view-space depth (negative in front).
#[inline]
pub fn point_size_px(point_size: f32, view_z: f32) -> f32 {
    point_size / -view_z
}

/// Whether a sprite coordinate in `[0,1]^2` survives the circular cut.
#[inline]
pub fn sprite_covers(coord: [f32; 2]) -> bool {
    let dx = coord[0] - 0.5;
    let dy = coord[1] - 0.5;
    (dx * dx + dy * dy).sqrt() <= SPRITE_RADIUS
}

/// Fragment alpha for a vertex at `planar_distance` from its ring center.
pub fn ring_alpha(planar_distance: f32) -> f32 {
    1.0 - smoothstep(FALLOFF_START, FALLOFF_END, 2.0 * planar_distance)
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
