use super::constants::{
    MAX_PARTICLE_DENSITY, MAX_RADIUS, MIN_PARTICLE_DENSITY, MIN_RADIUS, RING_ROTATION_BASE,
    RING_ROTATION_STEP,
};
use super::error::VizError;

/// Static particle layout of one stem: concentric rings of evenly spaced points.
///
/// `particles_per_ring` is always `2^density`, which is also the analyser
/// window, so the analyser delivers exactly half a ring of magnitudes per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingParticleLayout {
    number_of_rings: u32,
    particles_per_ring: u32,
    min_radius: f32,
    max_radius: f32,
    point_size: f32,
}

impl RingParticleLayout {
    pub fn new(
        number_of_rings: u32,
        particles_per_ring: u32,
        min_radius: f32,
        max_radius: f32,
        point_size: f32,
    ) -> Result<Self, VizError> {
        if number_of_rings == 0 {
            return Err(VizError::invalid("number_of_rings", "must be positive"));
        }
        if !particles_per_ring.is_power_of_two() || particles_per_ring < 2 {
            return Err(VizError::invalid(
                "particles_per_ring",
                format!("{particles_per_ring} is not a power of two >= 2"),
            ));
        }
        if !(min_radius.is_finite() && max_radius.is_finite()) || min_radius >= max_radius {
            return Err(VizError::invalid(
                "radius",
                format!("min_radius {min_radius} must be below max_radius {max_radius}"),
            ));
        }
        if !(point_size.is_finite() && point_size > 0.0) {
            return Err(VizError::invalid("point_size", "must be a positive number"));
        }
        Ok(Self {
            number_of_rings,
            particles_per_ring,
            min_radius,
            max_radius,
            point_size,
        })
    }

    /// Layout for a density exponent in `[5, 15]` with the standard radii.
    pub fn from_density(
        number_of_rings: u32,
        particle_density: u32,
        point_size: f32,
    ) -> Result<Self, VizError> {
        if !(MIN_PARTICLE_DENSITY..=MAX_PARTICLE_DENSITY).contains(&particle_density) {
            return Err(VizError::invalid(
                "particle_density",
                format!(
                    "{particle_density} outside [{MIN_PARTICLE_DENSITY}, {MAX_PARTICLE_DENSITY}]"
                ),
            ));
        }
        Self::new(
            number_of_rings,
            1 << particle_density,
            MIN_RADIUS,
            MAX_RADIUS,
            point_size,
        )
    }

    #[inline]
    pub fn number_of_rings(&self) -> u32 {
        self.number_of_rings
    }
    #[inline]
    pub fn particles_per_ring(&self) -> u32 {
        self.particles_per_ring
    }
    #[inline]
    pub fn min_radius(&self) -> f32 {
        self.min_radius
    }
    #[inline]
    pub fn max_radius(&self) -> f32 {
        self.max_radius
    }
    #[inline]
    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    pub fn vertex_count(&self) -> usize {
        self.number_of_rings as usize * self.particles_per_ring as usize
    }

    /// Length of the frequency history: half the vertex count.
    pub fn history_len(&self) -> usize {
        self.vertex_count() / 2
    }

    /// Analyser window (FFT size) matching this layout.
    pub fn fft_size(&self) -> u32 {
        self.particles_per_ring
    }

    /// Magnitudes delivered per analyser frame.
    pub fn frequency_bin_count(&self) -> usize {
        self.particles_per_ring as usize / 2
    }

    pub fn ring_radius(&self, ring: u32) -> f32 {
        let interval = (self.max_radius - self.min_radius) / self.number_of_rings as f32;
        self.min_radius + interval * ring as f32
    }

    /// Rest position of a particle on the y = 0 plane.
    pub fn rest_position(&self, ring: u32, particle: u32) -> [f32; 3] {
        let theta = 2.0 * std::f64::consts::PI * (particle as f64 / self.particles_per_ring as f64);
        let radius = self.ring_radius(ring) as f64;
        [
            (theta.cos() * radius) as f32,
            0.0,
            (theta.sin() * radius) as f32,
        ]
    }

    /// Flat `xyz` position buffer, ring-major.
    pub fn generate_positions(&self) -> Vec<f32> {
        let mut positions = Vec::with_capacity(self.vertex_count() * 3);
        for ring in 0..self.number_of_rings {
            for particle in 0..self.particles_per_ring {
                positions.extend_from_slice(&self.rest_position(ring, particle));
            }
        }
        positions
    }

    /// Ring and particle indices of a flat vertex id.
    #[inline]
    pub fn split_vertex(&self, vertex: usize) -> (u32, u32) {
        let ppr = self.particles_per_ring as usize;
        ((vertex / ppr) as u32, (vertex % ppr) as u32)
    }

    /// History slot read by a vertex.
    ///
    /// The first half of a ring reads its half-ring block front to back and the
    /// second half reads the same block back to front, which makes every ring
    /// left/right symmetric. Must match the vertex program exactly.
    pub fn history_slot(&self, ring: u32, particle: u32) -> usize {
        let half = (self.particles_per_ring / 2) as i64;
        let ring = ring as i64;
        let particle = particle as i64;
        let slot = ring * half + particle - 0.max(2 * (particle - half) + 1);
        slot as usize
    }

    /// Rotation of a ring about the vertical axis at `time` seconds.
    #[inline]
    pub fn ring_rotation(&self, ring: u32, time: f32) -> f32 {
        time * (ring as f32 * RING_ROTATION_STEP + RING_ROTATION_BASE)
    }
}
