use glam::Vec3;

use super::error::VizError;
use super::layout::RingParticleLayout;

/// Everything needed to build one stem.
#[derive(Clone, Debug, PartialEq)]
pub struct StemConfig {
    pub name: String,
    pub matcap_texture: String,
    pub model: String,
    pub audio: String,
    pub number_of_rings: u32,
    /// Exponent in `[5, 15]`; particles per ring and analyser window are `2^density`.
    pub particle_density: u32,
    pub point_size: f32,
    pub amplitude: f32,
}

impl StemConfig {
    /// Check every field and derive the particle layout.
    pub fn validate(&self) -> Result<RingParticleLayout, VizError> {
        for (field, value) in [
            ("matcap_texture", &self.matcap_texture),
            ("model", &self.model),
            ("audio", &self.audio),
        ] {
            if value.trim().is_empty() {
                return Err(VizError::invalid(field, "path is empty"));
            }
        }
        if !self.amplitude.is_finite() {
            return Err(VizError::invalid("amplitude", "must be finite"));
        }
        RingParticleLayout::from_density(self.number_of_rings, self.particle_density, self.point_size)
    }

    /// Analyser FFT size for this stem.
    pub fn fft_size(&self) -> u32 {
        1 << self.particle_density
    }
}

fn preset(name: &str, matcap: &str, audio: &str) -> StemConfig {
    StemConfig {
        name: name.to_string(),
        matcap_texture: matcap.to_string(),
        model: "./trumpet.glb".to_string(),
        audio: audio.to_string(),
        number_of_rings: 10,
        particle_density: 6,
        point_size: 10.0,
        amplitude: 0.15,
    }
}

/// The shipped scene: three stems and their offsets.
pub fn default_stems() -> Vec<(StemConfig, Vec3)> {
    vec![
        (
            preset("trumpet", "./silver.png", "./audio/trumpet.wav"),
            Vec3::ZERO,
        ),
        (
            preset("bass", "./matcap2.png", "./audio/bass.wav"),
            Vec3::new(1.5, 0.0, 0.0),
        ),
        (
            preset("piano", "./redGlowy.png", "./audio/piano.wav"),
            Vec3::new(1.5 / 2.0, 0.0, 1.5),
        ),
    ]
}
