use glam::{Mat4, Vec3};

use super::asset::{AssetState, AssetStatus, Release};
use super::config::StemConfig;
use super::constants::MODEL_SPIN_PER_FRAME;
use super::error::{AssetKind, VizError};
use super::field::ParticleField;
use super::mesh::{BoundingSphere, ModelPlacement};

/// Realtime spectrum of one stem's audio.
pub trait FrequencySource {
    /// Magnitudes produced per read (half the analyser window).
    fn bin_count(&self) -> usize;
    /// Fill `out` with the current byte magnitudes.
    fn read_frequency_data(&self, out: &mut [u8]);
    fn disconnect(&mut self);
}

/// A decoded, playable audio track.
pub trait Playback: Release {
    /// Flip between playing and paused; returns whether it is now playing.
    fn toggle(&mut self) -> bool;
    fn is_playing(&self) -> bool;
}

/// A GPU mesh that knows its own extent.
pub trait MeshBounds {
    fn bounding_sphere(&self) -> BoundingSphere;
}

/// Platform resources a stem binds together. The web frontend plugs in
/// wgpu and WebAudio types; tests plug in plain structs.
pub trait StemPlatform {
    type Texture: Release;
    type Mesh: Release + MeshBounds;
    type Audio: Playback;
    type Analyser: FrequencySource;
    type Particles: Release;
}

/// One stem: particle rings, decorative model and audio, positioned as a unit.
pub struct Stem<P: StemPlatform> {
    config: StemConfig,
    field: ParticleField,
    particles: Option<P::Particles>,
    analyser: Option<P::Analyser>,
    texture: AssetState<P::Texture>,
    mesh: AssetState<P::Mesh>,
    placement: Option<ModelPlacement>,
    audio: AssetState<P::Audio>,
    offset: Vec3,
    spin: f32,
    scratch: Vec<u8>,
    disposed: bool,
}

/// Split borrows handed to the renderer for one frame.
pub struct StemParts<'a, P: StemPlatform> {
    pub field: &'a ParticleField,
    pub particles: Option<&'a mut P::Particles>,
    pub mesh: Option<&'a mut P::Mesh>,
    pub texture: Option<&'a P::Texture>,
    pub group: Mat4,
    pub model: Option<Mat4>,
}

impl<P: StemPlatform> Stem<P> {
    /// Build the synchronous part of a stem: validated layout, particle field,
    /// analyser and its GPU particles. Asset legs start out `Unloaded`.
    pub fn new(
        config: StemConfig,
        analyser: P::Analyser,
        build_particles: impl FnOnce(&ParticleField) -> P::Particles,
    ) -> Result<Self, VizError> {
        let layout = config.validate()?;
        let expected = layout.frequency_bin_count();
        let actual = analyser.bin_count();
        if actual != expected {
            return Err(VizError::ConfigurationMismatch { expected, actual });
        }
        let field = ParticleField::new(layout, config.amplitude);
        let particles = build_particles(&field);
        log::info!(
            "[stem] {}: {} rings, {} particles/ring, fft {}",
            config.name,
            layout.number_of_rings(),
            layout.particles_per_ring(),
            layout.fft_size()
        );
        Ok(Self {
            config,
            field,
            particles: Some(particles),
            analyser: Some(analyser),
            texture: AssetState::Unloaded,
            mesh: AssetState::Unloaded,
            placement: None,
            audio: AssetState::Unloaded,
            offset: Vec3::ZERO,
            spin: 0.0,
            scratch: vec![0; expected],
            disposed: false,
        })
    }

    pub fn set_position(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.offset = Vec3::new(x, y, z);
        self
    }

    /// Per-frame step: spin the model (when present) and push the analyser's
    /// current spectrum into the particle history. Inert after `dispose`.
    pub fn update(&mut self, time: f32) -> Result<(), VizError> {
        if self.disposed {
            return Ok(());
        }
        if self.mesh.is_loaded() {
            self.spin = (self.spin + MODEL_SPIN_PER_FRAME) % std::f32::consts::TAU;
        }
        if let Some(analyser) = &self.analyser {
            analyser.read_frequency_data(&mut self.scratch);
        }
        self.field.update(time, &self.scratch)
    }

    pub fn on_texture_loaded(&mut self, outcome: Result<P::Texture, String>) -> Result<(), VizError> {
        let url = self.config.matcap_texture.clone();
        self.texture
            .resolve(outcome)
            .map_err(|reason| self.load_error(AssetKind::Texture, url, reason))
    }

    pub fn on_mesh_loaded(&mut self, outcome: Result<P::Mesh, String>) -> Result<(), VizError> {
        let bounds = outcome.as_ref().ok().map(|m| m.bounding_sphere());
        let url = self.config.model.clone();
        self.mesh
            .resolve(outcome)
            .map_err(|reason| self.load_error(AssetKind::Mesh, url, reason))?;
        if self.mesh.is_loaded() && self.placement.is_none() {
            if let Some(bounds) = bounds {
                self.placement = Some(ModelPlacement::fit(bounds));
            }
        }
        Ok(())
    }

    pub fn on_audio_loaded(&mut self, outcome: Result<P::Audio, String>) -> Result<(), VizError> {
        let url = self.config.audio.clone();
        self.audio
            .resolve(outcome)
            .map_err(|reason| self.load_error(AssetKind::Audio, url, reason))
    }

    fn load_error(&self, kind: AssetKind, url: String, reason: String) -> VizError {
        VizError::AssetLoad {
            stem: self.config.name.clone(),
            kind,
            url,
            reason,
        }
    }

    /// Play/pause toggle. `None` until the audio leg has loaded.
    pub fn toggle_playback(&mut self) -> Option<bool> {
        if self.disposed {
            return None;
        }
        self.audio.get_mut().map(|audio| audio.toggle())
    }

    pub fn is_playing(&self) -> bool {
        self.audio.get().map(|a| a.is_playing()).unwrap_or(false)
    }

    /// Release everything this stem owns, whatever has or has not loaded.
    /// Further calls are no-ops.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        if let Some(particles) = self.particles.take() {
            particles.release();
        }
        self.texture.dispose();
        self.mesh.dispose();
        self.audio.dispose();
        if let Some(mut analyser) = self.analyser.take() {
            analyser.disconnect();
        }
        log::info!("[stem] {} disposed", self.config.name);
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.config.name
    }
    #[inline]
    pub fn config(&self) -> &StemConfig {
        &self.config
    }
    #[inline]
    pub fn field(&self) -> &ParticleField {
        &self.field
    }
    #[inline]
    pub fn offset(&self) -> Vec3 {
        self.offset
    }
    #[inline]
    pub fn spin(&self) -> f32 {
        self.spin
    }
    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
    #[inline]
    pub fn placement(&self) -> Option<&ModelPlacement> {
        self.placement.as_ref()
    }

    pub fn texture_status(&self) -> AssetStatus {
        self.texture.status()
    }
    pub fn mesh_status(&self) -> AssetStatus {
        self.mesh.status()
    }
    pub fn audio_status(&self) -> AssetStatus {
        self.audio.status()
    }

    pub fn analyser(&self) -> Option<&P::Analyser> {
        self.analyser.as_ref()
    }

    pub fn particles(&self) -> Option<&P::Particles> {
        self.particles.as_ref()
    }

    pub fn mesh(&self) -> Option<&P::Mesh> {
        self.mesh.get()
    }

    /// Group transform shared by particles, model and positional audio.
    pub fn group_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.offset)
    }

    /// World matrix of the model, once its mesh has loaded.
    pub fn model_matrix(&self) -> Option<Mat4> {
        if !self.mesh.is_loaded() {
            return None;
        }
        self.placement
            .map(|p| self.group_matrix() * p.local_matrix(self.spin))
    }

    pub fn parts_mut(&mut self) -> StemParts<'_, P> {
        let group = self.group_matrix();
        let model = self.model_matrix();
        StemParts {
            field: &self.field,
            particles: self.particles.as_mut(),
            mesh: self.mesh.get_mut(),
            texture: self.texture.get(),
            group,
            model,
        }
    }
}
