use std::fmt;

use super::asset::AssetStatus;
use super::stem::{Stem, StemPlatform};

/// Snapshot of one stem for the host's diagnostics accessor.
#[derive(Clone, Debug, PartialEq)]
pub struct StemDiagnostics {
    pub name: String,
    pub texture: AssetStatus,
    pub mesh: AssetStatus,
    pub audio: AssetStatus,
    pub playing: bool,
    pub disposed: bool,
    pub history_len: usize,
    pub history_peak: u8,
    pub history_mean: f32,
    pub time: f32,
}

impl StemDiagnostics {
    pub fn capture<P: StemPlatform>(stem: &Stem<P>) -> Self {
        let history = stem.field().history();
        Self {
            name: stem.name().to_string(),
            texture: stem.texture_status(),
            mesh: stem.mesh_status(),
            audio: stem.audio_status(),
            playing: stem.is_playing(),
            disposed: stem.is_disposed(),
            history_len: history.len(),
            history_peak: history.peak(),
            history_mean: history.mean(),
            time: stem.field().time(),
        }
    }
}

impl fmt::Display for StemDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: texture={} mesh={} audio={}{} history={} peak={} mean={:.1}",
            self.name,
            self.texture,
            self.mesh,
            self.audio,
            if self.playing { " (playing)" } else { "" },
            self.history_len,
            self.history_peak,
            self.history_mean
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneDiagnostics {
    pub frames: u64,
    pub preload_complete: bool,
    pub loads_failed: usize,
    pub stems: Vec<StemDiagnostics>,
}

impl SceneDiagnostics {
    pub fn capture<'a, P: StemPlatform + 'a>(
        frames: u64,
        preload_complete: bool,
        loads_failed: usize,
        stems: impl IntoIterator<Item = &'a Stem<P>>,
    ) -> Self {
        Self {
            frames,
            preload_complete,
            loads_failed,
            stems: stems.into_iter().map(StemDiagnostics::capture).collect(),
        }
    }
}
