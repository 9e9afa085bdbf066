use std::fmt;

/// Which of a stem's three asynchronous legs an error belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetKind {
    Texture,
    Mesh,
    Audio,
}

impl AssetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AssetKind::Texture => "texture",
            AssetKind::Mesh => "mesh",
            AssetKind::Audio => "audio",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by the visualization core.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VizError {
    /// Analyser output and history sizing disagree. This is a wiring bug, not
    /// something to recover from at runtime.
    #[error("configuration mismatch: expected at most {expected} magnitudes, got {actual}")]
    ConfigurationMismatch { expected: usize, actual: usize },

    #[error("invalid configuration for `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// A texture, mesh or audio leg failed. Other stems keep running.
    #[error("stem `{stem}` failed to load {kind} from {url}: {reason}")]
    AssetLoad {
        stem: String,
        kind: AssetKind,
        url: String,
        reason: String,
    },
}

impl VizError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        VizError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
