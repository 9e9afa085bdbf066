use std::fmt;

/// A GPU or audio resource that must be given back explicitly.
pub trait Release {
    fn release(self);
}

/// Coarse state of an asset slot, without the payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetStatus {
    Unloaded,
    Loaded,
    Failed,
    Disposed,
}

impl AssetStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AssetStatus::Unloaded => "unloaded",
            AssetStatus::Loaded => "loaded",
            AssetStatus::Failed => "failed",
            AssetStatus::Disposed => "disposed",
        }
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One asynchronously loaded resource owned by a stem.
///
/// The render loop only touches the payload in `Loaded`. Results that land
/// after disposal are released on arrival.
#[derive(Debug, Default)]
pub enum AssetState<T> {
    #[default]
    Unloaded,
    Loaded(T),
    Failed(String),
    Disposed,
}

impl<T> AssetState<T> {
    pub fn status(&self) -> AssetStatus {
        match self {
            AssetState::Unloaded => AssetStatus::Unloaded,
            AssetState::Loaded(_) => AssetStatus::Loaded,
            AssetState::Failed(_) => AssetStatus::Failed,
            AssetState::Disposed => AssetStatus::Disposed,
        }
    }

    #[inline]
    pub fn get(&self) -> Option<&T> {
        match self {
            AssetState::Loaded(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        match self {
            AssetState::Loaded(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        matches!(self, AssetState::Loaded(_))
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            AssetState::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

impl<T: Release> AssetState<T> {
    /// Settle the slot with the outcome of its load.
    ///
    /// Returns the failure reason so the caller can report it. A disposed slot
    /// stays disposed and swallows the outcome.
    pub fn resolve(&mut self, outcome: Result<T, String>) -> Result<(), String> {
        match self {
            AssetState::Disposed => {
                if let Ok(late) = outcome {
                    late.release();
                }
                Ok(())
            }
            AssetState::Unloaded => match outcome {
                Ok(value) => {
                    *self = AssetState::Loaded(value);
                    Ok(())
                }
                Err(reason) => {
                    *self = AssetState::Failed(reason.clone());
                    Err(reason)
                }
            },
            AssetState::Loaded(_) | AssetState::Failed(_) => {
                match outcome {
                    Ok(duplicate) => {
                        log::warn!("[asset] slot already settled; releasing duplicate");
                        duplicate.release();
                    }
                    Err(reason) => {
                        log::warn!("[asset] slot already settled; ignoring failure: {}", reason);
                    }
                }
                Ok(())
            }
        }
    }

    /// Release the payload if there is one. Safe in every state.
    pub fn dispose(&mut self) {
        if let AssetState::Loaded(value) = std::mem::replace(self, AssetState::Disposed) {
            value.release();
        }
    }
}
