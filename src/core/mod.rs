pub mod asset;
pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod error;
pub mod field;
pub mod history;
pub mod layout;
pub mod loading;
pub mod mesh;
pub mod orbit;
pub mod program;
pub mod stem;
pub mod viewport;

pub use asset::{AssetState, AssetStatus, Release};
pub use config::{default_stems, StemConfig};
pub use constants::*;
pub use diagnostics::{SceneDiagnostics, StemDiagnostics};
pub use error::{AssetKind, VizError};
pub use field::ParticleField;
pub use loading::{LoadProgress, LoadTracker};
pub use mesh::{BoundingSphere, MeshData};
pub use orbit::OrbitControls;
pub use program::{ParticleProgram, ProgramCache, ProgramConstants};
pub use stem::{FrequencySource, MeshBounds, Playback, Stem, StemParts, StemPlatform};
pub use viewport::{Camera, Viewport};

// Shaders bundled as string constants
pub static MESH_WGSL: &str = include_str!("../../shaders/mesh.wgsl");
