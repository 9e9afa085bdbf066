// The main crate is wasm-only, so host tests include the pure-Rust core
// directly. The module tree mirrors `src/core` because the files refer to
// each other through `super::`.

#![allow(dead_code)]

pub mod core {
    pub mod asset {
        include!("../../src/core/asset.rs");
    }
    pub mod config {
        include!("../../src/core/config.rs");
    }
    pub mod constants {
        include!("../../src/core/constants.rs");
    }
    pub mod diagnostics {
        include!("../../src/core/diagnostics.rs");
    }
    pub mod error {
        include!("../../src/core/error.rs");
    }
    pub mod field {
        include!("../../src/core/field.rs");
    }
    pub mod history {
        include!("../../src/core/history.rs");
    }
    pub mod layout {
        include!("../../src/core/layout.rs");
    }
    pub mod loading {
        include!("../../src/core/loading.rs");
    }
    pub mod mesh {
        include!("../../src/core/mesh.rs");
    }
    pub mod orbit {
        include!("../../src/core/orbit.rs");
    }
    pub mod program {
        include!("../../src/core/program.rs");
    }
    pub mod stem {
        include!("../../src/core/stem.rs");
    }
    pub mod viewport {
        include!("../../src/core/viewport.rs");
    }
}
