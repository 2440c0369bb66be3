//! Developer tooling: read-only scene inspection for the CLI and overlay.
//!
//! # Invariants
//! - Tools never mutate the scene.

mod inspector;

pub use inspector::{ModelInfo, SceneInspector, SceneSummary};

pub fn crate_info() -> &'static str {
    "modelview-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
