//! Model asset loading.
//!
//! A model is loaded in two stages: its MTL material library first, then its
//! OBJ geometry with those materials attached. Parsing itself is done by
//! `tobj`; this crate turns the result into [`ModelData`] and reports every
//! failure as a tagged [`PipelineFailure`] instead of dropping it.
//!
//! # Invariants
//! - A pipeline never panics on bad input; it returns an outcome.
//! - A [`ModelData`] always has at least one triangle.

mod error;
mod material;
mod model;
mod pipeline;
mod request;

pub use error::{AssetError, LoadStage, PipelineFailure};
pub use material::{Material, MaterialSet};
pub use model::{MeshPart, ModelData};
pub use pipeline::{LoadOutcome, load_geometry, load_materials, run_pipeline};
pub use request::LoadRequest;

pub fn crate_info() -> &'static str {
    "modelview-assets v0.1.0"
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::path::{Path, PathBuf};

    pub const CUBE_MTL: &str = "\
newmtl red
Ka 0.1 0.0 0.0
Kd 0.8 0.1 0.1
Ks 0.5 0.5 0.5
Ns 32.0

newmtl grey
Kd 0.5 0.5 0.5
d 0.75
";

    /// Two quads, each with its own material, no normals.
    pub const QUADS_OBJ: &str = "\
# two quads
mtllib quads.mtl
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 0 0 1
v 1 0 1
o front
usemtl red
f 1 2 3 4
o floor
usemtl grey
f 1 5 6 2
";

    pub fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }
}
