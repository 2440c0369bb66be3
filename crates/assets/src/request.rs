use std::path::{Path, PathBuf};

/// One model to load: a name, a geometry file and its material library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub name: String,
    pub geometry: PathBuf,
    pub materials: PathBuf,
}

impl LoadRequest {
    /// Request whose material library sits next to the geometry with an
    /// `.mtl` extension.
    pub fn new(name: impl Into<String>, geometry: impl Into<PathBuf>) -> Self {
        let geometry = geometry.into();
        let materials = geometry.with_extension("mtl");
        Self {
            name: name.into(),
            geometry,
            materials,
        }
    }

    pub fn with_materials(mut self, materials: impl Into<PathBuf>) -> Self {
        self.materials = materials.into();
        self
    }

    /// Make relative paths relative to `base`. Absolute paths are kept.
    pub fn resolved_against(&self, base: &Path) -> Self {
        let resolve = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                base.join(p)
            }
        };
        Self {
            name: self.name.clone(),
            geometry: resolve(&self.geometry),
            materials: resolve(&self.materials),
        }
    }
}
