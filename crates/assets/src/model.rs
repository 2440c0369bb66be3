use std::path::{Path, PathBuf};

use glam::Vec3;

use crate::error::AssetError;
use crate::material::MaterialSet;

/// One indexed triangle list sharing a single material.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshPart {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    /// Index into the owning model's [`MaterialSet`].
    pub material: Option<usize>,
}

impl MeshPart {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn from_tobj(model: tobj::Model) -> Self {
        let mesh = model.mesh;
        let positions: Vec<[f32; 3]> = mesh
            .positions
            .chunks_exact(3)
            .map(|p| [p[0], p[1], p[2]])
            .collect();
        let normals = if mesh.normals.len() == mesh.positions.len() {
            mesh.normals
                .chunks_exact(3)
                .map(|n| [n[0], n[1], n[2]])
                .collect()
        } else {
            smooth_normals(&positions, &mesh.indices)
        };
        Self {
            name: model.name,
            positions,
            normals,
            indices: mesh.indices,
            material: mesh.material_id,
        }
    }
}

/// A loaded model: geometry parts plus the material set attached at load time.
#[derive(Debug, Clone)]
pub struct ModelData {
    pub name: String,
    pub source: PathBuf,
    pub parts: Vec<MeshPart>,
    pub materials: MaterialSet,
}

impl ModelData {
    pub(crate) fn from_tobj(
        name: &str,
        source: &Path,
        models: Vec<tobj::Model>,
        materials: MaterialSet,
    ) -> Result<Self, AssetError> {
        let parts: Vec<MeshPart> = models
            .into_iter()
            .map(MeshPart::from_tobj)
            .filter(|part| part.triangle_count() > 0)
            .collect();
        if parts.is_empty() {
            return Err(AssetError::EmptyGeometry(source.to_path_buf()));
        }
        Ok(Self {
            name: name.to_string(),
            source: source.to_path_buf(),
            parts,
            materials,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.parts.iter().map(|p| p.positions.len()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.parts.iter().map(MeshPart::triangle_count).sum()
    }

    /// Axis-aligned bounds over all parts as `(min, max)`.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for p in self.parts.iter().flat_map(|part| &part.positions) {
            let v = Vec3::from_array(*p);
            min = min.min(v);
            max = max.max(v);
        }
        (min, max)
    }
}

/// Area-weighted vertex normals for meshes that ship without `vn` data.
fn smooth_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut acc = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let pa = Vec3::from_array(positions[a]);
        let pb = Vec3::from_array(positions[b]);
        let pc = Vec3::from_array(positions[c]);
        let face = (pb - pa).cross(pc - pa);
        acc[a] += face;
        acc[b] += face;
        acc[c] += face;
    }
    acc.into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smooth_normals_of_flat_quad_point_up() {
        let positions = [
            [0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
            [1.0, 0.0, 0.0],
        ];
        let indices = [0, 1, 2, 0, 2, 3];
        for n in smooth_normals(&positions, &indices) {
            assert!((Vec3::from_array(n) - Vec3::Y).length() < 1e-6);
        }
    }

    #[test]
    fn isolated_vertex_gets_fallback_normal() {
        let positions = [[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [5.0; 3]];
        let normals = smooth_normals(&positions, &[0, 1, 2]);
        assert_eq!(normals[3], [0.0, 1.0, 0.0]);
        assert_eq!(normals[0], [0.0, 0.0, 1.0]);
    }

    #[test]
    fn empty_models_are_rejected() {
        let err = ModelData::from_tobj("x", Path::new("x.obj"), Vec::new(), MaterialSet::new())
            .unwrap_err();
        assert!(matches!(err, AssetError::EmptyGeometry(_)));
    }
}
