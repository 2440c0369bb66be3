//! CPU-side vertex data for upload.

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Vec3};
use modelview_assets::ModelData;
use modelview_common::Transform;
use modelview_scene::{GridHelper, Scene};

/// Most directional lights the mesh shader evaluates.
pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LightingUniform {
    pub ambient: [f32; 4],
    pub directions: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    pub colors: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    pub count: [u32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct GridVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl LightingUniform {
    /// Pack the scene's lights. Directional lights past the shader limit
    /// are dropped with a warning.
    pub fn from_scene(scene: &Scene) -> Self {
        let mut lighting = Self::zeroed();
        lighting.ambient = scene.ambient().to_rgba(1.0);

        let mut count = 0;
        for (direction, color) in scene.directional_lights() {
            if count == MAX_DIRECTIONAL_LIGHTS {
                tracing::warn!(
                    max = MAX_DIRECTIONAL_LIGHTS,
                    "too many directional lights, extra lights ignored"
                );
                break;
            }
            lighting.directions[count] = direction.extend(0.0).to_array();
            lighting.colors[count] = color.to_rgba(1.0);
            count += 1;
        }
        lighting.count[0] = count as u32;
        lighting
    }
}

/// Flatten a model into one vertex/index list, transform baked in.
///
/// Each part's vertices carry its material's diffuse color.
pub fn model_vertices(model: &ModelData, transform: &Transform) -> (Vec<MeshVertex>, Vec<u32>) {
    let matrix = transform.matrix();
    let normal_matrix = Mat3::from_mat4(matrix).inverse().transpose();

    let mut vertices = Vec::with_capacity(model.vertex_count());
    let mut indices = Vec::with_capacity(model.triangle_count() * 3);

    for part in &model.parts {
        let base = vertices.len() as u32;
        let color = model.materials.diffuse_for(part.material).to_array();
        for (p, n) in part.positions.iter().zip(&part.normals) {
            let normal = (normal_matrix * Vec3::from_array(*n)).normalize_or_zero();
            vertices.push(MeshVertex {
                position: matrix.transform_point3(Vec3::from_array(*p)).to_array(),
                normal: normal.to_array(),
                color,
            });
        }
        indices.extend(part.indices.iter().map(|i| base + i));
    }
    (vertices, indices)
}

/// Line-list vertices for a grid helper.
pub fn grid_vertices(grid: &GridHelper, transform: &Transform) -> Vec<GridVertex> {
    let matrix = transform.matrix();
    grid.lines()
        .into_iter()
        .flat_map(|line| {
            let color = line.color.to_rgba(1.0);
            [line.start, line.end].map(|p| GridVertex {
                position: matrix.transform_point3(p).to_array(),
                color,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelview_assets::{MaterialSet, MeshPart};
    use modelview_common::Color;
    use modelview_scene::{Light, NodeKind, SceneNode};

    #[test]
    fn grid_has_two_vertices_per_line() {
        let grid = GridHelper::default();
        let verts = grid_vertices(&grid, &Transform::default());
        assert_eq!(verts.len(), grid.lines().len() * 2);
    }

    #[test]
    fn grid_follows_node_position() {
        let grid = GridHelper {
            size: 2.0,
            divisions: 1,
            ..GridHelper::default()
        };
        let t = Transform::from_position(Vec3::new(0.0, 5.0, 0.0));
        assert!(grid_vertices(&grid, &t).iter().all(|v| v.position[1] == 5.0));
    }

    fn triangle(name: &str) -> MeshPart {
        MeshPart {
            name: name.into(),
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            normals: vec![[0.0, 0.0, 1.0]; 3],
            indices: vec![0, 1, 2],
            material: None,
        }
    }

    #[test]
    fn model_parts_are_concatenated_with_offset_indices() {
        let model = ModelData {
            name: "two".into(),
            source: "two.obj".into(),
            parts: vec![triangle("a"), triangle("b")],
            materials: MaterialSet::new(),
        };
        let t = Transform::from_position(Vec3::new(10.0, 0.0, 0.0));
        let (verts, indices) = model_vertices(&model, &t);

        assert_eq!(verts.len(), 6);
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(verts[1].position, [11.0, 0.0, 0.0]);
        assert_eq!(verts[0].normal, [0.0, 0.0, 1.0]);
        assert_eq!(verts[0].color, MaterialSet::DEFAULT_DIFFUSE.to_array());
    }

    #[test]
    fn lighting_packs_directional_and_ambient() {
        let mut scene = Scene::new();
        scene.add(
            SceneNode::new("sun", NodeKind::Light(Light::directional(Color::WHITE)))
                .with_position(Vec3::new(0.0, 10.0, 0.0)),
        );
        scene.add(SceneNode::new(
            "fill",
            NodeKind::Light(Light::ambient(Color::from_hex(0x404040))),
        ));
        let lighting = LightingUniform::from_scene(&scene);
        assert_eq!(lighting.count[0], 1);
        assert_eq!(lighting.directions[0], [0.0, 1.0, 0.0, 0.0]);
        assert_eq!(lighting.colors[0], [1.0, 1.0, 1.0, 1.0]);
        assert!((lighting.ambient[0] - 64.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn lighting_caps_directional_count() {
        let mut scene = Scene::new();
        for i in 0..6 {
            scene.add(
                SceneNode::new(format!("l{i}"), NodeKind::Light(Light::directional(Color::WHITE)))
                    .with_position(Vec3::X),
            );
        }
        assert_eq!(
            LightingUniform::from_scene(&scene).count[0] as usize,
            MAX_DIRECTIONAL_LIGHTS
        );
    }
}
