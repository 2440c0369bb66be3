use glam::Vec3;
use modelview_common::ObjectId;
use modelview_scene::{Light, NodeKind, Scene};

/// Scene inspector for developer tooling.
///
/// Read-only queries against the scene graph, used by the CLI and the
/// desktop overlay.
pub struct SceneInspector;

impl SceneInspector {
    /// Count nodes by kind and total up model geometry.
    pub fn summary(scene: &Scene) -> SceneSummary {
        let mut summary = SceneSummary {
            nodes: scene.child_count(),
            revision: scene.revision(),
            ..SceneSummary::default()
        };
        for (_, node) in scene.children() {
            match &node.kind {
                NodeKind::Light(Light::Directional { .. }) => summary.directional_lights += 1,
                NodeKind::Light(Light::Ambient { .. }) => summary.ambient_lights += 1,
                NodeKind::Grid(_) => summary.grids += 1,
                NodeKind::Model(model) => {
                    summary.models += 1;
                    summary.vertices += model.vertex_count();
                    summary.triangles += model.triangle_count();
                }
            }
        }
        summary
    }

    /// Per-model statistics in scene insertion order.
    pub fn describe_models(scene: &Scene) -> Vec<ModelInfo> {
        scene
            .models()
            .map(|(id, node, model)| ModelInfo {
                id,
                name: node.name.clone(),
                parts: model.parts.len(),
                materials: model.materials.len(),
                vertices: model.vertex_count(),
                triangles: model.triangle_count(),
                bounds: model.bounds(),
            })
            .collect()
    }
}

/// Node and geometry counts for a scene.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneSummary {
    pub nodes: usize,
    pub revision: u64,
    pub directional_lights: usize,
    pub ambient_lights: usize,
    pub grids: usize,
    pub models: usize,
    pub vertices: usize,
    pub triangles: usize,
}

impl SceneSummary {
    pub fn lights(&self) -> usize {
        self.directional_lights + self.ambient_lights
    }
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: nodes={} lights={} grids={} models={} vertices={} triangles={}",
            self.nodes,
            self.lights(),
            self.grids,
            self.models,
            self.vertices,
            self.triangles
        )
    }
}

/// Statistics for one loaded model.
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub id: ObjectId,
    pub name: String,
    pub parts: usize,
    pub materials: usize,
    pub vertices: usize,
    pub triangles: usize,
    /// `(min, max)` in model space.
    pub bounds: (Vec3, Vec3),
}

impl std::fmt::Display for ModelInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (min, max) = self.bounds;
        write!(
            f,
            "Model [{}] {} parts={} materials={} vertices={} triangles={} bounds=({:.1}, {:.1}, {:.1})..({:.1}, {:.1}, {:.1})",
            self.id.short(),
            self.name,
            self.parts,
            self.materials,
            self.vertices,
            self.triangles,
            min.x,
            min.y,
            min.z,
            max.x,
            max.y,
            max.z,
        )
    }
}
