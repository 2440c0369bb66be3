use std::collections::BTreeMap;

use glam::Vec3;
use modelview_assets::ModelData;
use modelview_common::{Color, ObjectId, Transform};

use crate::grid::GridHelper;
use crate::light::Light;

/// What a scene node carries.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Light(Light),
    Grid(GridHelper),
    Model(ModelData),
}

/// A direct child of the scene root.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub kind: NodeKind,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            kind,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn as_model(&self) -> Option<&ModelData> {
        match &self.kind {
            NodeKind::Model(m) => Some(m),
            _ => None,
        }
    }
}

/// The scene graph root.
///
/// Nodes are kept in a BTreeMap keyed by id; `order` remembers insertion
/// order so iteration is stable between runs.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: BTreeMap<ObjectId, SceneNode>,
    order: Vec<ObjectId>,
    revision: u64,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Incremented on every add/remove.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Add a node. Returns its id.
    pub fn add(&mut self, node: SceneNode) -> ObjectId {
        let id = ObjectId::new();
        tracing::debug!(id = %id.short(), name = %node.name, "scene add");
        self.nodes.insert(id, node);
        self.order.push(id);
        self.revision += 1;
        id
    }

    /// Remove a node. Returns it if it existed.
    pub fn remove(&mut self, id: ObjectId) -> Option<SceneNode> {
        let node = self.nodes.remove(&id)?;
        self.order.retain(|o| *o != id);
        self.revision += 1;
        Some(node)
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// All children in insertion order.
    pub fn children(&self) -> impl Iterator<Item = (ObjectId, &SceneNode)> {
        self.order
            .iter()
            .filter_map(|id| self.nodes.get(id).map(|n| (*id, n)))
    }

    pub fn models(&self) -> impl Iterator<Item = (ObjectId, &SceneNode, &ModelData)> {
        self.children()
            .filter_map(|(id, node)| node.as_model().map(|m| (id, node, m)))
    }

    pub fn grids(&self) -> impl Iterator<Item = (&SceneNode, &GridHelper)> {
        self.children().filter_map(|(_, node)| match &node.kind {
            NodeKind::Grid(g) => Some((node, g)),
            _ => None,
        })
    }

    /// Directional lights as `(direction towards the light, color * intensity)`.
    pub fn directional_lights(&self) -> impl Iterator<Item = (Vec3, Color)> {
        self.children().filter_map(|(_, node)| match node.kind {
            NodeKind::Light(light @ Light::Directional { .. }) => Some((
                node.transform
                    .position
                    .try_normalize()
                    .unwrap_or(Vec3::Y),
                light.radiance(),
            )),
            _ => None,
        })
    }

    /// Sum of all ambient lights.
    pub fn ambient(&self) -> Color {
        self.children()
            .filter_map(|(_, node)| match node.kind {
                NodeKind::Light(light @ Light::Ambient { .. }) => Some(light.radiance()),
                _ => None,
            })
            .fold(Color::BLACK, |acc, c| {
                Color::rgb(acc.r + c.r, acc.g + c.g, acc.b + c.b)
            })
    }
}
