use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::animation::AnimationClip;
use crate::scene::Mesh;

/// Prefab node: plain data, children referenced by index.
#[derive(Debug, Clone)]
pub struct PrefabNode {
    pub name: String,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    /// Indices into [`ModelPrefab::nodes`].
    pub children: Vec<usize>,
    pub mesh: Option<Arc<Mesh>>,
}

impl PrefabNode {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            children: Vec::new(),
            mesh: None,
        }
    }
}

/// Loader output: a node hierarchy with its meshes, plus animation clips.
///
/// Thread-safe pure data holding no scene handles. [`Scene::instantiate`]
/// turns it into scene nodes.
///
/// [`Scene::instantiate`]: crate::scene::Scene::instantiate
#[derive(Debug, Clone, Default)]
pub struct ModelPrefab {
    pub name: String,
    /// Flattened node storage.
    pub nodes: Vec<PrefabNode>,
    /// Indices of the top-level nodes.
    pub roots: Vec<usize>,
    pub clips: Vec<Arc<AnimationClip>>,
}

impl ModelPrefab {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_animated(&self) -> bool {
        !self.clips.is_empty()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.nodes
            .iter()
            .filter_map(|n| n.mesh.as_deref())
            .map(Mesh::triangle_count)
            .sum()
    }
}
