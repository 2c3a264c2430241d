use std::borrow::Cow;

use glam::Affine3A;

use crate::scene::transform::Transform;
use crate::scene::{CameraKey, LightKey, MeshKey, NodeHandle};

/// A scene node: hierarchy, transform and optional component keys.
///
/// Camera, light and mesh data live in the [`Scene`](crate::scene::Scene) pools;
/// the node only stores the key.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: Cow<'static, str>,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub transform: Transform,
    pub visible: bool,

    pub camera: Option<CameraKey>,
    pub light: Option<LightKey>,
    pub mesh: Option<MeshKey>,
}

impl Node {
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: Cow::Borrowed("Node"),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            visible: true,
            camera: None,
            light: None,
            mesh: None,
        }
    }

    #[must_use]
    pub fn with_name(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            ..Self::new()
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}
