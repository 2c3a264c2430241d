use std::borrow::Cow;

use std::sync::Arc;

use glam::{Affine3A, Vec3};
use slotmap::SlotMap;

use crate::assets::ModelPrefab;
use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::mesh::Mesh;
use crate::scene::node::Node;
use crate::scene::transform::Transform;
use crate::scene::transform_system;
use crate::scene::{CameraKey, LightKey, MeshKey, NodeHandle};

/// Scene graph.
///
/// Pure data: node hierarchy plus camera, light and mesh pools. Renderers read it,
/// the animation players and the pose sequencer write node transforms.
pub struct Scene {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,

    pub cameras: SlotMap<CameraKey, Camera>,
    pub lights: SlotMap<LightKey, Light>,
    pub meshes: SlotMap<MeshKey, Arc<Mesh>>,

    /// Clear color (linear RGB).
    pub background: Vec3,

    pub active_camera: Option<NodeHandle>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            cameras: SlotMap::with_key(),
            lights: SlotMap::with_key(),
            meshes: SlotMap::with_key(),
            background: Vec3::ZERO,
            active_camera: None,
        }
    }

    /// Adds a node at the root of the scene.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    pub fn create_node_with_name(&mut self, name: impl Into<Cow<'static, str>>) -> NodeHandle {
        self.add_node(Node::with_name(name))
    }

    /// Adds a camera on a new root node.
    pub fn add_camera(&mut self, camera: Camera) -> NodeHandle {
        let key = self.cameras.insert(camera);
        let mut node = Node::with_name("Camera");
        node.camera = Some(key);
        self.add_node(node)
    }

    /// Adds a light on a new root node.
    pub fn add_light(&mut self, light: Light) -> NodeHandle {
        let key = self.lights.insert(light);
        let mut node = Node::with_name("Light");
        node.light = Some(key);
        self.add_node(node)
    }

    /// Attaches `mesh` to `node`, replacing any mesh it had.
    pub fn set_mesh(&mut self, node: NodeHandle, mesh: Arc<Mesh>) {
        let Some(n) = self.nodes.get_mut(node) else {
            return;
        };
        if let Some(old) = n.mesh.take() {
            self.meshes.remove(old);
        }
        n.mesh = Some(self.meshes.insert(mesh));
    }

    /// Re-parents `child` under `parent`, detaching it from its previous
    /// parent or from the root list.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself");
            return;
        }
        if !self.nodes.contains_key(parent) {
            log::error!("Parent node not found during attach");
            return;
        }

        let old_parent = self.nodes.get(child).and_then(|n| n.parent);
        if let Some(p) = old_parent {
            if let Some(n) = self.nodes.get_mut(p)
                && let Some(i) = n.children.iter().position(|&x| x == child)
            {
                n.children.remove(i);
            }
        } else if let Some(i) = self.root_nodes.iter().position(|&x| x == child) {
            self.root_nodes.remove(i);
        }

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
            c.transform.mark_dirty();
        }
    }

    /// Removes a node and its whole subtree, including camera, light and
    /// mesh components.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        let Some(node) = self.nodes.get(handle) else {
            return;
        };
        let parent = node.parent;

        if let Some(p) = parent {
            if let Some(parent_node) = self.nodes.get_mut(p)
                && let Some(i) = parent_node.children.iter().position(|&x| x == handle)
            {
                parent_node.children.remove(i);
            }
        } else if let Some(i) = self.root_nodes.iter().position(|&x| x == handle) {
            self.root_nodes.remove(i);
        }

        let mut stack = vec![handle];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.remove(current) else {
                continue;
            };
            if let Some(key) = node.camera {
                self.cameras.remove(key);
            }
            if let Some(key) = node.light {
                self.lights.remove(key);
            }
            if let Some(key) = node.mesh {
                self.meshes.remove(key);
            }
            if self.active_camera == Some(current) {
                self.active_camera = None;
            }
            stack.extend(node.children);
        }
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth-first search for a node named `name` in the subtree of `root`.
    #[must_use]
    pub fn find_node_by_name(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            if node.name == name {
                return Some(current);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// Builds scene nodes for every prefab node under a fresh root named after
    /// the prefab. Returns the new root.
    pub fn instantiate(&mut self, prefab: &ModelPrefab) -> NodeHandle {
        let root = self.create_node_with_name(prefab.name.clone());

        let handles: Vec<NodeHandle> = prefab
            .nodes
            .iter()
            .map(|p| {
                let mut node = Node::with_name(p.name.clone());
                node.transform = Transform::from_trs(p.translation, p.rotation, p.scale);
                node.mesh = p.mesh.clone().map(|mesh| self.meshes.insert(mesh));
                self.nodes.insert(node)
            })
            .collect();

        for (index, p) in prefab.nodes.iter().enumerate() {
            for &child in &p.children {
                if let Some(&child_handle) = handles.get(child) {
                    self.link(child_handle, handles[index]);
                }
            }
        }
        for &index in &prefab.roots {
            if let Some(&handle) = handles.get(index) {
                self.link(handle, root);
            }
        }

        root
    }

    // Parent link for freshly inserted nodes that are not in the root list.
    fn link(&mut self, child: NodeHandle, parent: NodeHandle) {
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    /// Visits every mesh on a visible path from the roots with its node's
    /// world matrix. A hidden node hides its whole subtree.
    pub fn for_each_visible_mesh(&self, mut visit: impl FnMut(&Arc<Mesh>, &Affine3A)) {
        let mut stack: Vec<NodeHandle> = self.root_nodes.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            if !node.visible {
                continue;
            }
            if let Some(mesh) = node.mesh.and_then(|key| self.meshes.get(key)) {
                visit(mesh, node.world_matrix());
            }
            stack.extend(node.children.iter().rev().copied());
        }
    }

    /// Returns the active camera's transform and camera component.
    pub fn query_main_camera_bundle(&mut self) -> Option<(&mut Transform, &mut Camera)> {
        let node = self.nodes.get_mut(self.active_camera?)?;
        let camera = self.cameras.get_mut(node.camera?)?;
        Some((&mut node.transform, camera))
    }

    /// Returns the active camera component.
    #[must_use]
    pub fn main_camera(&self) -> Option<&Camera> {
        let node = self.nodes.get(self.active_camera?)?;
        self.cameras.get(node.camera?)
    }

    /// Propagates transforms into world matrices and refreshes camera views.
    pub fn update(&mut self) {
        transform_system::update_hierarchy(&mut self.nodes, &mut self.cameras, &self.root_nodes);
    }
}
