//! Transform System
//!
//! Propagates local matrices down the hierarchy into world matrices. Borrows
//! only the node and camera pools so the scene can be updated without
//! holding `&mut Scene`.

use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::camera::Camera;
use crate::scene::node::Node;
use crate::scene::{CameraKey, NodeHandle};

/// Updates world matrices for every node reachable from `roots`.
///
/// Uses an explicit stack instead of recursion. A node's world matrix is
/// recomputed when its own TRS changed or when any ancestor's did; cameras
/// attached to a recomputed node get their view matrix refreshed.
pub fn update_hierarchy(
    nodes: &mut SlotMap<NodeHandle, Node>,
    cameras: &mut SlotMap<CameraKey, Camera>,
    roots: &[NodeHandle],
) {
    // (node, parent world matrix, parent changed)
    let mut stack: Vec<(NodeHandle, Affine3A, bool)> = Vec::with_capacity(64);

    for &root in roots.iter().rev() {
        stack.push((root, Affine3A::IDENTITY, false));
    }

    while let Some((handle, parent_world, parent_changed)) = stack.pop() {
        let Some(node) = nodes.get_mut(handle) else {
            continue;
        };

        let local_changed = node.transform.update_local_matrix();
        let changed = local_changed || parent_changed;

        if changed {
            let world = parent_world * *node.transform.local_matrix();
            node.transform.set_world_matrix(world);

            if let Some(camera) = node.camera.and_then(|key| cameras.get_mut(key)) {
                camera.update_view(&world);
            }
        }

        let world = node.transform.world_matrix;
        for &child in node.children.iter().rev() {
            stack.push((child, world, changed));
        }
    }
}
