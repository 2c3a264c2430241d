use crate::animation::binding::PropertyBinding;
use crate::animation::clip::AnimationClip;
use crate::scene::{NodeHandle, Scene};

pub struct Binder;

impl Binder {
    /// Resolves each track of `clip` to a node in the subtree of `root` by
    /// node name. Tracks whose node cannot be found are skipped.
    #[must_use]
    pub fn bind(scene: &Scene, root: NodeHandle, clip: &AnimationClip) -> Vec<PropertyBinding> {
        let mut bindings = Vec::with_capacity(clip.tracks.len());

        for (track_index, track) in clip.tracks.iter().enumerate() {
            if let Some(node_handle) = scene.find_node_by_name(root, &track.meta.node_name) {
                bindings.push(PropertyBinding {
                    track_index,
                    node_handle,
                    target: track.meta.target,
                });
            } else {
                log::debug!(
                    "Clip '{}': no node named '{}', track skipped",
                    clip.name,
                    track.meta.node_name
                );
            }
        }

        bindings
    }
}
