use crate::scene::NodeHandle;

/// Node property an animation track writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetPath {
    Translation, // transform.position
    Rotation,    // transform.rotation
    Scale,       // transform.scale
}

/// Maps track `track_index` of a clip onto a property of `node_handle`.
#[derive(Debug, Clone)]
pub struct PropertyBinding {
    pub track_index: usize,
    pub node_handle: NodeHandle,
    pub target: TargetPath,
}
