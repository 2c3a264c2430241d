use crate::scene::{NodeHandle, Scene};

/// Something the render loop advances by the frame delta.
///
/// [`AnimationMixer`](super::AnimationMixer) is the stock implementation;
/// tests and hosts can register their own.
pub trait AnimationPlayer {
    /// Advances by `dt` seconds and writes the resulting pose into `scene`.
    fn advance(&mut self, dt: f32, scene: &mut Scene);

    /// Scene node this player animates, used to dispose of the player when
    /// the node is removed.
    fn root(&self) -> Option<NodeHandle> {
        None
    }
}
