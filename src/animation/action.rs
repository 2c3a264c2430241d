use std::sync::Arc;

use crate::animation::binding::{PropertyBinding, TargetPath};
use crate::animation::clip::{AnimationClip, TrackData};
use crate::animation::tracks::KeyframeCursor;
use crate::scene::Scene;

/// Looping playback of one clip over its resolved node bindings.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    playing: bool,

    pub bindings: Vec<PropertyBinding>,

    track_cursors: Vec<KeyframeCursor>,
}

impl AnimationAction {
    /// Creates a stopped action. Call [`play`](Self::play) to start it.
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let track_count = clip.tracks.len();
        Self {
            clip,
            time: 0.0,
            playing: false,
            bindings: Vec::new(),
            track_cursors: vec![KeyframeCursor::default(); track_count],
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    /// Stops the action and rewinds it.
    pub fn stop(&mut self) {
        self.playing = false;
        self.time = 0.0;
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Advances local time by `dt`, wrapping at the clip duration.
    pub fn update(&mut self, dt: f32) {
        let duration = self.clip.duration;
        if !self.playing || duration <= 0.0 || !dt.is_finite() {
            return;
        }
        self.time = (self.time + dt).rem_euclid(duration);
    }

    /// Samples every bound track at the current time and writes the values
    /// into the scene.
    pub fn apply(&mut self, scene: &mut Scene) {
        for binding in &self.bindings {
            let Some(track) = self.clip.tracks.get(binding.track_index) else {
                continue;
            };
            let Some(cursor) = self.track_cursors.get_mut(binding.track_index) else {
                continue;
            };
            let Some(node) = scene.get_node_mut(binding.node_handle) else {
                continue;
            };

            match (&track.data, binding.target) {
                (TrackData::Vector3(t), TargetPath::Translation) => {
                    if let Some(value) = t.sample_with_cursor(self.time, cursor) {
                        node.transform.position = value;
                    }
                }
                (TrackData::Vector3(t), TargetPath::Scale) => {
                    if let Some(value) = t.sample_with_cursor(self.time, cursor) {
                        node.transform.scale = value;
                    }
                }
                (TrackData::Quaternion(t), TargetPath::Rotation) => {
                    if let Some(value) = t.sample_with_cursor(self.time, cursor) {
                        node.transform.rotation = value;
                    }
                }
                _ => {}
            }
        }
    }
}
