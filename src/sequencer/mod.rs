//! Scroll-driven camera path
//!
//! Maps a normalized scroll progress in `[0, 1]` onto an ordered list of
//! [`Keyframe`]s split into equal-length segments. Position is interpolated
//! linearly. Orientation follows the keyframe that ends the current segment:
//! while the camera travels toward a keyframe it aims at that keyframe's
//! `look_at` target, and without one it interpolates Euler angles.
//!
//! A keyframe's aim point therefore holds on arrival, so `pose(1.0)` agrees
//! with the poses just before it. Orientation may still turn abruptly when
//! the camera leaves a keyframe for a segment with a different aim point.
//! Position is always continuous.

mod ease;
mod keyframe;
mod scroll;

pub use ease::Ease;
pub use keyframe::{CameraPose, Keyframe};
pub use scroll::ScrollRegion;

use glam::Vec3;

use crate::errors::{Result, SkyscrollError};
use crate::scene::{NodeHandle, Scene};
use keyframe::aim;

/// Segment index and raw (un-eased) fraction for a progress value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentPosition {
    pub index: usize,
    pub fraction: f32,
}

#[derive(Debug, Clone)]
pub struct PoseSequencer {
    keyframes: Vec<Keyframe>,
    ease: Ease,
}

impl PoseSequencer {
    /// Fails with [`SkyscrollError::TooFewKeyframes`] for fewer than two
    /// keyframes and with [`SkyscrollError::InvalidConfig`] when a keyframe
    /// holds a non-finite value.
    pub fn new(keyframes: Vec<Keyframe>, ease: Ease) -> Result<Self> {
        if keyframes.len() < 2 {
            return Err(SkyscrollError::TooFewKeyframes {
                count: keyframes.len(),
            });
        }
        if let Some(index) = keyframes.iter().position(|k| !k.is_finite()) {
            return Err(SkyscrollError::InvalidConfig(format!(
                "keyframe {index} has a non-finite component"
            )));
        }
        Ok(Self { keyframes, ease })
    }

    #[must_use]
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    #[must_use]
    pub fn ease(&self) -> Ease {
        self.ease
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.keyframes.len() - 1
    }

    /// Locates `t` on the path. Out-of-range and NaN inputs are clamped,
    /// with NaN treated as `0`.
    #[must_use]
    pub fn segment_at(&self, t: f32) -> SegmentPosition {
        let segments = self.segment_count();
        let t = clamp_progress(t);
        if t >= 1.0 {
            return SegmentPosition {
                index: segments - 1,
                fraction: 1.0,
            };
        }

        #[allow(clippy::cast_precision_loss)]
        let scaled = t * segments as f32;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let index = (scaled.floor() as usize).min(segments - 1);
        #[allow(clippy::cast_precision_loss)]
        let fraction = (scaled - index as f32).clamp(0.0, 1.0);
        SegmentPosition { index, fraction }
    }

    /// Camera pose at progress `t`.
    ///
    /// `pose(0.0)` is exactly the first keyframe and `pose(1.0)` exactly the
    /// last.
    #[must_use]
    pub fn pose(&self, t: f32) -> CameraPose {
        let t = clamp_progress(t);
        if t <= 0.0 {
            return self.keyframes[0].pose();
        }
        if t >= 1.0 {
            return self.keyframes[self.keyframes.len() - 1].pose();
        }

        let SegmentPosition { index, fraction } = self.segment_at(t);
        let from = &self.keyframes[index];
        let to = &self.keyframes[index + 1];
        let eased = self.ease.apply(fraction);

        let position = from.position.lerp(to.position, eased);
        let rotation = aim(
            position,
            to.look_at,
            from.rotation.lerp(to.rotation, eased),
        );

        CameraPose {
            position,
            rotation,
            look_at: to.look_at,
        }
    }

    /// Aim point in effect at `t`, if any.
    #[must_use]
    pub fn look_at_at(&self, t: f32) -> Option<Vec3> {
        self.pose(t).look_at
    }

    /// Writes `pose(t)` into the transform of `camera_node`. Returns the
    /// applied pose, or `None` when the node no longer exists.
    pub fn apply(&self, t: f32, scene: &mut Scene, camera_node: NodeHandle) -> Option<CameraPose> {
        let pose = self.pose(t);
        let node = scene.get_node_mut(camera_node)?;
        pose.apply_to(&mut node.transform);
        Some(pose)
    }
}

fn clamp_progress(t: f32) -> f32 {
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
}
