use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::scene::Transform;

/// One camera waypoint on the scroll path.
///
/// `rotation` holds intrinsic XYZ Euler angles in radians. When `look_at`
/// is set the camera aims at that point for the whole segment that ends at
/// this keyframe, and the Euler angles are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default)]
    pub look_at: Option<Vec3>,
}

impl Keyframe {
    #[must_use]
    pub fn new(position: Vec3, rotation: Vec3) -> Self {
        Self {
            position,
            rotation,
            look_at: None,
        }
    }

    #[must_use]
    pub fn with_look_at(mut self, target: Vec3) -> Self {
        self.look_at = Some(target);
        self
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.rotation.is_finite()
            && self.look_at.is_none_or(Vec3::is_finite)
    }

    /// The exact pose of this keyframe.
    #[must_use]
    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.position,
            rotation: aim(self.position, self.look_at, self.rotation),
            look_at: self.look_at,
        }
    }
}

/// Camera position and orientation produced by the sequencer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub rotation: Quat,
    /// Aim point in effect, if the governing keyframe has one.
    pub look_at: Option<Vec3>,
}

impl CameraPose {
    /// Overwrites the camera node's position and rotation.
    pub fn apply_to(&self, transform: &mut Transform) {
        transform.position = self.position;
        transform.rotation = self.rotation;
    }
}

#[inline]
fn euler_to_quat(euler: Vec3) -> Quat {
    Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z)
}

// Orientation at `position`: aimed at `look_at` when set and not degenerate,
// otherwise the Euler fallback.
pub(crate) fn aim(position: Vec3, look_at: Option<Vec3>, euler: Vec3) -> Quat {
    look_at
        .and_then(|target| Transform::look_rotation(position, target, Vec3::Y))
        .unwrap_or_else(|| euler_to_quat(euler))
}
