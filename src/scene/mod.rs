//! Scene Graph
//!
//! Manages the scene hierarchy and its components:
//! - [`Node`]: hierarchy + transform
//! - [`Transform`]: position, rotation, scale with cached matrices
//! - [`Scene`]: node, camera, light and mesh pools
//! - [`Camera`]: perspective intrinsics
//! - [`Light`]: directional and hemisphere lights
//! - [`Mesh`]: triangle geometry drawn by the renderer
//! - [`transform_system`]: world matrix propagation

pub mod camera;
pub mod light;
pub mod mesh;
pub mod node;
pub mod scene;
pub mod transform;
pub mod transform_system;

pub use camera::Camera;
pub use light::{Light, LightKind};
pub use mesh::{Mesh, Primitive};
pub use node::Node;
pub use scene::Scene;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct CameraKey;
    pub struct LightKey;
    pub struct MeshKey;
}
