//! Skyscroll
//!
//! A scroll-driven 3D showcase: a fixed list of camera waypoints is bound to
//! the page's scroll progress, a handful of animated glTF models pop into the
//! scene as they finish loading, and a per-frame loop advances their
//! animation players and issues one render per display refresh.
//!
//! # Layout
//!
//! - [`sequencer`]: scroll progress → camera pose
//! - [`render`]: the per-frame driver, the frame clock and the renderer seam
//! - [`assets`]: model readers, the glTF loader and the load coordinator
//! - [`animation`]: keyframe tracks, clips and the mixers that play them
//! - [`scene`]: the scene graph the renderer reads
//! - [`context`]: the state shared by all of the above, built once at startup
//! - [`app`]: winit / browser host integration
//!
//! # Example
//!
//! ```rust,ignore
//! use skyscroll::prelude::*;
//!
//! fn main() -> skyscroll::Result<()> {
//!     env_logger::init();
//!     App::new()
//!         .with_title("Skyscroll")
//!         .with_config(ShowcaseConfig::default())
//!         .run()
//! }
//! ```

pub mod animation;
pub mod app;
pub mod assets;
pub mod config;
pub mod context;
pub mod errors;
pub mod render;
pub mod scene;
pub mod sequencer;

pub use errors::{Result, SkyscrollError};

#[cfg(all(target_arch = "wasm32", not(feature = "http")))]
compile_error!("the web build fetches assets over HTTP; enable the `http` feature");

pub mod prelude {
    pub use crate::animation::{AnimationAction, AnimationClip, AnimationMixer, AnimationPlayer};
    pub use crate::app::App;
    pub use crate::assets::{AssetLoadCoordinator, AssetSpec, ModelPrefab, ModelSource};
    #[cfg(feature = "gltf")]
    pub use crate::assets::GltfSource;
    pub use crate::config::ShowcaseConfig;
    pub use crate::context::ShowcaseContext;
    pub use crate::errors::{Result, SkyscrollError};
    pub use crate::render::{FrameClock, RenderLoop, SceneRenderer};
    pub use crate::scene::{Camera, Light, NodeHandle, Scene};
    pub use crate::sequencer::{CameraPose, Ease, Keyframe, PoseSequencer, ScrollRegion};
    pub use glam::{Quat, Vec3};
}
