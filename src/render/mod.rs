//! Rendering
//!
//! - [`SceneRenderer`]: the drawing collaborator, one call per frame
//! - [`FrameClock`]: per-tick delta with clamping
//! - [`RenderLoop`]: advances animation players and renders once per tick
//! - [`SurfaceRenderer`]: wgpu forward pass drawing the scene's meshes
//! - [`draw`]: draw list and uniform data the forward pass uploads

mod clock;
pub mod draw;
mod driver;
mod surface;

pub use clock::FrameClock;
pub use driver::RenderLoop;
pub use surface::SurfaceRenderer;

use crate::errors::Result;
use crate::scene::{Camera, Scene};

/// Draws the scene graph from a camera.
pub trait SceneRenderer {
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<()>;

    /// Resizes the drawing surface. Zero dimensions are ignored.
    fn resize(&mut self, width: u32, height: u32);
}

impl<R: SceneRenderer + ?Sized> SceneRenderer for Box<R> {
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<()> {
        (**self).render(scene, camera)
    }

    fn resize(&mut self, width: u32, height: u32) {
        (**self).resize(width, height);
    }
}
