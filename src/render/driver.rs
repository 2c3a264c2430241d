use crate::context::ShowcaseContext;
use crate::render::{FrameClock, SceneRenderer};

/// Per-frame driver.
///
/// Each tick drains finished asset loads into the scene, advances every
/// active animation player by the same delta, propagates transforms and
/// issues exactly one render.
pub struct RenderLoop<R: SceneRenderer> {
    renderer: R,
    clock: FrameClock,
    frames: u64,
}

impl<R: SceneRenderer> RenderLoop<R> {
    #[must_use]
    pub fn new(renderer: R, max_frame_delta: f32) -> Self {
        Self {
            renderer,
            clock: FrameClock::new(max_frame_delta),
            frames: 0,
        }
    }

    /// Ticks with the wall-clock delta since the previous tick. Returns the
    /// delta handed to the players.
    pub fn tick(&mut self, ctx: &mut ShowcaseContext) -> f32 {
        let dt = self.clock.tick();
        self.step(ctx, dt);
        dt
    }

    /// Ticks with an externally measured delta in seconds, subject to the
    /// same clamping as [`tick`](Self::tick).
    pub fn tick_with_delta(&mut self, ctx: &mut ShowcaseContext, dt: f32) -> f32 {
        let dt = self.clock.advance(dt);
        self.step(ctx, dt);
        dt
    }

    fn step(&mut self, ctx: &mut ShowcaseContext, dt: f32) {
        ctx.drain_asset_events();
        ctx.advance_players(dt);

        ctx.scene_mut().update();
        let scene = ctx.scene();

        match scene.main_camera() {
            Some(camera) => {
                if let Err(e) = self.renderer.render(scene, camera) {
                    log::error!("Render error: {e}");
                }
            }
            None => log::warn!("No active camera, frame skipped"),
        }
        self.frames += 1;
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.renderer.resize(width, height);
    }

    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    #[must_use]
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}
