//! Render Loop Tests
//!
//! Tests for:
//! - FrameClock first-tick and clamping behavior
//! - One render per tick
//! - Every active player receives the same delta each tick
//! - Asset events drained at the start of a tick
//! - Resize forwarding

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;

use skyscroll::animation::AnimationPlayer;
use skyscroll::assets::{AssetEvent, AssetSpec, ModelPrefab};
use skyscroll::config::ShowcaseConfig;
use skyscroll::context::ShowcaseContext;
use skyscroll::errors::{Result, SkyscrollError};
use skyscroll::render::{FrameClock, RenderLoop, SceneRenderer};
use skyscroll::scene::{Camera, NodeHandle, Scene};

const EPSILON: f32 = 1e-6;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

// ============================================================================
// Test doubles
// ============================================================================

#[derive(Default)]
struct CountingRenderer {
    renders: usize,
    nodes_seen: Vec<usize>,
    sizes: Vec<(u32, u32)>,
    fail: bool,
}

impl SceneRenderer for CountingRenderer {
    fn render(&mut self, scene: &Scene, _camera: &Camera) -> Result<()> {
        self.renders += 1;
        self.nodes_seen.push(scene.node_count());
        if self.fail {
            return Err(SkyscrollError::Surface("device lost".into()));
        }
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.sizes.push((width, height));
    }
}

struct RecordingPlayer {
    deltas: Rc<RefCell<Vec<f32>>>,
}

impl AnimationPlayer for RecordingPlayer {
    fn advance(&mut self, dt: f32, _scene: &mut Scene) {
        self.deltas.borrow_mut().push(dt);
    }
}

/// Moves a node along +X at one unit per second.
struct DriftPlayer {
    node: NodeHandle,
}

impl AnimationPlayer for DriftPlayer {
    fn advance(&mut self, dt: f32, scene: &mut Scene) {
        if let Some(node) = scene.get_node_mut(self.node) {
            node.transform.position.x += dt;
        }
    }

    fn root(&self) -> Option<NodeHandle> {
        Some(self.node)
    }
}

fn context() -> ShowcaseContext {
    ShowcaseContext::bootstrap(&ShowcaseConfig::default(), 800, 600).expect("bootstrap")
}

fn recorder(ctx: &mut ShowcaseContext) -> Rc<RefCell<Vec<f32>>> {
    let deltas = Rc::new(RefCell::new(Vec::new()));
    ctx.add_player(Box::new(RecordingPlayer {
        deltas: deltas.clone(),
    }));
    deltas
}

// ============================================================================
// FrameClock
// ============================================================================

#[test]
fn clock_first_tick_is_zero() {
    let mut clock = FrameClock::new(1.0 / 30.0);
    assert_eq!(clock.tick(), 0.0);
    assert_eq!(clock.frame_count, 1);
}

#[test]
fn clock_clamps_large_deltas() {
    let mut clock = FrameClock::new(0.1);
    assert!(approx(clock.advance(0.05), 0.05));
    assert!(approx(clock.advance(2.0), 0.1));
    assert!(approx(clock.delta, 0.1));
}

#[test]
fn clock_ignores_negative_and_non_finite() {
    let mut clock = FrameClock::default();
    assert_eq!(clock.advance(-1.0), 0.0);
    assert_eq!(clock.advance(f32::NAN), 0.0);
    assert_eq!(clock.advance(f32::INFINITY), 0.0);
    assert_eq!(clock.elapsed.as_secs_f32(), 0.0);
}

#[test]
fn clock_without_limit() {
    let mut clock = FrameClock::new(0.0);
    assert_eq!(clock.max_delta(), f32::INFINITY);
    assert!(approx(clock.advance(5.0), 5.0));
}

#[test]
fn clock_elapsed_accumulates() {
    let mut clock = FrameClock::new(1.0);
    clock.advance(0.25);
    clock.advance(0.5);
    assert!((clock.elapsed.as_secs_f32() - 0.75).abs() < 1e-4);
    assert_eq!(clock.frame_count, 2);
}

// ============================================================================
// RenderLoop
// ============================================================================

#[test]
fn one_render_per_tick() {
    let mut ctx = context();
    let mut render_loop = RenderLoop::new(CountingRenderer::default(), 1.0 / 30.0);

    for _ in 0..5 {
        render_loop.tick_with_delta(&mut ctx, 0.016);
    }

    assert_eq!(render_loop.renderer().renders, 5);
    assert_eq!(render_loop.frame_count(), 5);
}

#[test]
fn players_receive_each_tick_delta() {
    let mut ctx = context();
    let first = recorder(&mut ctx);
    let second = recorder(&mut ctx);
    let mut render_loop = RenderLoop::new(CountingRenderer::default(), 1.0);

    let deltas = [0.016, 0.033, 0.0, 0.25];
    for dt in deltas {
        render_loop.tick_with_delta(&mut ctx, dt);
    }

    assert_eq!(*first.borrow(), deltas.to_vec());
    assert_eq!(*second.borrow(), deltas.to_vec());
}

#[test]
fn players_receive_clamped_delta() {
    let mut ctx = context();
    let deltas = recorder(&mut ctx);
    let mut render_loop = RenderLoop::new(CountingRenderer::default(), 0.05);

    let applied = render_loop.tick_with_delta(&mut ctx, 3.0);

    assert!(approx(applied, 0.05));
    assert_eq!(*deltas.borrow(), vec![applied]);
}

#[test]
fn wall_clock_tick_starts_at_zero() {
    let mut ctx = context();
    let deltas = recorder(&mut ctx);
    let mut render_loop = RenderLoop::new(CountingRenderer::default(), 1.0 / 30.0);

    render_loop.tick(&mut ctx);
    render_loop.tick(&mut ctx);

    let deltas = deltas.borrow();
    assert_eq!(deltas.len(), 2);
    assert_eq!(deltas[0], 0.0);
    assert!(deltas[1] >= 0.0 && deltas[1] <= 1.0 / 30.0);
}

#[test]
fn render_errors_do_not_stop_the_loop() {
    let mut ctx = context();
    let renderer = CountingRenderer {
        fail: true,
        ..CountingRenderer::default()
    };
    let mut render_loop = RenderLoop::new(renderer, 1.0 / 30.0);

    render_loop.tick_with_delta(&mut ctx, 0.016);
    render_loop.tick_with_delta(&mut ctx, 0.016);

    assert_eq!(render_loop.renderer().renders, 2);
    assert_eq!(render_loop.frame_count(), 2);
}

#[test]
fn tick_without_camera_skips_render() {
    let mut ctx = context();
    let camera = ctx.camera_node();
    ctx.scene_mut().remove_node(camera);
    let mut render_loop = RenderLoop::new(CountingRenderer::default(), 1.0 / 30.0);

    render_loop.tick_with_delta(&mut ctx, 0.016);

    assert_eq!(render_loop.renderer().renders, 0);
    assert_eq!(render_loop.frame_count(), 1);
}

#[test]
fn player_writes_are_propagated_before_render() {
    let mut ctx = context();
    let node = ctx.scene_mut().create_node_with_name("drifter");
    ctx.add_player(Box::new(DriftPlayer { node }));
    let mut render_loop = RenderLoop::new(CountingRenderer::default(), 1.0);

    render_loop.tick_with_delta(&mut ctx, 0.5);
    render_loop.tick_with_delta(&mut ctx, 0.25);

    let world = ctx.scene().get_node(node).expect("node").world_matrix().translation;
    assert!((world.x - 0.75).abs() < 1e-5, "got {world:?}");
}

#[test]
fn removed_model_player_is_disposed() {
    let mut ctx = context();
    let node = ctx.scene_mut().create_node_with_name("drifter");
    ctx.add_player(Box::new(DriftPlayer { node }));
    let deltas = recorder(&mut ctx);
    assert_eq!(ctx.player_count(), 2);

    ctx.remove_asset(node);
    assert_eq!(ctx.player_count(), 1);

    let mut render_loop = RenderLoop::new(CountingRenderer::default(), 1.0);
    render_loop.tick_with_delta(&mut ctx, 0.1);
    assert_eq!(deltas.borrow().len(), 1);
}

#[test]
fn asset_events_drain_before_render() {
    let mut ctx = context();
    let (tx, rx) = flume::unbounded();
    ctx.listen(rx);
    let baseline = ctx.scene().node_count();

    let mut prefab = ModelPrefab::new("bird");
    prefab.nodes.push(skyscroll::assets::PrefabNode::new("body"));
    prefab.roots.push(0);
    tx.send(AssetEvent::Ready {
        spec: AssetSpec::new("bird.glb", Vec3::new(1.0, 2.0, 3.0), 0.5),
        prefab,
    })
    .expect("receiver alive");

    let mut render_loop = RenderLoop::new(CountingRenderer::default(), 1.0 / 30.0);
    render_loop.tick_with_delta(&mut ctx, 0.016);

    assert_eq!(render_loop.renderer().nodes_seen, vec![baseline + 2]);
    assert_eq!(ctx.models().len(), 1);
}

#[test]
fn resize_is_forwarded_to_renderer() {
    let mut render_loop = RenderLoop::new(CountingRenderer::default(), 1.0 / 30.0);
    render_loop.resize(1024, 768);
    render_loop.renderer_mut().resize(1, 1);

    assert_eq!(render_loop.renderer().sizes, vec![(1024, 768), (1, 1)]);
}
