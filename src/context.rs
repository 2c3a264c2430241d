//! Showcase state
//!
//! [`ShowcaseContext`] owns everything the frame loop, the scroll handler and
//! the asset coordinator share: the scene graph, the camera node, the pose
//! sequencer and the active animation players. It is built once by
//! [`ShowcaseContext::bootstrap`] and passed by reference to each of them.

use glam::Vec3;

use crate::animation::{AnimationMixer, AnimationPlayer};
use crate::assets::{AssetEvent, AssetSpec, ModelPrefab};
use crate::config::ShowcaseConfig;
use crate::errors::{Result, SkyscrollError};
use crate::scene::light::color_from_hex;
use crate::scene::{Camera, Light, NodeHandle, Scene};
use crate::sequencer::{CameraPose, PoseSequencer};

pub struct ShowcaseContext {
    scene: Scene,
    camera_node: NodeHandle,
    sequencer: PoseSequencer,
    players: Vec<Box<dyn AnimationPlayer>>,
    models: Vec<NodeHandle>,
    failed: Vec<String>,
    events: Option<flume::Receiver<AssetEvent>>,
    progress: f32,
    viewport: (u32, u32),
}

impl ShowcaseContext {
    /// Builds the scene, camera and lights for a `width` x `height`
    /// container.
    ///
    /// Fails fast on an invalid configuration or a container without area.
    pub fn bootstrap(config: &ShowcaseConfig, width: u32, height: u32) -> Result<Self> {
        config.validate()?;
        if width == 0 || height == 0 {
            return Err(SkyscrollError::MissingContainer(format!(
                "container has no area ({width}x{height})"
            )));
        }
        let sequencer = config.sequencer()?;

        let mut scene = Scene::new();
        scene.background = color_from_hex(config.background);

        let cam = &config.camera;
        let aspect = width as f32 / height as f32;
        let camera_node = scene.add_camera(Camera::new_perspective(cam.fov, aspect, cam.near, cam.far));
        if let Some(node) = scene.get_node_mut(camera_node) {
            node.transform.position = cam.position;
            node.transform
                .set_rotation_euler(cam.rotation.x, cam.rotation.y, cam.rotation.z);
        }
        scene.active_camera = Some(camera_node);

        if let Some(light) = &config.lights.directional {
            let node = scene.add_light(Light::new_directional(
                color_from_hex(light.color),
                light.intensity,
            ));
            if let Some(node) = scene.get_node_mut(node) {
                node.transform.position = light.position;
                node.transform.rotate_y(light.rotation_y);
            }
        }
        if let Some(light) = &config.lights.hemisphere {
            scene.add_light(Light::new_hemisphere(
                color_from_hex(light.sky_color),
                color_from_hex(light.ground_color),
                light.intensity,
            ));
        }

        scene.update();

        log::info!(
            "Showcase ready: {width}x{height}, {} keyframes, {} lights",
            sequencer.keyframes().len(),
            scene.lights.len()
        );

        Ok(Self {
            scene,
            camera_node,
            sequencer,
            players: Vec::new(),
            models: Vec::new(),
            failed: Vec::new(),
            events: None,
            progress: 0.0,
            viewport: (width, height),
        })
    }

    // ========================================================================
    // Scroll / resize
    // ========================================================================

    /// Moves the camera to the pose for scroll progress `t`, overwriting
    /// whatever pose was set before.
    pub fn apply_scroll(&mut self, t: f32) -> Option<CameraPose> {
        self.progress = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        self.sequencer
            .apply(self.progress, &mut self.scene, self.camera_node)
    }

    /// Syncs the camera aspect ratio to new container dimensions. Zero-sized
    /// dimensions are ignored and return `false`.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.viewport = (width, height);
        let aspect = width as f32 / height as f32;
        if let Some((_, camera)) = self.scene.query_main_camera_bundle() {
            camera.set_aspect(aspect);
        }
        true
    }

    // ========================================================================
    // Assets
    // ========================================================================

    /// Subscribes to load outcomes. They are applied by
    /// [`drain_asset_events`](Self::drain_asset_events).
    pub fn listen(&mut self, events: flume::Receiver<AssetEvent>) {
        self.events = Some(events);
    }

    /// Applies every load outcome received so far. Returns how many were
    /// handled.
    pub fn drain_asset_events(&mut self) -> usize {
        let Some(events) = &self.events else {
            return 0;
        };
        let pending: Vec<AssetEvent> = events.try_iter().collect();
        let count = pending.len();
        for event in pending {
            self.handle_asset_event(event);
        }
        count
    }

    pub fn handle_asset_event(&mut self, event: AssetEvent) {
        match event {
            AssetEvent::Ready { spec, prefab } => {
                self.on_asset_ready(&spec, &prefab);
            }
            AssetEvent::Failed { spec, error } => self.on_asset_failed(&spec, &error),
        }
    }

    /// Adds a loaded model to the scene at its configured placement and, when
    /// it carries animation clips, starts its first clip on a new player.
    pub fn on_asset_ready(&mut self, spec: &AssetSpec, prefab: &ModelPrefab) -> NodeHandle {
        let root = self.scene.instantiate(prefab);
        if let Some(node) = self.scene.get_node_mut(root) {
            node.transform.position = spec.position;
            node.transform.scale = Vec3::splat(spec.scale);
        }

        if let Some(clip) = prefab.clips.first() {
            let mut mixer = AnimationMixer::new(root);
            let action = mixer.clip_action(clip.clone(), &self.scene);
            mixer.play(action);
            self.players.push(Box::new(mixer));
        }

        self.models.push(root);
        log::info!(
            "Asset '{}' ready: {} nodes, {} clips",
            spec.locator,
            prefab.nodes.len(),
            prefab.clips.len()
        );
        root
    }

    pub fn on_asset_failed(&mut self, spec: &AssetSpec, error: &SkyscrollError) {
        log::warn!("Asset '{}' skipped: {error}", spec.locator);
        self.failed.push(spec.locator.clone());
    }

    /// Removes a model subtree and disposes of the players bound to it.
    pub fn remove_asset(&mut self, root: NodeHandle) {
        self.scene.remove_node(root);
        self.players.retain(|p| p.root() != Some(root));
        self.models.retain(|&m| m != root);
    }

    // ========================================================================
    // Players
    // ========================================================================

    pub fn add_player(&mut self, player: Box<dyn AnimationPlayer>) {
        self.players.push(player);
    }

    /// Advances every active player by the same `dt`.
    pub fn advance_players(&mut self, dt: f32) {
        for player in &mut self.players {
            player.advance(dt, &mut self.scene);
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[inline]
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    #[must_use]
    pub fn camera_node(&self) -> NodeHandle {
        self.camera_node
    }

    #[must_use]
    pub fn camera(&self) -> Option<&Camera> {
        self.scene.main_camera()
    }

    #[must_use]
    pub fn sequencer(&self) -> &PoseSequencer {
        &self.sequencer
    }

    /// Last scroll progress applied.
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    #[must_use]
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Roots of the models added so far, in arrival order.
    #[must_use]
    pub fn models(&self) -> &[NodeHandle] {
        &self.models
    }

    /// Locators whose loads failed for good.
    #[must_use]
    pub fn failed_assets(&self) -> &[String] {
        &self.failed
    }
}
