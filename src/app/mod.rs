//! Winit host
//!
//! [`App`] configures and launches the showcase. The internal runner
//! implements winit's `ApplicationHandler`: it bootstraps the
//! [`ShowcaseContext`] once the window exists, starts the asset loads,
//! brings up the wgpu surface and then ticks the [`RenderLoop`] on every
//! redraw.
//!
//! Scroll input comes from the mouse wheel on native windows and from the
//! page's scroll events in the browser.
//!
//! ```rust,ignore
//! use skyscroll::prelude::*;
//!
//! fn main() -> skyscroll::Result<()> {
//!     App::new().with_config(ShowcaseConfig::default()).run()
//! }
//! ```

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

#[cfg(feature = "gltf")]
use crate::assets::{AssetLoadCoordinator, GltfSource, spawn_load};
use crate::config::ShowcaseConfig;
use crate::context::ShowcaseContext;
use crate::errors::{Result, SkyscrollError};
use crate::render::{RenderLoop, SurfaceRenderer};

#[cfg(not(target_arch = "wasm32"))]
mod wheel;
#[cfg(not(target_arch = "wasm32"))]
pub use wheel::VirtualScroll;

#[cfg(target_arch = "wasm32")]
mod web;
#[cfg(target_arch = "wasm32")]
pub use web::{PageScroll, page_href};

/// Application builder.
pub struct App {
    title: Option<String>,
    config: ShowcaseConfig,
    #[cfg(target_arch = "wasm32")]
    canvas_id: Option<String>,
}

impl App {
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: None,
            config: ShowcaseConfig::default(),
            #[cfg(target_arch = "wasm32")]
            canvas_id: None,
        }
    }

    /// Overrides the configured window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: ShowcaseConfig) -> Self {
        self.config = config;
        self
    }

    /// HTML canvas element to render into (WASM only).
    #[cfg(target_arch = "wasm32")]
    #[must_use]
    pub fn with_canvas_id(mut self, id: impl Into<String>) -> Self {
        self.canvas_id = Some(id.into());
        self
    }

    /// Runs the showcase until the window closes.
    ///
    /// Startup errors (invalid configuration, no window, no GPU surface) are
    /// returned once the event loop exits.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn run(self) -> Result<()> {
        self.config.validate()?;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let title = self.title.unwrap_or_else(|| self.config.title.clone());
        let mut runner = ShowcaseApp::new(self.config, title);
        event_loop.run_app(&mut runner)?;

        match runner.fatal.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Spawns the event loop on the browser's animation frames and returns.
    #[cfg(target_arch = "wasm32")]
    pub fn run(self) -> Result<()> {
        use winit::platform::web::EventLoopExtWebSys;

        self.config.validate()?;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let title = self.title.unwrap_or_else(|| self.config.title.clone());
        let mut runner = ShowcaseApp::new(self.config, title);
        runner.canvas_id = self.canvas_id;
        event_loop.spawn_app(runner);
        Ok(())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
type PendingRenderer = std::rc::Rc<std::cell::RefCell<Option<Result<SurfaceRenderer>>>>;

struct ShowcaseApp {
    config: ShowcaseConfig,
    title: String,

    window: Option<Arc<Window>>,
    context: Option<ShowcaseContext>,
    render_loop: Option<RenderLoop<SurfaceRenderer>>,
    #[cfg_attr(target_arch = "wasm32", allow(dead_code))]
    fatal: Option<SkyscrollError>,

    #[cfg(not(target_arch = "wasm32"))]
    scroll: Option<VirtualScroll>,

    #[cfg(target_arch = "wasm32")]
    canvas_id: Option<String>,
    #[cfg(target_arch = "wasm32")]
    scroll: Option<PageScroll>,
    #[cfg(target_arch = "wasm32")]
    pending_renderer: PendingRenderer,
}

impl ShowcaseApp {
    fn new(config: ShowcaseConfig, title: String) -> Self {
        Self {
            config,
            title,
            window: None,
            context: None,
            render_loop: None,
            fatal: None,
            scroll: None,
            #[cfg(target_arch = "wasm32")]
            canvas_id: None,
            #[cfg(target_arch = "wasm32")]
            pending_renderer: PendingRenderer::default(),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: SkyscrollError) {
        log::error!("Fatal startup error: {error}");
        self.fatal = Some(error);
        event_loop.exit();
    }

    /// Issues every configured load; outcomes land in the context's queue.
    #[cfg(feature = "gltf")]
    fn start_asset_loads(&self, context: &mut ShowcaseContext) {
        let source = match GltfSource::from_root(&self.config.asset_root) {
            Ok(source) => source,
            Err(e) => {
                log::error!("No models will load: {e}");
                return;
            }
        };
        let coordinator = AssetLoadCoordinator::new(source, self.config.load_retries);
        context.listen(coordinator.events());
        let issued = coordinator.issue_all(&self.config.assets, spawn_load);
        log::info!("Issued {issued} asset loads");
    }

    #[cfg(not(feature = "gltf"))]
    fn start_asset_loads(&self, _context: &mut ShowcaseContext) {
        log::warn!("Built without the `gltf` feature, {} models skipped", self.config.assets.len());
    }

    fn redraw(&mut self) {
        let (Some(context), Some(render_loop)) = (&mut self.context, &mut self.render_loop) else {
            return;
        };

        #[cfg(target_arch = "wasm32")]
        if let Some(progress) = self.scroll.as_ref().and_then(PageScroll::take_progress) {
            context.apply_scroll(progress);
        }

        render_loop.tick(context);
    }

    fn resize(&mut self, width: u32, height: u32) {
        let Some(context) = &mut self.context else {
            return;
        };
        if !context.resize(width, height) {
            return;
        }
        if let Some(render_loop) = &mut self.render_loop {
            render_loop.resize(width, height);
        }

        #[cfg(not(target_arch = "wasm32"))]
        if let Some(scroll) = &mut self.scroll {
            scroll.resize(height as f32);
            context.apply_scroll(scroll.progress());
        }
        #[cfg(target_arch = "wasm32")]
        if let Some(scroll) = &self.scroll {
            scroll.refresh();
        }
    }

    // Picks up the renderer once its async initialization has finished.
    #[cfg(target_arch = "wasm32")]
    fn poll_pending_renderer(&mut self, event_loop: &ActiveEventLoop) {
        if self.render_loop.is_some() {
            return;
        }
        let ready = match self.pending_renderer.try_borrow_mut() {
            Ok(mut pending) => pending.take(),
            Err(_) => return,
        };
        match ready {
            Some(Ok(renderer)) => {
                let mut render_loop = RenderLoop::new(renderer, self.config.max_frame_delta);
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    render_loop.resize(size.width, size.height);
                }
                self.render_loop = Some(render_loop);
                log::info!("Renderer ready, starting render loop");
            }
            Some(Err(e)) => self.fail(event_loop, e),
            None => {}
        }
    }
}

impl ApplicationHandler for ShowcaseApp {
    #[cfg(not(target_arch = "wasm32"))]
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(1280.0, 720.0));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(event_loop, SkyscrollError::MissingContainer(e.to_string()));
                return;
            }
        };
        self.window = Some(window.clone());

        let size = window.inner_size();
        let mut context = match ShowcaseContext::bootstrap(&self.config, size.width, size.height) {
            Ok(context) => context,
            Err(e) => {
                self.fail(event_loop, e);
                return;
            }
        };
        self.start_asset_loads(&mut context);

        log::info!("Initializing renderer backend...");
        let renderer = match pollster::block_on(SurfaceRenderer::new(
            window.clone(),
            size.width,
            size.height,
        )) {
            Ok(renderer) => renderer,
            Err(e) => {
                self.fail(event_loop, e);
                return;
            }
        };

        let scroll = VirtualScroll::new(
            size.height as f32,
            self.config.virtual_page_height,
            self.config.wheel_line_height,
        );
        context.apply_scroll(scroll.progress());

        self.scroll = Some(scroll);
        self.context = Some(context);
        self.render_loop = Some(RenderLoop::new(renderer, self.config.max_frame_delta));
    }

    #[cfg(target_arch = "wasm32")]
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        use wasm_bindgen::JsCast;
        use winit::platform::web::WindowAttributesExtWebSys;

        if self.window.is_some() {
            return;
        }

        let canvas_id = self.canvas_id.as_deref().unwrap_or("skyscroll-canvas");
        let canvas = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(canvas_id))
            .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok());
        let Some(canvas) = canvas else {
            self.fail(
                event_loop,
                SkyscrollError::MissingContainer(format!("canvas '#{canvas_id}' not found")),
            );
            return;
        };

        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let width = (f64::from(canvas.client_width()) * dpr) as u32;
        let height = (f64::from(canvas.client_height()) * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let attributes = Window::default_attributes()
            .with_title(&self.title)
            .with_canvas(Some(canvas));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(event_loop, SkyscrollError::MissingContainer(e.to_string()));
                return;
            }
        };
        self.window = Some(window.clone());

        let mut context = match ShowcaseContext::bootstrap(&self.config, width, height) {
            Ok(context) => context,
            Err(e) => {
                self.fail(event_loop, e);
                return;
            }
        };
        self.start_asset_loads(&mut context);

        match PageScroll::attach(&self.config.scroll_selector) {
            Ok(scroll) => {
                if let Some(progress) = scroll.take_progress() {
                    context.apply_scroll(progress);
                }
                self.scroll = Some(scroll);
            }
            Err(e) => {
                self.fail(event_loop, e);
                return;
            }
        }
        self.context = Some(context);

        log::info!("Initializing WebGPU renderer backend...");
        let pending = self.pending_renderer.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = SurfaceRenderer::new(window.clone(), width.max(1), height.max(1)).await;
            *pending.borrow_mut() = Some(result);
            window.request_redraw();
        });
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        #[cfg(target_arch = "wasm32")]
        self.poll_pending_renderer(event_loop);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            #[cfg(not(target_arch = "wasm32"))]
            WindowEvent::MouseWheel { delta, .. } => {
                if let (Some(scroll), Some(context)) = (&mut self.scroll, &mut self.context) {
                    context.apply_scroll(scroll.on_wheel(delta));
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.render_loop.is_some()
            && let Some(window) = &self.window
        {
            window.request_redraw();
        }
    }
}
