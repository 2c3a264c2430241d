use winit::event::MouseScrollDelta;

use crate::sequencer::ScrollRegion;

/// Mouse-wheel stand-in for page scrolling on native windows.
///
/// The window is treated as the viewport of a page `page_height` viewports
/// tall; the wheel moves the scroll offset through it.
#[derive(Debug, Clone)]
pub struct VirtualScroll {
    offset: f32,
    viewport_height: f32,
    page_height: f32,
    line_height: f32,
}

impl VirtualScroll {
    #[must_use]
    pub fn new(viewport_height: f32, page_height: f32, line_height: f32) -> Self {
        Self {
            offset: 0.0,
            viewport_height,
            page_height: page_height.max(1.0),
            line_height,
        }
    }

    fn region(&self) -> ScrollRegion {
        ScrollRegion::new(0.0, self.viewport_height * self.page_height)
    }

    #[must_use]
    pub fn progress(&self) -> f32 {
        self.region().progress(self.offset, self.viewport_height)
    }

    /// Applies a wheel event and returns the new progress.
    pub fn on_wheel(&mut self, delta: MouseScrollDelta) -> f32 {
        let pixels = match delta {
            MouseScrollDelta::LineDelta(_, y) => -y * self.line_height,
            MouseScrollDelta::PixelDelta(p) => -(p.y as f32),
        };
        let travel = self.region().travel(self.viewport_height);
        self.offset = (self.offset + pixels).clamp(0.0, travel);
        self.progress()
    }

    /// Keeps the progress unchanged across a viewport resize.
    pub fn resize(&mut self, viewport_height: f32) {
        let progress = self.progress();
        self.viewport_height = viewport_height;
        self.offset = progress * self.region().travel(viewport_height);
    }
}
