use serde::{Deserialize, Serialize};

/// A scrollable page section whose traversal maps to progress `0..=1`.
///
/// Progress is `0` when the top of the region meets the top of the viewport
/// and `1` when its bottom meets the bottom of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollRegion {
    /// Document offset of the region's top edge.
    pub top: f32,
    pub height: f32,
}

impl ScrollRegion {
    #[must_use]
    pub fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }

    /// Distance the viewport travels between progress `0` and `1`.
    #[must_use]
    pub fn travel(&self, viewport_height: f32) -> f32 {
        (self.height - viewport_height).max(0.0)
    }

    /// Progress for a document scroll offset, clamped to `0..=1`.
    ///
    /// A region no taller than the viewport has no travel and reports `0`
    /// until it is scrolled past its top, then `1`.
    #[must_use]
    pub fn progress(&self, scroll_offset: f32, viewport_height: f32) -> f32 {
        let travel = self.travel(viewport_height);
        let scrolled = scroll_offset - self.top;
        if scrolled.is_nan() {
            return 0.0;
        }
        if travel <= 0.0 {
            return if scrolled > 0.0 { 1.0 } else { 0.0 };
        }
        (scrolled / travel).clamp(0.0, 1.0)
    }

    /// Progress from a viewport-relative bounding rect, as reported by the
    /// browser for the scrolled element.
    #[must_use]
    pub fn progress_from_rect(rect_top: f32, rect_height: f32, viewport_height: f32) -> f32 {
        Self::new(rect_top, rect_height).progress(0.0, viewport_height)
    }
}
