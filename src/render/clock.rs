#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Frame timer producing the per-tick delta.
///
/// The first tick reports a zero delta. Deltas above `max_delta` are clamped
/// so a stalled tab or a breakpoint does not fast-forward every animation.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_tick: Option<Instant>,
    max_delta: f32,
    /// Delta in seconds reported by the most recent tick.
    pub delta: f32,
    /// Sum of all reported deltas.
    pub elapsed: Duration,
    pub frame_count: u64,
}

impl FrameClock {
    /// `max_delta` is in seconds. Non-positive or non-finite values disable
    /// clamping.
    #[must_use]
    pub fn new(max_delta: f32) -> Self {
        let max_delta = if max_delta.is_finite() && max_delta > 0.0 {
            max_delta
        } else {
            f32::INFINITY
        };
        Self {
            last_tick: None,
            max_delta,
            delta: 0.0,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Samples the wall clock and returns the clamped delta in seconds.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let raw = self
            .last_tick
            .map_or(0.0, |last| now.saturating_duration_since(last).as_secs_f32());
        self.last_tick = Some(now);
        self.record(raw)
    }

    /// Advances by an externally measured delta in seconds instead of the
    /// wall clock. Negative and non-finite deltas count as zero.
    pub fn advance(&mut self, dt: f32) -> f32 {
        let raw = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.record(raw)
    }

    fn record(&mut self, raw: f32) -> f32 {
        let delta = raw.min(self.max_delta);
        if delta < raw {
            log::debug!("Frame delta {raw:.3}s clamped to {delta:.3}s");
        }
        self.delta = delta;
        self.elapsed = self.elapsed.saturating_add(Duration::from_secs_f32(delta));
        self.frame_count += 1;
        delta
    }

    #[must_use]
    pub fn max_delta(&self) -> f32 {
        self.max_delta
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(1.0 / 30.0)
    }
}
