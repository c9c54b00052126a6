#![forbid(unsafe_code)]

//! Per-surface paint pacing.
//!
//! A surface paints on a tick only when its target interval has elapsed
//! since the previous paint and it is either dirty or in continuous mode.
//! In continuous mode the achieved frame rate is recomputed about once per
//! second from a rolling paint counter.

use std::time::Duration;

use hgrid_core::SurfaceConfig;

const FPS_WINDOW: Duration = Duration::from_secs(1);

/// Outcome of a pacing check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaceDecision {
    /// Rate is 0; the surface never paints from the loop.
    Disabled,
    /// Nothing to paint: not dirty and not continuous.
    Idle,
    /// The interval since the last paint has not elapsed yet.
    TooSoon,
    Paint,
}

/// Paint timing state for one surface.
#[derive(Debug, Clone, Default)]
pub struct FramePacer {
    last_paint: Duration,
    paint_count: u32,
    last_fps_compute: Duration,
    fps: f64,
}

impl FramePacer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether to paint at `now`.
    #[must_use]
    pub fn decide(&self, now: Duration, dirty: bool, config: &SurfaceConfig) -> PaceDecision {
        let Some(interval) = config.paint_interval() else {
            return PaceDecision::Disabled;
        };
        if !(config.continuous_repaint || dirty) {
            return PaceDecision::Idle;
        }
        if now.saturating_sub(self.last_paint) > interval {
            PaceDecision::Paint
        } else {
            PaceDecision::TooSoon
        }
    }

    /// Record a loop-driven paint at `now`.
    pub fn record_paint(&mut self, now: Duration, config: &SurfaceConfig) {
        self.last_paint = now;
        if !config.continuous_repaint {
            return;
        }
        self.paint_count += 1;
        let window = now.saturating_sub(self.last_fps_compute);
        if window >= FPS_WINDOW {
            self.fps = f64::from(self.paint_count) / window.as_secs_f64();
            self.paint_count = 0;
            self.last_fps_compute = now;
        }
    }

    /// Achieved frames per second, as of the last full window.
    #[inline]
    #[must_use]
    pub const fn current_fps(&self) -> f64 {
        self.fps
    }

    #[inline]
    #[must_use]
    pub const fn last_paint(&self) -> Duration {
        self.last_paint
    }
}
