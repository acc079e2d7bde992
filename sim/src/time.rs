//! Frame pacing.
//!
//! The host calls [`FrameLimiter::advance`] from every display callback. Callbacks that
//! arrive sooner than the target interval are skipped, and an executed step covers the
//! real time since the previous executed step, clamped to `max_dt`. Missed time is
//! dropped, never replayed.

use crate::config::TickSettings;
use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
pub struct FrameLimiter {
    interval: Duration,
    max_dt: f32,
    last: Option<Instant>,
}

impl FrameLimiter {
    pub fn new(settings: &TickSettings) -> Self {
        Self {
            interval: Duration::from_secs_f32(settings.target_interval_s()),
            max_dt: settings.max_dt_s,
            last: None,
        }
    }

    /// Step length to simulate at `now`, or `None` to skip this callback.
    ///
    /// The first call only starts the clock.
    pub fn advance(&mut self, now: Instant) -> Option<f32> {
        let Some(last) = self.last else {
            self.last = Some(now);
            return None;
        };
        let elapsed = now.saturating_duration_since(last);
        if elapsed < self.interval {
            return None;
        }
        self.last = Some(now);
        Some(elapsed.as_secs_f32().min(self.max_dt))
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
