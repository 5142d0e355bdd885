//! Heartbeat configuration for the limbic runtime
//!
//! The heartbeat feeds wall-clock time into a character as soft-decay scene
//! steps, so affect keeps relaxing between interactions.

use anima_core::DecayMode;
use std::time::Duration;

/// Configuration for the limbic heartbeat
#[derive(Debug, Clone, PartialEq)]
pub struct HeartbeatConfig {
    /// How often to tick. `None` disables the heartbeat; time then only
    /// passes through explicit scene steps.
    pub interval: Option<Duration>,
    pub decay_mode: DecayMode,
    /// Scene seconds per wall-clock second.
    pub time_scale: f64,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self::manual()
    }
}

impl HeartbeatConfig {
    /// No background ticking
    pub fn manual() -> Self {
        Self {
            interval: None,
            decay_mode: DecayMode::SoftDecay,
            time_scale: 1.0,
        }
    }

    /// One tick per second at real time
    pub fn realtime() -> Self {
        Self {
            interval: Some(Duration::from_secs(1)),
            ..Self::manual()
        }
    }

    /// Very fast heartbeat for testing
    pub fn testing() -> Self {
        Self {
            interval: Some(Duration::from_millis(10)),
            ..Self::manual()
        }
    }

    pub fn with_time_scale(mut self, time_scale: f64) -> Self {
        self.time_scale = time_scale;
        self
    }

    /// Scene time corresponding to `wall` elapsed.
    pub fn scene_elapsed(&self, wall: Duration) -> Duration {
        Duration::try_from_secs_f64(wall.as_secs_f64() * self.time_scale).unwrap_or(Duration::ZERO)
    }
}
