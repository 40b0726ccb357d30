//! Render orchestrator configuration.

use std::time::Duration;

use crate::tile::DEFAULT_TRANSITION_DURATION;

/// Default delay between a render request and the cycle it triggers.
/// Bursts of requests inside the window collapse into one cycle.
pub const DEFAULT_RENDER_THROTTLE: Duration = Duration::from_millis(250);

/// A short throttle for hosts that re-render every frame anyway.
pub const FAST_RENDER_THROTTLE: Duration = Duration::from_millis(15);

/// Configuration for a [`TileRenderer`](super::TileRenderer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// Whether newly decoded tiles cross-fade in.
    pub transitions_enabled: bool,
    /// Cross-fade duration for newly decoded tiles.
    pub transition_duration: Duration,
    /// Render request coalescing window.
    pub render_throttle: Duration,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            transitions_enabled: true,
            transition_duration: DEFAULT_TRANSITION_DURATION,
            render_throttle: DEFAULT_RENDER_THROTTLE,
        }
    }
}
