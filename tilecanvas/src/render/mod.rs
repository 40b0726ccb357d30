//! Render orchestration.
//!
//! [`TileRenderer`] owns the active detail level, the set of tiles in the
//! current viewport, and the previous level's decoded tiles retained for
//! cross-fade. One render cycle runs request → compute-state → diff →
//! enqueue-decode → draw → reconcile-invalidate:
//!
//! ```text
//! IDLE ──request──► REQUESTED (throttle armed)
//!                       │ throttle fires
//!                       ▼
//!                  COMPUTING (snapshot + tile-set diff)
//!                       │ new tiles
//!                       ▼
//!                  DECODING (executor batch, completions drained)
//!                       │ draw passes
//!                       ▼
//!                  DRAWING ──dirty──► DRAWING
//!                       │ two consecutive clean passes
//!                       ▼
//!                  settled (IDLE) or re-armed (REQUESTED)
//! ```
//!
//! All state mutation happens on the caller's thread through the
//! [`pump`](TileRenderer::pump) / [`draw`](TileRenderer::draw) step
//! functions; decode workers only ever talk back over the completion
//! channel.

mod config;
mod listener;
mod orchestrator;
mod region;
mod throttle;

pub use config::{RenderConfig, DEFAULT_RENDER_THROTTLE, FAST_RENDER_THROTTLE};
pub use listener::{NullRenderListener, RenderListener};
pub use orchestrator::TileRenderer;
pub use region::OpaqueRegion;
pub use throttle::RenderThrottle;
