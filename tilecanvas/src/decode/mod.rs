//! Asynchronous tile decoding.
//!
//! The render orchestrator never decodes pixels itself. It hands a batch
//! of [`DecodeJob`]s to a [`DecodeExecutor`] together with a completion
//! channel, and keeps going; workers report back through
//! [`DecodeEvent`]s which the orchestrator drains on its own thread.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     TileRenderer                            │
//! │   queue(batch) ──►                  ◄── drain DecodeEvents  │
//! └─────────────────────────────────────────────────────────────┘
//!                  │                        ▲
//!                  ▼                        │ unbounded channel
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  TokioDecodeExecutor                        │
//! │  in-flight dedup · CancellationToken · spawn_blocking       │
//! └─────────────────────────────────────────────────────────────┘
//!                  │
//!                  ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   PixelProvider                             │
//! │        fetch(&DecodeJob) -> Result<RgbaImage, _>            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Re-submitting a tile that is already decoding is a no-op, and a
//! completion that arrives after cancellation is abandoned rather than
//! applied.

mod error;
mod events;
mod executor;
mod job;
mod pool;
mod provider;

pub use error::DecodeError;
pub use events::{DecodeEvent, DecodeEventReceiver, DecodeEventSender};
pub use executor::DecodeExecutor;
pub use job::DecodeJob;
pub use pool::TokioDecodeExecutor;
pub use provider::PixelProvider;
