//! Completion events from decode workers.

use tokio::sync::mpsc;

use super::DecodeError;
use crate::tile::{PixelData, TileCoord};

/// Event reported by the decode executor to the render orchestrator.
///
/// Events travel over a single-consumer channel drained synchronously by
/// the orchestrator's step function; workers never mutate orchestrator
/// state directly. Tile completions may arrive in any order.
#[derive(Debug)]
pub enum DecodeEvent {
    /// A batch of decode work has started.
    BatchStarted,

    /// One tile's pixel data is ready.
    TileDecoded {
        coord: TileCoord,
        pixels: PixelData,
    },

    /// One tile's decode failed. The batch keeps going.
    TileFailed {
        coord: TileCoord,
        error: DecodeError,
    },

    /// The batch was cancelled before finishing; remaining work was
    /// abandoned.
    BatchCancelled,

    /// Every job in the batch has finished or failed.
    BatchCompleted,
}

/// Sending half handed to the executor with each batch.
pub type DecodeEventSender = mpsc::UnboundedSender<DecodeEvent>;

/// Receiving half owned by the orchestrator.
pub type DecodeEventReceiver = mpsc::UnboundedReceiver<DecodeEvent>;
