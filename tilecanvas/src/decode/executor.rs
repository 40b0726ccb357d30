//! Decode executor interface.

use super::{DecodeEventSender, DecodeJob};

/// Accepts batches of pending tiles and decodes them off the render path.
///
/// Implementations must:
/// - skip jobs whose tile is already decoding (re-submission of the
///   current visible set every cycle is expected and must be idempotent);
/// - report progress through [`DecodeEvent`](super::DecodeEvent)s on the
///   supplied channel;
/// - abandon, not apply, work that completes after [`cancel`](Self::cancel).
pub trait DecodeExecutor: Send {
    /// Queues a batch of decode jobs. Returns immediately.
    fn queue(&mut self, batch: Vec<DecodeJob>, events: DecodeEventSender);

    /// Interrupts in-flight and queued decode work. A later
    /// [`queue`](Self::queue) call starts fresh.
    fn cancel(&mut self);
}
