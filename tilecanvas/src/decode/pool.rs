//! Tokio-backed decode executor.

use std::sync::Arc;

use dashmap::DashSet;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::{DecodeError, DecodeEvent, DecodeEventSender, DecodeExecutor, DecodeJob, PixelProvider};
use crate::tile::TileCoord;

/// Decode executor running [`PixelProvider::fetch`] on a tokio runtime's
/// blocking pool.
///
/// Each queued batch gets a supervisor task that fans out one worker per
/// tile and reports a terminal `BatchCompleted` or `BatchCancelled` once
/// all workers have drained. A shared in-flight set makes re-submission
/// of already-decoding tiles a no-op across batches.
pub struct TokioDecodeExecutor {
    provider: Arc<dyn PixelProvider>,
    handle: Handle,
    in_flight: Arc<DashSet<TileCoord>>,
    cancellation: CancellationToken,
}

impl TokioDecodeExecutor {
    /// Creates an executor that spawns onto the given runtime handle.
    pub fn new(provider: Arc<dyn PixelProvider>, handle: Handle) -> Self {
        Self {
            provider,
            handle,
            in_flight: Arc::new(DashSet::new()),
            cancellation: CancellationToken::new(),
        }
    }

    /// Creates an executor bound to the current runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime context.
    pub fn current(provider: Arc<dyn PixelProvider>) -> Self {
        Self::new(provider, Handle::current())
    }

    /// Number of tiles currently being decoded.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }
}

impl DecodeExecutor for TokioDecodeExecutor {
    fn queue(&mut self, batch: Vec<DecodeJob>, events: DecodeEventSender) {
        // A cancelled token is permanent; batches after a cancellation run
        // under a fresh one.
        if self.cancellation.is_cancelled() {
            self.cancellation = CancellationToken::new();
        }
        let jobs: Vec<DecodeJob> = batch
            .into_iter()
            .filter(|job| self.in_flight.insert(job.coord()))
            .collect();
        if jobs.is_empty() {
            return;
        }
        debug!(jobs = jobs.len(), "queueing decode batch");

        let provider = Arc::clone(&self.provider);
        let in_flight = Arc::clone(&self.in_flight);
        let token = self.cancellation.clone();

        self.handle.spawn(async move {
            let _ = events.send(DecodeEvent::BatchStarted);
            let mut workers = Vec::with_capacity(jobs.len());
            for job in jobs {
                let provider = Arc::clone(&provider);
                let in_flight = Arc::clone(&in_flight);
                let token = token.clone();
                let events = events.clone();
                workers.push(tokio::spawn(async move {
                    let coord = job.coord();
                    if token.is_cancelled() {
                        in_flight.remove(&coord);
                        return;
                    }
                    let result =
                        tokio::task::spawn_blocking(move || provider.fetch(&job)).await;
                    in_flight.remove(&coord);
                    if token.is_cancelled() {
                        // Abandoned: a completion after cancellation must
                        // not be applied.
                        return;
                    }
                    match result {
                        Ok(Ok(pixels)) => {
                            let _ = events.send(DecodeEvent::TileDecoded {
                                coord,
                                pixels: Arc::new(pixels),
                            });
                        }
                        Ok(Err(error)) => {
                            warn!(tile = %coord, %error, "tile decode failed");
                            let _ = events.send(DecodeEvent::TileFailed { coord, error });
                        }
                        Err(join_error) => {
                            let error = DecodeError::Worker(join_error.to_string());
                            warn!(tile = %coord, %error, "decode worker died");
                            let _ = events.send(DecodeEvent::TileFailed { coord, error });
                        }
                    }
                }));
            }
            futures::future::join_all(workers).await;
            if token.is_cancelled() {
                let _ = events.send(DecodeEvent::BatchCancelled);
            } else {
                let _ = events.send(DecodeEvent::BatchCompleted);
            }
        });
    }

    fn cancel(&mut self) {
        self.cancellation.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::LevelScale;
    use image::RgbaImage;
    use std::time::Duration;
    use tokio::sync::mpsc;

    struct SolidProvider;

    impl PixelProvider for SolidProvider {
        fn fetch(&self, _job: &DecodeJob) -> Result<RgbaImage, DecodeError> {
            Ok(RgbaImage::new(4, 4))
        }
    }

    struct SlowProvider {
        delay: Duration,
    }

    impl PixelProvider for SlowProvider {
        fn fetch(&self, _job: &DecodeJob) -> Result<RgbaImage, DecodeError> {
            std::thread::sleep(self.delay);
            Ok(RgbaImage::new(4, 4))
        }
    }

    struct FailingProvider;

    impl PixelProvider for FailingProvider {
        fn fetch(&self, job: &DecodeJob) -> Result<RgbaImage, DecodeError> {
            Err(DecodeError::provider(job.coord(), "no such tile"))
        }
    }

    fn job(column: i32, row: i32) -> DecodeJob {
        DecodeJob::new(
            TileCoord::new(column, row, LevelScale::new(1.0)),
            Arc::new(()),
        )
    }

    async fn collect_until_terminal(
        rx: &mut mpsc::UnboundedReceiver<DecodeEvent>,
    ) -> Vec<DecodeEvent> {
        let mut events = Vec::new();
        loop {
            let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
                .await
                .expect("timed out waiting for decode events")
                .expect("event channel closed unexpectedly");
            let terminal = matches!(
                event,
                DecodeEvent::BatchCompleted | DecodeEvent::BatchCancelled
            );
            events.push(event);
            if terminal {
                return events;
            }
        }
    }

    #[tokio::test]
    async fn test_batch_decodes_all_tiles() {
        let mut executor = TokioDecodeExecutor::current(Arc::new(SolidProvider));
        let (tx, mut rx) = mpsc::unbounded_channel();
        executor.queue(vec![job(0, 0), job(1, 0)], tx);

        let events = collect_until_terminal(&mut rx).await;
        assert!(matches!(events[0], DecodeEvent::BatchStarted));
        let decoded = events
            .iter()
            .filter(|e| matches!(e, DecodeEvent::TileDecoded { .. }))
            .count();
        assert_eq!(decoded, 2);
        assert!(matches!(events.last(), Some(DecodeEvent::BatchCompleted)));
        assert_eq!(executor.in_flight_count(), 0);
    }

    #[tokio::test]
    async fn test_in_flight_resubmission_is_skipped() {
        let mut executor = TokioDecodeExecutor::current(Arc::new(SlowProvider {
            delay: Duration::from_millis(100),
        }));
        let (tx, mut rx) = mpsc::unbounded_channel();
        executor.queue(vec![job(0, 0)], tx.clone());
        // The tile is still decoding; queueing it again must not start a
        // second batch.
        executor.queue(vec![job(0, 0)], tx);

        let events = collect_until_terminal(&mut rx).await;
        let starts = events
            .iter()
            .filter(|e| matches!(e, DecodeEvent::BatchStarted))
            .count();
        let decoded = events
            .iter()
            .filter(|e| matches!(e, DecodeEvent::TileDecoded { .. }))
            .count();
        assert_eq!(starts, 1, "duplicate submission must be coalesced");
        assert_eq!(decoded, 1);
    }

    #[tokio::test]
    async fn test_cancel_abandons_in_flight_work() {
        let mut executor = TokioDecodeExecutor::current(Arc::new(SlowProvider {
            delay: Duration::from_millis(50),
        }));
        let (tx, mut rx) = mpsc::unbounded_channel();
        executor.queue(vec![job(0, 0), job(1, 0)], tx);
        executor.cancel();

        let events = collect_until_terminal(&mut rx).await;
        assert!(
            matches!(events.last(), Some(DecodeEvent::BatchCancelled)),
            "cancelled batch must report BatchCancelled"
        );
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, DecodeEvent::TileDecoded { .. })),
            "completions after cancellation must be abandoned"
        );
    }

    #[tokio::test]
    async fn test_queue_after_cancel_starts_fresh() {
        let mut executor = TokioDecodeExecutor::current(Arc::new(SolidProvider));
        executor.cancel();

        let (tx, mut rx) = mpsc::unbounded_channel();
        executor.queue(vec![job(0, 0)], tx);
        let events = collect_until_terminal(&mut rx).await;
        assert!(matches!(events.last(), Some(DecodeEvent::BatchCompleted)));
    }

    #[tokio::test]
    async fn test_provider_failure_reports_tile_failed() {
        let mut executor = TokioDecodeExecutor::current(Arc::new(FailingProvider));
        let (tx, mut rx) = mpsc::unbounded_channel();
        executor.queue(vec![job(3, 4)], tx);

        let events = collect_until_terminal(&mut rx).await;
        assert!(events.iter().any(|e| matches!(
            e,
            DecodeEvent::TileFailed { error: DecodeError::Provider { .. }, .. }
        )));
        assert!(
            matches!(events.last(), Some(DecodeEvent::BatchCompleted)),
            "a failed tile must not fail the batch"
        );
    }

    #[tokio::test]
    async fn test_empty_batch_after_dedup_emits_nothing() {
        let mut executor = TokioDecodeExecutor::current(Arc::new(SlowProvider {
            delay: Duration::from_millis(100),
        }));
        let (tx, mut rx) = mpsc::unbounded_channel();
        executor.queue(vec![job(0, 0)], tx.clone());
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        executor.queue(vec![job(0, 0)], tx2);

        // The second channel never sees a batch.
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(rx2.try_recv().is_err());
        let _ = collect_until_terminal(&mut rx).await;
    }
}
