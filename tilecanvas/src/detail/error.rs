//! Detail level error types.

use thiserror::Error;

/// Visible tiles were queried before any viewport state was computed.
///
/// Distinct from an empty result: callers like the orchestrator's cleanup
/// treat it as "nothing to do yet", not as a bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error(
    "grid state has not been computed; call compute_current_state before querying visible tiles"
)]
pub struct StateNotComputed;
