//! Decode error types.

use thiserror::Error;

use crate::tile::TileCoord;

/// Errors reported by decode workers.
///
/// A decode failure never crashes the render cycle; the affected tile
/// stays undecoded and is retried only if a future render cycle
/// re-enqueues it.
#[derive(Debug, Clone, Error)]
pub enum DecodeError {
    /// The pixel provider failed to produce data for a tile.
    #[error("pixel provider failed for tile {coord}: {message}")]
    Provider { coord: TileCoord, message: String },

    /// The worker task panicked or was torn down mid-decode.
    #[error("decode worker failed: {0}")]
    Worker(String),
}

impl DecodeError {
    /// Convenience constructor for provider implementations.
    pub fn provider(coord: TileCoord, message: impl Into<String>) -> Self {
        Self::Provider {
            coord,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::LevelScale;

    #[test]
    fn test_provider_display() {
        let error = DecodeError::provider(
            TileCoord::new(1, 2, LevelScale::new(0.5)),
            "missing asset",
        );
        let message = error.to_string();
        assert!(message.contains("1:2@0.5"));
        assert!(message.contains("missing asset"));
    }

    #[test]
    fn test_worker_display() {
        let error = DecodeError::Worker("task panicked".into());
        assert_eq!(error.to_string(), "decode worker failed: task panicked");
    }
}
