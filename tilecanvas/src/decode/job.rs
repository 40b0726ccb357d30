//! Decode work descriptors.

use std::fmt;
use std::sync::Arc;

use crate::tile::{TileCoord, TileData};

/// Everything a worker needs to decode one tile: the tile's identity and
/// the owning level's opaque payload.
///
/// Jobs are owned copies; the executor never receives a live reference
/// into the orchestrator's tile sets.
#[derive(Clone)]
pub struct DecodeJob {
    coord: TileCoord,
    data: TileData,
}

impl DecodeJob {
    pub fn new(coord: TileCoord, data: TileData) -> Self {
        Self { coord, data }
    }

    pub fn coord(&self) -> TileCoord {
        self.coord
    }

    pub fn data(&self) -> TileData {
        Arc::clone(&self.data)
    }
}

impl fmt::Debug for DecodeJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodeJob")
            .field("coord", &self.coord)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::LevelScale;

    #[test]
    fn test_job_carries_identity_and_payload() {
        let data: TileData = Arc::new("template".to_string());
        let coord = TileCoord::new(4, 5, LevelScale::new(1.0));
        let job = DecodeJob::new(coord, data);
        assert_eq!(job.coord(), coord);
        let payload = job.data();
        assert_eq!(
            payload.downcast_ref::<String>().map(String::as_str),
            Some("template")
        );
    }
}
