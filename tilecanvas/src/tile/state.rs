//! Tile decode lifecycle state.

use std::fmt;

/// Decode state of one tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TileState {
    /// Created but not yet handed to the decode executor.
    #[default]
    Unassigned,

    /// Enqueued to the decode executor, awaiting pixel data.
    PendingDecode,

    /// Pixel data has arrived; the tile may be composited.
    Decoded,

    /// Permanently discarded. Terminal; a destroyed tile is never drawn.
    Destroyed,
}

impl TileState {
    /// True if the tile holds pixel data ready for compositing.
    pub fn is_decoded(&self) -> bool {
        matches!(self, Self::Decoded)
    }

    /// True if decode work may still be enqueued or is outstanding.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::PendingDecode)
    }

    /// True if the tile has been permanently discarded.
    pub fn is_destroyed(&self) -> bool {
        matches!(self, Self::Destroyed)
    }
}

impl fmt::Display for TileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unassigned => write!(f, "Unassigned"),
            Self::PendingDecode => write!(f, "PendingDecode"),
            Self::Decoded => write!(f, "Decoded"),
            Self::Destroyed => write!(f, "Destroyed"),
        }
    }
}
