//! Detail levels: one zoom tier of the tile pyramid.
//!
//! A [`DetailLevel`] owns the viewport-to-grid resolution for its scale:
//! given a [`ViewContext`](crate::viewport::ViewContext) it computes the
//! half-open row/column ranges of visible tiles as a [`StateSnapshot`],
//! then materializes one [`Tile`](crate::tile::Tile) per grid cell in
//! range. Snapshots are cheap values compared structurally, which is how
//! callers detect a stationary viewport without touching the tile set.

mod error;
mod level;
mod snapshot;

pub use error::StateNotComputed;
pub use level::DetailLevel;
pub use snapshot::StateSnapshot;
