//! Tiles and tile identity.
//!
//! A tile is one fixed-size cell of a detail level's grid, addressed by
//! `(column, row)` and the owning level's scale. Identity, equality and
//! hashing are defined over that triple only, never over decoded content,
//! so a freshly materialized tile and its already-decoded twin compare
//! equal and the render orchestrator can diff visible sets cheaply.
//!
//! Decode state walks a fixed lifecycle:
//!
//! ```text
//! Unassigned ──queue──► PendingDecode ──pixels──► Decoded
//!      ▲                                            │
//!      └───────────────── reset ◄───────────────────┤
//!                                                destroy
//!                                                   ▼
//!                                               Destroyed
//! ```
//!
//! A destroyed tile is terminal and must never be drawn.

mod coord;
mod state;
#[allow(clippy::module_inception)]
mod tile;

pub use coord::{LevelScale, TileCoord};
pub use state::TileState;
pub use tile::{PixelData, Tile, TileData, DEFAULT_TRANSITION_DURATION};
