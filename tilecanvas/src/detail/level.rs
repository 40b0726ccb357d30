//! One zoom tier of the tile pyramid.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::{StateNotComputed, StateSnapshot};
use crate::tile::{LevelScale, Tile, TileCoord, TileData};
use crate::viewport::ViewContext;

/// One detail level: a scale factor, the tile grid dimensions for that
/// scale, and an opaque payload handed through to every tile.
///
/// Levels are totally ordered by scale (ascending) and compare equal when
/// their scales are equal, so the orchestrator can detect "same level
/// requested again" across distinct instances.
///
/// The level holds the last computed [`StateSnapshot`] and a visible-tile
/// map consistent with it. The map is only valid with respect to the most
/// recent snapshot; querying it before any snapshot exists yields
/// [`StateNotComputed`].
pub struct DetailLevel {
    scale: LevelScale,
    tile_width: u32,
    tile_height: u32,
    data: TileData,
    last_snapshot: Option<StateSnapshot>,
    visible: HashMap<TileCoord, Tile>,
}

impl DetailLevel {
    /// Creates a detail level.
    ///
    /// # Arguments
    ///
    /// * `scale` - Content-space units per grid pixel; finite and positive
    /// * `data` - Opaque payload forwarded to each tile (e.g. a URL template)
    /// * `tile_width` / `tile_height` - Grid cell dimensions in pixels
    pub fn new(scale: f64, data: TileData, tile_width: u32, tile_height: u32) -> Self {
        Self {
            scale: LevelScale::new(scale),
            tile_width,
            tile_height,
            data,
            last_snapshot: None,
            visible: HashMap::new(),
        }
    }

    pub fn scale(&self) -> LevelScale {
        self.scale
    }

    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    pub fn data(&self) -> TileData {
        Arc::clone(&self.data)
    }

    /// Ratio of the device scale to this level's native scale.
    pub fn relative_scale(&self, device_scale: f64) -> f64 {
        device_scale / self.scale.get()
    }

    /// Resolves the visible row/column ranges for the given view state.
    ///
    /// The viewport is clamped to `[0, drawable_width] x
    /// [0, drawable_height]` first. Returns the snapshot as a value so the
    /// caller owns the equality check against whatever it last rendered.
    pub fn compute_current_state(&mut self, ctx: &ViewContext) -> StateSnapshot {
        let relative_scale = self.relative_scale(ctx.scale);
        let footprint_width = f64::from(self.tile_width) * relative_scale;
        let footprint_height = f64::from(self.tile_height) * relative_scale;
        let viewport = ctx
            .viewport
            .clamped_to(ctx.drawable_width, ctx.drawable_height);
        let row_start = (viewport.top / footprint_height).floor() as i32;
        let row_end = (viewport.bottom / footprint_height).ceil() as i32;
        let column_start = (viewport.left / footprint_width).floor() as i32;
        let column_end = (viewport.right / footprint_width).ceil() as i32;
        let snapshot = StateSnapshot::new(self.scale, row_start, row_end, column_start, column_end);
        self.last_snapshot = Some(snapshot);
        snapshot
    }

    pub fn has_computed_state(&self) -> bool {
        self.last_snapshot.is_some()
    }

    pub fn last_snapshot(&self) -> Option<StateSnapshot> {
        self.last_snapshot
    }

    /// Rebuilds the visible-tile map for the current snapshot, one tile
    /// per (row, column) pair in range, discarding prior contents.
    ///
    /// Idempotent per snapshot but expensive; callers gate it behind a
    /// snapshot-equality short-circuit.
    pub fn materialize_visible_tiles(&mut self) -> Result<(), StateNotComputed> {
        let snapshot = self.last_snapshot.ok_or(StateNotComputed)?;
        self.visible.clear();
        for row in snapshot.row_start()..snapshot.row_end() {
            for column in snapshot.column_start()..snapshot.column_end() {
                let tile = Tile::new(
                    column,
                    row,
                    self.tile_width,
                    self.tile_height,
                    Arc::clone(&self.data),
                    self.scale,
                );
                self.visible.insert(tile.coord(), tile);
            }
        }
        debug!(
            level = %self.scale,
            tiles = self.visible.len(),
            "materialized visible tile set"
        );
        Ok(())
    }

    /// The tiles materialized for the current snapshot.
    pub fn visible_tiles(&self) -> Result<&HashMap<TileCoord, Tile>, StateNotComputed> {
        if self.last_snapshot.is_none() {
            return Err(StateNotComputed);
        }
        Ok(&self.visible)
    }

    /// Clears the snapshot, forcing recomputation on next access.
    pub fn invalidate(&mut self) {
        self.last_snapshot = None;
    }
}

impl PartialEq for DetailLevel {
    fn eq(&self, other: &Self) -> bool {
        self.scale == other.scale
    }
}

impl Eq for DetailLevel {}

impl PartialOrd for DetailLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DetailLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.scale.cmp(&other.scale)
    }
}

impl fmt::Debug for DetailLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetailLevel")
            .field("scale", &self.scale)
            .field("tile_width", &self.tile_width)
            .field("tile_height", &self.tile_height)
            .field("last_snapshot", &self.last_snapshot)
            .field("visible_tiles", &self.visible.len())
            .finish()
    }
}
