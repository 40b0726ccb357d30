//! One grid cell of a detail level.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::{Duration, Instant};

use image::RgbaImage;

use super::{LevelScale, TileCoord, TileState};
use crate::geom::{unscale, RectF};
use crate::surface::DrawTarget;

/// Decoded bitmap for one tile. Shared so completion events and the tile
/// itself can hold the same allocation.
pub type PixelData = Arc<RgbaImage>;

/// Opaque per-level payload handed through to the pixel provider, e.g. a
/// URL template or an asset path scheme. The core never inspects it.
pub type TileData = Arc<dyn Any + Send + Sync>;

/// Cross-fade duration applied to tiles unless overridden.
pub const DEFAULT_TRANSITION_DURATION: Duration = Duration::from_millis(200);

/// One tile of one detail level: identity, geometry, decode state and
/// cross-fade transition progress.
///
/// Geometry is fixed at construction. The base rectangle lives in the
/// level's own grid-pixel space; the relative rectangle is the base
/// rectangle divided by the level scale, which puts every tile of every
/// level into one shared content coordinate frame for compositing.
#[derive(Clone)]
pub struct Tile {
    coord: TileCoord,
    width: u32,
    height: u32,
    base_rect: RectF,
    relative_rect: RectF,
    state: TileState,
    pixels: Option<PixelData>,
    data: TileData,
    progress: f32,
    transitions_enabled: bool,
    transition_duration: Duration,
    render_timestamp: Option<Instant>,
}

impl Tile {
    /// Creates an unassigned tile at `(column, row)` of a level with the
    /// given tile dimensions and scale.
    pub fn new(
        column: i32,
        row: i32,
        width: u32,
        height: u32,
        data: TileData,
        scale: LevelScale,
    ) -> Self {
        let left = f64::from(column) * f64::from(width);
        let top = f64::from(row) * f64::from(height);
        let base_rect = RectF::new(left, top, left + f64::from(width), top + f64::from(height));
        let relative_rect = RectF::new(
            unscale(base_rect.left, scale.get()),
            unscale(base_rect.top, scale.get()),
            unscale(base_rect.right, scale.get()),
            unscale(base_rect.bottom, scale.get()),
        );
        Self {
            coord: TileCoord::new(column, row, scale),
            width,
            height,
            base_rect,
            relative_rect,
            state: TileState::Unassigned,
            pixels: None,
            data,
            progress: 0.0,
            transitions_enabled: false,
            transition_duration: DEFAULT_TRANSITION_DURATION,
            render_timestamp: None,
        }
    }

    pub fn coord(&self) -> TileCoord {
        self.coord
    }

    pub fn column(&self) -> i32 {
        self.coord.column
    }

    pub fn row(&self) -> i32 {
        self.coord.row
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn state(&self) -> TileState {
        self.state
    }

    pub fn has_pixels(&self) -> bool {
        self.pixels.is_some()
    }

    pub fn pixels(&self) -> Option<&PixelData> {
        self.pixels.as_ref()
    }

    /// The tile's rectangle in its level's grid-pixel space.
    pub fn base_rect(&self) -> RectF {
        self.base_rect
    }

    /// The tile's rectangle in shared base content space.
    pub fn relative_rect(&self) -> RectF {
        self.relative_rect
    }

    /// The relative rectangle multiplied by an arbitrary scale factor.
    pub fn scaled_rect(&self, scale: f64) -> RectF {
        self.relative_rect.scaled(scale)
    }

    /// The opaque per-level payload this tile carries for the provider.
    pub fn data(&self) -> TileData {
        Arc::clone(&self.data)
    }

    pub fn set_transition_duration(&mut self, duration: Duration) {
        self.transition_duration = duration;
    }

    /// Enables or disables the cross-fade for this tile. Enabling restarts
    /// progress from zero.
    pub fn set_transitions_enabled(&mut self, enabled: bool) {
        self.transitions_enabled = enabled;
        if enabled {
            self.progress = 0.0;
        }
    }

    /// Transition progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Recomputes transition progress from the render timestamp.
    ///
    /// No-op while transitions are disabled. Reaching full progress
    /// permanently disables further transition computation for this tile.
    pub fn compute_progress(&mut self, now: Instant) {
        if !self.transitions_enabled {
            return;
        }
        self.progress = match self.render_timestamp {
            Some(stamp) => {
                let elapsed = now.saturating_duration_since(stamp).as_secs_f32();
                (elapsed / self.transition_duration.as_secs_f32()).min(1.0)
            }
            // Never stamped: treat as already settled rather than fading
            // from an undefined origin.
            None => 1.0,
        };
        if self.progress >= 1.0 {
            self.progress = 1.0;
            self.transitions_enabled = false;
        }
    }

    /// Resets the transition clock to `now` and progress to zero.
    ///
    /// Called exactly once, when the tile first becomes decoded, never on
    /// subsequent draws.
    pub fn stamp_time(&mut self, now: Instant) {
        if self.transitions_enabled {
            self.render_timestamp = Some(now);
            self.progress = 0.0;
        }
    }

    /// True while a cross-fade is still in flight.
    pub fn is_dirty(&self) -> bool {
        self.transitions_enabled && self.progress < 1.0
    }

    /// Compositing opacity derived from transition progress.
    pub fn opacity(&self) -> u8 {
        if self.transitions_enabled {
            (255.0 * self.progress) as u8
        } else {
            255
        }
    }

    pub(crate) fn mark_pending(&mut self) {
        self.state = TileState::PendingDecode;
    }

    /// Installs decoded pixel data and moves the tile to `Decoded`.
    pub(crate) fn set_decoded(&mut self, pixels: PixelData) {
        self.pixels = Some(pixels);
        self.state = TileState::Decoded;
    }

    pub(crate) fn mark_unassigned(&mut self) {
        self.state = TileState::Unassigned;
    }

    /// Blends this tile's pixel data into `target` at its relative
    /// rectangle, using the current transition opacity.
    ///
    /// Returns true if the tile is still dirty (mid-transition), so the
    /// caller knows another frame is required.
    pub fn draw(&self, target: &mut dyn DrawTarget) -> bool {
        if self.state.is_destroyed() {
            return false;
        }
        if let Some(pixels) = &self.pixels {
            target.blit(pixels, self.relative_rect, self.opacity());
        }
        self.is_dirty()
    }

    /// Releases pixel data and returns the tile to `Unassigned`.
    ///
    /// Safe to call repeatedly and on a tile that was never decoded.
    pub fn reset(&mut self) {
        self.state = TileState::Unassigned;
        self.pixels = None;
        self.progress = 0.0;
        self.render_timestamp = None;
    }

    /// Permanently discards the tile: pixel data is released and the state
    /// becomes terminal. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        self.state = TileState::Destroyed;
        self.pixels = None;
        self.progress = 0.0;
    }
}

impl PartialEq for Tile {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord
    }
}

impl Eq for Tile {}

impl Hash for Tile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coord.hash(state);
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tile")
            .field("coord", &self.coord)
            .field("state", &self.state)
            .field("has_pixels", &self.pixels.is_some())
            .field("progress", &self.progress)
            .finish()
    }
}
