//! The render orchestrator.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use super::{NullRenderListener, OpaqueRegion, RenderConfig, RenderListener, RenderThrottle};
use crate::decode::{DecodeEvent, DecodeEventReceiver, DecodeEventSender, DecodeExecutor, DecodeJob};
use crate::detail::{DetailLevel, StateSnapshot};
use crate::surface::DrawTarget;
use crate::tile::{LevelScale, PixelData, Tile, TileCoord, TileState};
use crate::viewport::{ViewContext, ViewportProvider};

/// Orchestrates the tile render lifecycle for one surface.
///
/// Owns the active [`DetailLevel`], the tiles visible in the current
/// viewport, and the previous level's decoded tiles retained for
/// cross-fade. The host drives it with two step functions, both on the
/// surface context:
///
/// - [`pump`](Self::pump) drains decode completions and fires the render
///   throttle; call it once per frame (or whenever idle).
/// - [`draw`](Self::draw) composites the current state into a
///   [`DrawTarget`]; call it once per frame while
///   [`needs_draw`](Self::needs_draw) reports true.
///
/// Decode workers never touch this struct; they report through the
/// completion channel created at construction.
pub struct TileRenderer {
    viewport: Arc<dyn ViewportProvider>,
    executor: Box<dyn DecodeExecutor>,
    listener: Box<dyn RenderListener>,

    events_tx: DecodeEventSender,
    events_rx: DecodeEventReceiver,

    level: Option<DetailLevel>,
    last_rendered_scale: Option<LevelScale>,
    last_rendered_snapshot: Option<StateSnapshot>,

    /// Tiles mathematically inside the current viewport, by identity.
    active: HashMap<TileCoord, Tile>,
    /// Previous level's decoded tiles kept alive through the cross-fade.
    previous: HashMap<TileCoord, Tile>,

    throttle: RenderThrottle,
    transitions_enabled: bool,
    transition_duration: Duration,

    cancelled: bool,
    suppressed: bool,
    rendering: bool,
    invalidated: bool,

    /// One clean draw pass has been observed since the last dirty one.
    clean_pass_seen: bool,
    /// Previous tiles have been torn down for the current settle.
    previous_cleared: bool,
}

impl TileRenderer {
    /// Creates an orchestrator over the given viewport provider and
    /// decode executor.
    pub fn new(
        config: RenderConfig,
        viewport: Arc<dyn ViewportProvider>,
        executor: Box<dyn DecodeExecutor>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            viewport,
            executor,
            listener: Box::new(NullRenderListener),
            events_tx,
            events_rx,
            level: None,
            last_rendered_scale: None,
            last_rendered_snapshot: None,
            active: HashMap::new(),
            previous: HashMap::new(),
            throttle: RenderThrottle::new(config.render_throttle),
            transitions_enabled: config.transitions_enabled,
            transition_duration: config.transition_duration,
            cancelled: false,
            suppressed: false,
            rendering: false,
            invalidated: false,
            clean_pass_seen: false,
            previous_cleared: false,
        }
    }

    /// Installs the render lifecycle listener.
    pub fn set_listener(&mut self, listener: Box<dyn RenderListener>) {
        self.listener = listener;
    }

    pub fn set_transitions_enabled(&mut self, enabled: bool) {
        self.transitions_enabled = enabled;
    }

    pub fn set_transition_duration(&mut self, duration: Duration) {
        self.transition_duration = duration;
    }

    pub fn set_render_throttle(&mut self, delay: Duration) {
        self.throttle.set_delay(delay);
    }

    /// True between a decode batch starting and completing or being
    /// cancelled.
    pub fn is_rendering(&self) -> bool {
        self.rendering
    }

    /// True while a render request is armed and waiting on the throttle.
    pub fn is_render_pending(&self) -> bool {
        self.throttle.is_armed()
    }

    /// True if the composited output is stale and the host should call
    /// [`draw`](Self::draw) this frame.
    pub fn needs_draw(&self) -> bool {
        self.invalidated
    }

    pub fn current_level(&self) -> Option<&DetailLevel> {
        self.level.as_ref()
    }

    pub fn active_tile_count(&self) -> usize {
        self.active.len()
    }

    pub fn previous_tile_count(&self) -> usize {
        self.previous.len()
    }

    /// Number of active tiles holding decoded pixel data.
    pub fn decoded_tile_count(&self) -> usize {
        self.active
            .values()
            .filter(|t| t.state().is_decoded())
            .count()
    }

    /// Identities of the tiles in the current viewport, sorted by row
    /// then column.
    pub fn active_coords(&self) -> Vec<TileCoord> {
        let mut coords: Vec<TileCoord> = self.active.keys().copied().collect();
        coords.sort_by_key(|c| (c.row, c.column));
        coords
    }

    /// Identities of the retained previous-level tiles, sorted by row
    /// then column.
    pub fn previous_coords(&self) -> Vec<TileCoord> {
        let mut coords: Vec<TileCoord> = self.previous.keys().copied().collect();
        coords.sort_by_key(|c| (c.row, c.column));
        coords
    }

    /// Arms the render throttle.
    ///
    /// Clears any prior cancellation. Ignored while no level is active,
    /// while the viewport is locked, or while rendering is suppressed;
    /// repeated requests inside the throttle window coalesce into one
    /// trigger.
    pub fn request_render(&mut self, now: Instant) {
        self.cancelled = false;
        if self.level.is_none() {
            return;
        }
        if self.suppressed || self.viewport.is_locked() {
            return;
        }
        if self.throttle.request(now) {
            trace!("render request armed");
        }
    }

    /// Flags the current render as cancelled and interrupts in-flight and
    /// queued decode work. A later [`request_render`](Self::request_render)
    /// re-arms.
    pub fn cancel_render(&mut self) {
        self.cancelled = true;
        self.executor.cancel();
        // The executor abandons these; record that so a future cycle
        // re-enqueues them.
        for tile in self.active.values_mut() {
            if tile.state().is_pending() {
                tile.mark_unassigned();
            }
        }
    }

    /// Blocks new render cycles from starting without touching in-flight
    /// work. Used while the surface is temporarily not visible.
    pub fn suppress_render(&mut self) {
        self.suppressed = true;
    }

    /// Allows render cycles to start again.
    pub fn resume_render(&mut self) {
        self.suppressed = false;
    }

    /// Switches the active detail level.
    ///
    /// No-op if `level` has the same scale as the active one. Otherwise
    /// cancels any in-flight render, retains every decoded tile of the
    /// outgoing level for cross-fade, clears the active set, swaps the
    /// level in and immediately requests a render.
    pub fn update_tile_set(&mut self, level: DetailLevel, now: Instant) {
        if let Some(current) = &self.level {
            if current.scale() == level.scale() {
                return;
            }
        }
        self.cancel_render();
        self.previous.clear();
        for (coord, tile) in self.active.drain() {
            if tile.state().is_decoded() {
                self.previous.insert(coord, tile);
            }
            // Undecoded tiles are dropped; their decode work was just
            // cancelled.
        }
        debug!(
            level = %level.scale(),
            retained = self.previous.len(),
            "switching detail level"
        );
        self.level = Some(level);
        self.clean_pass_seen = false;
        self.previous_cleared = false;
        self.request_render(now);
    }

    /// Drains decode completions and fires the throttle. Call once per
    /// frame from the surface context.
    pub fn pump(&mut self, now: Instant) {
        self.drain_events(now);
        if self.throttle.poll(now) && !self.cancelled && !self.suppressed && self.level.is_some() {
            self.begin_render_cycle(now);
        }
    }

    /// Destroys and de-lists every active tile absent from the most
    /// recent materialized set.
    ///
    /// Tolerates being called before any state has been computed; that is
    /// "nothing to do yet", not an error.
    pub fn cleanup(&mut self) {
        let Some(level) = self.level.as_ref() else {
            return;
        };
        let Ok(visible) = level.visible_tiles() else {
            return;
        };
        self.active.retain(|coord, tile| {
            if visible.contains_key(coord) {
                true
            } else {
                tile.destroy();
                false
            }
        });
    }

    /// Drops all active tiles and blocks further rendering until resumed.
    pub fn clear(&mut self) {
        self.suppress_render();
        self.cancel_render();
        for tile in self.active.values_mut() {
            tile.destroy();
        }
        self.active.clear();
        self.invalidated = true;
    }

    /// Tears the orchestrator down: cancels decode work, drops all tiles
    /// and disarms the throttle.
    pub fn destroy(&mut self) {
        self.executor.cancel();
        self.clear();
        for tile in self.previous.values_mut() {
            tile.destroy();
        }
        self.previous.clear();
        self.throttle.disarm();
    }

    fn drain_events(&mut self, now: Instant) {
        let mut events = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            events.push(event);
        }
        for event in events {
            match event {
                DecodeEvent::BatchStarted => {
                    self.rendering = true;
                    self.listener.on_render_start();
                }
                DecodeEvent::TileDecoded { coord, pixels } => {
                    self.apply_decoded(coord, pixels, now);
                }
                DecodeEvent::TileFailed { coord, error } => {
                    warn!(tile = %coord, %error, "decode failed");
                    if let Some(tile) = self.active.get_mut(&coord) {
                        if tile.state().is_pending() {
                            // Back to unassigned so a future cycle can
                            // re-enqueue it.
                            tile.mark_unassigned();
                        }
                    }
                    self.listener.on_decode_error(&error);
                }
                DecodeEvent::BatchCancelled => {
                    self.rendering = false;
                    self.listener.on_render_cancelled();
                }
                DecodeEvent::BatchCompleted => {
                    self.rendering = false;
                    self.on_batch_completed(now);
                }
            }
        }
    }

    fn apply_decoded(&mut self, coord: TileCoord, pixels: PixelData, now: Instant) {
        if self.cancelled {
            // Completion raced a cancellation; abandon it.
            return;
        }
        let Some(tile) = self.active.get_mut(&coord) else {
            // Tile was discarded while decoding; stale completions are a
            // silent no-op.
            trace!(tile = %coord, "dropping stale decode completion");
            return;
        };
        if !tile.state().is_pending() {
            return;
        }
        tile.set_decoded(pixels);
        tile.stamp_time(now);
        self.invalidated = true;
    }

    fn on_batch_completed(&mut self, now: Instant) {
        if self.cancelled {
            // The batch raced a cancellation; nothing from it was
            // applied, so do not record it as rendered.
            return;
        }
        self.cleanup();
        self.listener.on_render_complete();
        if let Some(level) = &self.level {
            self.last_rendered_scale = Some(level.scale());
            self.last_rendered_snapshot = level.last_snapshot();
        }
        // Re-arm so the settle loop keeps cycling until the viewport
        // state stops changing.
        self.request_render(now);
    }

    /// One render cycle: resolve viewport state, diff the tile set and
    /// enqueue decode work. Never blocks on decode completion.
    fn begin_render_cycle(&mut self, now: Instant) {
        let ctx = ViewContext::capture(self.viewport.as_ref());
        {
            let Some(level) = self.level.as_mut() else {
                return;
            };
            let snapshot = level.compute_current_state(&ctx);
            if Some(snapshot) == self.last_rendered_snapshot
                && Some(level.scale()) == self.last_rendered_scale
            {
                // Stationary viewport on the already-rendered level; the
                // central fast exit.
                trace!("viewport unchanged since last rendered state");
                return;
            }
            if let Err(error) = level.materialize_visible_tiles() {
                debug!(%error, "render cycle without computed state");
                return;
            }
        }

        self.cleanup();

        let mut fresh: Vec<Tile> = Vec::new();
        if let Some(level) = self.level.as_ref() {
            if let Ok(visible) = level.visible_tiles() {
                fresh = visible
                    .values()
                    .filter(|tile| !self.active.contains_key(&tile.coord()))
                    .cloned()
                    .collect();
            }
        }

        for mut tile in fresh {
            tile.set_transitions_enabled(self.transitions_enabled);
            tile.set_transition_duration(self.transition_duration);
            self.active.insert(tile.coord(), tile);
        }

        // Hand the executor the undecoded portion of the visible set.
        // Tiles already decoding are re-submitted and skipped there, so
        // this is idempotent across cycles.
        let mut batch = Vec::new();
        for tile in self.active.values_mut() {
            match tile.state() {
                TileState::Unassigned => {
                    tile.mark_pending();
                    batch.push(DecodeJob::new(tile.coord(), tile.data()));
                }
                TileState::PendingDecode => {
                    batch.push(DecodeJob::new(tile.coord(), tile.data()));
                }
                TileState::Decoded | TileState::Destroyed => {}
            }
        }
        if !batch.is_empty() {
            debug!(tiles = batch.len(), "enqueueing decode batch");
            self.executor.queue(batch, self.events_tx.clone());
        }

        self.invalidated = true;
    }

    /// Composites the current state into `target`.
    ///
    /// Runs the occlusion reconciliation over the retained previous-level
    /// tiles, draws them and the current level's decoded tiles, and
    /// applies the invalidation policy: a dirty pass schedules another
    /// draw immediately; two consecutive clean passes trigger the hard
    /// teardown of whatever previous tiles remain.
    ///
    /// Returns true if another frame is required.
    pub fn draw(&mut self, target: &mut dyn DrawTarget, now: Instant) -> bool {
        self.invalidated = false;

        // Opaque region: current-level decoded tiles that have finished
        // fading. Transitioning tiles are excluded and force another pass.
        let mut opaque = OpaqueRegion::new();
        let mut dirty = false;
        let mut decoded: Vec<TileCoord> = Vec::new();
        for tile in self.active.values_mut() {
            if tile.state().is_decoded() {
                tile.compute_progress(now);
                decoded.push(tile.coord());
                if tile.is_dirty() {
                    dirty = true;
                } else {
                    opaque.add(tile.relative_rect());
                }
            }
        }

        // Bring the viewport into the content frame the tile rectangles
        // already live in; all occlusion comparisons happen there.
        let device_scale = self.viewport.current_scale();
        let inverted = if device_scale > 0.0 {
            1.0 / device_scale
        } else {
            1.0
        };
        let content_viewport = self.viewport.visible_content_rect().scaled(inverted);

        self.previous.retain(|coord, tile| {
            let rect = tile.relative_rect();
            let in_viewport = content_viewport.intersects(&rect);
            let covered = opaque.covers(&rect);
            if in_viewport && !covered {
                tile.compute_progress(now);
                dirty |= tile.draw(target);
                true
            } else {
                // Discarded permanently; never drawn again.
                trace!(tile = %coord, in_viewport, covered, "dropping previous tile");
                tile.destroy();
                false
            }
        });

        for coord in decoded {
            if let Some(tile) = self.active.get(&coord) {
                dirty |= tile.draw(target);
            }
        }

        if dirty {
            // Mid-transition tiles were drawn; reset the settle counters
            // and come straight back.
            self.clean_pass_seen = false;
            self.previous_cleared = false;
            self.invalidated = true;
        } else if !self.clean_pass_seen {
            // First clean pass: let the surface settle before any visible
            // teardown.
            self.clean_pass_seen = true;
            self.invalidated = true;
        } else if !self.previous.is_empty() && !self.previous_cleared {
            // Second consecutive clean pass: hard-destroy the leftovers
            // and redraw once more without them.
            debug!(
                previous = self.previous.len(),
                "clean settle reached, destroying previous level tiles"
            );
            for tile in self.previous.values_mut() {
                tile.destroy();
            }
            self.previous.clear();
            self.previous_cleared = true;
            self.invalidated = true;
        }

        self.invalidated
    }
}
