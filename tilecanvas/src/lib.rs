//! tilecanvas - viewport-driven tile pyramid rendering
//!
//! Renders an arbitrarily large raster image as a pyramid of fixed-size
//! tiles, loading only the tiles intersecting the current viewport at the
//! current zoom level, decoding them asynchronously, and compositing them
//! with cross-fade transitions when the zoom level changes.
//!
//! # High-Level API
//!
//! The host supplies a viewport, a pixel provider and a draw target, and
//! drives the [`render::TileRenderer`] step functions from its frame
//! loop:
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Instant;
//! use tilecanvas::decode::TokioDecodeExecutor;
//! use tilecanvas::detail::DetailLevel;
//! use tilecanvas::render::{RenderConfig, TileRenderer};
//!
//! let executor = TokioDecodeExecutor::new(provider, runtime.handle().clone());
//! let mut renderer = TileRenderer::new(RenderConfig::default(), viewport, Box::new(executor));
//!
//! renderer.update_tile_set(DetailLevel::new(0.5, data, 256, 256), Instant::now());
//! loop {
//!     let now = Instant::now();
//!     renderer.pump(now);
//!     if renderer.needs_draw() {
//!         renderer.draw(&mut surface, now);
//!     }
//! }
//! ```

pub mod decode;
pub mod detail;
pub mod geom;
pub mod logging;
pub mod render;
pub mod surface;
pub mod tile;
pub mod viewport;

/// Version of the tilecanvas library.
///
/// Defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
