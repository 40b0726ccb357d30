//! Abstract drawing surface.
//!
//! The render orchestrator composites tiles through the [`DrawTarget`]
//! trait and never talks to a concrete 2D API. Destination rectangles are
//! in base content space; a host that zooms applies its own device-scale
//! transform, or wraps one into its `DrawTarget` implementation the way
//! [`PixmapTarget::with_scale`] does.

mod pixmap;

pub use pixmap::PixmapTarget;

use crate::geom::RectF;
use image::RgbaImage;

/// Destination surface for tile compositing.
pub trait DrawTarget {
    /// Blends `pixels` over the destination rectangle `dest` (base content
    /// coordinates) with the given opacity, 0 transparent through 255
    /// opaque. Source pixels are stretched to fill `dest`.
    fn blit(&mut self, pixels: &RgbaImage, dest: RectF, opacity: u8);
}
