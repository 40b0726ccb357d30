//! In-memory RGBA draw target.

use image::{Rgba, RgbaImage};

use super::DrawTarget;
use crate::geom::RectF;

/// A [`DrawTarget`] backed by an in-memory RGBA image.
///
/// Used by the test suite and by demo hosts that have no hardware
/// surface. Blits use nearest-neighbor sampling and source-over blending.
pub struct PixmapTarget {
    image: RgbaImage,
    scale: f64,
}

impl PixmapTarget {
    /// Creates a target mapping content space 1:1 onto pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_scale(width, height, 1.0)
    }

    /// Creates a target that applies `scale` to every destination
    /// rectangle, standing in for a host's device-scale transform.
    pub fn with_scale(width: u32, height: u32, scale: f64) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            scale,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }

    /// Consumes the target, returning the composited image.
    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

impl DrawTarget for PixmapTarget {
    fn blit(&mut self, pixels: &RgbaImage, dest: RectF, opacity: u8) {
        let dest = dest.scaled(self.scale);
        if dest.is_empty() || opacity == 0 || pixels.width() == 0 || pixels.height() == 0 {
            return;
        }
        // Float-to-int casts saturate, so negative edges clamp to zero.
        let x0 = dest.left.floor().max(0.0) as u32;
        let y0 = dest.top.floor().max(0.0) as u32;
        let x1 = (dest.right.ceil() as u32).min(self.image.width());
        let y1 = (dest.bottom.ceil() as u32).min(self.image.height());

        for y in y0..y1 {
            for x in x0..x1 {
                let u = ((f64::from(x) + 0.5 - dest.left) / dest.width()
                    * f64::from(pixels.width()))
                .floor()
                .max(0.0) as u32;
                let v = ((f64::from(y) + 0.5 - dest.top) / dest.height()
                    * f64::from(pixels.height()))
                .floor()
                .max(0.0) as u32;
                let src = pixels.get_pixel(
                    u.min(pixels.width() - 1),
                    v.min(pixels.height() - 1),
                );
                let alpha = u32::from(src[3]) * u32::from(opacity) / 255;
                let dst = self.image.get_pixel_mut(x, y);
                for channel in 0..3 {
                    dst[channel] = ((u32::from(src[channel]) * alpha
                        + u32::from(dst[channel]) * (255 - alpha))
                        / 255) as u8;
                }
                dst[3] = (alpha + u32::from(dst[3]) * (255 - alpha) / 255) as u8;
            }
        }
    }
}
