//! Pixel data provider interface.

use image::RgbaImage;

use super::{DecodeError, DecodeJob};

/// Produces pixel data for tiles.
///
/// Implementations resolve the job's opaque payload (URL template, asset
/// path scheme, generator parameters) into a decoded bitmap. `fetch` runs
/// on a worker thread and may block on I/O or CPU-bound decoding; it must
/// never touch render state.
pub trait PixelProvider: Send + Sync + 'static {
    /// Decodes the pixel data for one tile.
    fn fetch(&self, job: &DecodeJob) -> Result<RgbaImage, DecodeError>;
}
