//! Viewport and scale provider interface.
//!
//! The host owns panning, zooming and layout; the engine only consumes a
//! read-only view of them. Geometry code never receives the provider
//! itself, only a [`ViewContext`] snapshot captured at the start of a
//! render cycle, so detail levels and tiles carry no upward references.

use crate::geom::RectF;

/// Supplies the current zoom scale and visible rectangle.
///
/// All rectangle and size values are in *scaled* content coordinates, i.e.
/// base content units multiplied by [`current_scale`](Self::current_scale).
pub trait ViewportProvider: Send + Sync {
    /// The overall zoom factor currently applied to the content.
    fn current_scale(&self) -> f64;

    /// The visible sub-rectangle of the content, in scaled coordinates.
    fn visible_content_rect(&self) -> RectF;

    /// Width and height of the full content at the current scale.
    fn drawable_size(&self) -> (f64, f64);

    /// When true, render requests are ignored; used by hosts during bulk
    /// reconfiguration.
    fn is_locked(&self) -> bool {
        false
    }
}

/// Immutable snapshot of the viewport provider's state for one render
/// cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewContext {
    /// Overall zoom factor.
    pub scale: f64,
    /// Scaled content width.
    pub drawable_width: f64,
    /// Scaled content height.
    pub drawable_height: f64,
    /// Visible rectangle in scaled content coordinates.
    pub viewport: RectF,
}

impl ViewContext {
    pub fn new(scale: f64, drawable_width: f64, drawable_height: f64, viewport: RectF) -> Self {
        Self {
            scale,
            drawable_width,
            drawable_height,
            viewport,
        }
    }

    /// Captures the provider's current state.
    pub fn capture(provider: &dyn ViewportProvider) -> Self {
        let (drawable_width, drawable_height) = provider.drawable_size();
        Self {
            scale: provider.current_scale(),
            drawable_width,
            drawable_height,
            viewport: provider.visible_content_rect(),
        }
    }
}
