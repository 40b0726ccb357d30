//! Opaque region tracking for previous-tile culling.

use crate::geom::RectF;

/// Union of the rectangles of fully-rendered (non-transitioning) tiles,
/// accumulated during one draw pass and used to cull obsolete tiles from
/// the previous detail level.
///
/// Built fresh each render cycle; no state survives across frames. All
/// rectangles live in base content space.
///
/// Coverage uses corner containment: a rectangle counts as covered when
/// both its top-left and bottom-right corners lie inside the union. For
/// axis-aligned, non-rotated tile grids this is an acceptable
/// approximation of true coverage; the orchestrator's two-clean-pass
/// teardown absorbs the cases it gets wrong.
#[derive(Debug, Default)]
pub struct OpaqueRegion {
    rects: Vec<RectF>,
}

impl OpaqueRegion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fully opaque rectangle to the union.
    pub fn add(&mut self, rect: RectF) {
        if !rect.is_empty() {
            self.rects.push(rect);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn clear(&mut self) {
        self.rects.clear();
    }

    /// True if the point lies inside any rectangle of the union, edges
    /// included.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.rects.iter().any(|r| r.contains_point(x, y))
    }

    /// True if both corners of `rect` lie inside the union.
    pub fn covers(&self, rect: &RectF) -> bool {
        !self.is_empty()
            && self.contains_point(rect.left, rect.top)
            && self.contains_point(rect.right, rect.bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_region_covers_nothing() {
        let region = OpaqueRegion::new();
        assert!(!region.covers(&RectF::new(0.0, 0.0, 1.0, 1.0)));
        assert!(!region.contains_point(0.0, 0.0));
    }

    #[test]
    fn test_single_rect_coverage() {
        let mut region = OpaqueRegion::new();
        region.add(RectF::new(0.0, 0.0, 512.0, 512.0));
        assert!(region.covers(&RectF::new(0.0, 0.0, 512.0, 512.0)));
        assert!(region.covers(&RectF::new(100.0, 100.0, 400.0, 400.0)));
        assert!(!region.covers(&RectF::new(100.0, 100.0, 600.0, 400.0)));
    }

    #[test]
    fn test_union_of_four_tiles_covers_previous_tile() {
        // A 2x2 grid of 256-unit tiles covering the same square as one
        // 512-unit tile from a coarser level.
        let mut region = OpaqueRegion::new();
        region.add(RectF::new(0.0, 0.0, 256.0, 256.0));
        region.add(RectF::new(256.0, 0.0, 512.0, 256.0));
        region.add(RectF::new(0.0, 256.0, 256.0, 512.0));
        region.add(RectF::new(256.0, 256.0, 512.0, 512.0));
        assert!(
            region.covers(&RectF::new(0.0, 0.0, 512.0, 512.0)),
            "corners on shared edges must count as contained"
        );
    }

    #[test]
    fn test_gap_in_union_defeats_coverage() {
        let mut region = OpaqueRegion::new();
        region.add(RectF::new(0.0, 0.0, 256.0, 512.0));
        // Right half missing: bottom-right corner of the big rect is
        // outside every member.
        assert!(!region.covers(&RectF::new(0.0, 0.0, 512.0, 512.0)));
    }

    #[test]
    fn test_corner_containment_is_an_approximation() {
        // Both corners inside, center uncovered: corner containment
        // reports covered. Documented approximation, not a bug.
        let mut region = OpaqueRegion::new();
        region.add(RectF::new(0.0, 0.0, 100.0, 100.0));
        region.add(RectF::new(400.0, 400.0, 512.0, 512.0));
        assert!(region.covers(&RectF::new(50.0, 50.0, 450.0, 450.0)));
    }

    #[test]
    fn test_empty_rects_are_ignored() {
        let mut region = OpaqueRegion::new();
        region.add(RectF::new(10.0, 10.0, 10.0, 50.0));
        assert!(region.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut region = OpaqueRegion::new();
        region.add(RectF::new(0.0, 0.0, 10.0, 10.0));
        region.clear();
        assert!(region.is_empty());
    }
}
