//! Scroll-offset recomputation across zoom changes.
//!
//! The grid is always square: `tile_size * 2^zoom` pixels per side. When the
//! grid is narrower than the viewport the hosting surface centers it, leaving a
//! letterbox inset of `max(viewport - grid, 0) / 2` on each side. Every
//! transform here keeps the *fractional* map position under a focal point
//! fixed, and accounts for that inset on both the read and the write side.

use crate::core::geo::{Point, ScrollOffset, Size};
use serde::{Deserialize, Serialize};

/// One discrete zoom step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Signed level change: `+1` for `In`, `-1` for `Out`.
    pub fn delta(self) -> i32 {
        match self {
            ZoomDirection::In => 1,
            ZoomDirection::Out => -1,
        }
    }

    /// Applies one step and clamps the result into `[min_zoom, max_zoom]`.
    pub fn apply(self, zoom: u8, min_zoom: u8, max_zoom: u8) -> u8 {
        let next = i32::from(zoom) + self.delta();
        next.clamp(i32::from(min_zoom), i32::from(max_zoom)) as u8
    }
}

/// Stateless zoom transform.
pub struct ZoomTransform;

impl ZoomTransform {
    /// Full grid edge length in pixels at `zoom`.
    pub fn grid_size(tile_size: u32, zoom: u8) -> f64 {
        f64::from(tile_size) * 2_f64.powi(i32::from(zoom))
    }

    /// Letterbox inset per axis when the grid is smaller than the viewport.
    pub fn letterbox_inset(viewport: Size, grid: f64) -> Point {
        Point::new(
            (viewport.width - grid).max(0.0) / 2.0,
            (viewport.height - grid).max(0.0) / 2.0,
        )
    }

    /// New scroll offset at `to_zoom` that keeps the map point at the
    /// viewport's logical center at the center again.
    pub fn next_scroll(
        scroll: ScrollOffset,
        viewport: Size,
        tile_size: u32,
        from_zoom: u8,
        to_zoom: u8,
    ) -> ScrollOffset {
        Self::next_scroll_about(scroll, viewport, tile_size, from_zoom, to_zoom, viewport.half())
    }

    /// Same as [`ZoomTransform::next_scroll`], keeping the map point under
    /// `focal` fixed instead. `focal` is a pixel offset from the viewport's
    /// top-left corner; the same offset is used to read the old map point and
    /// to place it again, so repeated steps do not drift.
    pub fn next_scroll_about(
        scroll: ScrollOffset,
        viewport: Size,
        tile_size: u32,
        from_zoom: u8,
        to_zoom: u8,
        focal: Point,
    ) -> ScrollOffset {
        let prev_grid = Self::grid_size(tile_size, from_zoom);
        let new_grid = Self::grid_size(tile_size, to_zoom);
        let prev_inset = Self::letterbox_inset(viewport, prev_grid);
        let new_inset = Self::letterbox_inset(viewport, new_grid);

        // Map-space point under the focal offset, as a fraction of the old grid
        let anchor = scroll.subtract(&prev_inset).add(&focal);
        let fraction = anchor.multiply(1.0 / prev_grid);

        fraction
            .multiply(new_grid)
            .subtract(&focal)
            .add(&new_inset)
    }

    /// Fractional map position (0..1 inside the grid) currently under `focal`.
    pub fn fraction_at(
        scroll: ScrollOffset,
        viewport: Size,
        tile_size: u32,
        zoom: u8,
        focal: Point,
    ) -> Point {
        let grid = Self::grid_size(tile_size, zoom);
        let inset = Self::letterbox_inset(viewport, grid);
        scroll.subtract(&inset).add(&focal).multiply(1.0 / grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Size = Size {
        width: 1400.0,
        height: 800.0,
    };

    fn assert_close(a: Point, b: Point) {
        let tol = 1e-6 * (1.0 + b.x.abs().max(b.y.abs()));
        assert!(
            (a.x - b.x).abs() <= tol && (a.y - b.y).abs() <= tol,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn test_direction_clamps_at_bounds() {
        assert_eq!(ZoomDirection::In.apply(2, 0, 3), 3);
        assert_eq!(ZoomDirection::In.apply(3, 0, 3), 3);
        assert_eq!(ZoomDirection::Out.apply(0, 0, 3), 0);
        assert_eq!(ZoomDirection::Out.apply(1, 0, 3), 0);
    }

    #[test]
    fn test_letterboxed_grid_zooms_into_its_center() {
        // Zoom 0 grid (512) is narrower than both viewport axes, so it is
        // letterboxed and its center sits under the viewport center
        let next = ZoomTransform::next_scroll(Point::new(0.0, 0.0), VIEWPORT, 512, 0, 1);
        // Zoom 1 grid is 1024: still letterboxed horizontally (inset 188),
        // overflowing vertically (inset 0)
        assert_close(next, Point::new(0.0 - 700.0 + 512.0 + 188.0, 512.0 - 400.0));
    }

    #[test]
    fn test_center_point_is_preserved() {
        let scroll = Point::new(1300.0, 900.0);
        let before = ZoomTransform::fraction_at(scroll, VIEWPORT, 512, 2, VIEWPORT.half());
        let next = ZoomTransform::next_scroll(scroll, VIEWPORT, 512, 2, 3);
        let after = ZoomTransform::fraction_at(next, VIEWPORT, 512, 3, VIEWPORT.half());
        assert_close(after, before);
    }

    #[test]
    fn test_round_trip_restores_offset() {
        for zoom in 0..3u8 {
            let scroll = Point::new(37.5 * f64::from(zoom + 1), 211.0);
            let up = ZoomTransform::next_scroll(scroll, VIEWPORT, 512, zoom, zoom + 1);
            let back = ZoomTransform::next_scroll(up, VIEWPORT, 512, zoom + 1, zoom);
            assert_close(back, scroll);
        }
    }

    #[test]
    fn test_focal_point_round_trip_does_not_drift() {
        let focal = Point::new(120.0, 640.0);
        let mut scroll = Point::new(2000.0, 1500.0);
        let start = scroll;
        for _ in 0..5 {
            scroll = ZoomTransform::next_scroll_about(scroll, VIEWPORT, 512, 3, 2, focal);
            scroll = ZoomTransform::next_scroll_about(scroll, VIEWPORT, 512, 2, 3, focal);
        }
        assert_close(scroll, start);
    }

    #[test]
    fn test_focal_point_stays_under_cursor() {
        let focal = Point::new(300.0, 100.0);
        let scroll = Point::new(800.0, 400.0);
        let before = ZoomTransform::fraction_at(scroll, VIEWPORT, 512, 2, focal);
        let next = ZoomTransform::next_scroll_about(scroll, VIEWPORT, 512, 2, 3, focal);
        let after = ZoomTransform::fraction_at(next, VIEWPORT, 512, 3, focal);
        assert_close(after, before);
    }

    #[test]
    fn test_same_zoom_is_identity() {
        let scroll = Point::new(123.0, 456.0);
        assert_close(
            ZoomTransform::next_scroll(scroll, VIEWPORT, 512, 2, 2),
            scroll,
        );
    }
}
