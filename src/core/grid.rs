//! Visible-tile enumeration for a scroll offset and zoom level.

use crate::core::geo::{Point, Size, TileCoord};

/// Stateless helper that computes which grid cells a viewport needs.
///
/// The set is recomputed from scratch on every call; callers never patch a
/// previous result.
pub struct GridIndexer;

impl GridIndexer {
    /// Returns every tile whose pixel rectangle falls in the viewport window,
    /// extended by `overscan` tiles past the trailing (right/bottom) edges.
    ///
    /// Tiles are ordered column by column (`x` outer, `y` inner). Indices that
    /// would fall outside `[0, 2^zoom)` are dropped, so a negative or
    /// out-of-range scroll yields a partial or empty set, never invalid coordinates.
    pub fn visible_tiles(
        scroll: Point,
        zoom: u8,
        viewport: Size,
        tile_size: u32,
        overscan: u32,
    ) -> Vec<TileCoord> {
        let tile = f64::from(tile_size);
        let last = (TileCoord::tiles_per_side(zoom) - 1).min(u64::from(u32::MAX)) as f64;

        let (tiles_per_row, tiles_per_col) = Self::tiles_across(viewport, tile_size, overscan);

        // Both ends inclusive, clipped to the grid while still in f64 so huge
        // offsets cannot overflow the index arithmetic
        let window = |offset: f64, across: u64| {
            let start = (offset / tile).floor();
            let end = start + across as f64;
            (start.max(0.0), end.min(last))
        };
        let (min_x, max_x) = window(scroll.x, tiles_per_row);
        let (min_y, max_y) = window(scroll.y, tiles_per_col);
        if !(min_x <= max_x && min_y <= max_y) {
            return Vec::new();
        }

        let mut tiles = Vec::new();
        for x in min_x as u32..=max_x as u32 {
            for y in min_y as u32..=max_y as u32 {
                tiles.push(TileCoord::new(zoom, x, y));
            }
        }
        tiles
    }

    /// Columns and rows spanned by the viewport plus overscan.
    pub fn tiles_across(viewport: Size, tile_size: u32, overscan: u32) -> (u64, u64) {
        let tile = f64::from(tile_size);
        let across = |extent: f64| {
            ((extent.max(0.0) / tile).ceil() as u64).saturating_add(u64::from(overscan))
        };
        (across(viewport.width), across(viewport.height))
    }
}
