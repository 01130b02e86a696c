//! Mapping between the overview (minimap) and the main viewport.
//!
//! The overview always shows the whole map, so one overview pixel stands for
//! `grid / overview_size` map pixels at the current zoom.

use crate::core::bounds::IndicatorRect;
use crate::core::geo::{Point, ScrollOffset, Size};
use crate::core::zoom::ZoomTransform;

/// Stateless overview mapping. Carries only the overview's edge length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimapMapper {
    overview_size: f64,
}

impl MinimapMapper {
    pub fn new(overview_size: f64) -> Self {
        Self { overview_size }
    }

    pub fn overview_size(&self) -> f64 {
        self.overview_size
    }

    /// Position and extent of the main viewport in overview pixels.
    pub fn indicator_rect(
        &self,
        scroll: ScrollOffset,
        zoom: u8,
        viewport: Size,
        tile_size: u32,
    ) -> IndicatorRect {
        let scale = self.overview_size / ZoomTransform::grid_size(tile_size, zoom);
        IndicatorRect::new(
            scroll.x * scale,
            scroll.y * scale,
            viewport.width * scale,
            viewport.height * scale,
        )
    }

    /// Fraction of the overview under `pointer`, clamped to `[0, 1]` per axis.
    pub fn pointer_fraction(&self, pointer: Point, minimap_origin: Point) -> Point {
        let relative = pointer.subtract(&minimap_origin).multiply(1.0 / self.overview_size);
        relative.clamp(&Point::new(0.0, 0.0), &Point::new(1.0, 1.0))
    }

    /// Scroll offset that centers the viewport on the map point under
    /// `pointer`. Used for both clicks on the overview and indicator drags.
    pub fn pointer_to_scroll(
        &self,
        pointer: Point,
        minimap_origin: Point,
        grid_width: f64,
        grid_height: f64,
        viewport: Size,
    ) -> ScrollOffset {
        let fraction = self.pointer_fraction(pointer, minimap_origin);
        Point::new(
            fraction.x * grid_width - viewport.width / 2.0,
            fraction.y * grid_height - viewport.height / 2.0,
        )
    }
}

impl Default for MinimapMapper {
    fn default() -> Self {
        Self::new(crate::core::constants::OVERVIEW_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> MinimapMapper {
        MinimapMapper::new(200.0)
    }

    #[test]
    fn test_indicator_rect_scales_with_zoom() {
        let viewport = Size::new(1400.0, 800.0);
        let rect = mapper().indicator_rect(Point::new(1024.0, 512.0), 3, viewport, 512);
        // Zoom 3 grid is 4096 px, so one overview px = 20.48 map px
        assert_eq!(rect.left, 50.0);
        assert_eq!(rect.top, 25.0);
        assert_eq!(rect.width, 1400.0 / 4096.0 * 200.0);
        assert_eq!(rect.height, 800.0 / 4096.0 * 200.0);
    }

    #[test]
    fn test_click_center_centers_viewport() {
        let scroll = mapper().pointer_to_scroll(
            Point::new(100.0, 100.0),
            Point::new(0.0, 0.0),
            4096.0,
            4096.0,
            Size::new(1400.0, 800.0),
        );
        assert_eq!(scroll, Point::new(1348.0, 1648.0));
    }

    #[test]
    fn test_pointer_outside_overview_is_clamped() {
        let origin = Point::new(1000.0, 500.0);
        let fraction = mapper().pointer_fraction(Point::new(900.0, 900.0), origin);
        assert_eq!(fraction, Point::new(0.0, 1.0));
    }

    #[test]
    fn test_indicator_center_feeds_back_to_same_scroll() {
        let viewport = Size::new(1400.0, 800.0);
        let scroll = Point::new(1200.0, 900.0);
        let origin = Point::new(30.0, 40.0);
        let rect = mapper().indicator_rect(scroll, 3, viewport, 512);
        let back = mapper().pointer_to_scroll(
            Point::new(rect.left + rect.width / 2.0, rect.top + rect.height / 2.0).add(&origin),
            origin,
            4096.0,
            4096.0,
            viewport,
        );
        assert!((back.x - scroll.x).abs() < 1e-9);
        assert!((back.y - scroll.y).abs() < 1e-9);
    }
}
