use serde::{Deserialize, Serialize};

/// A point in viewport-local or map-canvas pixel coordinates.
///
/// Scroll offsets, pointer positions and focal points all use this type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// The pixel coordinate of the viewport's top-left corner within the full map canvas.
pub type ScrollOffset = Point;

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn multiply(&self, scalar: f64) -> Point {
        Point::new(self.x * scalar, self.y * scalar)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Clamps each axis independently into `[min, max]`.
    pub fn clamp(&self, min: &Point, max: &Point) -> Point {
        Point::new(self.x.clamp(min.x, max.x), self.y.clamp(min.y, max.y))
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Width and height of a window in pixels. Used for the viewport extent,
/// which does not depend on zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// The fixed (width, height) of the visible window.
pub type ViewportExtent = Size;

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Half of the extent, i.e. the viewport's logical center relative to its top-left.
    pub fn half(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Size {
    fn default() -> Self {
        let (width, height) = crate::core::constants::DEFAULT_VIEWPORT;
        Self::new(width, height)
    }
}

/// Identifies one grid cell: `(zoom, x, y)` with `0 <= x, y < 2^zoom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u8, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Number of tiles along one side of the square grid at `zoom`.
    pub fn tiles_per_side(zoom: u8) -> u64 {
        1u64.checked_shl(u32::from(zoom)).unwrap_or(u64::MAX)
    }

    /// Checks if the tile is inside the grid for its zoom level
    pub fn is_valid(&self) -> bool {
        let side = Self::tiles_per_side(self.z);
        u64::from(self.x) < side && u64::from(self.y) < side
    }
}

impl std::fmt::Display for TileCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_arithmetic() {
        let a = Point::new(3.0, 4.0);
        let b = Point::new(1.0, 1.0);
        assert_eq!(a.add(&b), Point::new(4.0, 5.0));
        assert_eq!(a.subtract(&b), Point::new(2.0, 3.0));
        assert_eq!(a.multiply(2.0), Point::new(6.0, 8.0));
    }

    #[test]
    fn test_point_clamp_per_axis() {
        let p = Point::new(-5.0, 900.0);
        let clamped = p.clamp(&Point::new(0.0, 0.0), &Point::new(100.0, 200.0));
        assert_eq!(clamped, Point::new(0.0, 200.0));
    }

    #[test]
    fn test_tile_coord_validity() {
        assert!(TileCoord::new(0, 0, 0).is_valid());
        assert!(!TileCoord::new(0, 1, 0).is_valid());
        assert!(TileCoord::new(3, 7, 7).is_valid());
        assert!(!TileCoord::new(3, 8, 0).is_valid());
    }

    #[test]
    fn test_tile_display() {
        assert_eq!(TileCoord::new(3, 4, 5).to_string(), "3/4/5");
    }
}
