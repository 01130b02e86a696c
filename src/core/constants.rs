//! Core constants for the tile grid, the zoom range and the overview widget.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default square tile edge in pixels. Identical at every zoom level: a higher
/// zoom means more tiles, never larger ones.
pub const TILE_SIZE: u32 = 512;

/// Lowest zoom level (a single tile).
pub const MIN_ZOOM: u8 = 0;

/// Highest zoom level offered by default.
pub const MAX_ZOOM: u8 = 3;

/// Upper bound accepted for a configured `max_zoom`; keeps `2^zoom * tile_size`
/// well inside the exactly representable `f64` range.
pub const MAX_SUPPORTED_ZOOM: u8 = 24;

/// Edge length of the square overview (minimap) in pixels.
pub const OVERVIEW_SIZE: f64 = 200.0;

/// Accumulated wheel delta that triggers one discrete zoom step.
pub const WHEEL_THRESHOLD: f64 = 100.0;

/// Extra rows/columns of tiles requested past the trailing viewport edge.
pub const OVERSCAN_TILES: u32 = 3;

/// The indicator is drawn at most `OVERVIEW_SIZE - INDICATOR_INSET` wide/high
/// so its border stays inside the overview frame.
pub const INDICATOR_INSET: f64 = 2.0;

/// Viewport extent used until the host reports a measured size.
pub const DEFAULT_VIEWPORT: (f64, f64) = (1400.0, 800.0);

/// Gap between the overview and the bottom-right corner of the viewport.
pub const OVERVIEW_MARGIN: f64 = 16.0;
