use serde::{Deserialize, Serialize};

/// The main viewport's position and extent, expressed in overview pixels.
///
/// Always derived from `(zoom, scroll, viewport)`; never stored as state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl IndicatorRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Width/height limited to `max_extent` so a bordered indicator stays inside
    /// the overview frame. For display only; the unclamped rect stays authoritative.
    pub fn clamped_for_display(&self, max_extent: f64) -> IndicatorRect {
        IndicatorRect::new(
            self.left,
            self.top,
            self.width.min(max_extent),
            self.height.min(max_extent),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_display_clamp_keeps_origin() {
        let rect = IndicatorRect::new(4.0, 6.0, 546.875, 312.5);
        let shown = rect.clamped_for_display(198.0);
        assert_eq!(shown, IndicatorRect::new(4.0, 6.0, 198.0, 198.0));
        // Source rect is untouched
        assert_eq!(rect.width, 546.875);
    }
}
