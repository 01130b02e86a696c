use crate::core::zoom::ZoomDirection;

/// Turns a stream of wheel deltas into discrete zoom steps.
///
/// Deltas add up until their magnitude reaches the threshold; then one step
/// fires in the direction of the accumulated sign and the total resets to zero.
/// A positive total (wheel scrolled down/towards the user) zooms out.
///
/// The owner is responsible for mode gating: deltas received while zooming is
/// disabled must not be fed in, and [`WheelAccumulator::reset`] must be called
/// when the wheel-zoom mode is left.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelAccumulator {
    accumulated: f64,
    threshold: f64,
}

impl WheelAccumulator {
    pub fn new(threshold: f64) -> Self {
        Self {
            accumulated: 0.0,
            threshold,
        }
    }

    /// Adds `delta_y` and reports a step once the threshold is crossed.
    pub fn on_wheel_delta(&mut self, delta_y: f64) -> Option<ZoomDirection> {
        if !delta_y.is_finite() {
            return None;
        }

        self.accumulated += delta_y;
        if self.accumulated.abs() < self.threshold {
            return None;
        }

        let direction = if self.accumulated > 0.0 {
            ZoomDirection::Out
        } else {
            ZoomDirection::In
        };
        self.accumulated = 0.0;
        Some(direction)
    }

    pub fn accumulated(&self) -> f64 {
        self.accumulated
    }

    pub fn reset(&mut self) {
        self.accumulated = 0.0;
    }
}

impl Default for WheelAccumulator {
    fn default() -> Self {
        Self::new(crate::core::constants::WHEEL_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_deltas_accumulate_to_one_step() {
        let mut wheel = WheelAccumulator::new(100.0);
        assert_eq!(wheel.on_wheel_delta(40.0), None);
        assert_eq!(wheel.on_wheel_delta(40.0), None);
        assert_eq!(wheel.accumulated(), 80.0);
        assert_eq!(wheel.on_wheel_delta(40.0), Some(ZoomDirection::Out));
        assert_eq!(wheel.accumulated(), 0.0);
    }

    #[test]
    fn test_negative_deltas_zoom_in() {
        let mut wheel = WheelAccumulator::new(100.0);
        assert_eq!(wheel.on_wheel_delta(-120.0), Some(ZoomDirection::In));
    }

    #[test]
    fn test_opposite_deltas_cancel() {
        let mut wheel = WheelAccumulator::new(100.0);
        assert_eq!(wheel.on_wheel_delta(90.0), None);
        assert_eq!(wheel.on_wheel_delta(-90.0), None);
        assert_eq!(wheel.accumulated(), 0.0);
    }

    #[test]
    fn test_exact_threshold_fires() {
        let mut wheel = WheelAccumulator::new(100.0);
        assert_eq!(wheel.on_wheel_delta(100.0), Some(ZoomDirection::Out));
    }

    #[test]
    fn test_non_finite_delta_is_ignored() {
        let mut wheel = WheelAccumulator::new(100.0);
        wheel.on_wheel_delta(30.0);
        assert_eq!(wheel.on_wheel_delta(f64::NAN), None);
        assert_eq!(wheel.accumulated(), 30.0);
    }
}
