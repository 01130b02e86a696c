use crate::core::{
    geo::{Point, Size},
    viewport::{DragKind, InteractionMode},
    zoom::ZoomDirection,
};
use serde::{Deserialize, Serialize};

/// Input events the viewport reacts to.
///
/// All positions are in viewport-local pixels (origin at the viewport's
/// top-left corner), including positions over the overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Primary button pressed
    PointerDown {
        position: Point,
        target: PointerTarget,
    },
    /// Pointer moved anywhere (globally captured while a drag is active)
    PointerMove { position: Point },
    /// Primary button released anywhere
    PointerUp,
    /// Mouse wheel; positive `delta_y` scrolls down
    Wheel { delta_y: f64, position: Point },
    /// The hosting scroll surface moved (scrollbar drag, programmatic scroll)
    Scroll { offset: Point },
    /// Click on the overview frame
    MinimapClick { position: Point },
    /// Zoom in/out button
    ZoomButton(ZoomDirection),
    /// Grab/Arrow toggle
    ModeChange(InteractionMode),
    /// Keyboard input
    KeyDown(KeyCode),
    /// Viewport was (re)measured
    Resize { size: Size },
    /// Start of a render tick; runs deferred work
    AnimationFrame,
}

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerTarget {
    /// The scrollable map surface
    Map,
    /// The overview frame outside the indicator
    Minimap,
    /// The viewport indicator inside the overview
    Indicator,
}

/// Keyboard key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Plus,
    Equals,
    Minus,
    Other(u32),
}

impl KeyCode {
    pub fn from_char(c: char) -> Self {
        match c {
            '+' => KeyCode::Plus,
            '=' => KeyCode::Equals,
            '-' => KeyCode::Minus,
            other => KeyCode::Other(other as u32),
        }
    }

    /// The zoom step bound to this key, if any. `+` and `=` share a key on
    /// most layouts, so both zoom in.
    pub fn zoom_direction(self) -> Option<ZoomDirection> {
        match self {
            KeyCode::Plus | KeyCode::Equals => Some(ZoomDirection::In),
            KeyCode::Minus => Some(ZoomDirection::Out),
            KeyCode::Other(_) => None,
        }
    }
}

/// Whether an event was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventHandled {
    /// Consumed; the host should suppress its default behaviour
    Handled,
    NotHandled,
}

impl EventHandled {
    pub fn is_handled(self) -> bool {
        self == EventHandled::Handled
    }
}

/// Notifications emitted by the viewport after state changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewportEvent {
    /// Zoom level changed (the matching scroll write follows on the next frame)
    ZoomChanged { from: u8, to: u8 },
    /// Stored scroll offset changed
    ScrollChanged { offset: Point },
    /// Interaction mode switched
    ModeChanged { mode: InteractionMode },
    /// A map or indicator drag began
    DragStarted { kind: DragKind },
    /// The active drag ended
    DragEnded,
}

impl ViewportEvent {
    /// Listener key used by [`crate::input::handler::EventManager::on`]
    pub fn event_type(&self) -> &'static str {
        match self {
            ViewportEvent::ZoomChanged { .. } => "zoomchanged",
            ViewportEvent::ScrollChanged { .. } => "scrollchanged",
            ViewportEvent::ModeChanged { .. } => "modechanged",
            ViewportEvent::DragStarted { .. } => "dragstart",
            ViewportEvent::DragEnded => "dragend",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        assert_eq!(KeyCode::from_char('+').zoom_direction(), Some(ZoomDirection::In));
        assert_eq!(KeyCode::from_char('=').zoom_direction(), Some(ZoomDirection::In));
        assert_eq!(KeyCode::from_char('-').zoom_direction(), Some(ZoomDirection::Out));
        assert_eq!(KeyCode::from_char('a').zoom_direction(), None);
    }
}
