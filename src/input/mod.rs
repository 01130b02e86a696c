pub mod events;
pub mod handler;
pub mod wheel;

// Re-export the essential types
pub use events::{EventHandled, InputEvent, KeyCode, PointerTarget, ViewportEvent};
pub use handler::{EventCallback, EventManager};
pub use wheel::WheelAccumulator;
