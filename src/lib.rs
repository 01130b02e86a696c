//! # tileview
//!
//! A zoomable tile-grid viewport with a synchronized overview (minimap).
//!
//! The coordinate engine in [`core`] is pure state arithmetic: which tiles are
//! visible, how the scroll offset follows a zoom change, where the overview
//! indicator sits. [`core::viewport::ViewportController`] owns the state and
//! turns input events into state changes. The [`tiles`] module fetches and
//! caches tile images, and [`ui`] hosts everything in an egui widget.

pub mod core;
pub mod input;
pub mod prelude;
pub mod tiles;

#[cfg(feature = "egui")]
pub mod ui;

pub use crate::core::constants;

// Re-export public API
pub use core::{
    bounds::IndicatorRect,
    config::{TileLoadingConfig, ViewerConfig, ViewportConfig, ZoomFocus},
    geo::{Point, ScrollOffset, Size, TileCoord, ViewportExtent},
    grid::GridIndexer,
    minimap::MinimapMapper,
    viewport::{DragKind, DragState, InteractionMode, ViewportController},
    zoom::{ZoomDirection, ZoomTransform},
};

pub use input::{
    events::{EventHandled, InputEvent, KeyCode, PointerTarget, ViewportEvent},
    wheel::WheelAccumulator,
};

pub use tiles::{TileAvailability, TileLoader};

#[cfg(feature = "egui")]
pub use ui::widget::TileViewport;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum TileViewError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },
}

/// Error type alias for convenience
pub type Error = TileViewError;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;
