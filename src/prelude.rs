//! Prelude module for common tileview types and traits
//!
//! Re-exports the most commonly used types for `use tileview::prelude::*;`

pub use crate::core::{
    bounds::IndicatorRect,
    config::{TileLoadingConfig, ViewerConfig, ViewportConfig, ZoomFocus},
    frame::{FrameScheduler, FrameUpdate},
    geo::{Point, ScrollOffset, Size, TileCoord, ViewportExtent},
    grid::GridIndexer,
    minimap::MinimapMapper,
    viewport::{DragKind, DragState, InteractionMode, ViewportController},
    zoom::{ZoomDirection, ZoomTransform},
};

pub use crate::input::{
    events::{EventHandled, InputEvent, KeyCode, PointerTarget, ViewportEvent},
    handler::EventManager,
    wheel::WheelAccumulator,
};

pub use crate::tiles::{
    FetchOutcome, HttpFetcher, TileAvailability, TileCache, TileEntry, TileFetcher, TileLoader,
    TileSource, UrlTemplateSource,
};

#[cfg(feature = "egui")]
pub use crate::ui::{widget::TileViewport, TileViewportExt};

pub use crate::{Error, Result, TileViewError};

pub use std::{sync::Arc, time::Duration};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
