use crate::core::bounds::IndicatorRect;
use crate::core::config::ViewportConfig;
use crate::core::constants::{INDICATOR_INSET, OVERVIEW_MARGIN};
use crate::core::frame::{FrameScheduler, FrameUpdate};
use crate::core::geo::{Point, ScrollOffset, Size, TileCoord};
use crate::core::grid::GridIndexer;
use crate::core::minimap::MinimapMapper;
use crate::core::zoom::{ZoomDirection, ZoomTransform};
use crate::input::events::{EventHandled, InputEvent, KeyCode, PointerTarget, ViewportEvent};
use crate::input::handler::EventManager;
use crate::input::wheel::WheelAccumulator;
use crate::Result;
use serde::{Deserialize, Serialize};

pub use crate::core::config::ZoomFocus;

/// Whether the map surface pans natively (Arrow) or is grabbed and wheel-zoomed (Grab)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InteractionMode {
    #[default]
    Arrow,
    Grab,
}

/// The two kinds of drag gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DragKind {
    Map,
    Indicator,
}

/// Active drag gesture, at most one at a time
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Panning the map; holds the pointer position seen on the last move
    DraggingMap { last_pointer: Point },
    /// Dragging the indicator across the overview
    DraggingIndicator,
}

impl DragState {
    pub fn is_idle(&self) -> bool {
        matches!(self, DragState::Idle)
    }

    pub fn kind(&self) -> Option<DragKind> {
        match self {
            DragState::Idle => None,
            DragState::DraggingMap { .. } => Some(DragKind::Map),
            DragState::DraggingIndicator => Some(DragKind::Indicator),
        }
    }
}

/// Owns the viewport state (zoom, scroll, mode, drag) and is its only mutator.
///
/// Every input goes through one of the `on_*` handlers, or through
/// [`ViewportController::handle_event`]. Handlers run to completion and queue
/// [`ViewportEvent`] notifications, which the host collects with
/// [`ViewportController::drain_events`].
///
/// A zoom change updates the zoom level immediately and schedules the matching
/// scroll write for the next [`ViewportController::on_animation_frame`], after
/// the host has laid out the new grid. Native scroll samples are coalesced to
/// one per frame the same way.
#[derive(Debug)]
pub struct ViewportController {
    config: ViewportConfig,
    zoom: u8,
    scroll: ScrollOffset,
    viewport: Size,
    mode: InteractionMode,
    drag: DragState,
    wheel: WheelAccumulator,
    minimap: MinimapMapper,
    /// Explicit overview placement; `None` docks it to the bottom-right corner
    minimap_origin: Option<Point>,
    frames: FrameScheduler,
    events: EventManager,
}

impl ViewportController {
    pub fn new(config: ViewportConfig) -> Result<Self> {
        config.validate()?;
        log::debug!(
            "viewport controller: tile_size={} zoom={}..={} viewport={}x{}",
            config.tile_size,
            config.min_zoom,
            config.max_zoom,
            config.viewport.width,
            config.viewport.height
        );

        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: ViewportConfig) -> Self {
        Self {
            zoom: config.initial_zoom,
            scroll: Point::default(),
            viewport: config.viewport,
            mode: InteractionMode::default(),
            drag: DragState::default(),
            wheel: WheelAccumulator::new(config.wheel_threshold),
            minimap: MinimapMapper::new(config.overview_size),
            minimap_origin: None,
            frames: FrameScheduler::new(),
            events: EventManager::new(),
            config,
        }
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    /// Scroll offset currently applied to the hosting surface
    pub fn scroll(&self) -> ScrollOffset {
        self.scroll
    }

    /// Post-zoom scroll write waiting for the next frame
    pub fn pending_scroll(&self) -> Option<ScrollOffset> {
        self.frames.pending_write()
    }

    /// The offset new gestures build on: the pending write when a zoom is
    /// still settling, the applied offset otherwise.
    pub fn effective_scroll(&self) -> ScrollOffset {
        self.frames.pending_write().unwrap_or(self.scroll)
    }

    /// Whether the next animation frame has work to do
    pub fn has_pending_frame(&self) -> bool {
        self.frames.has_pending()
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn wheel_accumulated(&self) -> f64 {
        self.wheel.accumulated()
    }

    pub fn can_zoom_in(&self) -> bool {
        self.zoom < self.config.max_zoom
    }

    pub fn can_zoom_out(&self) -> bool {
        self.zoom > self.config.min_zoom
    }

    /// Grid edge length in pixels at the current zoom
    pub fn grid_size(&self) -> f64 {
        ZoomTransform::grid_size(self.config.tile_size, self.zoom)
    }

    /// Offset at which the grid is drawn when it is smaller than the viewport
    pub fn letterbox_inset(&self) -> Point {
        ZoomTransform::letterbox_inset(self.viewport, self.grid_size())
    }

    /// Largest scroll offset the hosting surface allows per axis
    pub fn max_scroll(&self) -> Point {
        let grid = self.grid_size();
        Point::new(
            (grid - self.viewport.width).max(0.0),
            (grid - self.viewport.height).max(0.0),
        )
    }

    /// Clamps `offset` into the scrollable range. Non-finite input keeps the
    /// current offset.
    pub fn clamp_scroll(&self, offset: ScrollOffset) -> ScrollOffset {
        if !offset.is_finite() {
            return self.scroll;
        }
        offset.clamp(&Point::new(0.0, 0.0), &self.max_scroll())
    }

    pub fn visible_tiles(&self) -> Vec<TileCoord> {
        GridIndexer::visible_tiles(
            self.scroll,
            self.zoom,
            self.viewport,
            self.config.tile_size,
            self.config.overscan_tiles,
        )
    }

    /// Viewport indicator in overview pixels, relative to the overview's top-left
    pub fn indicator_rect(&self) -> IndicatorRect {
        self.minimap
            .indicator_rect(self.scroll, self.zoom, self.viewport, self.config.tile_size)
    }

    /// Indicator as drawn: extent clamped so the outline stays inside the overview
    pub fn display_indicator_rect(&self) -> IndicatorRect {
        self.indicator_rect()
            .clamped_for_display(self.minimap.overview_size() - INDICATOR_INSET)
    }

    pub fn overview_size(&self) -> f64 {
        self.minimap.overview_size()
    }

    /// Top-left corner of the overview in viewport-local pixels
    pub fn minimap_origin(&self) -> Point {
        self.minimap_origin.unwrap_or_else(|| {
            let inset = self.minimap.overview_size() + OVERVIEW_MARGIN;
            Point::new(
                (self.viewport.width - inset).max(0.0),
                (self.viewport.height - inset).max(0.0),
            )
        })
    }

    pub fn set_minimap_origin(&mut self, origin: Option<Point>) {
        self.minimap_origin = origin;
    }

    /// Listener registration and queue access
    pub fn events_mut(&mut self) -> &mut EventManager {
        &mut self.events
    }

    /// Returns queued notifications in emission order
    pub fn drain_events(&mut self) -> Vec<ViewportEvent> {
        self.events.process_events()
    }

    /// Single ordered entry point for every input
    pub fn handle_event(&mut self, event: InputEvent) -> EventHandled {
        match event {
            InputEvent::PointerDown { position, target } => self.on_pointer_down(position, target),
            InputEvent::PointerMove { position } => self.on_pointer_move(position),
            InputEvent::PointerUp => self.on_pointer_up(),
            InputEvent::Wheel { delta_y, position } => self.on_wheel(delta_y, position),
            InputEvent::Scroll { offset } => self.on_scroll(offset),
            InputEvent::MinimapClick { position } => self.on_minimap_click(position),
            InputEvent::ZoomButton(direction) => self.on_zoom_button(direction),
            InputEvent::ModeChange(mode) => self.on_mode_change(mode),
            InputEvent::KeyDown(key) => self.on_key_down(key),
            InputEvent::Resize { size } => self.on_resize(size),
            InputEvent::AnimationFrame => {
                if self.on_animation_frame() {
                    EventHandled::Handled
                } else {
                    EventHandled::NotHandled
                }
            }
        }
    }

    pub fn on_mode_change(&mut self, mode: InteractionMode) -> EventHandled {
        if mode == self.mode {
            return EventHandled::NotHandled;
        }

        if self.mode == InteractionMode::Grab {
            self.wheel.reset();
            if let DragState::DraggingMap { .. } = self.drag {
                self.drag = DragState::Idle;
                self.events.emit(ViewportEvent::DragEnded);
            }
        }

        log::debug!("interaction mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        self.events.emit(ViewportEvent::ModeChanged { mode });
        EventHandled::Handled
    }

    pub fn on_pointer_down(&mut self, position: Point, target: PointerTarget) -> EventHandled {
        if !self.drag.is_idle() {
            log::trace!("ignoring {:?} press during {:?}", target, self.drag);
            return EventHandled::NotHandled;
        }

        let kind = match target {
            PointerTarget::Map if self.mode == InteractionMode::Grab => {
                self.drag = DragState::DraggingMap {
                    last_pointer: position,
                };
                DragKind::Map
            }
            PointerTarget::Indicator => {
                self.drag = DragState::DraggingIndicator;
                DragKind::Indicator
            }
            _ => return EventHandled::NotHandled,
        };

        self.events.emit(ViewportEvent::DragStarted { kind });
        EventHandled::Handled
    }

    pub fn on_pointer_move(&mut self, position: Point) -> EventHandled {
        match self.drag {
            DragState::Idle => EventHandled::NotHandled,
            DragState::DraggingMap { last_pointer } => {
                let delta = position.subtract(&last_pointer);
                self.drag = DragState::DraggingMap {
                    last_pointer: position,
                };
                let target = self.effective_scroll().subtract(&delta);
                self.write_scroll(target);
                EventHandled::Handled
            }
            DragState::DraggingIndicator => {
                let target = self.minimap_target(position);
                self.write_scroll(target);
                EventHandled::Handled
            }
        }
    }

    pub fn on_pointer_up(&mut self) -> EventHandled {
        if self.drag.is_idle() {
            return EventHandled::NotHandled;
        }
        self.drag = DragState::Idle;
        self.events.emit(ViewportEvent::DragEnded);
        EventHandled::Handled
    }

    /// Wheel input. `delta_y > 0` scrolls down. Only Grab mode zooms; in
    /// Arrow mode the host scrolls natively and nothing here changes.
    pub fn on_wheel(&mut self, delta_y: f64, position: Point) -> EventHandled {
        if self.mode != InteractionMode::Grab {
            return EventHandled::NotHandled;
        }

        if let Some(direction) = self.wheel.on_wheel_delta(delta_y) {
            let focal = match self.config.zoom_focus {
                ZoomFocus::ViewportCenter => self.viewport.half(),
                ZoomFocus::Cursor => position,
            };
            self.step_zoom(direction, focal);
        }
        EventHandled::Handled
    }

    /// Native scroll from the hosting surface; applied on the next frame
    pub fn on_scroll(&mut self, offset: ScrollOffset) -> EventHandled {
        if !offset.is_finite() {
            return EventHandled::NotHandled;
        }
        if !self.frames.schedule_scroll_sample(offset) {
            log::trace!("coalesced scroll sample {:?}", offset);
        }
        EventHandled::Handled
    }

    /// Click on the overview: centers the viewport on the clicked map point
    pub fn on_minimap_click(&mut self, position: Point) -> EventHandled {
        let target = self.minimap_target(position);
        self.write_scroll(target);
        EventHandled::Handled
    }

    pub fn on_zoom_button(&mut self, direction: ZoomDirection) -> EventHandled {
        if self.step_zoom(direction, self.viewport.half()) {
            EventHandled::Handled
        } else {
            EventHandled::NotHandled
        }
    }

    pub fn on_key_down(&mut self, key: KeyCode) -> EventHandled {
        match key.zoom_direction() {
            Some(direction) => self.on_zoom_button(direction),
            None => EventHandled::NotHandled,
        }
    }

    /// Jumps to `zoom` (clamped into range), keeping the viewport center fixed.
    pub fn zoom_to(&mut self, zoom: u8) -> bool {
        let target = zoom.clamp(self.config.min_zoom, self.config.max_zoom);
        self.apply_zoom(target, self.viewport.half())
    }

    /// The viewport was measured or resized. Negative or non-finite extents
    /// are ignored.
    pub fn on_resize(&mut self, size: Size) -> EventHandled {
        let valid = size.width.is_finite()
            && size.height.is_finite()
            && size.width >= 0.0
            && size.height >= 0.0;
        if !valid || size == self.viewport {
            return EventHandled::NotHandled;
        }

        log::debug!("viewport resized to {}x{}", size.width, size.height);
        self.viewport = size;
        let clamped = self.clamp_scroll(self.scroll);
        self.commit_scroll(clamped);
        EventHandled::Handled
    }

    /// Start of a render tick. Applies the deferred zoom write-back or the
    /// latest native scroll sample; returns whether the offset changed.
    pub fn on_animation_frame(&mut self) -> bool {
        match self.frames.take_frame() {
            Some(FrameUpdate::DeferredWrite(offset)) => {
                log::trace!("applying deferred scroll write {:?}", offset);
                self.commit_scroll(offset)
            }
            Some(FrameUpdate::ScrollSample(offset)) => self.commit_scroll(offset),
            None => false,
        }
    }

    fn minimap_target(&self, position: Point) -> ScrollOffset {
        let grid = self.grid_size();
        self.minimap
            .pointer_to_scroll(position, self.minimap_origin(), grid, grid, self.viewport)
    }

    fn step_zoom(&mut self, direction: ZoomDirection, focal: Point) -> bool {
        let next = direction.apply(self.zoom, self.config.min_zoom, self.config.max_zoom);
        self.apply_zoom(next, focal)
    }

    fn apply_zoom(&mut self, next: u8, focal: Point) -> bool {
        // Reaching this point means the gesture is spent, even at a bound
        self.wheel.reset();

        if next == self.zoom {
            log::trace!("zoom already at {}, ignoring", self.zoom);
            return false;
        }

        let target = ZoomTransform::next_scroll_about(
            self.effective_scroll(),
            self.viewport,
            self.config.tile_size,
            self.zoom,
            next,
            focal,
        );

        log::debug!("zoom {} -> {}", self.zoom, next);
        let from = self.zoom;
        self.zoom = next;
        self.frames.schedule_write(target);
        self.events.emit(ViewportEvent::ZoomChanged { from, to: next });
        true
    }

    /// Immediate write from a gesture. Replaces anything scheduled, since the
    /// hosting surface now reports this offset.
    fn write_scroll(&mut self, offset: ScrollOffset) -> bool {
        self.frames.clear();
        self.commit_scroll(offset)
    }

    fn commit_scroll(&mut self, offset: ScrollOffset) -> bool {
        let clamped = self.clamp_scroll(offset);
        if clamped == self.scroll {
            return false;
        }
        self.scroll = clamped;
        self.events.emit(ViewportEvent::ScrollChanged { offset: clamped });
        true
    }
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::with_valid_config(ViewportConfig::default())
    }
}
