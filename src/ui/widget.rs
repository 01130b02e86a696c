use crate::{
    core::{
        config::ViewerConfig,
        geo::{Point, Size, TileCoord},
        viewport::{DragState, InteractionMode, ViewportController},
        zoom::ZoomDirection,
    },
    input::events::{EventHandled, InputEvent, KeyCode, PointerTarget, ViewportEvent},
    prelude::{HashMap, HashSet},
    tiles::{TileAvailability, TileLoader},
    Result,
};
use egui::{Color32, ColorImage, CursorIcon, Pos2, Rect, Response, Sense, Stroke, Ui, Vec2};

const BUTTON_SIZE: Vec2 = Vec2::new(34.0, 26.0);
const MODE_BUTTON_SIZE: Vec2 = Vec2::new(72.0, 26.0);
const CONTROL_MARGIN: f32 = 16.0;
const CONTROL_GAP: f32 = 8.0;

const ACCENT: Color32 = Color32::from_rgb(240, 176, 64);
const DISABLED: Color32 = Color32::from_gray(160);
const PLACEHOLDER_FILL: Color32 = Color32::from_gray(248);
const PLACEHOLDER_STROKE: Color32 = Color32::from_gray(204);
const OVERVIEW_FILL: Color32 = Color32::from_rgb(34, 34, 34);

/// What a screen position lands on, topmost first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    ZoomIn,
    ZoomOut,
    Mode(InteractionMode),
    Indicator,
    Minimap,
    Map,
    Outside,
}

/// Screen rectangles of everything the widget draws, for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportLayout {
    pub map: Rect,
    pub minimap: Rect,
    pub indicator: Rect,
    pub zoom_out: Rect,
    pub zoom_in: Rect,
    pub grab_button: Rect,
    pub arrow_button: Rect,
}

impl ViewportLayout {
    pub fn new(map: Rect, controller: &ViewportController) -> Self {
        let origin = controller.minimap_origin();
        let overview = controller.overview_size() as f32;
        let minimap = Rect::from_min_size(
            map.min + Vec2::new(origin.x as f32, origin.y as f32),
            Vec2::splat(overview),
        );

        let indicator = controller.display_indicator_rect();
        let indicator = Rect::from_min_size(
            minimap.min + Vec2::new(indicator.left as f32, indicator.top as f32),
            Vec2::new(indicator.width as f32, indicator.height as f32),
        );

        // Zoom buttons bottom-left, mode toggle top-right
        let zoom_out = Rect::from_min_size(
            map.left_bottom() + Vec2::new(CONTROL_MARGIN, -CONTROL_MARGIN - BUTTON_SIZE.y),
            BUTTON_SIZE,
        );
        let zoom_in = zoom_out.translate(Vec2::new(BUTTON_SIZE.x + CONTROL_GAP, 0.0));

        let arrow_button = Rect::from_min_size(
            map.right_top() + Vec2::new(-CONTROL_MARGIN - MODE_BUTTON_SIZE.x, CONTROL_MARGIN),
            MODE_BUTTON_SIZE,
        );
        let grab_button = arrow_button.translate(Vec2::new(-MODE_BUTTON_SIZE.x - CONTROL_GAP, 0.0));

        Self {
            map,
            minimap,
            indicator,
            zoom_out,
            zoom_in,
            grab_button,
            arrow_button,
        }
    }

    pub fn hit_test(&self, pos: Pos2) -> Hit {
        if !self.map.contains(pos) {
            Hit::Outside
        } else if self.zoom_in.contains(pos) {
            Hit::ZoomIn
        } else if self.zoom_out.contains(pos) {
            Hit::ZoomOut
        } else if self.grab_button.contains(pos) {
            Hit::Mode(InteractionMode::Grab)
        } else if self.arrow_button.contains(pos) {
            Hit::Mode(InteractionMode::Arrow)
        } else if self.indicator.contains(pos) {
            Hit::Indicator
        } else if self.minimap.contains(pos) {
            Hit::Minimap
        } else {
            Hit::Map
        }
    }

    /// Screen position to viewport-local pixels
    pub fn to_local(&self, pos: Pos2) -> Point {
        Point::new(
            f64::from(pos.x - self.map.min.x),
            f64::from(pos.y - self.map.min.y),
        )
    }
}

/// Decoded tile texture, or `None` when the bytes were not a readable image
type TileTexture = Option<egui::TextureHandle>;

/// Stateful tile viewport widget: owns the controller and the tile loader,
/// translates egui input each frame and paints the grid, the overview and
/// the controls.
pub struct TileViewport {
    controller: ViewportController,
    loader: TileLoader,
    textures: HashMap<TileCoord, TileTexture>,
    recent_events: Vec<ViewportEvent>,
    /// The primary button went down on the overview (frame or indicator);
    /// releasing it over the overview counts as a click there
    overview_pressed: bool,
}

impl TileViewport {
    pub fn new(controller: ViewportController, loader: TileLoader) -> Self {
        Self {
            controller,
            loader,
            textures: HashMap::default(),
            recent_events: Vec::new(),
            overview_pressed: false,
        }
    }

    /// Builds the controller and an HTTP loader that repaints `ctx` whenever
    /// a tile arrives.
    pub fn from_config(config: &ViewerConfig, ctx: &egui::Context) -> Result<Self> {
        let controller = ViewportController::new(config.viewport.clone())?;
        let repaint = ctx.clone();
        let loader = TileLoader::from_config(&config.tiles)?.with_notifier(move || repaint.request_repaint());
        Ok(Self::new(controller, loader))
    }

    pub fn controller(&self) -> &ViewportController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ViewportController {
        &mut self.controller
    }

    pub fn loader(&self) -> &TileLoader {
        &self.loader
    }

    /// Notifications produced during the last `show`
    pub fn recent_events(&self) -> &[ViewportEvent] {
        &self.recent_events
    }

    pub fn retry_failed_tiles(&mut self) -> usize {
        self.loader.retry_failed()
    }

    pub fn show(&mut self, ui: &mut Ui) -> Response {
        let desired_size = ui.available_size();
        let (rect, response) = ui.allocate_exact_size(desired_size, Sense::click_and_drag());

        self.controller.on_resize(Size::new(
            f64::from(rect.width()),
            f64::from(rect.height()),
        ));
        self.controller.on_animation_frame();

        self.handle_input(ui, rect, &response);

        let root = TileCoord::new(0, 0, 0);
        let mut wanted = self.controller.visible_tiles();
        wanted.push(root);
        self.loader.request_visible(&wanted);
        self.loader.poll();
        self.prune_textures(&wanted);

        let layout = ViewportLayout::new(rect, &self.controller);
        self.paint_tiles(ui, &layout);
        self.paint_overview(ui, &layout, root);
        self.paint_controls(ui, &layout);

        self.update_cursor(ui, &response);

        self.recent_events = self.controller.drain_events();
        if self.controller.has_pending_frame() || !self.recent_events.is_empty() {
            ui.ctx().request_repaint();
        }

        response
    }

    fn handle_input(&mut self, ui: &Ui, rect: Rect, response: &Response) {
        let layout = ViewportLayout::new(rect, &self.controller);
        let (events, scroll_delta) = ui.input(|i| (i.events.clone(), i.raw_scroll_delta));
        let keyboard_free = ui.memory(|m| m.focus().is_none());

        for event in events {
            match event {
                egui::Event::PointerButton {
                    pos,
                    button: egui::PointerButton::Primary,
                    pressed: true,
                    ..
                } => self.on_press(&layout, pos),
                egui::Event::PointerButton {
                    pos,
                    button: egui::PointerButton::Primary,
                    pressed: false,
                    ..
                } => self.on_release(&layout, pos),
                egui::Event::PointerMoved(pos) => {
                    self.controller.handle_event(InputEvent::PointerMove {
                        position: layout.to_local(pos),
                    });
                }
                egui::Event::Text(text) if keyboard_free && response.hovered() => {
                    for c in text.chars() {
                        self.controller.handle_event(InputEvent::KeyDown(KeyCode::from_char(c)));
                    }
                }
                _ => {}
            }
        }

        if scroll_delta != Vec2::ZERO && response.hovered() {
            let position = response
                .hover_pos()
                .map(|pos| layout.to_local(pos))
                .unwrap_or_else(|| self.controller.viewport().half());

            // egui reports scrolling down as a negative delta
            let handled = self.controller.handle_event(InputEvent::Wheel {
                delta_y: -f64::from(scroll_delta.y),
                position,
            });

            // Arrow mode: the surface scrolls natively
            if handled == EventHandled::NotHandled {
                let delta = Point::new(f64::from(scroll_delta.x), f64::from(scroll_delta.y));
                let offset = self.controller.effective_scroll().subtract(&delta);
                self.controller.handle_event(InputEvent::Scroll { offset });
            }
        }
    }

    fn on_press(&mut self, layout: &ViewportLayout, pos: Pos2) {
        let position = layout.to_local(pos);
        let hit = layout.hit_test(pos);
        self.overview_pressed = matches!(hit, Hit::Indicator | Hit::Minimap);

        let event = match hit {
            Hit::Outside => return,
            Hit::ZoomIn => InputEvent::ZoomButton(ZoomDirection::In),
            Hit::ZoomOut => InputEvent::ZoomButton(ZoomDirection::Out),
            Hit::Mode(mode) => InputEvent::ModeChange(mode),
            Hit::Indicator => InputEvent::PointerDown {
                position,
                target: PointerTarget::Indicator,
            },
            // Recentred on release, see `on_release`
            Hit::Minimap => return,
            Hit::Map => InputEvent::PointerDown {
                position,
                target: PointerTarget::Map,
            },
        };
        self.controller.handle_event(event);
    }

    /// Ends any drag, then recentres when the press and the release both
    /// landed on the overview.
    fn on_release(&mut self, layout: &ViewportLayout, pos: Pos2) {
        self.controller.handle_event(InputEvent::PointerUp);

        if std::mem::take(&mut self.overview_pressed) && layout.minimap.contains(pos) {
            self.controller.handle_event(InputEvent::MinimapClick {
                position: layout.to_local(pos),
            });
        }
    }

    fn prune_textures(&mut self, wanted: &[TileCoord]) {
        let keep: HashSet<TileCoord> = wanted.iter().copied().collect();
        self.textures.retain(|coord, _| keep.contains(coord));
    }

    /// Texture for a ready tile, decoding and uploading it on first use
    fn texture_for(&mut self, ctx: &egui::Context, coord: TileCoord) -> Option<egui::TextureId> {
        if let Some(texture) = self.textures.get(&coord) {
            return texture.as_ref().map(|t| t.id());
        }

        let TileAvailability::Ready(bytes) = self.loader.availability(coord) else {
            return None;
        };

        let texture = match decode_tile(&bytes) {
            Some(image) => Some(ctx.load_texture(
                format!("tile_{}_{}_{}", coord.z, coord.x, coord.y),
                image,
                egui::TextureOptions::LINEAR,
            )),
            None => {
                log::warn!("tile {} is not a decodable image", coord);
                None
            }
        };
        let id = texture.as_ref().map(|t| t.id());
        self.textures.insert(coord, texture);
        id
    }

    fn paint_tiles(&mut self, ui: &Ui, layout: &ViewportLayout) {
        let painter = ui.painter_at(layout.map);
        painter.rect_filled(layout.map, 0.0, Color32::from_gray(230));

        let tile_size = self.controller.config().tile_size as f32;
        let scroll = self.controller.scroll();
        let inset = self.controller.letterbox_inset();
        let origin = layout.map.min
            + Vec2::new((inset.x - scroll.x) as f32, (inset.y - scroll.y) as f32);

        for coord in self.controller.visible_tiles() {
            let tile_rect = Rect::from_min_size(
                origin + Vec2::new(coord.x as f32 * tile_size, coord.y as f32 * tile_size),
                Vec2::splat(tile_size),
            );

            match self.loader.availability(coord) {
                TileAvailability::Loading => {}
                TileAvailability::Unavailable => paint_placeholder(&painter, tile_rect),
                TileAvailability::Ready(_) => match self.texture_for(ui.ctx(), coord) {
                    Some(texture_id) => {
                        painter.image(texture_id, tile_rect, unit_uv(), Color32::WHITE);
                        paint_tile_label(&painter, tile_rect, coord);
                    }
                    None => paint_placeholder(&painter, tile_rect),
                },
            }
        }
    }

    fn paint_overview(&mut self, ui: &Ui, layout: &ViewportLayout, root: TileCoord) {
        let painter = ui.painter_at(layout.map);
        painter.rect_filled(layout.minimap, 4.0, OVERVIEW_FILL);
        if let Some(texture_id) = self.texture_for(ui.ctx(), root) {
            painter.image(texture_id, layout.minimap, unit_uv(), Color32::WHITE);
        }
        painter.rect_stroke(layout.minimap, 4.0, Stroke::new(1.0, Color32::from_gray(160)));

        painter.rect_filled(layout.indicator, 2.0, ACCENT.gamma_multiply(0.3));
        painter.rect_stroke(layout.indicator, 2.0, Stroke::new(2.0, ACCENT));
    }

    fn paint_controls(&self, ui: &Ui, layout: &ViewportLayout) {
        let painter = ui.painter_at(layout.map);
        let mode = self.controller.mode();

        paint_button(&painter, layout.zoom_out, "−", self.controller.can_zoom_out());
        paint_button(&painter, layout.zoom_in, "+", self.controller.can_zoom_in());
        paint_button(&painter, layout.grab_button, "✋ Grab", mode != InteractionMode::Grab);
        paint_button(&painter, layout.arrow_button, "Arrow", mode != InteractionMode::Arrow);
    }

    fn update_cursor(&self, ui: &Ui, response: &Response) {
        if !response.hovered() || self.controller.mode() != InteractionMode::Grab {
            return;
        }
        let icon = match self.controller.drag_state() {
            DragState::DraggingMap { .. } => CursorIcon::Grabbing,
            _ => CursorIcon::Grab,
        };
        ui.ctx().set_cursor_icon(icon);
    }
}

/// Extension trait so hosts can write `ui.tile_viewport(&mut viewport)`
pub trait TileViewportExt {
    fn tile_viewport(&mut self, viewport: &mut TileViewport) -> Response;
}

impl TileViewportExt for Ui {
    fn tile_viewport(&mut self, viewport: &mut TileViewport) -> Response {
        viewport.show(self)
    }
}

fn unit_uv() -> Rect {
    Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0))
}

fn paint_placeholder(painter: &egui::Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, PLACEHOLDER_FILL);
    painter.rect_stroke(rect, 0.0, Stroke::new(1.0, PLACEHOLDER_STROKE));
}

fn paint_tile_label(painter: &egui::Painter, rect: Rect, coord: TileCoord) {
    let label = coord.to_string();
    let anchor = rect.left_bottom() + Vec2::new(4.0, -4.0);
    let background = Rect::from_min_size(
        anchor - Vec2::new(0.0, 18.0),
        Vec2::new(7.0 * label.len() as f32 + 8.0, 18.0),
    );
    painter.rect_filled(background, 4.0, Color32::from_white_alpha(180));
    painter.text(
        background.left_center() + Vec2::new(4.0, 0.0),
        egui::Align2::LEFT_CENTER,
        label,
        egui::FontId::proportional(12.0),
        Color32::BLACK,
    );
}

fn paint_button(painter: &egui::Painter, rect: Rect, label: &str, enabled: bool) {
    let (fill, text) = if enabled {
        (ACCENT, Color32::WHITE)
    } else {
        (DISABLED, Color32::from_gray(60))
    };
    painter.rect_filled(rect, 4.0, fill);
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        label,
        egui::FontId::proportional(14.0),
        text,
    );
}

fn decode_tile(bytes: &[u8]) -> Option<ColorImage> {
    let img = image::load_from_memory(bytes).ok()?;
    let rgba_img = img.to_rgba8();
    let (width, height) = rgba_img.dimensions();
    Some(ColorImage::from_rgba_unmultiplied(
        [width as usize, height as usize],
        &rgba_img.into_raw(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> ViewportLayout {
        let rect = Rect::from_min_size(Pos2::new(100.0, 50.0), Vec2::new(1400.0, 800.0));
        ViewportLayout::new(rect, &ViewportController::default())
    }

    #[test]
    fn test_overview_is_docked_bottom_right() {
        let layout = layout();
        assert_eq!(layout.minimap.min, Pos2::new(100.0 + 1184.0, 50.0 + 584.0));
        assert_eq!(layout.minimap.size(), Vec2::splat(200.0));
    }

    #[test]
    fn test_hit_testing_prefers_controls() {
        let layout = layout();
        assert_eq!(layout.hit_test(layout.zoom_in.center()), Hit::ZoomIn);
        assert_eq!(layout.hit_test(layout.zoom_out.center()), Hit::ZoomOut);
        assert_eq!(
            layout.hit_test(layout.grab_button.center()),
            Hit::Mode(InteractionMode::Grab)
        );
        assert_eq!(layout.hit_test(layout.indicator.center()), Hit::Indicator);
        assert_eq!(layout.hit_test(layout.minimap.right_bottom() - Vec2::splat(1.0)), Hit::Minimap);
        assert_eq!(layout.hit_test(Pos2::new(700.0, 400.0)), Hit::Map);
        assert_eq!(layout.hit_test(Pos2::new(10.0, 10.0)), Hit::Outside);
    }

    #[test]
    fn test_local_coordinates() {
        let layout = layout();
        assert_eq!(layout.to_local(Pos2::new(150.0, 80.0)), Point::new(50.0, 30.0));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_tile(b"not an image").is_none());
    }
}
