use tileview::{
    core::config::ViewerConfig,
    ui::{TileViewport, TileViewportExt},
    InteractionMode,
};

/// Standalone tile viewer application
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = load_config()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([
                config.viewport.viewport.width as f32,
                config.viewport.viewport.height as f32 + 28.0,
            ])
            .with_title("tileview"),
        ..Default::default()
    };

    eframe::run_native(
        "tileview-app",
        options,
        Box::new(move |cc| Box::new(TileViewApp::new(cc, &config))),
    )?;

    Ok(())
}

/// Config file from the first argument or `TILEVIEW_CONFIG`, defaults
/// otherwise. `TILEVIEW_TILE_URL` overrides the tile URL template.
fn load_config() -> tileview::Result<ViewerConfig> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("TILEVIEW_CONFIG").ok());

    let mut config = match path {
        Some(path) => {
            log::info!("loading configuration from {}", path);
            ViewerConfig::from_json_file(path)?
        }
        None => ViewerConfig::default(),
    };

    if let Ok(url) = std::env::var("TILEVIEW_TILE_URL") {
        config.tiles.url_template = url;
    }
    config.validate()?;
    Ok(config)
}

struct TileViewApp {
    viewport: Option<TileViewport>,
    startup_error: Option<String>,
}

impl TileViewApp {
    fn new(cc: &eframe::CreationContext<'_>, config: &ViewerConfig) -> Self {
        match TileViewport::from_config(config, &cc.egui_ctx) {
            Ok(viewport) => Self {
                viewport: Some(viewport),
                startup_error: None,
            },
            Err(e) => {
                log::error!("failed to start viewer: {}", e);
                Self {
                    viewport: None,
                    startup_error: Some(e.to_string()),
                }
            }
        }
    }

    fn status_bar(ui: &mut egui::Ui, viewport: &mut TileViewport) {
        ui.horizontal(|ui| {
            let controller = viewport.controller();
            let scroll = controller.scroll();
            let mode = match controller.mode() {
                InteractionMode::Grab => "Grab",
                InteractionMode::Arrow => "Arrow",
            };

            ui.label(format!("Zoom: {}", controller.zoom()));
            ui.separator();
            ui.label(format!("Mode: {}", mode));
            ui.separator();
            ui.label(format!("Scroll: {:.0}, {:.0}", scroll.x, scroll.y));
            ui.separator();
            ui.label(format!("Visible tiles: {}", controller.visible_tiles().len()));
            ui.separator();
            ui.label(format!(
                "Loading: {}",
                viewport.loader().in_flight_count() + viewport.loader().queued_count()
            ));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Retry failed tiles").clicked() {
                    let count = viewport.retry_failed_tiles();
                    log::info!("retrying {} failed tiles", count);
                }
            });
        });
    }
}

impl eframe::App for TileViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let Some(viewport) = self.viewport.as_mut() else {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.heading("tileview could not start");
                if let Some(error) = &self.startup_error {
                    ui.label(error);
                }
            });
            return;
        };

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            Self::status_bar(ui, viewport);
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                ui.tile_viewport(viewport);
            });
    }
}
