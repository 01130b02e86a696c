//! Drives a viewport through a scripted gesture sequence without any UI and
//! prints what a renderer would need after each step.
//!
//! Run with `cargo run --example headless`; set `RUST_LOG=debug` for the
//! controller's own log output.

use tileview::prelude::*;

fn main() -> Result<()> {
    #[cfg(feature = "debug")]
    env_logger::init();

    let mut controller = ViewportController::new(ViewportConfig {
        initial_zoom: 1,
        ..ViewportConfig::default()
    })?;

    // Each step builds its input from the controller state at dispatch time,
    // so positions follow earlier steps (the overview moves on resize)
    type Step = fn(&ViewportController) -> InputEvent;
    let script: Vec<(&str, Step)> = vec![
        ("measure", |_| InputEvent::Resize { size: Size::new(1280.0, 720.0) }),
        ("zoom in (button)", |_| InputEvent::ZoomButton(ZoomDirection::In)),
        ("frame", |_| InputEvent::AnimationFrame),
        ("grab mode", |_| InputEvent::ModeChange(InteractionMode::Grab)),
        ("press map", |_| InputEvent::PointerDown {
            position: Point::new(640.0, 360.0),
            target: PointerTarget::Map,
        }),
        ("drag", |_| InputEvent::PointerMove { position: Point::new(440.0, 260.0) }),
        ("release", |_| InputEvent::PointerUp),
        ("wheel", |_| InputEvent::Wheel { delta_y: -60.0, position: Point::new(640.0, 360.0) }),
        ("wheel", |_| InputEvent::Wheel { delta_y: -60.0, position: Point::new(640.0, 360.0) }),
        ("frame", |_| InputEvent::AnimationFrame),
        ("click overview", |controller| InputEvent::MinimapClick {
            position: controller.minimap_origin().add(&Point::new(150.0, 50.0)),
        }),
        ("zoom out (key)", |_| InputEvent::KeyDown(KeyCode::Minus)),
        ("frame", |_| InputEvent::AnimationFrame),
    ];

    for (label, step) in script {
        let input = step(&controller);
        let handled = controller.handle_event(input);
        let events = controller.drain_events();

        println!(
            "{label:<18} {:?} zoom={} scroll=({:.1}, {:.1}) drag={:?}",
            handled,
            controller.zoom(),
            controller.scroll().x,
            controller.scroll().y,
            controller.drag_state().kind(),
        );
        for event in &events {
            println!("    -> {}", serde_json::to_string(event)?);
        }
    }

    let rect = controller.indicator_rect();
    println!(
        "indicator: left={:.1} top={:.1} width={:.1} height={:.1}",
        rect.left, rect.top, rect.width, rect.height
    );

    let tiles: Vec<String> = controller.visible_tiles().iter().map(ToString::to_string).collect();
    println!("visible tiles ({}): {}", tiles.len(), tiles.join(" "));

    Ok(())
}
