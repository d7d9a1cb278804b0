//! Entry point for the xaiboard dashboard.

use std::rc::Rc;

use eframe::egui;
use tracing::{info, warn};
use xaiboard::audio::AudioOutput;
use xaiboard::config;
use xaiboard::egui_app::controller::EguiController;
use xaiboard::egui_app::ui::{EguiApp, MIN_VIEWPORT_SIZE};
use xaiboard::logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let config = config::load_or_default()?;
    info!(
        "Artifact server at {}",
        config
            .artifact_server
            .base_url()
            .map(|url| url.to_string())
            .unwrap_or_else(|err| err.to_string())
    );
    let output = match AudioOutput::open_default() {
        Ok(output) => Some(Rc::new(output)),
        Err(err) => {
            warn!("No audio output, playback will be silent: {err}");
            None
        }
    };
    let controller = EguiController::new(&config, output)?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("XAI Dashboard")
            .with_inner_size(egui::vec2(1_200.0, 820.0))
            .with_min_inner_size(MIN_VIEWPORT_SIZE),
        ..Default::default()
    };

    eframe::run_native(
        "xaiboard",
        native_options,
        Box::new(move |_cc| Ok(Box::new(EguiApp::new(controller)))),
    )?;
    Ok(())
}
