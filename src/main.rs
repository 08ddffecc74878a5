#![cfg_attr(all(windows, feature = "windows_gui"), windows_subsystem = "windows")]

use eframe::egui;
use lin_notepad::gui::{NotepadApp, Services, APP_NAME};
use lin_notepad::logging;
use lin_notepad::settings::SettingsStore;

fn main() -> anyhow::Result<()> {
    let store = SettingsStore::load_or_default(SettingsStore::default_path());
    let settings = store.settings().clone();
    logging::init(settings.debug_logging, settings.log_file.clone());
    tracing::debug!(path = %store.path().display(), "settings loaded");

    let (width, height) = settings.window_size.unwrap_or((900, 700));
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_NAME)
            .with_inner_size([width as f32, height as f32])
            .with_min_inner_size([320.0, 200.0])
            .with_decorations(false),
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(move |cc| {
            let services = Services::native(&cc.egui_ctx);
            Box::new(NotepadApp::new(&cc.egui_ctx, store, services))
        }),
    )
    .map_err(|e| anyhow::anyhow!(e.to_string()))
}
