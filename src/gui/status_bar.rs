use crate::editor::Editor;
use eframe::egui;
use std::path::Path;

pub(super) fn show(ui: &mut egui::Ui, path: Option<&Path>, editor: &Editor, zoom: f32) {
    ui.horizontal(|ui| {
        match path {
            Some(path) => ui.label(path.display().to_string()),
            None => ui.weak("Unsaved file"),
        };
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(format!("Lines: {}", editor.line_count()));
            ui.separator();
            ui.label(format!("Chars: {}", editor.char_count()));
            if (zoom - 1.0).abs() > f32::EPSILON {
                ui.separator();
                ui.label(format!("{:.0}%", zoom * 100.0));
            }
        });
    });
}
