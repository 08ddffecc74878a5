use super::NotepadApp;
use crate::paste_rules::PasteRule;
use crate::settings::Settings;
use eframe::egui;

const FONT_SIZE_RANGE: std::ops::RangeInclusive<f32> = 8.0..=48.0;

/// Right-hand panel editing paste rules and a few display settings. Edits
/// are written back as they happen.
#[derive(Default)]
pub struct SettingsDrawer {
    pub open: bool,
    rules: Vec<PasteRule>,
    font_size: f32,
    debug_logging: bool,
}

impl SettingsDrawer {
    pub fn open(&mut self, settings: &Settings) {
        self.rules = settings.paste_rules.clone();
        self.font_size = settings.font_size;
        self.debug_logging = settings.debug_logging;
        self.open = true;
    }

    pub fn ui(&mut self, ctx: &egui::Context, app: &mut NotepadApp) {
        if !self.open {
            return;
        }
        let mut rules_changed = false;
        let mut close = false;
        egui::SidePanel::right("settings_drawer")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Settings");
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("✕").clicked() {
                            close = true;
                        }
                    });
                });
                ui.separator();

                let mut show_status_bar = app.settings().show_status_bar;
                if ui.checkbox(&mut show_status_bar, "Show status bar").changed() {
                    app.update_settings(|s| s.show_status_bar = show_status_bar);
                }
                ui.horizontal(|ui| {
                    ui.label("Font size");
                    if ui
                        .add(egui::DragValue::new(&mut self.font_size).clamp_range(FONT_SIZE_RANGE))
                        .changed()
                    {
                        let size = self.font_size;
                        app.update_settings(|s| s.font_size = size);
                    }
                });
                if ui
                    .checkbox(&mut self.debug_logging, "Debug logging (after restart)")
                    .changed()
                {
                    let debug = self.debug_logging;
                    app.update_settings(|s| s.debug_logging = debug);
                }

                ui.separator();
                ui.label("Paste rules");
                ui.weak("Applied in order to pasted text.");
                let mut remove: Option<usize> = None;
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for (idx, rule) in self.rules.iter_mut().enumerate() {
                        ui.push_id(idx, |ui| {
                            egui::Grid::new("rule").num_columns(2).show(ui, |ui| {
                                ui.label("Find");
                                rules_changed |= ui.text_edit_singleline(&mut rule.find).changed();
                                ui.end_row();
                                ui.label("Replace");
                                rules_changed |=
                                    ui.text_edit_singleline(&mut rule.replace).changed();
                                ui.end_row();
                            });
                            ui.horizontal(|ui| {
                                rules_changed |= ui.checkbox(&mut rule.is_regex, "Use regex").changed();
                                if ui.button("Remove").clicked() {
                                    remove = Some(idx);
                                }
                            });
                        });
                        ui.separator();
                    }
                });
                if let Some(idx) = remove {
                    self.rules.remove(idx);
                    rules_changed = true;
                }
                if ui.button("Add rule").clicked() {
                    self.rules.push(PasteRule::literal("", ""));
                    rules_changed = true;
                }
            });
        if rules_changed {
            app.set_paste_rules(self.rules.clone());
        }
        if close {
            self.open = false;
        }
    }
}
