use crate::settings::ThemeMode;
use eframe::egui;

const LIGHT_PANEL: egui::Color32 = egui::Color32::from_rgb(255, 255, 255);
const LIGHT_WINDOW: egui::Color32 = egui::Color32::from_rgb(245, 246, 250);
const LIGHT_SELECTION: egui::Color32 = egui::Color32::from_rgb(153, 194, 255);
const DARK_PANEL: egui::Color32 = egui::Color32::from_rgb(30, 30, 30);
const DARK_WINDOW: egui::Color32 = egui::Color32::from_rgb(37, 37, 38);
const DARK_SELECTION: egui::Color32 = egui::Color32::from_rgb(38, 79, 120);

/// Visuals for `mode`. `System` keeps whatever `defaults` the context had.
pub fn visuals_for_mode(mode: ThemeMode, defaults: &egui::Visuals) -> egui::Visuals {
    let mut visuals = match mode {
        ThemeMode::System => return defaults.clone(),
        ThemeMode::Light => egui::Visuals::light(),
        ThemeMode::Dark => egui::Visuals::dark(),
    };
    let (panel, window, selection) = match mode {
        ThemeMode::Dark => (DARK_PANEL, DARK_WINDOW, DARK_SELECTION),
        _ => (LIGHT_PANEL, LIGHT_WINDOW, LIGHT_SELECTION),
    };
    visuals.panel_fill = panel;
    visuals.window_fill = window;
    visuals.extreme_bg_color = panel;
    visuals.widgets.noninteractive.bg_fill = panel;
    visuals.selection.bg_fill = selection;
    visuals
}

/// Apply `mode` to the context. `system` holds the visuals captured at
/// startup, restored when switching back to `System`.
pub fn apply_theme(ctx: &egui::Context, mode: ThemeMode, system: &egui::Visuals) {
    ctx.set_visuals(visuals_for_mode(mode, system));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_switching_is_deterministic() {
        let base = egui::Visuals::light();
        let dark = visuals_for_mode(ThemeMode::Dark, &base);
        let light = visuals_for_mode(ThemeMode::Light, &base);
        let system = visuals_for_mode(ThemeMode::System, &base);

        assert!(dark.dark_mode);
        assert!(!light.dark_mode);
        assert_ne!(dark.panel_fill, light.panel_fill);
        assert_eq!(light.selection.bg_fill, LIGHT_SELECTION);
        assert_eq!(system, base);
    }

    #[test]
    fn system_mode_keeps_dark_defaults() {
        let base = egui::Visuals::dark();
        assert_eq!(visuals_for_mode(ThemeMode::System, &base), base);
    }
}
