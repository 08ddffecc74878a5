use crate::menu::{Command, MenuBarGroup, MenuConfig, MenuItem, PopupId};
use crate::settings::ThemeMode;
use eframe::egui;
use std::time::Instant;

const POPUP_MIN_WIDTH: f32 = 180.0;

#[derive(Default)]
pub(super) struct MenuBarOutput {
    pub command: Option<Command>,
    pub start_drag: bool,
}

/// Draw the menu bar, its open popups and the window controls.
pub(super) fn show(
    ui: &mut egui::Ui,
    group: &mut MenuBarGroup,
    menus: &[MenuConfig],
    theme: ThemeMode,
    now: Instant,
) -> MenuBarOutput {
    let mut out = MenuBarOutput::default();

    egui::menu::bar(ui, |ui| {
        for menu in menus {
            let response = ui.selectable_label(group.is_root_open(&menu.label), &menu.label);
            group.register_button(&menu.label, response.rect);
            if response.clicked() {
                group.toggle(&menu.label);
            }
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            out.command = window_controls(ui, theme);
            let drag = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            if drag.double_clicked() {
                out.command = Some(Command::ToggleMaximize);
            } else if drag.drag_started_by(egui::PointerButton::Primary) {
                out.start_drag = true;
            }
        });
    });

    if let Some(pos) = ui.ctx().pointer_hover_pos() {
        group.pointer_moved(pos);
    }
    group.process_pointer_sample();

    let open = menus
        .iter()
        .find(|menu| group.is_root_open(&menu.label));
    if let Some(menu) = open {
        if let Some(command) = show_root_popup(ui.ctx(), group, menu, now) {
            out.command = Some(command);
        }
    }

    if out.command.is_some() {
        // The caller queues the command, so the bar is closed before it runs.
        group.root_close();
    }
    out
}

fn window_controls(ui: &mut egui::Ui, theme: ThemeMode) -> Option<Command> {
    let mut command = None;
    if ui.button("✕").on_hover_text("Close").clicked() {
        command = Some(Command::CloseWindow);
    }
    if ui.button("🗖").on_hover_text("Maximize").clicked() {
        command = Some(Command::ToggleMaximize);
    }
    if ui.button("🗕").on_hover_text("Minimize").clicked() {
        command = Some(Command::Minimize);
    }
    let (icon, hint) = match theme {
        ThemeMode::Dark => ("☀", "Switch to light theme"),
        ThemeMode::Light | ThemeMode::System => ("🌙", "Switch to dark theme"),
    };
    if ui.button(icon).on_hover_text(hint).clicked() {
        command = Some(Command::ToggleTheme);
    }
    command
}

fn show_root_popup(
    ctx: &egui::Context,
    group: &mut MenuBarGroup,
    menu: &MenuConfig,
    now: Instant,
) -> Option<Command> {
    let anchor = group.button_rect(&menu.label)?;
    let mut hovered = None;
    let mut command = None;
    let area = egui::Area::new(egui::Id::new(("menu_root", menu.label.as_str())))
        .order(egui::Order::Foreground)
        .fixed_pos(anchor.left_bottom())
        .show(ctx, |ui| {
            egui::Frame::menu(ui.style()).show(ui, |ui| {
                ui.set_min_width(POPUP_MIN_WIDTH);
                command = show_items(ui, group, &menu.items, None, &menu.label, now, &mut hovered);
            });
        });
    group.set_root_area(Some(area.response.rect));
    group.hover_trigger(hovered, now);
    command
}

fn show_items(
    ui: &mut egui::Ui,
    group: &mut MenuBarGroup,
    items: &[MenuItem],
    parent: Option<PopupId>,
    path: &str,
    now: Instant,
    hovered: &mut Option<PopupId>,
) -> Option<Command> {
    let mut command = None;
    for item in items {
        match item {
            MenuItem::Divider => {
                ui.separator();
            }
            MenuItem::Action(action) => {
                let mut button = egui::Button::new(&action.label)
                    .frame(false)
                    .selected(action.selected);
                if let Some(shortcut) = &action.shortcut {
                    button = button.shortcut_text(shortcut);
                }
                let response = ui.add_enabled(!action.disabled, button);
                if response.clicked() {
                    command = Some(action.command);
                }
            }
            MenuItem::Submenu(sub) => {
                let key = format!("{path}/{}", sub.label);
                let id = group.mount_submenu(&key, parent);
                let response = ui.add(
                    egui::Button::new(&sub.label)
                        .frame(false)
                        .shortcut_text("⏵")
                        .selected(group.is_open(id)),
                );
                group.set_anchor(id, response.rect);
                if response.hovered() {
                    *hovered = Some(id);
                }
                if response.clicked() {
                    group.open_submenu(id);
                }
                if group.is_open(id) {
                    if let Some(c) = show_submenu(ui.ctx(), group, id, &sub.items, &key, now, hovered) {
                        command = Some(c);
                    }
                }
            }
        }
    }
    command
}

fn show_submenu(
    ctx: &egui::Context,
    group: &mut MenuBarGroup,
    id: PopupId,
    items: &[MenuItem],
    key: &str,
    now: Instant,
    hovered: &mut Option<PopupId>,
) -> Option<Command> {
    let anchor = group.anchor(id)?;
    let mut command = None;
    let area = egui::Area::new(egui::Id::new(("menu_sub", key)))
        .order(egui::Order::Foreground)
        .fixed_pos(anchor.right_top())
        .show(ctx, |ui| {
            egui::Frame::menu(ui.style()).show(ui, |ui| {
                ui.set_min_width(POPUP_MIN_WIDTH);
                command = show_items(ui, group, items, Some(id), key, now, hovered);
            });
        });
    group.set_popup_area(id, Some(area.response.rect));
    command
}
