mod editor_view;
mod menu_bar;
mod settings_drawer;
mod status_bar;
pub mod theme;

pub use editor_view::EDITOR_ID;
pub use settings_drawer::SettingsDrawer;

use crate::clipboard::{
    read_or_none, write_or_log, ClipboardProvider, MemoryClipboard, SystemClipboard,
};
use crate::editor::Editor;
use crate::files::{FileOutcome, FileRequest, FileResponse, FileWorker, NativeDialogs};
use crate::history::EditHistory;
use crate::host::WindowHost;
use crate::menu::{menu_shortcuts, notepad_menus, Command, MenuBarGroup, MenuConfig, MenuState};
use crate::paste_rules::{PasteRule, PasteRuleSet};
use crate::settings::{Settings, SettingsStore, ThemeMode};
use eframe::egui;
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};
use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Instant;

pub const APP_NAME: &str = "Lin Notepad";
const TOAST_SECONDS: f64 = 3.0;

fn push_toast(toasts: &mut Toasts, kind: ToastKind, text: impl Into<String>) {
    let text = text.into();
    tracing::debug!(%text, "toast");
    toasts.add(Toast {
        text: text.into(),
        kind,
        options: ToastOptions::default().duration_in_seconds(TOAST_SECONDS),
    });
}

/// Collaborators the app talks to outside its own state.
pub struct Services {
    pub clipboard: Box<dyn ClipboardProvider>,
    pub files: FileWorker,
}

impl Services {
    /// System clipboard and native file dialogs. The file worker wakes the UI
    /// when a dialog finishes. Without a reachable system clipboard, copy and
    /// paste stay inside the app.
    pub fn native(ctx: &egui::Context) -> Self {
        let repaint = ctx.clone();
        let clipboard: Box<dyn ClipboardProvider> = match arboard::Clipboard::new() {
            Ok(_) => Box::new(SystemClipboard),
            Err(e) => {
                tracing::warn!(error = %e, "system clipboard unavailable");
                Box::new(MemoryClipboard::default())
            }
        };
        Self {
            clipboard,
            files: FileWorker::spawn(NativeDialogs, move || repaint.request_repaint()),
        }
    }
}

pub struct NotepadApp {
    store: SettingsStore,
    editor: Editor,
    /// Widget-side copy of the document text.
    buffer: String,
    synced_revision: Option<u64>,
    /// Revision whose text was last handed to the settings store.
    persisted_revision: Option<u64>,
    /// Revision matching the file on disk.
    saved_revision: Option<u64>,
    file_path: Option<PathBuf>,
    host: WindowHost,
    zoom_changed: Rc<Cell<Option<f32>>>,
    menus: MenuBarGroup,
    paste_rules: PasteRuleSet,
    clipboard: Box<dyn ClipboardProvider>,
    files: FileWorker,
    toasts: Toasts,
    settings_drawer: SettingsDrawer,
    show_about: bool,
    system_visuals: egui::Visuals,
    title: String,
    window_size: Option<(i32, i32)>,
    queued: Vec<Command>,
}

impl NotepadApp {
    pub fn new(ctx: &egui::Context, store: SettingsStore, services: Services) -> Self {
        let settings = store.settings().clone();
        let editor = Editor::new(
            settings.last_text.clone(),
            EditHistory::new(settings.history_limit, settings.typing_debounce()),
        );
        let revision = editor.revision();

        let mut host = WindowHost::new(settings.zoom_factor);
        let zoom_changed = Rc::new(Cell::new(None));
        {
            let zoom_changed = zoom_changed.clone();
            host.on_zoom_changed(move |zoom| zoom_changed.set(Some(zoom)));
        }
        host.on_devtools_state_changed(|open| tracing::debug!(open, "developer tools toggled"));

        ctx.options_mut(|o| o.zoom_with_keyboard = false);
        host.apply_zoom(ctx);
        let system_visuals = ctx.style().visuals.clone();
        theme::apply_theme(ctx, settings.theme_mode, &system_visuals);

        tracing::info!(path = %store.path().display(), "notepad started");
        Self {
            paste_rules: PasteRuleSet::new(settings.paste_rules.clone()),
            store,
            editor,
            buffer: String::new(),
            synced_revision: None,
            persisted_revision: Some(revision),
            saved_revision: Some(revision),
            file_path: None,
            host,
            zoom_changed,
            menus: MenuBarGroup::default(),
            clipboard: services.clipboard,
            files: services.files,
            toasts: Toasts::new()
                .anchor(egui::Align2::RIGHT_BOTTOM, [-10.0, -30.0])
                .direction(egui::Direction::BottomUp),
            settings_drawer: SettingsDrawer::default(),
            show_about: false,
            system_visuals,
            title: String::new(),
            window_size: settings.window_size,
            queued: Vec::new(),
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn menus(&self) -> &MenuBarGroup {
        &self.menus
    }

    pub fn host(&self) -> &WindowHost {
        &self.host
    }

    pub fn settings(&self) -> &Settings {
        self.store.settings()
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.saved_revision != Some(self.editor.revision())
    }

    pub fn is_about_open(&self) -> bool {
        self.show_about
    }

    pub fn is_settings_open(&self) -> bool {
        self.settings_drawer.open
    }

    /// Window title: file name, a `*` while unsaved, then the app name.
    pub fn window_title(&self) -> String {
        let name = self
            .file_path
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_owned());
        let marker = if self.is_dirty() { "*" } else { "" };
        format!("{marker}{name} - {APP_NAME}")
    }

    fn menu_state(&self) -> MenuState {
        let settings = self.store.settings();
        MenuState {
            can_undo: self.editor.can_undo(),
            can_redo: self.editor.can_redo(),
            has_selection: self.editor.has_selection(),
            theme_mode: settings.theme_mode,
            show_status_bar: settings.show_status_bar,
        }
    }

    pub fn menu_config(&self) -> Vec<MenuConfig> {
        notepad_menus(&self.menu_state())
    }

    /// Run `command` as if its menu entry had been clicked.
    pub fn dispatch(&mut self, ctx: &egui::Context, command: Command) {
        tracing::debug!(?command, "dispatch");
        let now = Instant::now();
        match command {
            Command::New => {
                self.editor.replace_all("");
                self.file_path = None;
                self.saved_revision = Some(self.editor.revision());
            }
            Command::Open => self.request_file(FileRequest::Open),
            Command::Save => self.request_file(FileRequest::Save {
                path: self.file_path.clone(),
                content: self.editor.text().to_owned(),
            }),
            Command::SaveAs => self.request_file(FileRequest::SaveAs {
                current: self.file_path.clone(),
                content: self.editor.text().to_owned(),
            }),
            Command::Clear => {
                self.editor.replace_all("");
            }
            Command::Exit | Command::CloseWindow => self.host.close(ctx),
            Command::Undo => {
                self.editor.undo();
            }
            Command::Redo => {
                self.editor.redo();
            }
            Command::Cut => self.cut(),
            Command::Copy => self.copy(),
            Command::Paste => {
                if let Some(text) = read_or_none(self.clipboard.as_mut()) {
                    self.paste_text(&text);
                }
            }
            Command::SelectAll => self.editor.select_all(),
            Command::OpenSettings => self.settings_drawer.open(self.store.settings()),
            Command::Reload => self.reload(ctx, false),
            Command::ForceReload => self.reload(ctx, true),
            Command::ToggleDevTools => {
                self.host.toggle_devtools();
            }
            Command::ZoomReset => {
                self.host.zoom_reset(ctx);
            }
            Command::ZoomIn => {
                self.host.zoom_in(ctx);
            }
            Command::ZoomOut => {
                self.host.zoom_out(ctx);
            }
            Command::ToggleFullscreen => self.host.toggle_fullscreen(ctx),
            Command::SetTheme(mode) => self.set_theme(ctx, mode, now),
            Command::ToggleTheme => {
                let mode = self.store.settings().theme_mode.toggled();
                self.set_theme(ctx, mode, now);
            }
            Command::ToggleStatusBar => self
                .store
                .update(now, |s| s.show_status_bar = !s.show_status_bar),
            Command::Minimize => self.host.minimize(ctx),
            Command::ToggleMaximize => self.host.toggle_maximize(ctx),
            Command::About => self.show_about = true,
        }
        ctx.request_repaint();
    }

    fn copy(&mut self) {
        if let Some(text) = self.editor.copy_text() {
            write_or_log(self.clipboard.as_mut(), &text);
        }
    }

    fn cut(&mut self) {
        let Some(text) = self.editor.copy_text() else {
            return;
        };
        if write_or_log(self.clipboard.as_mut(), &text) {
            self.editor.cut();
        }
    }

    /// Insert clipboard text after running it through the paste rules.
    fn paste_text(&mut self, text: &str) {
        let text = self.paste_rules.apply(text);
        self.editor.insert_at_selection(&text);
    }

    fn set_theme(&mut self, ctx: &egui::Context, mode: ThemeMode, now: Instant) {
        theme::apply_theme(ctx, mode, &self.system_visuals);
        self.store.update(now, |s| s.theme_mode = mode);
    }

    pub(crate) fn update_settings(&mut self, change: impl FnOnce(&mut Settings)) {
        self.store.update(Instant::now(), change);
    }

    pub(crate) fn set_paste_rules(&mut self, rules: Vec<PasteRule>) {
        self.paste_rules = PasteRuleSet::new(rules.clone());
        self.store.update(Instant::now(), |s| s.paste_rules = rules);
    }

    fn request_file(&mut self, request: FileRequest) {
        if !self.files.dispatch(self.editor.revision(), request) {
            push_toast(
                &mut self.toasts,
                ToastKind::Info,
                "A file dialog is already open",
            );
        }
    }

    fn handle_file_response(&mut self, response: FileResponse) {
        match response.outcome {
            FileOutcome::Opened(result) => {
                if let Some(err) = result.error {
                    push_toast(&mut self.toasts, ToastKind::Error, format!("Open failed: {err}"));
                    return;
                }
                if result.canceled {
                    return;
                }
                let (Some(path), Some(content)) = (result.path, result.content) else {
                    return;
                };
                self.editor.replace_all(content);
                push_toast(
                    &mut self.toasts,
                    ToastKind::Success,
                    format!("Opened {}", path.display()),
                );
                self.file_path = Some(path);
                self.saved_revision = Some(self.editor.revision());
            }
            FileOutcome::Saved(result) => {
                if let Some(err) = result.error {
                    push_toast(&mut self.toasts, ToastKind::Error, format!("Save failed: {err}"));
                    return;
                }
                let Some(path) = result.path else {
                    return;
                };
                if response.revision == self.editor.revision() {
                    self.saved_revision = Some(response.revision);
                } else {
                    tracing::debug!(
                        saved = response.revision,
                        current = self.editor.revision(),
                        "document changed while saving"
                    );
                }
                push_toast(
                    &mut self.toasts,
                    ToastKind::Success,
                    format!("Saved {}", path.display()),
                );
                self.file_path = Some(path);
            }
        }
    }

    /// Re-read the settings file and apply it. `force` also restores the
    /// persisted document and forgets undo history.
    fn reload(&mut self, ctx: &egui::Context, force: bool) {
        if let Err(e) = self.store.reload() {
            tracing::warn!(error = %format!("{e:#}"), "reload failed");
            push_toast(&mut self.toasts, ToastKind::Error, format!("Reload failed: {e}"));
            return;
        }
        self.apply_settings(ctx);
        if force {
            let text = self.store.settings().last_text.clone();
            self.editor.reset(text);
            self.file_path = None;
            self.saved_revision = Some(self.editor.revision());
            self.persisted_revision = Some(self.editor.revision());
            tracing::info!("force reloaded");
        } else {
            // The reloaded file may hold an older document.
            self.persisted_revision = None;
            tracing::info!("settings reloaded");
        }
    }

    fn apply_settings(&mut self, ctx: &egui::Context) {
        let settings = self.store.settings().clone();
        theme::apply_theme(ctx, settings.theme_mode, &self.system_visuals);
        self.host.set_zoom(ctx, settings.zoom_factor);
        self.zoom_changed.set(None);
        self.editor.set_history_limit(settings.history_limit);
        self.editor.set_typing_debounce(settings.typing_debounce());
        self.paste_rules = PasteRuleSet::new(settings.paste_rules);
    }

    fn handle_input(&mut self, ctx: &egui::Context) {
        if self.menus.is_active()
            && ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Escape))
        {
            self.menus.root_close();
        }
        for (shortcut, command) in menu_shortcuts(&self.menu_config()) {
            if ctx.input_mut(|i| i.consume_shortcut(&shortcut)) {
                // Queued commands run at the end of the frame, after the close.
                self.menus.root_close();
                self.queued.push(command);
            }
        }
    }

    /// Persist the document text once per change.
    fn persist_text(&mut self, now: Instant) {
        let revision = self.editor.revision();
        if self.persisted_revision == Some(revision) {
            return;
        }
        let text = self.editor.text().to_owned();
        self.store.update(now, |s| s.last_text = text);
        self.persisted_revision = Some(revision);
    }

    fn schedule_repaint(&self, ctx: &egui::Context, now: Instant) {
        let next = [
            self.editor.next_deadline(),
            self.menus.next_deadline(),
            self.store.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min();
        if let Some(deadline) = next {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }
    }

    /// One frame of the application. [`eframe::App::update`] calls this; tests
    /// drive it with a headless context.
    pub fn ui(&mut self, ctx: &egui::Context) {
        let now = Instant::now();

        while let Some(response) = self.files.try_recv() {
            self.handle_file_response(response);
        }
        self.editor.tick(now);
        self.menus.tick(now);
        self.store.tick(now);

        self.handle_input(ctx);

        let menu_config = self.menu_config();
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            let output = menu_bar::show(ui, &mut self.menus, &menu_config, self.store.settings().theme_mode, now);
            if output.start_drag {
                self.host.start_drag(ctx);
            }
            self.queued.extend(output.command);
        });

        if self.store.settings().show_status_bar {
            egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
                status_bar::show(ui, self.file_path.as_deref(), &self.editor, self.host.zoom_level());
            });
        }

        if self.settings_drawer.open {
            let mut drawer = std::mem::take(&mut self.settings_drawer);
            drawer.ui(ctx, self);
            self.settings_drawer = drawer;
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.editor_ui(ui, now);
        });

        if self.show_about {
            egui::Window::new("About")
                .collapsible(false)
                .resizable(false)
                .open(&mut self.show_about)
                .show(ctx, |ui| {
                    ui.heading(APP_NAME);
                    ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                    ui.label("A small plain-text editor.");
                });
        }

        if self.host.is_devtools_open() {
            let mut open = true;
            egui::Window::new("Developer Tools")
                .default_size([360.0, 480.0])
                .open(&mut open)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| ctx.inspection_ui(ui));
                });
            if !open {
                self.host.set_devtools_open(false);
            }
        }

        if self.menus.is_active() {
            if let Some(pos) = ctx.input(|i| {
                i.pointer
                    .any_pressed()
                    .then(|| i.pointer.interact_pos())
                    .flatten()
            }) {
                self.menus.handle_outside_click(pos);
            }
        }

        for command in std::mem::take(&mut self.queued) {
            self.dispatch(ctx, command);
        }

        if let Some(zoom) = self.zoom_changed.take() {
            self.store.update(now, |s| s.zoom_factor = zoom);
        }
        self.persist_text(now);

        let title = self.window_title();
        if title != self.title {
            self.host.set_title(ctx, title.clone());
            self.title = title;
        }
        if let Some(rect) = ctx.input(|i| i.viewport().inner_rect) {
            self.window_size = Some((rect.width() as i32, rect.height() as i32));
        }

        self.toasts.show(ctx);
        self.schedule_repaint(ctx, now);
    }
}

impl eframe::App for NotepadApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.editor.cancel_timers();
        self.menus.cancel_timers();
        let text = self.editor.text().to_owned();
        let window_size = self.window_size;
        self.store.update(Instant::now(), |s| {
            s.last_text = text;
            if window_size.is_some() {
                s.window_size = window_size;
            }
        });
        if let Err(e) = self.store.flush() {
            tracing::error!(error = %format!("{e:#}"), "failed to save settings on exit");
        }
        tracing::info!("notepad closed");
    }
}
