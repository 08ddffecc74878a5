use super::NotepadApp;
use crate::history::Selection;
use crate::menu::Command;
use eframe::egui;
use std::time::Instant;

/// Memory id of the document `TextEdit`.
pub const EDITOR_ID: &str = "notepad_editor";

enum ClipboardEvent {
    Copy,
    Cut,
    Paste(String),
}

impl NotepadApp {
    /// Route platform clipboard events through the app so paste rules apply
    /// and the edits land in the undo history.
    fn take_clipboard_events(&mut self, ui: &egui::Ui, id: egui::Id) {
        if !ui.memory(|m| m.has_focus(id)) {
            return;
        }
        let mut events = Vec::new();
        ui.input_mut(|i| {
            i.events.retain(|event| match event {
                egui::Event::Copy => {
                    events.push(ClipboardEvent::Copy);
                    false
                }
                egui::Event::Cut => {
                    events.push(ClipboardEvent::Cut);
                    false
                }
                egui::Event::Paste(text) => {
                    events.push(ClipboardEvent::Paste(text.clone()));
                    false
                }
                _ => true,
            })
        });
        for event in events {
            match event {
                ClipboardEvent::Copy => self.copy(),
                ClipboardEvent::Cut => self.cut(),
                ClipboardEvent::Paste(text) => self.paste_text(&text),
            }
        }
    }

    fn sync_buffer(&mut self) {
        let revision = self.editor.revision();
        if self.synced_revision != Some(revision) {
            self.buffer.clear();
            self.buffer.push_str(self.editor.text());
            self.synced_revision = Some(revision);
        }
    }

    pub(super) fn editor_ui(&mut self, ui: &mut egui::Ui, now: Instant) {
        let id = egui::Id::new(EDITOR_ID);
        self.take_clipboard_events(ui, id);
        self.sync_buffer();

        let font = egui::FontId::monospace(self.store.settings().font_size);
        let output = egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                egui::TextEdit::multiline(&mut self.buffer)
                    .id(id)
                    .font(font)
                    .frame(false)
                    .lock_focus(true)
                    .desired_width(f32::INFINITY)
                    .desired_rows(24)
                    .show(ui)
            })
            .inner;

        let selection = output.cursor_range.map(|range| {
            let [min, max] = range.as_ccursor_range().sorted();
            Selection::new(min.index, max.index)
        });
        if output.response.changed() {
            let selection = selection.unwrap_or_else(|| self.editor.selection());
            self.editor
                .on_user_edit(self.buffer.clone(), selection, now);
            self.synced_revision = Some(self.editor.revision());
        } else if let Some(selection) = selection {
            // Until the pending selection reaches the widget, its cursor is stale.
            if !self.editor.has_pending_selection() {
                self.editor.set_selection(selection);
            }
        }

        // Only once the widget shows the restored text is the selection valid.
        if self.synced_revision == Some(self.editor.revision()) {
            if let Some(selection) = self.editor.take_pending_selection() {
                let mut state = output.state.clone();
                state
                    .cursor
                    .set_char_range(Some(egui::text::CCursorRange::two(
                        egui::text::CCursor::new(selection.start),
                        egui::text::CCursor::new(selection.end),
                    )));
                state.store(ui.ctx(), id);
                ui.memory_mut(|m| m.request_focus(id));
            }
        }

        let has_selection = self.editor.has_selection();
        output.response.context_menu(|ui| {
            if ui.add_enabled(has_selection, egui::Button::new("Copy")).clicked() {
                self.queued.push(Command::Copy);
                ui.close_menu();
            }
            if ui.add_enabled(has_selection, egui::Button::new("Cut")).clicked() {
                self.queued.push(Command::Cut);
                ui.close_menu();
            }
            if ui.button("Paste").clicked() {
                self.queued.push(Command::Paste);
                ui.close_menu();
            }
        });
    }
}
