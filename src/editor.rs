use crate::common::text::{char_len, char_to_byte_index, line_count};
use crate::history::{is_large_edit, EditHistory, HistoryEntry, Selection};
use std::time::{Duration, Instant};

/// The live document: text, selection and its undo history.
///
/// Every change bumps [`Editor::revision`]. The UI copies the text into its
/// widget buffer whenever the revision differs from the one it last saw, and
/// applies [`Editor::take_pending_selection`] after the widget shows the new
/// text.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    text: String,
    selection: Selection,
    history: EditHistory,
    pending_selection: Option<Selection>,
    revision: u64,
}

impl Editor {
    /// A document with the caret at the end of `text`.
    pub fn new(text: impl Into<String>, history: EditHistory) -> Self {
        let text = text.into();
        Self {
            selection: Selection::caret(char_len(&text)),
            text,
            history,
            pending_selection: None,
            revision: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn set_history_limit(&mut self, limit: usize) {
        self.history.set_limit(limit);
    }

    pub fn set_typing_debounce(&mut self, delay: Duration) {
        self.history.set_typing_debounce(delay);
    }

    /// Track a selection change made in the widget without a text change.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection.clamped(self.char_count());
    }

    /// Apply text typed into the widget.
    ///
    /// Small changes are coalesced into one undo step per burst of typing;
    /// changes larger than the threshold are recorded on their own. Returns
    /// false when the text did not actually change.
    pub fn on_user_edit(&mut self, new_text: String, new_selection: Selection, now: Instant) -> bool {
        if new_text == self.text {
            self.set_selection(new_selection);
            return false;
        }
        if is_large_edit(&self.text, &new_text) {
            self.history.flush_pending();
            self.history.record_edit(self.text.clone(), self.selection);
        } else {
            self.history
                .record_edit_debounced(&self.text, self.selection, now);
        }
        self.text = new_text;
        self.selection = new_selection.clamped(self.char_count());
        self.revision += 1;
        true
    }

    /// Pending typing counts as an undo step.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo() || self.history.has_pending()
    }

    /// Typing that has not been recorded yet still invalidates redo.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo() && !self.history.has_pending()
    }

    pub fn undo(&mut self) -> bool {
        self.history.flush_pending();
        let current = HistoryEntry::new(self.text.clone(), self.selection);
        match self.history.undo(current) {
            Some(entry) => {
                self.restore(entry);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        self.history.flush_pending();
        let current = HistoryEntry::new(self.text.clone(), self.selection);
        match self.history.redo(current) {
            Some(entry) => {
                self.restore(entry);
                true
            }
            None => false,
        }
    }

    // Text first; the selection is only valid against the restored text.
    fn restore(&mut self, entry: HistoryEntry) {
        self.text = entry.text;
        self.revision += 1;
        let selection = entry.selection.clamped(self.char_count());
        self.selection = selection;
        self.pending_selection = Some(selection);
    }

    /// Replace the selection with `insert` as one undo step and put the caret
    /// after the inserted text.
    pub fn insert_at_selection(&mut self, insert: &str) -> bool {
        let (start, end) = self.selection.clamped(self.char_count()).sorted();
        if insert.is_empty() && start == end {
            return false;
        }
        self.record_atomic();
        let from = char_to_byte_index(&self.text, start);
        let to = char_to_byte_index(&self.text, end);
        self.text.replace_range(from..to, insert);
        self.revision += 1;
        self.move_caret(start + char_len(insert));
        true
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.clamped(self.char_count()).is_empty()
    }

    /// The selected text, `None` when the selection is empty.
    pub fn copy_text(&self) -> Option<String> {
        let (start, end) = self.selection.clamped(self.char_count()).sorted();
        if start == end {
            return None;
        }
        let from = char_to_byte_index(&self.text, start);
        let to = char_to_byte_index(&self.text, end);
        Some(self.text[from..to].to_owned())
    }

    /// Remove the selection as one undo step and return what was removed.
    pub fn cut(&mut self) -> Option<String> {
        let removed = self.copy_text()?;
        self.insert_at_selection("");
        Some(removed)
    }

    pub fn select_all(&mut self) {
        let selection = Selection::new(0, self.char_count());
        self.selection = selection;
        self.pending_selection = Some(selection);
    }

    /// Replace the whole document as one undo step (New, Clear, Open).
    pub fn replace_all(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text == self.text {
            return false;
        }
        self.record_atomic();
        self.text = text;
        self.revision += 1;
        self.move_caret(0);
        true
    }

    /// Replace the document and forget all history.
    pub fn reset(&mut self, text: impl Into<String>) {
        self.history.clear();
        self.text = text.into();
        self.revision += 1;
        self.move_caret(0);
    }

    fn record_atomic(&mut self) {
        self.history.flush_pending();
        self.history.record_edit(self.text.clone(), self.selection);
    }

    fn move_caret(&mut self, pos: usize) {
        let selection = Selection::caret(pos).clamped(self.char_count());
        self.selection = selection;
        self.pending_selection = Some(selection);
    }

    /// Fire due history work. Returns true when something changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.history.tick(now)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.history.pending_deadline()
    }

    /// Drop pending typing coalescing, used on shutdown.
    pub fn cancel_timers(&mut self) {
        self.history.cancel_pending();
    }

    /// Whether the widget has yet to be told about a selection the editor set.
    pub fn has_pending_selection(&self) -> bool {
        self.pending_selection.is_some()
    }

    /// Selection to push into the widget, if the editor changed it.
    pub fn take_pending_selection(&mut self) -> Option<Selection> {
        self.pending_selection.take()
    }

    pub fn char_count(&self) -> usize {
        char_len(&self.text)
    }

    pub fn line_count(&self) -> usize {
        line_count(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(editor: &mut Editor, text: &str, at: Instant) {
        let caret = char_len(text);
        editor.on_user_edit(text.to_owned(), Selection::caret(caret), at);
    }

    #[test]
    fn typing_burst_undoes_to_empty_and_redoes() {
        let start = Instant::now();
        let mut editor = Editor::default();
        for (i, prefix) in ["h", "he", "hel", "hell", "hello"].into_iter().enumerate() {
            typed(&mut editor, prefix, start + Duration::from_millis(100 * i as u64));
        }
        assert_eq!(editor.history().undo_len(), 0);
        assert!(editor.tick(start + Duration::from_millis(1400)));
        assert_eq!(editor.history().undo_len(), 1);

        assert!(editor.undo());
        assert_eq!(editor.text(), "");
        assert!(editor.redo());
        assert_eq!(editor.text(), "hello");
        assert_eq!(editor.take_pending_selection(), Some(Selection::caret(5)));
    }

    #[test]
    fn undo_flushes_pending_typing() {
        let start = Instant::now();
        let mut editor = Editor::new("ab", EditHistory::default());
        assert!(!editor.can_undo());
        typed(&mut editor, "abc", start);
        assert!(editor.can_undo());
        assert!(editor.undo());
        assert_eq!(editor.text(), "ab");
    }

    #[test]
    fn pending_typing_hides_redo() {
        let start = Instant::now();
        let mut editor = Editor::new("", EditHistory::default());
        editor.replace_all("one");
        editor.undo();
        assert!(editor.can_redo());
        typed(&mut editor, "x", start);
        assert!(!editor.can_redo());
        assert!(!editor.redo());
        assert_eq!(editor.text(), "x");
    }

    #[test]
    fn large_edits_are_recorded_immediately() {
        let start = Instant::now();
        let mut editor = Editor::default();
        typed(&mut editor, "a", start);
        typed(&mut editor, "a plus a lot more", start + Duration::from_millis(10));
        assert_eq!(editor.history().undo_len(), 2);
        assert!(!editor.history().has_pending());
        editor.undo();
        assert_eq!(editor.text(), "a");
        editor.undo();
        assert_eq!(editor.text(), "");
    }

    #[test]
    fn insert_and_cut_work_on_characters() {
        let mut editor = Editor::new("héllo wörld", EditHistory::default());
        editor.set_selection(Selection::new(6, 11));
        assert_eq!(editor.copy_text().as_deref(), Some("wörld"));
        assert_eq!(editor.cut().as_deref(), Some("wörld"));
        assert_eq!(editor.text(), "héllo ");
        assert!(editor.insert_at_selection("ß"));
        assert_eq!(editor.text(), "héllo ß");
        assert_eq!(editor.selection(), Selection::caret(7));

        editor.undo();
        assert_eq!(editor.text(), "héllo ");
        editor.undo();
        assert_eq!(editor.text(), "héllo wörld");
        assert_eq!(editor.selection(), Selection::new(6, 11));
    }

    #[test]
    fn reversed_selection_is_handled() {
        let mut editor = Editor::new("abcdef", EditHistory::default());
        editor.set_selection(Selection::new(4, 1));
        assert_eq!(editor.copy_text().as_deref(), Some("bcd"));
        editor.insert_at_selection("X");
        assert_eq!(editor.text(), "aXef");
    }

    #[test]
    fn select_all_and_counts() {
        let mut editor = Editor::new("one\ntwo", EditHistory::default());
        editor.select_all();
        assert_eq!(editor.selection(), Selection::new(0, 7));
        assert_eq!(editor.char_count(), 7);
        assert_eq!(editor.line_count(), 2);
        assert!(editor.has_selection());
        assert!(editor.has_pending_selection());
        editor.take_pending_selection();
        assert!(!editor.has_pending_selection());
    }

    #[test]
    fn reset_forgets_history_and_bumps_revision() {
        let mut editor = Editor::new("old", EditHistory::default());
        editor.replace_all("new");
        let revision = editor.revision();
        editor.reset("restored");
        assert!(!editor.can_undo());
        assert!(editor.revision() > revision);
        assert!(!editor.replace_all("restored"));
    }
}
