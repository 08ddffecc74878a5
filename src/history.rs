use crate::common::debounce::Debounce;
use crate::common::text::char_len;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Maximum number of undo steps kept before the oldest is dropped. A
/// configured limit is clamped to `1..=DEFAULT_HISTORY_LIMIT`.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;
/// Inactivity window after which a burst of typing becomes one undo step.
pub const DEFAULT_TYPING_DEBOUNCE: Duration = Duration::from_millis(1000);
/// Edits inserting or removing more than this many characters are recorded
/// immediately instead of being coalesced with typing.
pub const LARGE_EDIT_THRESHOLD: usize = 5;

/// Selection bounds as character offsets. `start <= end` is not required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn caret(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn sorted(&self) -> (usize, usize) {
        (self.start.min(self.end), self.start.max(self.end))
    }

    /// Clamp both bounds to a document of `len` characters.
    pub fn clamped(&self, len: usize) -> Self {
        Self::new(self.start.min(len), self.end.min(len))
    }
}

/// One document snapshot together with the selection active at that point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub text: String,
    pub selection: Selection,
}

impl HistoryEntry {
    pub fn new(text: impl Into<String>, selection: Selection) -> Self {
        Self {
            text: text.into(),
            selection,
        }
    }
}

/// Whether the change from `previous` to `next` should bypass typing
/// coalescing.
///
/// The changed span is what lies between the common prefix and the common
/// suffix, so replacing a selection with text of the same length still
/// counts.
pub fn is_large_edit(previous: &str, next: &str) -> bool {
    let prefix = previous
        .chars()
        .zip(next.chars())
        .take_while(|(a, b)| a == b)
        .count();
    let previous_rest = char_len(previous) - prefix;
    let next_rest = char_len(next) - prefix;
    let suffix = previous
        .chars()
        .rev()
        .zip(next.chars().rev())
        .take(previous_rest.min(next_rest))
        .take_while(|(a, b)| a == b)
        .count();
    let removed = previous_rest - suffix;
    let inserted = next_rest - suffix;
    removed.max(inserted) > LARGE_EDIT_THRESHOLD
}

fn clamp_limit(limit: usize) -> usize {
    limit.clamp(1, DEFAULT_HISTORY_LIMIT)
}

/// Undo/redo stacks of document snapshots.
///
/// The live document is owned by the caller: `undo` and `redo` receive the
/// current state and hand back the snapshot to restore.
#[derive(Debug, Clone)]
pub struct EditHistory {
    undo_stack: VecDeque<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    limit: usize,
    pending: Debounce<HistoryEntry>,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT, DEFAULT_TYPING_DEBOUNCE)
    }
}

impl EditHistory {
    pub fn new(limit: usize, typing_debounce: Duration) -> Self {
        let limit = clamp_limit(limit);
        Self {
            undo_stack: VecDeque::with_capacity(limit),
            redo_stack: Vec::new(),
            limit,
            pending: Debounce::new(typing_debounce),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.limit = clamp_limit(limit);
        self.evict_overflow();
    }

    pub fn set_typing_debounce(&mut self, delay: Duration) {
        self.pending.set_delay(delay);
    }

    /// Push a snapshot immediately and invalidate redo history.
    pub fn record_edit(&mut self, previous_text: impl Into<String>, previous_selection: Selection) {
        self.push(HistoryEntry::new(previous_text, previous_selection));
    }

    /// Schedule a push once typing has been idle for the debounce delay.
    ///
    /// Repeated calls move the deadline but keep the snapshot taken by the
    /// first call, so a burst collapses into the state before it began.
    pub fn record_edit_debounced(
        &mut self,
        previous_text: &str,
        previous_selection: Selection,
        now: Instant,
    ) {
        self.pending.extend_or_insert_with(now, || {
            HistoryEntry::new(previous_text, previous_selection)
        });
    }

    /// Fire the debounced push if its deadline passed. Returns true when an
    /// entry was pushed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.pending.poll(now) {
            Some(entry) => {
                self.push(entry);
                true
            }
            None => false,
        }
    }

    /// Push the pending debounced snapshot right away, if any.
    pub fn flush_pending(&mut self) -> bool {
        match self.pending.cancel() {
            Some(entry) => {
                self.push(entry);
                true
            }
            None => false,
        }
    }

    /// Drop the pending debounced snapshot without recording it.
    pub fn cancel_pending(&mut self) {
        if self.pending.cancel().is_some() {
            tracing::debug!("discarded pending history entry");
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_pending()
    }

    pub fn pending_deadline(&self) -> Option<Instant> {
        self.pending.deadline()
    }

    /// Restore the previous snapshot. `current` is kept for redo.
    pub fn undo(&mut self, current: HistoryEntry) -> Option<HistoryEntry> {
        let entry = self.undo_stack.pop_back()?;
        self.redo_stack.push(current);
        Some(entry)
    }

    /// Re-apply the last undone snapshot. `current` is kept for undo.
    pub fn redo(&mut self, current: HistoryEntry) -> Option<HistoryEntry> {
        let entry = self.redo_stack.pop()?;
        self.undo_stack.push_back(current);
        self.evict_overflow();
        Some(entry)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn undo_entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.undo_stack.iter()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.pending.cancel();
    }

    fn push(&mut self, entry: HistoryEntry) {
        self.undo_stack.push_back(entry);
        self.evict_overflow();
        self.redo_stack.clear();
    }

    fn evict_overflow(&mut self) {
        while self.undo_stack.len() > self.limit {
            self.undo_stack.pop_front();
            tracing::trace!(limit = self.limit, "evicted oldest history entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str, pos: usize) -> HistoryEntry {
        HistoryEntry::new(text, Selection::caret(pos))
    }

    #[test]
    fn new_record_clears_redo_stack() {
        let mut history = EditHistory::default();
        history.record_edit("a", Selection::caret(1));
        let _ = history.undo(entry("ab", 2));
        assert_eq!(history.redo_len(), 1);

        history.record_edit("a", Selection::caret(1));
        assert_eq!(history.redo_len(), 0);
        assert_eq!(history.undo_len(), 1);
    }

    #[test]
    fn undo_and_redo_on_empty_stacks_are_noops() {
        let mut history = EditHistory::default();
        assert_eq!(history.undo(entry("x", 0)), None);
        assert_eq!(history.redo(entry("x", 0)), None);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn capacity_evicts_oldest_first() {
        let mut history = EditHistory::new(3, DEFAULT_TYPING_DEBOUNCE);
        for i in 0..5 {
            history.record_edit(i.to_string(), Selection::caret(0));
        }
        let texts: Vec<_> = history.undo_entries().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, ["2", "3", "4"]);
    }

    #[test]
    fn shrinking_limit_drops_oldest() {
        let mut history = EditHistory::default();
        for i in 0..10 {
            history.record_edit(i.to_string(), Selection::caret(0));
        }
        history.set_limit(2);
        let texts: Vec<_> = history.undo_entries().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, ["8", "9"]);
    }

    #[test]
    fn debounced_burst_keeps_first_snapshot() {
        let start = Instant::now();
        let mut history = EditHistory::default();
        history.record_edit_debounced("", Selection::caret(0), start);
        history.record_edit_debounced("h", Selection::caret(1), start + Duration::from_millis(300));
        history.record_edit_debounced("he", Selection::caret(2), start + Duration::from_millis(900));

        assert!(!history.tick(start + Duration::from_millis(1500)));
        assert!(history.tick(start + Duration::from_millis(1900)));
        assert_eq!(history.undo_len(), 1);
        assert_eq!(history.undo_entries().next(), Some(&entry("", 0)));
    }

    #[test]
    fn flush_and_cancel_pending() {
        let now = Instant::now();
        let mut history = EditHistory::default();
        history.record_edit_debounced("a", Selection::caret(1), now);
        assert!(history.flush_pending());
        assert_eq!(history.undo_len(), 1);

        history.record_edit_debounced("b", Selection::caret(1), now);
        history.cancel_pending();
        assert!(!history.tick(now + Duration::from_secs(5)));
        assert_eq!(history.undo_len(), 1);
    }

    #[test]
    fn large_edit_threshold() {
        assert!(!is_large_edit("hello", "hello!"));
        assert!(!is_large_edit("", "12345"));
        assert!(is_large_edit("", "123456"));
        assert!(is_large_edit("a long line", ""));
    }

    #[test]
    fn same_length_replacement_is_large_when_span_is() {
        assert!(!is_large_edit("hello", "hellp"));
        assert!(is_large_edit("say abcdefgh now", "say ABCDEFGH now"));
        assert!(!is_large_edit("aaaa", "aaaaa"));
        assert!(!is_large_edit("héllo wörld", "héllo wörd"));
    }

    #[test]
    fn configured_limit_is_clamped() {
        let mut history = EditHistory::new(0, DEFAULT_TYPING_DEBOUNCE);
        assert_eq!(history.limit(), 1);
        history.record_edit("a", Selection::caret(0));
        assert_eq!(history.undo_len(), 1);

        history.set_limit(10_000);
        assert_eq!(history.limit(), DEFAULT_HISTORY_LIMIT);
    }
}
