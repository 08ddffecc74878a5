use criterion::{criterion_group, criterion_main, Criterion};
use lin_notepad::editor::Editor;
use lin_notepad::history::{EditHistory, HistoryEntry, Selection};
use std::time::{Duration, Instant};

fn bench_record_at_limit(c: &mut Criterion) {
    let mut history = EditHistory::default();
    let text = "lorem ipsum ".repeat(200);
    for _ in 0..history.limit() {
        history.record_edit(text.clone(), Selection::caret(0));
    }
    c.bench_function("record_edit_at_limit", |b| {
        b.iter(|| history.record_edit(text.clone(), Selection::caret(0)))
    });
}

fn bench_typing_burst(c: &mut Criterion) {
    c.bench_function("typing_burst_500", |b| {
        b.iter(|| {
            let start = Instant::now();
            let mut editor = Editor::default();
            let mut text = String::new();
            for i in 0..500u64 {
                text.push('x');
                let caret = text.len();
                editor.on_user_edit(
                    text.clone(),
                    Selection::caret(caret),
                    start + Duration::from_millis(i),
                );
            }
            editor.tick(start + Duration::from_secs(10));
            editor
        })
    });
}

fn bench_undo_redo_cycle(c: &mut Criterion) {
    let mut history = EditHistory::default();
    for i in 0..100 {
        history.record_edit(format!("v{i}"), Selection::caret(0));
    }
    let mut current = HistoryEntry::new("current", Selection::caret(0));
    c.bench_function("undo_redo_100", |b| {
        b.iter(|| {
            while let Some(entry) = history.undo(current.clone()) {
                current = entry;
            }
            while let Some(entry) = history.redo(current.clone()) {
                current = entry;
            }
        })
    });
}

criterion_group!(
    benches,
    bench_record_at_limit,
    bench_typing_burst,
    bench_undo_redo_cycle
);
criterion_main!(benches);
