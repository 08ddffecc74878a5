use lin_notepad::files::{FileDialogs, FileOutcome, FileRequest, FileResponse, FileWorker};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;
use tempfile::tempdir;

struct FixedDialogs {
    open: Option<PathBuf>,
    save: Option<PathBuf>,
}

impl FileDialogs for FixedDialogs {
    fn pick_open(&self) -> Option<PathBuf> {
        self.open.clone()
    }

    fn pick_save(&self, _current: Option<&Path>) -> Option<PathBuf> {
        self.save.clone()
    }
}

fn wait_for(worker: &mut FileWorker, wake: &mpsc::Receiver<()>) -> FileResponse {
    wake.recv_timeout(Duration::from_secs(5)).expect("worker did not answer");
    worker.try_recv().expect("response after wake-up")
}

#[test]
fn open_reads_the_picked_file() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("note.txt");
    std::fs::write(&file, "ünïcode text").unwrap();
    let (tx, wake) = mpsc::channel();
    let mut worker = FileWorker::spawn(
        FixedDialogs {
            open: Some(file.clone()),
            save: None,
        },
        move || {
            let _ = tx.send(());
        },
    );

    assert!(worker.dispatch(7, FileRequest::Open));
    let response = wait_for(&mut worker, &wake);
    assert_eq!(response.revision, 7);
    match response.outcome {
        FileOutcome::Opened(result) => {
            assert!(!result.canceled);
            assert_eq!(result.path, Some(file));
            assert_eq!(result.content.as_deref(), Some("ünïcode text"));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert!(!worker.is_busy());
}

#[test]
fn only_one_request_runs_at_a_time() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("out.txt");
    let (tx, wake) = mpsc::channel();
    let mut worker = FileWorker::spawn(
        FixedDialogs {
            open: None,
            save: Some(target.clone()),
        },
        move || {
            let _ = tx.send(());
        },
    );

    assert!(worker.dispatch(
        1,
        FileRequest::SaveAs {
            current: None,
            content: "first".into(),
        }
    ));
    assert!(worker.is_busy());
    assert!(!worker.dispatch(2, FileRequest::Open));

    let response = wait_for(&mut worker, &wake);
    assert_eq!(response.revision, 1);
    assert!(matches!(
        response.outcome,
        FileOutcome::Saved(ref r) if r.path.as_deref() == Some(target.as_path())
    ));
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "first");
}

#[test]
fn cancelled_save_reports_canceled() {
    let (tx, wake) = mpsc::channel();
    let mut worker = FileWorker::spawn(
        FixedDialogs {
            open: None,
            save: None,
        },
        move || {
            let _ = tx.send(());
        },
    );
    worker.dispatch(
        3,
        FileRequest::Save {
            path: None,
            content: "x".into(),
        },
    );
    match wait_for(&mut worker, &wake).outcome {
        FileOutcome::Saved(result) => {
            assert!(result.canceled);
            assert!(result.path.is_none());
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}
