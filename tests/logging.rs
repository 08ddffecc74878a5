use std::{fs, thread::sleep, time::Duration};

use serial_test::serial;
use tempfile::tempdir;

#[test]
#[serial]
fn debug_events_reach_a_log_file_in_a_new_directory() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("logs").join("notepad.log");

    lin_notepad::logging::init(true, Some(path.clone()));
    tracing::debug!(revision = 7, "debug line from the editor");
    // A second init keeps the first subscriber.
    lin_notepad::logging::init(false, None);
    tracing::info!("still routed to the file");

    sleep(Duration::from_millis(200));

    assert!(path.exists(), "log file was not created");
    let contents = fs::read_to_string(path).unwrap();
    assert!(contents.contains("debug line from the editor"));
    assert!(contents.contains("revision=7"));
    assert!(contents.contains("still routed to the file"));
}
