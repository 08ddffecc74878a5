use once_cell::sync::OnceCell;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// Filter used by [`init`]. `RUST_LOG` is only honoured when debug logging is
/// enabled, so a stray variable in the user's environment cannot make a
/// release session verbose.
pub fn filter(debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    }
}

/// Initialise logging.
///
/// With a `log_file` output goes through a non-blocking file writer whose
/// guard lives for the rest of the process; otherwise it goes to stdout.
/// Calling this more than once keeps the first subscriber.
pub fn init(debug: bool, log_file: Option<PathBuf>) {
    let builder = tracing_subscriber::fmt().with_env_filter(filter(debug));

    let Some(path) = log_file else {
        let _ = builder.try_init();
        return;
    };

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let Some(file_name) = path.file_name() else {
        let _ = builder.try_init();
        return;
    };
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("cannot create log directory {}: {e}", dir.display());
        let _ = builder.try_init();
        return;
    }

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    if builder.with_writer(writer).with_ansi(false).try_init().is_ok() {
        let _ = FILE_GUARD.set(guard);
    }
}
