use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};

const TEXT_FILTER_NAME: &str = "Text";
const TEXT_FILTER_EXTS: &[&str] = &["txt", "md", "log"];
const UNTITLED_FILE_NAME: &str = "Untitled.txt";

/// File pickers used by open/save. Implementations may block; they run on
/// the [`FileWorker`] thread.
pub trait FileDialogs: Send + 'static {
    fn pick_open(&self) -> Option<PathBuf>;
    fn pick_save(&self, current: Option<&Path>) -> Option<PathBuf>;
}

/// Native dialogs. Only Windows has a picker; elsewhere every dialog
/// reports a cancel.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeDialogs;

#[cfg(target_os = "windows")]
impl FileDialogs for NativeDialogs {
    fn pick_open(&self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Open")
            .add_filter(TEXT_FILTER_NAME, TEXT_FILTER_EXTS)
            .add_filter("All files", &["*"])
            .pick_file()
    }

    fn pick_save(&self, current: Option<&Path>) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new()
            .set_title("Save As")
            .add_filter(TEXT_FILTER_NAME, TEXT_FILTER_EXTS);
        match current {
            Some(path) => {
                if let Some(dir) = path.parent() {
                    dialog = dialog.set_directory(dir);
                }
                if let Some(name) = path.file_name() {
                    dialog = dialog.set_file_name(name.to_string_lossy());
                }
            }
            None => dialog = dialog.set_file_name(UNTITLED_FILE_NAME),
        }
        dialog.save_file()
    }
}

#[cfg(not(target_os = "windows"))]
impl FileDialogs for NativeDialogs {
    fn pick_open(&self) -> Option<PathBuf> {
        tracing::debug!(filter = TEXT_FILTER_NAME, exts = ?TEXT_FILTER_EXTS, "no native open dialog");
        None
    }

    fn pick_save(&self, current: Option<&Path>) -> Option<PathBuf> {
        let name = current
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNTITLED_FILE_NAME.to_owned());
        tracing::debug!(%name, "no native save dialog");
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OpenResult {
    pub canceled: bool,
    pub path: Option<PathBuf>,
    pub content: Option<String>,
    /// Set when the dialog succeeded but reading the file failed.
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SaveResult {
    pub canceled: bool,
    pub path: Option<PathBuf>,
    /// Set when the dialog succeeded but writing the file failed.
    pub error: Option<String>,
}

impl OpenResult {
    fn canceled() -> Self {
        Self {
            canceled: true,
            ..Self::default()
        }
    }
}

impl SaveResult {
    fn canceled() -> Self {
        Self {
            canceled: true,
            ..Self::default()
        }
    }
}

pub fn read_text_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    String::from_utf8(bytes).with_context(|| format!("{} is not valid UTF-8", path.display()))
}

pub fn write_text_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("write {}", path.display()))
}

/// Prompt for a file and read it as UTF-8.
pub fn open_file(dialogs: &dyn FileDialogs) -> OpenResult {
    let Some(path) = dialogs.pick_open() else {
        return OpenResult::canceled();
    };
    match read_text_file(&path) {
        Ok(content) => {
            tracing::info!(path = %path.display(), "opened file");
            OpenResult {
                canceled: false,
                path: Some(path),
                content: Some(content),
                error: None,
            }
        }
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "open failed");
            OpenResult {
                error: Some(format!("{e:#}")),
                ..OpenResult::canceled()
            }
        }
    }
}

/// Save to `path`, prompting for one when it is `None`.
pub fn save_file(dialogs: &dyn FileDialogs, path: Option<&Path>, content: &str) -> SaveResult {
    let target = match path {
        Some(path) => path.to_path_buf(),
        None => match dialogs.pick_save(None) {
            Some(path) => path,
            None => return SaveResult::canceled(),
        },
    };
    write_to(target, content)
}

/// Save to a freshly chosen path.
pub fn save_file_as(dialogs: &dyn FileDialogs, current: Option<&Path>, content: &str) -> SaveResult {
    match dialogs.pick_save(current) {
        Some(path) => write_to(path, content),
        None => SaveResult::canceled(),
    }
}

fn write_to(path: PathBuf, content: &str) -> SaveResult {
    match write_text_file(&path, content) {
        Ok(()) => {
            tracing::info!(path = %path.display(), bytes = content.len(), "saved file");
            SaveResult {
                canceled: false,
                path: Some(path),
                error: None,
            }
        }
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "save failed");
            SaveResult {
                error: Some(format!("{e:#}")),
                ..SaveResult::canceled()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileRequest {
    Open,
    Save {
        path: Option<PathBuf>,
        content: String,
    },
    SaveAs {
        current: Option<PathBuf>,
        content: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Opened(OpenResult),
    Saved(SaveResult),
}

/// A finished request together with the document revision captured when it
/// was dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResponse {
    pub revision: u64,
    pub outcome: FileOutcome,
}

/// Runs file dialogs and IO off the UI thread.
///
/// Only one request is in flight at a time; further requests are ignored
/// until the response has been received. The thread exits when the worker is
/// dropped.
pub struct FileWorker {
    request_tx: Sender<(u64, FileRequest)>,
    response_rx: Receiver<FileResponse>,
    busy: bool,
}

impl FileWorker {
    pub fn spawn<D, N>(dialogs: D, notify: N) -> Self
    where
        D: FileDialogs,
        N: Fn() + Send + 'static,
    {
        let (request_tx, request_rx) = channel::<(u64, FileRequest)>();
        let (response_tx, response_rx) = channel::<FileResponse>();
        std::thread::spawn(move || {
            for (revision, request) in request_rx {
                let outcome = match request {
                    FileRequest::Open => FileOutcome::Opened(open_file(&dialogs)),
                    FileRequest::Save { path, content } => {
                        FileOutcome::Saved(save_file(&dialogs, path.as_deref(), &content))
                    }
                    FileRequest::SaveAs { current, content } => {
                        FileOutcome::Saved(save_file_as(&dialogs, current.as_deref(), &content))
                    }
                };
                if response_tx.send(FileResponse { revision, outcome }).is_err() {
                    break;
                }
                notify();
            }
            tracing::debug!("file worker stopped");
        });
        Self {
            request_tx,
            response_rx,
            busy: false,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Queue `request`. Returns false when another request is still running
    /// or the worker has stopped.
    pub fn dispatch(&mut self, revision: u64, request: FileRequest) -> bool {
        if self.busy {
            tracing::debug!("file request ignored while another is running");
            return false;
        }
        if self.request_tx.send((revision, request)).is_err() {
            tracing::warn!("file worker is gone");
            return false;
        }
        self.busy = true;
        true
    }

    pub fn try_recv(&mut self) -> Option<FileResponse> {
        match self.response_rx.try_recv() {
            Ok(response) => {
                self.busy = false;
                Some(response)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.busy = false;
                None
            }
        }
    }
}
