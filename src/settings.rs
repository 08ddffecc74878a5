use crate::common::debounce::Debounce;
use crate::history::{DEFAULT_HISTORY_LIMIT, DEFAULT_TYPING_DEBOUNCE};
use crate::paste_rules::PasteRule;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

pub const SETTINGS_FILE_NAME: &str = "settings.json";
/// Overrides the settings location when set.
pub const SETTINGS_ENV_VAR: &str = "LIN_NOTEPAD_SETTINGS";
const APP_DIR_NAME: &str = "lin_notepad";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    System,
}

impl Default for ThemeMode {
    fn default() -> Self {
        ThemeMode::Light
    }
}

impl ThemeMode {
    /// The mode the window-controls toggle switches to.
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light | ThemeMode::System => ThemeMode::Dark,
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeMode::Light => write!(f, "Light"),
            ThemeMode::Dark => write!(f, "Dark"),
            ThemeMode::System => write!(f, "System"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Document text restored at startup.
    #[serde(default)]
    pub last_text: String,
    #[serde(default)]
    pub theme_mode: ThemeMode,
    #[serde(default = "default_true")]
    pub show_status_bar: bool,
    #[serde(default)]
    pub paste_rules: Vec<PasteRule>,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// When set, log output goes to this file instead of stdout.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// Last known window size. If absent, a default size is used.
    #[serde(default)]
    pub window_size: Option<(i32, i32)>,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default = "default_zoom")]
    pub zoom_factor: f32,
    /// Maximum number of undo steps.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_typing_debounce_ms")]
    pub typing_debounce_ms: u64,
    /// Delay before changes are written back to the settings file.
    #[serde(default = "default_autosave_delay_ms")]
    pub autosave_delay_ms: u64,
}

fn default_true() -> bool {
    true
}

fn default_font_size() -> f32 {
    14.0
}

fn default_zoom() -> f32 {
    1.0
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_typing_debounce_ms() -> u64 {
    DEFAULT_TYPING_DEBOUNCE.as_millis() as u64
}

fn default_autosave_delay_ms() -> u64 {
    300
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            last_text: String::new(),
            theme_mode: ThemeMode::default(),
            show_status_bar: true,
            paste_rules: Vec::new(),
            debug_logging: false,
            log_file: None,
            window_size: None,
            font_size: default_font_size(),
            zoom_factor: default_zoom(),
            history_limit: default_history_limit(),
            typing_debounce_ms: default_typing_debounce_ms(),
            autosave_delay_ms: default_autosave_delay_ms(),
        }
    }
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn typing_debounce(&self) -> Duration {
        Duration::from_millis(self.typing_debounce_ms)
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }
}

/// Owns the persisted [`Settings`] and writes them back after changes.
///
/// Writes are debounced: [`SettingsStore::update`] schedules a save and
/// [`SettingsStore::tick`] performs it once the delay has passed.
/// [`SettingsStore::flush`] writes immediately and is used on exit.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
    autosave: Debounce<()>,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>, settings: Settings) -> Self {
        let autosave = Debounce::new(settings.autosave_delay());
        Self {
            path: path.into(),
            settings,
            autosave,
        }
    }

    /// `LIN_NOTEPAD_SETTINGS`, else the per-user config directory, else the
    /// working directory.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var(SETTINGS_ENV_VAR) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }
        dirs_next::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME).join(SETTINGS_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE_NAME))
    }

    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let settings = Settings::load(&path)
            .with_context(|| format!("load settings from {}", path.display()))?;
        Ok(Self::new(path, settings))
    }

    /// Load the settings, falling back to defaults when the file is corrupt.
    pub fn load_or_default(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::load(path.clone()) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "using default settings");
                Self::new(path, Settings::default())
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Apply `change` and schedule a write.
    pub fn update(&mut self, now: Instant, change: impl FnOnce(&mut Settings)) {
        change(&mut self.settings);
        self.autosave.set_delay(self.settings.autosave_delay());
        self.autosave.schedule((), now);
    }

    pub fn is_dirty(&self) -> bool {
        self.autosave.is_pending()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.autosave.deadline()
    }

    /// Write the settings if the autosave delay has passed. Returns true when
    /// a write was attempted.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.autosave.poll(now).is_none() {
            return false;
        }
        if let Err(e) = self.write() {
            tracing::warn!(error = %format!("{e:#}"), "failed to save settings");
        }
        true
    }

    /// Write immediately, cancelling any scheduled write.
    pub fn flush(&mut self) -> Result<()> {
        self.autosave.cancel();
        self.write()
    }

    /// Re-read the settings file, discarding unsaved changes.
    pub fn reload(&mut self) -> Result<()> {
        self.autosave.cancel();
        self.settings = Settings::load(&self.path)
            .with_context(|| format!("reload settings from {}", self.path.display()))?;
        Ok(())
    }

    fn write(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("create settings parent folder {}", parent.display())
                })?;
            }
        }
        self.settings
            .save(&self.path)
            .with_context(|| format!("write settings file {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}
