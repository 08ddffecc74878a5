pub mod clipboard;
pub mod common;
pub mod editor;
pub mod files;
pub mod gui;
pub mod history;
pub mod host;
pub mod logging;
pub mod menu;
pub mod paste_rules;
pub mod settings;
