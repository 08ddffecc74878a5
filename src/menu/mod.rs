pub mod config;
pub mod controller;
pub mod shortcut;

pub use config::{notepad_menus, ActionItem, Command, MenuConfig, MenuItem, MenuState};
pub use controller::{MenuBarGroup, MenuBarState, PopupId, SUBMENU_OPEN_DELAY};
pub use shortcut::{menu_shortcuts, parse_shortcut};
