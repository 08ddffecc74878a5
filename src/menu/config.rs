use crate::settings::ThemeMode;

/// Everything a menu entry can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    New,
    Open,
    Save,
    SaveAs,
    Clear,
    Exit,
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    SelectAll,
    OpenSettings,
    Reload,
    ForceReload,
    ToggleDevTools,
    ZoomReset,
    ZoomIn,
    ZoomOut,
    ToggleFullscreen,
    SetTheme(ThemeMode),
    ToggleTheme,
    ToggleStatusBar,
    Minimize,
    ToggleMaximize,
    CloseWindow,
    About,
}

impl Command {
    /// Clipboard commands arrive as clipboard events from the platform when
    /// triggered from the keyboard, so their shortcuts are display-only.
    pub fn is_clipboard(self) -> bool {
        matches!(self, Command::Cut | Command::Copy | Command::Paste)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionItem {
    pub label: String,
    pub shortcut: Option<String>,
    pub command: Command,
    pub disabled: bool,
    pub selected: bool,
}

impl ActionItem {
    pub fn new(label: impl Into<String>, command: Command) -> Self {
        Self {
            label: label.into(),
            shortcut: None,
            command,
            disabled: false,
            selected: false,
        }
    }

    pub fn shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmenuItem {
    pub label: String,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MenuItem {
    Action(ActionItem),
    Submenu(SubmenuItem),
    Divider,
}

impl From<ActionItem> for MenuItem {
    fn from(item: ActionItem) -> Self {
        MenuItem::Action(item)
    }
}

impl MenuItem {
    pub fn submenu(label: impl Into<String>, items: Vec<MenuItem>) -> Self {
        MenuItem::Submenu(SubmenuItem {
            label: label.into(),
            items,
        })
    }
}

/// One root entry of the menu bar.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuConfig {
    pub label: String,
    pub items: Vec<MenuItem>,
}

impl MenuConfig {
    pub fn new(label: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Self {
            label: label.into(),
            items,
        }
    }
}

/// Application state the menus reflect (enabled and checked entries).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuState {
    pub can_undo: bool,
    pub can_redo: bool,
    pub has_selection: bool,
    pub theme_mode: ThemeMode,
    pub show_status_bar: bool,
}

pub fn notepad_menus(state: &MenuState) -> Vec<MenuConfig> {
    vec![
        MenuConfig::new(
            "File",
            vec![
                ActionItem::new("New", Command::New).shortcut("Ctrl+N").into(),
                ActionItem::new("Open...", Command::Open).shortcut("Ctrl+O").into(),
                MenuItem::Divider,
                ActionItem::new("Save", Command::Save).shortcut("Ctrl+S").into(),
                ActionItem::new("Save As...", Command::SaveAs)
                    .shortcut("Ctrl+Shift+S")
                    .into(),
                MenuItem::Divider,
                ActionItem::new("Clear", Command::Clear).into(),
                MenuItem::Divider,
                ActionItem::new("Exit", Command::Exit).into(),
            ],
        ),
        MenuConfig::new(
            "Edit",
            vec![
                ActionItem::new("Undo", Command::Undo)
                    .shortcut("Ctrl+Z")
                    .disabled(!state.can_undo)
                    .into(),
                ActionItem::new("Redo", Command::Redo)
                    .shortcut("Ctrl+Y")
                    .disabled(!state.can_redo)
                    .into(),
                MenuItem::Divider,
                ActionItem::new("Cut", Command::Cut)
                    .shortcut("Ctrl+X")
                    .disabled(!state.has_selection)
                    .into(),
                ActionItem::new("Copy", Command::Copy)
                    .shortcut("Ctrl+C")
                    .disabled(!state.has_selection)
                    .into(),
                ActionItem::new("Paste", Command::Paste).shortcut("Ctrl+V").into(),
                MenuItem::Divider,
                ActionItem::new("Select All", Command::SelectAll)
                    .shortcut("Ctrl+A")
                    .into(),
                MenuItem::Divider,
                ActionItem::new("Settings...", Command::OpenSettings).into(),
            ],
        ),
        MenuConfig::new(
            "View",
            vec![
                ActionItem::new("Reload", Command::Reload).shortcut("Ctrl+R").into(),
                ActionItem::new("Force Reload", Command::ForceReload)
                    .shortcut("Ctrl+Shift+R")
                    .into(),
                ActionItem::new("Toggle Developer Tools", Command::ToggleDevTools)
                    .shortcut("Ctrl+Shift+I")
                    .into(),
                MenuItem::Divider,
                ActionItem::new("Actual Size", Command::ZoomReset)
                    .shortcut("Ctrl+0")
                    .into(),
                ActionItem::new("Zoom In", Command::ZoomIn).shortcut("Ctrl+=").into(),
                ActionItem::new("Zoom Out", Command::ZoomOut).shortcut("Ctrl+-").into(),
                MenuItem::Divider,
                ActionItem::new("Toggle Full Screen", Command::ToggleFullscreen)
                    .shortcut("F11")
                    .into(),
                MenuItem::Divider,
                MenuItem::submenu(
                    "Theme",
                    [ThemeMode::Light, ThemeMode::Dark, ThemeMode::System]
                        .into_iter()
                        .map(|mode| {
                            MenuItem::from(
                                ActionItem::new(mode.to_string(), Command::SetTheme(mode))
                                    .selected(state.theme_mode == mode),
                            )
                        })
                        .collect(),
                ),
                ActionItem::new("Status Bar", Command::ToggleStatusBar)
                    .selected(state.show_status_bar)
                    .into(),
            ],
        ),
        MenuConfig::new(
            "Window",
            vec![
                ActionItem::new("Minimize", Command::Minimize).into(),
                ActionItem::new("Zoom", Command::ToggleMaximize).into(),
                MenuItem::Divider,
                ActionItem::new("Close", Command::CloseWindow)
                    .shortcut("Alt+F4")
                    .into(),
            ],
        ),
        MenuConfig::new(
            "Help",
            vec![ActionItem::new("About", Command::About).into()],
        ),
    ]
}

/// Visit every action item in `menus`, depth first.
pub fn for_each_action<'a>(menus: &'a [MenuConfig], mut visit: impl FnMut(&'a ActionItem)) {
    fn walk<'a>(items: &'a [MenuItem], visit: &mut dyn FnMut(&'a ActionItem)) {
        for item in items {
            match item {
                MenuItem::Action(action) => visit(action),
                MenuItem::Submenu(sub) => walk(&sub.items, visit),
                MenuItem::Divider => {}
            }
        }
    }
    for menu in menus {
        walk(&menu.items, &mut visit);
    }
}
