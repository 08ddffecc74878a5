use super::config::{for_each_action, Command, MenuConfig};
use eframe::egui::{Key, KeyboardShortcut, Modifiers};

/// Parse a shortcut string like "Ctrl+Shift+S" into a [`KeyboardShortcut`].
///
/// Matching is case-insensitive. `ctrl` maps to the platform command key.
pub fn parse_shortcut(s: &str) -> Option<KeyboardShortcut> {
    let mut modifiers = Modifiers::NONE;
    let mut key: Option<Key> = None;

    // "Ctrl++" style strings name the plus key itself.
    let trimmed = s.trim();
    let (body, trailing_plus) = match trimmed.strip_suffix("++") {
        Some(rest) => (rest, true),
        None => (trimmed, false),
    };

    for part in body.split('+') {
        let upper = part.trim().to_ascii_uppercase();
        match upper.as_str() {
            "CTRL" | "CONTROL" | "CMD" | "COMMAND" => modifiers = modifiers | Modifiers::COMMAND,
            "SHIFT" => modifiers = modifiers | Modifiers::SHIFT,
            "ALT" | "OPTION" => modifiers = modifiers | Modifiers::ALT,
            "" => {}
            _ => {
                if key.is_some() {
                    return None;
                }
                key = Some(parse_key(&upper)?);
            }
        }
    }
    if trailing_plus {
        if key.is_some() {
            return None;
        }
        key = Some(Key::Plus);
    }

    key.map(|k| KeyboardShortcut::new(modifiers, k))
}

fn parse_key(upper: &str) -> Option<Key> {
    let key = match upper {
        "SPACE" => Key::Space,
        "TAB" => Key::Tab,
        "ENTER" | "RETURN" => Key::Enter,
        "ESC" | "ESCAPE" => Key::Escape,
        "DELETE" | "DEL" => Key::Delete,
        "BACKSPACE" => Key::Backspace,
        "INSERT" => Key::Insert,
        "HOME" => Key::Home,
        "END" => Key::End,
        "PAGEUP" => Key::PageUp,
        "PAGEDOWN" => Key::PageDown,
        "UP" => Key::ArrowUp,
        "DOWN" => Key::ArrowDown,
        "LEFT" => Key::ArrowLeft,
        "RIGHT" => Key::ArrowRight,
        "=" | "EQUALS" => Key::Equals,
        "PLUS" => Key::Plus,
        "-" | "MINUS" => Key::Minus,
        "0" => Key::Num0,
        "1" => Key::Num1,
        "2" => Key::Num2,
        "3" => Key::Num3,
        "4" => Key::Num4,
        "5" => Key::Num5,
        "6" => Key::Num6,
        "7" => Key::Num7,
        "8" => Key::Num8,
        "9" => Key::Num9,
        "A" => Key::A,
        "B" => Key::B,
        "C" => Key::C,
        "D" => Key::D,
        "E" => Key::E,
        "F" => Key::F,
        "G" => Key::G,
        "H" => Key::H,
        "I" => Key::I,
        "J" => Key::J,
        "K" => Key::K,
        "L" => Key::L,
        "M" => Key::M,
        "N" => Key::N,
        "O" => Key::O,
        "P" => Key::P,
        "Q" => Key::Q,
        "R" => Key::R,
        "S" => Key::S,
        "T" => Key::T,
        "U" => Key::U,
        "V" => Key::V,
        "W" => Key::W,
        "X" => Key::X,
        "Y" => Key::Y,
        "Z" => Key::Z,
        "F1" => Key::F1,
        "F2" => Key::F2,
        "F3" => Key::F3,
        "F4" => Key::F4,
        "F5" => Key::F5,
        "F6" => Key::F6,
        "F7" => Key::F7,
        "F8" => Key::F8,
        "F9" => Key::F9,
        "F10" => Key::F10,
        "F11" => Key::F11,
        "F12" => Key::F12,
        _ => return None,
    };
    Some(key)
}

fn modifier_count(modifiers: Modifiers) -> usize {
    [modifiers.command, modifiers.shift, modifiers.alt]
        .into_iter()
        .filter(|m| *m)
        .count()
}

/// Collect the keyboard shortcuts of every action. Disabled entries are
/// included so their keys never fall through to the text widget.
///
/// The result is ordered most specific first: egui matches modifiers
/// loosely, so "Ctrl+S" would otherwise also consume "Ctrl+Shift+S".
pub fn menu_shortcuts(menus: &[MenuConfig]) -> Vec<(KeyboardShortcut, Command)> {
    let mut out = Vec::new();
    for_each_action(menus, |item| {
        if item.command.is_clipboard() {
            return;
        }
        let Some(text) = item.shortcut.as_deref() else {
            return;
        };
        match parse_shortcut(text) {
            Some(shortcut) => out.push((shortcut, item.command)),
            None => tracing::warn!(
                "shortcut '{}' for menu item '{}' is invalid; ignoring",
                text,
                item.label
            ),
        }
    });
    out.sort_by_key(|(shortcut, _)| std::cmp::Reverse(modifier_count(shortcut.modifiers)));
    out
}
