//! Shared command vocabulary for every accessible menu.
//!
//! Translates raw `KeyEvent`s and textual keybinds into semantic `NavCommand`s
//! so every navigator reacts the same way regardless of which domain is open.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Discrete navigation commands fed to the active navigator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    /// Move to the next entry (wraps)
    Next,
    /// Move to the previous entry (wraps)
    Previous,
    /// Open the selection, or run it if it is a leaf
    DrillDown,
    /// Pop one level; closes the menu at the root
    GoBack,
    /// Close the menu from any depth
    Close,
    /// Change the selected numeric value by this much
    Adjust(i32),
    /// Say the current state again
    Repeat,
}

/// Convert KeyEvent to string representation for matching against keybinds
pub fn key_event_to_string(key: KeyEvent) -> String {
    let mut parts = Vec::new();

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        parts.push("Ctrl");
    }
    if key.modifiers.contains(KeyModifiers::SHIFT) {
        parts.push("Shift");
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        parts.push("Alt");
    }

    let key_str = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => {
            // Shifted letters are written upper-case: "Shift+Q"
            if key.modifiers.contains(KeyModifiers::SHIFT) && c.is_ascii_lowercase() {
                c.to_ascii_uppercase().to_string()
            } else {
                c.to_string()
            }
        }
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => {
            parts.retain(|p| *p != "Shift");
            parts.push("Shift");
            "Tab".to_string()
        }
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => return String::new(),
    };

    parts.push(&key_str);
    normalize_keybind(&parts.join("+"))
}

/// Normalize a keybind string so config spellings compare equal to
/// `key_event_to_string` output ("control+q" == "Ctrl+q", "escape" == "Esc")
pub fn normalize_keybind(s: &str) -> String {
    let mut modifiers = Vec::new();
    let mut key = String::new();

    // A literal plus key: "+" or "Shift++"
    let s = s.trim();
    let s = if s == "+" {
        key.push('+');
        ""
    } else if let Some(rest) = s.strip_suffix("++") {
        key.push('+');
        rest
    } else {
        s
    };

    for part in s.split('+').filter(|p| !p.trim().is_empty()) {
        let part = part.trim();
        match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => modifiers.push("Ctrl"),
            "shift" => modifiers.push("Shift"),
            "alt" => modifiers.push("Alt"),
            "esc" | "escape" => key = "Esc".to_string(),
            "enter" | "return" => key = "Enter".to_string(),
            lower if part.chars().count() > 1 => key = capitalize(lower),
            _ => key = part.to_string(),
        }
    }

    modifiers.sort();
    modifiers.dedup();
    // Shifted letters are upper-case, matching what the terminal reports
    if modifiers.contains(&"Shift") && key.chars().count() == 1 {
        key = key.to_uppercase();
    }
    let mut out: Vec<String> = modifiers.into_iter().map(str::to_string).collect();
    out.push(key);
    out.join("+")
}

/// Title-case a named key ("up" -> "Up", "pageup" -> "PageUp")
fn capitalize(lower: &str) -> String {
    match lower {
        "pageup" => "PageUp".to_string(),
        "pagedown" => "PageDown".to_string(),
        "backspace" => "Backspace".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        }
    }
}
