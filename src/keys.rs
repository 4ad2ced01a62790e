use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::Message;

/// A declarative keybinding map that can be composed and extended.
#[derive(Clone)]
pub struct Keymap {
    bindings: Vec<(KeyCode, KeyModifiers, Message)>,
}

impl Keymap {
    pub const fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Add a key binding with no modifiers.
    pub fn bind(mut self, code: KeyCode, message: Message) -> Self {
        self.bindings.push((code, KeyModifiers::NONE, message));
        self
    }

    /// Add a key binding with Ctrl modifier.
    pub fn bind_ctrl(mut self, code: KeyCode, message: Message) -> Self {
        self.bindings.push((code, KeyModifiers::CONTROL, message));
        self
    }

    /// Look up a message for a key event.
    /// Later bindings take precedence over earlier ones.
    pub fn get(&self, event: &KeyEvent) -> Option<Message> {
        self.bindings
            .iter()
            .rev()
            .find(|(code, mods, _)| *code == event.code && event.modifiers.contains(*mods))
            .map(|(_, _, msg)| msg.clone())
    }

    /// Extend this keymap with another. The other keymap's bindings take precedence.
    pub fn extend(mut self, other: Self) -> Self {
        self.bindings.extend(other.bindings);
        self
    }

    /// Find the first key bound to a specific message.
    pub fn find_key(&self, message: &Message) -> Option<(KeyCode, KeyModifiers)> {
        self.bindings
            .iter()
            .find(|(_, _, msg)| msg == message)
            .map(|(code, mods, _)| (*code, *mods))
    }
}

/// Format a key binding for display in help text.
pub fn format_key(code: KeyCode, mods: KeyModifiers) -> String {
    let key_str = match code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        _ => "?".to_string(),
    };
    if mods.contains(KeyModifiers::CONTROL) {
        format!("C-{key_str}")
    } else {
        key_str
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}

/// Keybindings that work regardless of what is displayed.
pub fn global_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char('q'), Message::Quit)
        .bind_ctrl(KeyCode::Char('c'), Message::Quit)
        .bind(KeyCode::Char('`'), Message::ToggleDebug)
        .bind(KeyCode::Char('?'), Message::ToggleHelp)
        .bind(KeyCode::Char('r'), Message::Reload)
}

/// Viewer keybindings.
pub fn viewer_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char('k'), Message::Previous)
        .bind(KeyCode::Up, Message::Previous)
        .bind(KeyCode::Char('h'), Message::Previous)
        .bind(KeyCode::Left, Message::Previous)
        .bind(KeyCode::Char('j'), Message::Next)
        .bind(KeyCode::Down, Message::Next)
        .bind(KeyCode::Char('l'), Message::Next)
        .bind(KeyCode::Right, Message::Next)
        .bind(KeyCode::Enter, Message::Play)
        .bind(KeyCode::Char('o'), Message::Play)
}

pub fn handle_key(key: KeyEvent) -> Option<Message> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    global_keymap().extend(viewer_keymap()).get(&key)
}
