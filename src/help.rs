//! Dynamic help text generation from keymaps.

use crate::app::Message;
use crate::keys::{Keymap, format_key};

/// A single help item representing one or more related actions.
pub struct HelpItem {
    /// Messages to look up keys for. Keys are joined with "/".
    messages: Vec<Message>,
    /// The label to show (e.g., "nav", "play", "quit").
    label: &'static str,
}

impl HelpItem {
    pub fn new(message: Message, label: &'static str) -> Self {
        Self {
            messages: vec![message],
            label,
        }
    }

    /// Create a help item for paired actions (e.g., k/j for prev/next).
    pub fn pair(first: Message, second: Message, label: &'static str) -> Self {
        Self {
            messages: vec![first, second],
            label,
        }
    }

    /// Format this help item using the given keymap.
    /// Returns None if no keys are bound for any of the messages.
    pub fn format(&self, keymap: &Keymap) -> Option<String> {
        let keys: Vec<String> = self
            .messages
            .iter()
            .filter_map(|msg| {
                keymap
                    .find_key(msg)
                    .map(|(code, mods)| format_key(code, mods))
            })
            .collect();
        if keys.is_empty() {
            return None;
        }
        Some(format!("{}:{}", keys.join("/"), self.label))
    }
}

/// A collection of help items for a specific context.
pub struct HelpConfig {
    /// Items to show in expanded (full help) mode.
    pub expanded: Vec<HelpItem>,
    /// Items to show in compact (minimal) mode.
    pub compact: Vec<HelpItem>,
}

impl HelpConfig {
    pub fn format(&self, keymap: &Keymap, show_expanded: bool) -> String {
        let items = if show_expanded {
            &self.expanded
        } else {
            &self.compact
        };
        items
            .iter()
            .filter_map(|item| item.format(keymap))
            .collect::<Vec<_>>()
            .join("  ")
    }
}

pub fn viewer_help() -> HelpConfig {
    use Message::{Next, Play, Previous, Quit, Reload, ToggleDebug, ToggleHelp};
    HelpConfig {
        expanded: vec![
            HelpItem::pair(Previous, Next, "prev/next"),
            HelpItem::new(Play, "play"),
            HelpItem::new(Reload, "reload"),
            HelpItem::new(ToggleDebug, "debug"),
            HelpItem::new(Quit, "quit"),
            HelpItem::new(ToggleHelp, "hide"),
        ],
        compact: vec![
            HelpItem::pair(Previous, Next, "prev/next"),
            HelpItem::new(Play, "play"),
            HelpItem::new(ToggleHelp, "help"),
            HelpItem::new(Quit, "quit"),
        ],
    }
}
