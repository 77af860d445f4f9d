use crate::parsing::context::ParseContext;

use super::{Role, RoleInput, RoleKind};

const NAMED_KEYS: [&str; 41] = [
    "alt", "backspace", "capslock", "cmd", "ctrl", "del", "delete", "down", "end", "enter",
    "esc", "escape", "f1", "f10", "f11", "f12", "f2", "f3", "f4", "f5", "f6", "f7", "f8", "f9",
    "fn", "home", "insert", "left", "meta", "option", "pagedown", "pageup", "plus", "return",
    "right", "shift", "space", "super", "tab", "up", "win",
];

/// `{kbd}`ctrl+shift+p``
pub struct KbdRole;

impl KbdRole {
    /// Normalised keys of a combination, or `None` if any part is not a key.
    pub fn parse(input: &str) -> Option<Vec<String>> {
        input
            .split('+')
            .map(|part| {
                let key = part.trim().to_lowercase();
                let single_char = key.chars().count() == 1;
                (single_char || NAMED_KEYS.binary_search(&key.as_str()).is_ok()).then_some(key)
            })
            .collect()
    }
}

impl Role for KbdRole {
    fn matches(&self, name: &str) -> bool {
        name == "kbd"
    }

    fn create(&self, input: &RoleInput<'_>, ctx: &ParseContext) -> RoleKind {
        let keys = Self::parse(input.content).unwrap_or_else(|| {
            ctx.error(
                input.position,
                format!("Invalid keyboard shortcut: {}", input.content),
            );
            Vec::new()
        });
        RoleKind::Kbd { keys }
    }
}
