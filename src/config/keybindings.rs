//! Keyboard bindings configuration.

use crate::model::NavKey;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::collections::HashMap;

/// Maps keyboard events to navigator keys.
///
/// Fixed bindings live in the table; printable filter characters are
/// recognised separately so every letter does not need an entry.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, NavKey>,
}

impl KeyBindings {
    /// Look up the table entry for a key event.
    pub fn get(&self, key: KeyEvent) -> Option<NavKey> {
        self.bindings.get(&key).copied()
    }

    /// Translate a terminal key event.
    ///
    /// Release and repeat events are ignored. Plain or shifted characters in
    /// the filter charset become [`NavKey::Char`].
    pub fn resolve(&self, event: &KeyEvent) -> Option<NavKey> {
        if event.kind != KeyEventKind::Press {
            return None;
        }
        let normalized = KeyEvent::new(event.code, event.modifiers);
        if let Some(key) = self.get(normalized) {
            return Some(key);
        }
        match event.code {
            KeyCode::Char(ch)
                if event.modifiers == KeyModifiers::NONE
                    || event.modifiers == KeyModifiers::SHIFT =>
            {
                NavKey::filter_char(ch)
            }
            _ => None,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = HashMap::new();
        let mut bind = |code: KeyCode, modifiers: KeyModifiers, key: NavKey| {
            bindings.insert(KeyEvent::new(code, modifiers), key);
        };

        // Arrows
        bind(KeyCode::Up, KeyModifiers::NONE, NavKey::Up);
        bind(KeyCode::Down, KeyModifiers::NONE, NavKey::Down);
        bind(KeyCode::Left, KeyModifiers::NONE, NavKey::Left);
        bind(KeyCode::Right, KeyModifiers::NONE, NavKey::Select);
        bind(KeyCode::Enter, KeyModifiers::NONE, NavKey::Select);

        // Paging
        bind(KeyCode::PageUp, KeyModifiers::NONE, NavKey::PageUp);
        bind(KeyCode::PageDown, KeyModifiers::NONE, NavKey::PageDown);

        // Filter editing
        bind(KeyCode::Backspace, KeyModifiers::NONE, NavKey::Backspace);

        // Application controls
        bind(KeyCode::Esc, KeyModifiers::NONE, NavKey::Escape);
        bind(KeyCode::Char('c'), KeyModifiers::CONTROL, NavKey::Escape);
        bind(KeyCode::F(5), KeyModifiers::NONE, NavKey::Refresh);
        bind(KeyCode::Char('r'), KeyModifiers::CONTROL, NavKey::Refresh);

        Self { bindings }
    }
}
