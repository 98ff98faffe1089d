//! Domain-level key input independent of the terminal backend.

/// Discrete key events understood by the navigator.
///
/// The mapping from `crossterm::event::KeyEvent` to `NavKey` is handled by
/// [`KeyBindings`](crate::config::KeyBindings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    /// Move selection / scroll up one row. Default: ↑
    Up,
    /// Move selection / scroll down one row. Default: ↓
    Down,
    /// Move or scroll one page up. Default: Page Up
    PageUp,
    /// Move or scroll one page down. Default: Page Down
    PageDown,
    /// Go back one level. Default: ←
    Left,
    /// Drill into the selection. Default: → / Enter
    Select,
    /// Remove the last filter character. Default: Backspace
    Backspace,
    /// Leave the navigator from any view. Default: Esc / Ctrl+c
    Escape,
    /// Re-fetch the top-level entries. Default: F5 / Ctrl+r
    Refresh,
    /// A filter character, already validated by [`is_filter_char`].
    Char(char),
}

impl NavKey {
    /// Build a `Char` key, rejecting characters outside the searchable-name charset.
    pub fn filter_char(ch: char) -> Option<Self> {
        is_filter_char(ch).then_some(Self::Char(ch))
    }
}

/// Characters accepted by type-to-filter: ASCII letters, digits, `-` and `_`.
pub fn is_filter_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}
