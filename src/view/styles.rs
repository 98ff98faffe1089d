//! Colour palette for panes, rows and the status line.

use crate::state::PagerTone;
use crate::view::frame::RowStyle;
use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Whether colours should be used.
///
/// Disabled by the `--no-color` flag or a `NO_COLOR` environment variable
/// with any value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Colours on unless `--no-color` was passed or `NO_COLOR` is set.
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var_os("NO_COLOR").is_none();
        Self { enabled }
    }

    /// Always use colours.
    pub fn enabled() -> Self {
        Self { enabled: true }
    }

    /// Never use colours.
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    /// Whether colours should be emitted.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self::enabled()
    }
}

// ===== Palette =====

/// Resolved styles for every frame element.
///
/// Without colour, selection and focus still show through modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Breadcrumb line.
    pub title: Style,
    /// [`RowStyle::Plain`] rows.
    pub plain: Style,
    /// [`RowStyle::Muted`] rows.
    pub muted: Style,
    /// Notices in rows and the status line.
    pub notice: Style,
    /// Errors in rows, the status line and the fault screen.
    pub error: Style,
    /// The selected row.
    pub selected: Style,
    /// Border of the pane receiving input.
    pub focused_border: Style,
    /// Border of other panes.
    pub border: Style,
    /// Key hints.
    pub footer: Style,
    /// More-above and more-below markers.
    pub marker: Style,
}

impl Palette {
    /// Palette for the given colour setting.
    pub fn new(config: ColorConfig) -> Self {
        if config.colors_enabled() {
            Self {
                title: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                plain: Style::default(),
                muted: Style::default().fg(Color::DarkGray),
                notice: Style::default().fg(Color::Yellow),
                error: Style::default().fg(Color::Red),
                selected: Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
                focused_border: Style::default().fg(Color::Cyan),
                border: Style::default().fg(Color::DarkGray),
                footer: Style::default().fg(Color::DarkGray),
                marker: Style::default().fg(Color::Yellow),
            }
        } else {
            Self {
                title: Style::default().add_modifier(Modifier::BOLD),
                plain: Style::default(),
                muted: Style::default().add_modifier(Modifier::DIM),
                notice: Style::default(),
                error: Style::default().add_modifier(Modifier::BOLD),
                selected: Style::default().add_modifier(Modifier::REVERSED),
                focused_border: Style::default().add_modifier(Modifier::BOLD),
                border: Style::default(),
                footer: Style::default(),
                marker: Style::default(),
            }
        }
    }

    /// Style for a row.
    pub fn row(&self, style: RowStyle) -> Style {
        match style {
            RowStyle::Plain => self.plain,
            RowStyle::Muted => self.muted,
            RowStyle::Notice => self.notice,
            RowStyle::Error => self.error,
        }
    }

    /// Style for a status message.
    pub fn status(&self, tone: PagerTone) -> Style {
        match tone {
            PagerTone::Text => self.plain,
            PagerTone::Notice => self.notice,
            PagerTone::Error => self.error,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(ColorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial(no_color_env)]
    fn no_color_flag_disables_colors() {
        assert!(!ColorConfig::from_env_and_args(true).colors_enabled());
    }

    #[test]
    #[serial(no_color_env)]
    fn no_color_env_disables_colors() {
        std::env::set_var("NO_COLOR", "1");
        let config = ColorConfig::from_env_and_args(false);
        std::env::remove_var("NO_COLOR");
        assert!(!config.colors_enabled());
    }

    #[test]
    #[serial(no_color_env)]
    fn colors_enabled_without_flag_or_env() {
        std::env::remove_var("NO_COLOR");
        assert!(ColorConfig::from_env_and_args(false).colors_enabled());
    }

    #[test]
    fn error_and_notice_rows_differ_from_plain() {
        let palette = Palette::new(ColorConfig::enabled());
        assert_ne!(palette.row(RowStyle::Error), palette.row(RowStyle::Plain));
        assert_ne!(palette.row(RowStyle::Notice), palette.row(RowStyle::Plain));
        assert_eq!(palette.status(PagerTone::Error), palette.error);
    }

    #[test]
    fn monochrome_palette_has_no_colors() {
        let palette = Palette::new(ColorConfig::disabled());
        for style in [palette.muted, palette.error, palette.selected, palette.title] {
            assert_eq!(style.fg, None);
            assert_eq!(style.bg, None);
        }
        assert!(palette.selected.add_modifier.contains(Modifier::REVERSED));
    }
}
