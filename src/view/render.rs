//! Drawing frame descriptions onto a ratatui terminal.

use crate::view::constants::{
    FOOTER_HEIGHT, LEFT_PANE_PERCENT, MORE_ABOVE_MARKER, MORE_BELOW_MARKER, SELECTED_PREFIX,
    TITLE_HEIGHT, UNSELECTED_PREFIX,
};
use crate::view::frame::{FrameDescription, Pane};
use crate::view::styles::Palette;
use crate::view::TuiError;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};
use ratatui::{Frame, Terminal};

/// Output side of the event loop.
pub trait Renderer {
    /// Current terminal height in rows.
    fn viewport_rows(&mut self) -> Result<u16, TuiError>;

    /// Draw one complete frame.
    fn draw(&mut self, frame: &FrameDescription) -> Result<(), TuiError>;
}

/// Renderer backed by a ratatui terminal.
///
/// Generic over the backend so tests can draw into a `TestBackend`.
pub struct TerminalRenderer<B>
where
    B: Backend,
{
    terminal: Terminal<B>,
    palette: Palette,
}

impl<B> TerminalRenderer<B>
where
    B: Backend,
{
    /// Renderer drawing onto `terminal` with `palette`.
    pub fn new(terminal: Terminal<B>, palette: Palette) -> Self {
        Self { terminal, palette }
    }

    /// The underlying terminal.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// The underlying terminal, mutably.
    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }
}

impl<B> Renderer for TerminalRenderer<B>
where
    B: Backend,
{
    fn viewport_rows(&mut self) -> Result<u16, TuiError> {
        Ok(self.terminal.size()?.height)
    }

    fn draw(&mut self, frame: &FrameDescription) -> Result<(), TuiError> {
        let palette = self.palette;
        self.terminal
            .draw(|f| render_frame(f, frame, &palette))?;
        Ok(())
    }
}

/// Lay out and draw one frame.
pub fn render_frame(f: &mut Frame, frame: &FrameDescription, palette: &Palette) {
    if let Some(message) = &frame.fault {
        render_fault(f, f.area(), message, &frame.footer, palette);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(TITLE_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(f.area());

    let mut title = vec![Span::styled(frame.title.as_str(), palette.title)];
    if let Some(status) = &frame.status {
        title.push(Span::raw("  "));
        title.push(Span::styled(status.text.as_str(), palette.status(status.tone)));
    }
    f.render_widget(Paragraph::new(Line::from(title)), rows[0]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(LEFT_PANE_PERCENT),
            Constraint::Percentage(100 - LEFT_PANE_PERCENT),
        ])
        .split(rows[1]);
    render_pane(f, panes[0], &frame.left, palette);
    render_pane(f, panes[1], &frame.right, palette);

    f.render_widget(
        Paragraph::new(Line::styled(frame.footer.as_str(), palette.footer)),
        rows[2],
    );
}

fn render_pane(f: &mut Frame, area: Rect, pane: &Pane, palette: &Palette) {
    let border = if pane.focused {
        palette.focused_border
    } else {
        palette.border
    };
    let mut block = Block::bordered()
        .title(pane.title.as_str())
        .border_style(border);
    if pane.more_above {
        block = block.title_top(Line::styled(MORE_ABOVE_MARKER, palette.marker).right_aligned());
    }
    if pane.more_below {
        block =
            block.title_bottom(Line::styled(MORE_BELOW_MARKER, palette.marker).right_aligned());
    }

    // Rows are only prefixed in panes that carry a selection
    let selectable = pane.rows.iter().any(|row| row.selected);
    let lines: Vec<Line> = pane
        .rows
        .iter()
        .map(|row| {
            let text = row.text.as_str();
            match (selectable, row.selected) {
                (true, true) => Line::from(vec![
                    Span::raw(SELECTED_PREFIX),
                    Span::raw(text),
                ])
                .style(palette.selected),
                (true, false) => Line::from(vec![
                    Span::raw(UNSELECTED_PREFIX),
                    Span::styled(text, palette.row(row.style)),
                ]),
                (false, _) => Line::styled(text, palette.row(row.style)),
            }
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_fault(f: &mut Frame, area: Rect, message: &str, footer: &str, palette: &Palette) {
    let lines = vec![
        Line::styled("psnav stopped after an unexpected error:", palette.error),
        Line::raw(""),
        Line::raw(message),
        Line::raw(""),
        Line::styled(footer, palette.footer),
    ];
    let block = Block::bordered().title("psnav").border_style(palette.error);
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}
