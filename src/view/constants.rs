//! Layout dimension constants.

/// Height of the title line.
pub const TITLE_HEIGHT: u16 = 1;

/// Height of the key-hint footer.
pub const FOOTER_HEIGHT: u16 = 1;

/// Top and bottom pane borders together.
pub const PANE_BORDER_ROWS: u16 = 2;

/// Share of the width given to the left list pane.
pub const LEFT_PANE_PERCENT: u16 = 40;

/// Marker drawn on a pane border when rows are hidden above.
pub const MORE_ABOVE_MARKER: &str = " ▲ more ";

/// Marker drawn on a pane border when rows are hidden below.
pub const MORE_BELOW_MARKER: &str = " ▼ more ";

/// Row prefix for the selected row.
pub const SELECTED_PREFIX: &str = "> ";
/// Blank prefix keeping unselected rows aligned.
pub const UNSELECTED_PREFIX: &str = "  ";

const _: () = assert!(
    TITLE_HEIGHT + FOOTER_HEIGHT + PANE_BORDER_ROWS == crate::state::CHROME_ROWS,
    "layout chrome must match the page-size calculation"
);
