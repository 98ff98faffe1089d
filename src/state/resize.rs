//! Derives the page size from the viewport height.

use crate::state::navigation::Navigator;
use tracing::debug;

/// Rows taken by everything except list/pager content: title, footer and
/// the two pane borders.
pub const CHROME_ROWS: u16 = 4;

/// Page size for a viewport of `viewport_rows` rows. Never below 1.
pub fn page_size_for(viewport_rows: u16) -> usize {
    usize::from(viewport_rows.saturating_sub(CHROME_ROWS)).max(1)
}

/// Tracks the last applied page size.
///
/// The page size is re-derived from the current viewport on every call, so
/// shrinking the terminal takes effect as soon as it is observed.
#[derive(Debug, Clone, Default)]
pub struct ResizeAdapter {
    last: Option<usize>,
}

impl ResizeAdapter {
    /// Adapter that has applied nothing yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Page size applied by the most recent call, if any.
    pub fn last_page_size(&self) -> Option<usize> {
        self.last
    }

    /// Resize every list and pager if the page size changed.
    ///
    /// Returns `true` when a resize was applied.
    pub fn apply(&mut self, viewport_rows: u16, navigator: &mut Navigator) -> bool {
        let page_size = page_size_for(viewport_rows);
        if self.last == Some(page_size) && navigator.page_size() == page_size {
            return false;
        }
        debug!(viewport_rows, page_size, "page size changed");
        self.last = Some(page_size);
        navigator.resize(page_size);
        true
    }
}
