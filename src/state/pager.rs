//! Scrollable text buffer for the content view.

/// How the pager content should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PagerTone {
    /// Ordinary document text.
    #[default]
    Text,
    /// Informational message (placeholder, instructions).
    Notice,
    /// A fetch failure rendered as content.
    Error,
}

/// Placeholder row shown when the pager holds no lines.
pub const EMPTY_CONTENT_PLACEHOLDER: &str = "(no content)";

/// Lines of text with a visible window.
///
/// Invariant: `scroll_offset <= max(0, lines.len() - page_size)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPager {
    lines: Vec<String>,
    tone: PagerTone,
    scroll_offset: usize,
    page_size: usize,
}

/// Lines currently inside the visible window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerWindow<'a> {
    /// Visible lines, top to bottom.
    pub lines: Vec<&'a str>,
    /// Tone of the whole buffer.
    pub tone: PagerTone,
    /// Lines exist above the window.
    pub more_above: bool,
    /// Lines exist below the window.
    pub more_below: bool,
}

impl ContentPager {
    /// Empty pager; `page_size` is raised to at least 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            lines: Vec::new(),
            tone: PagerTone::Text,
            scroll_offset: 0,
            page_size: page_size.max(1),
        }
    }

    /// Replace the content and scroll back to the top.
    pub fn load(&mut self, lines: Vec<String>, tone: PagerTone) {
        self.lines = lines;
        self.tone = tone;
        self.scroll_offset = 0;
    }

    /// Load a single informational line.
    pub fn load_notice(&mut self, text: impl Into<String>) {
        self.load(vec![text.into()], PagerTone::Notice);
    }

    /// Load a single error line.
    pub fn load_error(&mut self, text: impl Into<String>) {
        self.load(vec![text.into()], PagerTone::Error);
    }

    /// All loaded lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Presentation of the loaded content.
    pub fn tone(&self) -> PagerTone {
        self.tone
    }

    /// Index of the first visible line.
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Lines per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    fn max_scroll(&self) -> usize {
        self.lines.len().saturating_sub(self.page_size)
    }

    /// Scroll by `delta` lines, clamped to the valid range.
    pub fn scroll_by(&mut self, delta: isize) {
        self.scroll_offset = self
            .scroll_offset
            .saturating_add_signed(delta)
            .min(self.max_scroll());
    }

    /// Change the page size and re-clamp the scroll offset.
    pub fn resize(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    /// Up to `page_size` lines from the scroll offset.
    ///
    /// An empty buffer yields a single placeholder row.
    pub fn visible_window(&self) -> PagerWindow<'_> {
        if self.lines.is_empty() {
            return PagerWindow {
                lines: vec![EMPTY_CONTENT_PLACEHOLDER],
                tone: PagerTone::Notice,
                more_above: false,
                more_below: false,
            };
        }
        let end = (self.scroll_offset + self.page_size).min(self.lines.len());
        PagerWindow {
            lines: self.lines[self.scroll_offset..end]
                .iter()
                .map(String::as_str)
                .collect(),
            tone: self.tone,
            more_above: self.scroll_offset > 0,
            more_below: end < self.lines.len(),
        }
    }
}
