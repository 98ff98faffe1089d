//! Pure projection from navigator state to a frame description.
//!
//! [`project`] never mutates anything; the renderer turns the result into
//! terminal cells. Keeping this step pure lets every screen be asserted
//! without a backend.

use crate::model::{Entry, Filterable, SubEntry, SubEntryKind};
use crate::state::{
    ContentSource, ListWindow, Navigator, PagedFilterList, PagerTone, StatusLine, View, ViewKind,
};

/// How a row should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowStyle {
    /// Ordinary text.
    #[default]
    Plain,
    /// De-emphasised (common parameters, secondary details).
    Muted,
    /// Informational message.
    Notice,
    /// Failure text.
    Error,
}

impl From<PagerTone> for RowStyle {
    fn from(tone: PagerTone) -> Self {
        match tone {
            PagerTone::Text => Self::Plain,
            PagerTone::Notice => Self::Notice,
            PagerTone::Error => Self::Error,
        }
    }
}

/// One line of a pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Text without selection prefix.
    pub text: String,
    /// Presentation of the text.
    pub style: RowStyle,
    /// Highlighted as the current selection.
    pub selected: bool,
}

impl Row {
    /// Unselected plain row.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::styled(text, RowStyle::Plain)
    }

    /// Unselected row with the given style.
    pub fn styled(text: impl Into<String>, style: RowStyle) -> Self {
        Self {
            text: text.into(),
            style,
            selected: false,
        }
    }

    fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

/// One bordered pane.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pane {
    /// Text on the top border.
    pub title: String,
    /// Visible rows, top to bottom.
    pub rows: Vec<Row>,
    /// Rows are hidden above.
    pub more_above: bool,
    /// Rows are hidden below.
    pub more_below: bool,
    /// Receives key input.
    pub focused: bool,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameDescription {
    /// Breadcrumb line.
    pub title: String,
    /// Status message appended to the title line.
    pub status: Option<StatusLine>,
    /// List pane.
    pub left: Pane,
    /// Detail or content pane.
    pub right: Pane,
    /// Key hints for the active view.
    pub footer: String,
    /// Set only for the unexpected-fault acknowledgment frame.
    pub fault: Option<String>,
}

impl FrameDescription {
    /// Frame shown once before the navigator exits on an unexpected error.
    pub fn fault(message: impl Into<String>) -> Self {
        Self {
            title: "psnav".to_string(),
            fault: Some(message.into()),
            footer: "Press any key to exit".to_string(),
            ..Self::default()
        }
    }

    /// Whether this is the fault acknowledgment frame.
    pub fn is_fault(&self) -> bool {
        self.fault.is_some()
    }
}

/// Project the navigator state into a frame.
pub fn project(nav: &Navigator) -> FrameDescription {
    let kind = nav.view_kind();
    let title = format!("psnav: {}", nav.breadcrumb().join(" > "));

    let (left, right) = match nav.session() {
        None => {
            let left = entry_pane(nav.entries(), true);
            let right = entry_detail(nav.entries());
            (left, right)
        }
        Some(stack) => {
            let (entry, list) = match stack.root() {
                View::SubEntryList { entry, list } => (entry, list),
                // The root is always the sub-entry list
                _ => return FrameDescription::fault("navigation stack lost its root view"),
            };
            let left = sub_entry_pane(entry, list, kind == ViewKind::SubEntryList);
            let right = match stack.top() {
                View::SubEntryList { list, .. } => sub_entry_detail(list),
                View::OptionMenu {
                    sub_entry, list, ..
                } => list_pane(format!("{} options", sub_entry.name), list, true, |item| {
                    Row::plain(item.label())
                }),
                View::ParameterList { sub_entry, list } => {
                    list_pane(format!("Parameters of {}", sub_entry.name), list, true, |p| {
                        let style = if p.is_common {
                            RowStyle::Muted
                        } else {
                            RowStyle::Plain
                        };
                        Row::styled(&p.name, style)
                    })
                }
                View::Content {
                    sub_entry,
                    source,
                    pager,
                    ..
                } => {
                    let window = pager.visible_window();
                    let style = RowStyle::from(window.tone);
                    Pane {
                        title: content_title(sub_entry, source),
                        rows: window
                            .lines
                            .iter()
                            .map(|line| Row::styled(*line, style))
                            .collect(),
                        more_above: window.more_above,
                        more_below: window.more_below,
                        focused: true,
                    }
                }
            };
            (left, right)
        }
    };

    FrameDescription {
        title,
        status: nav.status().cloned(),
        left,
        right,
        footer: footer_for(nav).to_string(),
        fault: None,
    }
}

fn content_title(sub_entry: &SubEntry, source: &ContentSource) -> String {
    match source {
        ContentSource::Document(category) => format!("{category} help: {}", sub_entry.name),
        ContentSource::Online => format!("Online help: {}", sub_entry.name),
        ContentSource::ParameterHelp(parameter) => {
            format!("-{} of {}", parameter.name, sub_entry.name)
        }
    }
}

/// Key hints for the current view.
pub fn footer_for(nav: &Navigator) -> &'static str {
    match nav.session().map(|stack| stack.top()) {
        None => "↑↓ move  → open  type to filter  ← erase/quit  F5 refresh  Esc quit",
        Some(View::SubEntryList { .. }) => {
            "↑↓ move  → options  type to filter  ← erase/back  Esc quit"
        }
        Some(View::OptionMenu { .. }) => "↑↓ move  → open  ← back  Esc quit",
        Some(View::ParameterList { .. }) => "↑↓ move  → help  ← back  Esc quit",
        Some(View::Content {
            source: ContentSource::Online,
            ..
        }) => "→ open in browser  ← back  Esc quit",
        Some(View::Content { .. }) => "↑↓ scroll  PgUp/PgDn page  ← back  Esc quit",
    }
}

fn filtered_title(base: &str, list_filter: &str, shown: usize, total: usize) -> String {
    if list_filter.is_empty() {
        format!("{base} ({total})")
    } else {
        format!("{base} ({shown}/{total}) filter: {list_filter}")
    }
}

fn list_pane<T: Filterable>(
    title: String,
    list: &PagedFilterList<T>,
    focused: bool,
    mut to_row: impl FnMut(&T) -> Row,
) -> Pane {
    let ListWindow {
        rows,
        selected,
        more_above,
        more_below,
    } = list.visible_window();
    Pane {
        title,
        rows: rows
            .into_iter()
            .map(|(pos, item)| to_row(item).selected(Some(pos) == selected))
            .collect(),
        more_above,
        more_below,
        focused,
    }
}

fn entry_pane(entries: &PagedFilterList<Entry>, focused: bool) -> Pane {
    let title = filtered_title(
        "Modules",
        entries.filter(),
        entries.filtered_len(),
        entries.items().len(),
    );
    let mut pane = list_pane(title, entries, focused, |entry| {
        match entries.hidden_family_members(entry) {
            0 => Row::plain(entry.name()),
            hidden => Row::plain(format!("{} (+{hidden})", entry.name())),
        }
    });
    if entries.is_empty() {
        pane.rows.push(Row::styled("(no matches)", RowStyle::Notice));
    }
    pane
}

fn entry_detail(entries: &PagedFilterList<Entry>) -> Pane {
    let rows = match entries.selected() {
        Some(entry) => {
            let mut rows = vec![Row::plain(format!("Module:  {}", entry.name()))];
            if let Some(version) = entry.version() {
                rows.push(Row::plain(format!("Version: {version}")));
            }
            let hidden = entries.hidden_family_members(entry);
            if hidden > 0 {
                rows.push(Row::styled(
                    format!("Family:  {} ({hidden} more, type to show)", entry.family()),
                    RowStyle::Muted,
                ));
            }
            rows.push(Row::plain(""));
            rows.push(Row::styled("Press → to list its commands", RowStyle::Muted));
            rows
        }
        None if entries.items().is_empty() => {
            vec![Row::styled("No modules available", RowStyle::Notice)]
        }
        None => vec![Row::styled(
            format!("No modules match '{}'", entries.filter()),
            RowStyle::Notice,
        )],
    };
    Pane {
        title: "Details".to_string(),
        rows,
        ..Pane::default()
    }
}

fn sub_entry_label(sub_entry: &SubEntry) -> String {
    match sub_entry.alias_target() {
        Some(target) => format!("{} -> {target}", sub_entry.name),
        None => sub_entry.name.clone(),
    }
}

fn sub_entry_pane(entry: &Entry, list: &PagedFilterList<SubEntry>, focused: bool) -> Pane {
    let title = filtered_title(
        &format!("Commands in {}", entry.name()),
        list.filter(),
        list.filtered_len(),
        list.items().len(),
    );
    let mut pane = list_pane(title, list, focused, |sub_entry| {
        let style = if sub_entry.kind == SubEntryKind::Alias {
            RowStyle::Muted
        } else {
            RowStyle::Plain
        };
        Row::styled(sub_entry_label(sub_entry), style)
    });
    if list.is_empty() {
        pane.rows.push(Row::styled("(no matches)", RowStyle::Notice));
    }
    pane
}

fn sub_entry_detail(list: &PagedFilterList<SubEntry>) -> Pane {
    let rows = match list.selected() {
        Some(sub_entry) => {
            let mut rows = vec![
                Row::plain(format!("Name:   {}", sub_entry.name)),
                Row::plain(format!("Type:   {}", sub_entry.kind.label())),
                Row::plain(format!("Module: {}", sub_entry.source_module)),
            ];
            if let Some(target) = sub_entry.alias_target() {
                rows.push(Row::plain(format!("Alias of: {target}")));
            }
            if !sub_entry.summary.is_empty() {
                rows.push(Row::plain(""));
                rows.push(Row::plain(sub_entry.summary.clone()));
            }
            rows
        }
        None => vec![Row::styled(
            format!("No commands match '{}'", list.filter()),
            RowStyle::Notice,
        )],
    };
    Pane {
        title: "Description".to_string(),
        rows,
        ..Pane::default()
    }
}
