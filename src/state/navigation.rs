//! Navigation state machine over the entry hierarchy.
//!
//! The top-level entry list lives for the whole process. Exploring an entry
//! opens a session: a [`NavigationStack`] whose bottom is that entry's
//! sub-entry list. Forward navigation pushes a [`View`], back navigation pops
//! it, so going back restores the earlier state instead of recomputing it.
//!
//! ```text
//! EntryList ──→ SubEntryList ──→ OptionMenu ──→ Content (Examples/Detailed/Full/Online)
//!     ▲  (session)    │  ▲            │  ▲
//!     └───── ← ───────┘  └──── ← ─────┘  └──→ ParameterList ──→ Content (parameter help)
//! ```
//!
//! Escape from any view ends the navigator.

use crate::model::{
    sort_parameters, DocumentCategory, Entry, NavKey, OptionMenuItem, Parameter, SubEntry,
};
use crate::provider::{text_to_lines, ContentProvider};
use crate::state::filter_list::PagedFilterList;
use crate::state::pager::{ContentPager, PagerTone};
use tracing::{debug, info, warn};

/// Which level of the hierarchy is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// Top-level module list.
    EntryList,
    /// Commands of one module.
    SubEntryList,
    /// Help categories of one command.
    OptionMenu,
    /// Parameters of one command.
    ParameterList,
    /// A help document or parameter help.
    Content,
}

/// Identifies one pushed content view, so late fetch results can be matched
/// against the view that asked for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewToken(u64);

/// What a content view is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    /// A help document of the given category.
    Document(DocumentCategory),
    /// Instructions for opening the online help.
    Online,
    /// Help text of one parameter.
    ParameterHelp(Parameter),
}

impl ContentSource {
    /// Breadcrumb text for this source.
    pub fn label(&self) -> &str {
        match self {
            Self::Document(DocumentCategory::Examples) => "Examples",
            Self::Document(DocumentCategory::Detailed) => "Detailed",
            Self::Document(DocumentCategory::Full) => "Full",
            Self::Online => "Online",
            Self::ParameterHelp(parameter) => &parameter.name,
        }
    }
}

/// One level on the navigation stack, owning its list or pager.
#[derive(Debug, Clone)]
pub enum View {
    /// Commands of the session's entry.
    SubEntryList {
        /// Entry being explored.
        entry: Entry,
        /// Its commands.
        list: PagedFilterList<SubEntry>,
    },
    /// Help categories for one command.
    OptionMenu {
        /// Command the menu belongs to.
        sub_entry: SubEntry,
        /// The fixed menu items.
        list: PagedFilterList<OptionMenuItem>,
        /// Parameters fetched on first entry into the parameter list.
        parameters: Option<Vec<Parameter>>,
    },
    /// Parameters of one command, common ones last.
    ParameterList {
        /// Command the parameters belong to.
        sub_entry: SubEntry,
        /// Sorted parameters.
        list: PagedFilterList<Parameter>,
    },
    /// Scrollable text.
    Content {
        /// Command the text describes.
        sub_entry: SubEntry,
        /// What kind of text is shown.
        source: ContentSource,
        /// The text itself.
        pager: ContentPager,
        /// Matches late fetch results to this view.
        token: ViewToken,
    },
}

impl View {
    /// Level of the hierarchy this view belongs to.
    pub fn kind(&self) -> ViewKind {
        match self {
            Self::SubEntryList { .. } => ViewKind::SubEntryList,
            Self::OptionMenu { .. } => ViewKind::OptionMenu,
            Self::ParameterList { .. } => ViewKind::ParameterList,
            Self::Content { .. } => ViewKind::Content,
        }
    }

    fn resize(&mut self, page_size: usize) {
        match self {
            Self::SubEntryList { list, .. } => list.resize(page_size),
            Self::OptionMenu { list, .. } => list.resize(page_size),
            Self::ParameterList { list, .. } => list.resize(page_size),
            Self::Content { pager, .. } => pager.resize(page_size),
        }
    }
}

/// Stack of views for one entry-exploration session.
///
/// Never empty: the bottom is always the session's `SubEntryList`.
#[derive(Debug, Clone)]
pub struct NavigationStack {
    views: Vec<View>,
}

impl NavigationStack {
    fn new(root: View) -> Self {
        Self { views: vec![root] }
    }

    fn push(&mut self, view: View) {
        self.views.push(view);
    }

    /// Pop the top view. The root view is never popped.
    fn pop(&mut self) -> Option<View> {
        if self.views.len() > 1 {
            self.views.pop()
        } else {
            None
        }
    }

    /// Number of views, including the root.
    pub fn depth(&self) -> usize {
        self.views.len()
    }

    /// The view receiving key input.
    pub fn top(&self) -> &View {
        // Invariant: never empty
        &self.views[self.views.len() - 1]
    }

    fn top_mut(&mut self) -> &mut View {
        let last = self.views.len() - 1;
        &mut self.views[last]
    }

    /// The session's sub-entry list view.
    pub fn root(&self) -> &View {
        &self.views[0]
    }

    /// Views from bottom to top.
    pub fn views(&self) -> impl Iterator<Item = &View> + '_ {
        self.views.iter()
    }

    fn resize_all(&mut self, page_size: usize) {
        for view in &mut self.views {
            view.resize(page_size);
        }
    }
}

/// One-line message shown in the title bar until the next key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// Message text.
    pub text: String,
    /// Notice or error styling.
    pub tone: PagerTone,
}

/// What the session loop should do after a key was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Keep running.
    Continue,
    /// Re-fetch the entry catalog, then keep running.
    Refresh,
    /// Leave the navigator.
    Quit,
}

/// A blocking fetch waiting to be resolved by the session loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    /// A help document.
    Document {
        /// Command to fetch help for.
        sub_entry: SubEntry,
        /// Which document.
        category: DocumentCategory,
    },
    /// Help of one parameter.
    ParameterHelp {
        /// Command owning the parameter.
        sub_entry: SubEntry,
        /// Parameter to fetch help for.
        parameter: Parameter,
    },
}

#[derive(Debug, Clone)]
struct PendingFetch {
    token: ViewToken,
    request: FetchRequest,
}

/// The view state machine.
///
/// Owns the process-wide entry list and the current session stack, and maps
/// [`NavKey`]s to transitions. Every collaborator error is caught here and
/// turned into displayable state.
#[derive(Debug, Clone)]
pub struct Navigator {
    entries: PagedFilterList<Entry>,
    session: Option<NavigationStack>,
    page_size: usize,
    status: Option<StatusLine>,
    pending: Option<PendingFetch>,
    next_token: u64,
}

impl Navigator {
    /// Start at the entry list with an empty filter.
    pub fn new(entries: Vec<Entry>, page_size: usize, group_families: bool) -> Self {
        let page_size = page_size.max(1);
        let entries = if group_families {
            PagedFilterList::with_family_collapse(entries, page_size)
        } else {
            PagedFilterList::new(entries, page_size)
        };
        Self {
            entries,
            session: None,
            page_size,
            status: None,
            pending: None,
            next_token: 0,
        }
    }

    // ===== Queries =====

    /// Level of the view receiving input.
    pub fn view_kind(&self) -> ViewKind {
        self.session
            .as_ref()
            .map_or(ViewKind::EntryList, |stack| stack.top().kind())
    }

    /// Process-wide entry list.
    pub fn entries(&self) -> &PagedFilterList<Entry> {
        &self.entries
    }

    /// Current exploration session, `None` at the entry list.
    pub fn session(&self) -> Option<&NavigationStack> {
        self.session.as_ref()
    }

    /// Status message, cleared by the next key.
    pub fn status(&self) -> Option<&StatusLine> {
        self.status.as_ref()
    }

    /// Rows per page applied to every list and pager.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Whether a fetch is waiting for [`Navigator::resolve_pending`].
    pub fn has_pending_fetch(&self) -> bool {
        self.pending.is_some()
    }

    /// Names of the levels leading to the current view, outermost first.
    pub fn breadcrumb(&self) -> Vec<String> {
        let mut crumbs = vec!["Modules".to_string()];
        let Some(stack) = &self.session else {
            return crumbs;
        };
        for view in stack.views() {
            match view {
                View::SubEntryList { entry, .. } => crumbs.push(entry.name().to_string()),
                View::OptionMenu { sub_entry, .. } => crumbs.push(sub_entry.name.clone()),
                View::ParameterList { .. } => crumbs.push("Parameters".to_string()),
                View::Content { source, .. } => crumbs.push(source.label().to_string()),
            }
        }
        crumbs
    }

    // ===== Transitions =====

    /// Handle one key press.
    ///
    /// List fetches (sub-entries, parameters) run immediately; document
    /// fetches are queued and must be completed with
    /// [`Navigator::resolve_pending`].
    pub fn handle_key(&mut self, key: NavKey, provider: &dyn ContentProvider) -> Dispatch {
        self.status = None;

        if key == NavKey::Escape {
            info!(view = ?self.view_kind(), "escape pressed, leaving navigator");
            self.pending = None;
            self.session = None;
            return Dispatch::Quit;
        }

        let dispatch = match self.view_kind() {
            ViewKind::EntryList => self.on_entry_list(key, provider),
            ViewKind::SubEntryList => self.on_sub_entry_list(key),
            ViewKind::OptionMenu => self.on_option_menu(key, provider),
            ViewKind::ParameterList => self.on_parameter_list(key),
            ViewKind::Content => self.on_content(key, provider),
        };
        debug!(?key, view = ?self.view_kind(), ?dispatch, "key handled");
        dispatch
    }

    /// Run the queued fetch, if any, and load its result.
    ///
    /// The result is applied only when the content view that requested it is
    /// still on top of the stack; otherwise it is discarded.
    pub fn resolve_pending(&mut self, provider: &dyn ContentProvider) {
        let Some(PendingFetch { token, request }) = self.pending.take() else {
            return;
        };
        if self.content_pager(token).is_none() {
            debug!(?token, "dropping fetch for a view that is gone");
            return;
        }

        let (lines, tone) = match &request {
            FetchRequest::Document {
                sub_entry,
                category,
            } => match provider.fetch_document(sub_entry, *category) {
                Ok(lines) => (lines, PagerTone::Text),
                Err(e) => {
                    warn!(
                        command = %sub_entry.name,
                        %category,
                        error = %e,
                        "document fetch failed"
                    );
                    (vec![format!("Error: {e}")], PagerTone::Error)
                }
            },
            FetchRequest::ParameterHelp {
                sub_entry,
                parameter,
            } => match provider.fetch_parameter_help(sub_entry, parameter) {
                Ok(text) => {
                    let mut lines = text_to_lines(&text);
                    if lines.is_empty() {
                        if let Some(fallback) = &parameter.help_text {
                            lines = text_to_lines(fallback);
                        }
                    }
                    (lines, PagerTone::Text)
                }
                Err(e) => {
                    warn!(
                        command = %sub_entry.name,
                        parameter = %parameter.name,
                        error = %e,
                        "parameter help fetch failed"
                    );
                    (vec![format!("Error: {e}")], PagerTone::Error)
                }
            },
        };

        match self.content_pager(token) {
            Some(pager) => pager.load(lines, tone),
            None => debug!(?token, "discarding stale fetch result"),
        }
    }

    /// Replace the top-level entries (explicit refresh).
    pub fn reload_entries(&mut self, entries: Vec<Entry>) {
        info!(count = entries.len(), "entry list reloaded");
        self.entries.replace(entries);
    }

    /// Show a one-line message until the next key press.
    pub fn set_status(&mut self, text: impl Into<String>, tone: PagerTone) {
        self.status = Some(StatusLine {
            text: text.into(),
            tone,
        });
    }

    /// Apply a new page size to every list and pager.
    pub fn resize(&mut self, page_size: usize) {
        let page_size = page_size.max(1);
        self.page_size = page_size;
        self.entries.resize(page_size);
        if let Some(stack) = &mut self.session {
            stack.resize_all(page_size);
        }
    }

    // ===== Per-view handlers =====

    fn page_delta(&self) -> isize {
        isize::try_from(self.page_size).unwrap_or(isize::MAX)
    }

    fn on_entry_list(&mut self, key: NavKey, provider: &dyn ContentProvider) -> Dispatch {
        let page = self.page_delta();
        match key {
            NavKey::Up => self.entries.move_selection(-1),
            NavKey::Down => self.entries.move_selection(1),
            NavKey::PageUp => self.entries.move_selection(-page),
            NavKey::PageDown => self.entries.move_selection(page),
            NavKey::Char(ch) => self.entries.push_filter_char(ch),
            NavKey::Backspace => {
                self.entries.pop_filter_char();
            }
            NavKey::Left => {
                if !self.entries.pop_filter_char() {
                    return Dispatch::Quit;
                }
            }
            NavKey::Select => self.open_entry(provider),
            NavKey::Refresh => return Dispatch::Refresh,
            NavKey::Escape => return Dispatch::Quit,
        }
        Dispatch::Continue
    }

    fn open_entry(&mut self, provider: &dyn ContentProvider) {
        let Some(entry) = self.entries.selected().cloned() else {
            return;
        };
        match provider.list_sub_entries(&entry) {
            Ok(items) if items.is_empty() => {
                info!(module = entry.name(), "module has no commands");
                self.set_status(
                    format!("No commands found in module '{}'", entry.name()),
                    PagerTone::Notice,
                );
            }
            Ok(items) => {
                info!(module = entry.name(), count = items.len(), "session started");
                let list = PagedFilterList::new(items, self.page_size);
                self.session = Some(NavigationStack::new(View::SubEntryList { entry, list }));
            }
            Err(e) => {
                warn!(module = entry.name(), error = %e, "listing commands failed");
                self.set_status(
                    format!("Could not list commands of '{}': {e}", entry.name()),
                    PagerTone::Error,
                );
            }
        }
    }

    fn on_sub_entry_list(&mut self, key: NavKey) -> Dispatch {
        let page = self.page_delta();
        let page_size = self.page_size;
        let Some(stack) = &mut self.session else {
            return Dispatch::Continue;
        };
        let View::SubEntryList { list, .. } = stack.top_mut() else {
            return Dispatch::Continue;
        };
        match key {
            NavKey::Up => list.move_selection(-1),
            NavKey::Down => list.move_selection(1),
            NavKey::PageUp => list.move_selection(-page),
            NavKey::PageDown => list.move_selection(page),
            NavKey::Char(ch) => list.push_filter_char(ch),
            NavKey::Backspace => {
                list.pop_filter_char();
            }
            NavKey::Left => {
                if !list.pop_filter_char() {
                    info!("session closed");
                    self.session = None;
                }
            }
            NavKey::Select => {
                if let Some(sub_entry) = list.selected().cloned() {
                    list.clear_filter();
                    let menu = PagedFilterList::new(OptionMenuItem::ALL.to_vec(), page_size);
                    stack.push(View::OptionMenu {
                        sub_entry,
                        list: menu,
                        parameters: None,
                    });
                }
            }
            NavKey::Refresh | NavKey::Escape => {}
        }
        Dispatch::Continue
    }

    fn on_option_menu(&mut self, key: NavKey, provider: &dyn ContentProvider) -> Dispatch {
        let Some(stack) = &mut self.session else {
            return Dispatch::Continue;
        };
        let View::OptionMenu { list, .. } = stack.top_mut() else {
            return Dispatch::Continue;
        };
        match key {
            NavKey::Up => list.move_selection(-1),
            NavKey::Down => list.move_selection(1),
            NavKey::PageUp => list.select_index(0),
            NavKey::PageDown => list.select_index(usize::MAX),
            NavKey::Left => {
                stack.pop();
            }
            NavKey::Select => {
                if let Some(&item) = list.selected() {
                    self.open_option(item, provider);
                }
            }
            NavKey::Char(_) | NavKey::Backspace | NavKey::Refresh | NavKey::Escape => {}
        }
        Dispatch::Continue
    }

    fn open_option(&mut self, item: OptionMenuItem, provider: &dyn ContentProvider) {
        let page_size = self.page_size;
        let Some(stack) = &mut self.session else {
            return;
        };
        let View::OptionMenu {
            sub_entry,
            parameters,
            ..
        } = stack.top_mut()
        else {
            return;
        };
        let sub_entry = sub_entry.clone();

        match item {
            OptionMenuItem::Parameters => {
                if parameters.is_none() {
                    match provider.list_parameters(&sub_entry) {
                        Ok(mut fetched) => {
                            sort_parameters(&mut fetched);
                            *parameters = Some(fetched);
                        }
                        Err(e) => {
                            warn!(
                                command = %sub_entry.name,
                                error = %e,
                                "listing parameters failed"
                            );
                            self.set_status(
                                format!("Could not list parameters of '{}': {e}", sub_entry.name),
                                PagerTone::Error,
                            );
                            return;
                        }
                    }
                }
                let params = parameters.clone().unwrap_or_default();
                if params.is_empty() {
                    self.set_status(
                        format!("'{}' has no parameters", sub_entry.name),
                        PagerTone::Notice,
                    );
                    return;
                }
                stack.push(View::ParameterList {
                    sub_entry,
                    list: PagedFilterList::new(params, page_size),
                });
            }
            OptionMenuItem::Online => {
                let mut pager = ContentPager::new(page_size);
                pager.load(
                    vec![
                        format!("Online help for '{}'.", sub_entry.name),
                        String::new(),
                        "Press → or Enter to open it in your browser.".to_string(),
                        "Press ← to go back.".to_string(),
                    ],
                    PagerTone::Notice,
                );
                let token = self.issue_token();
                self.push_view(View::Content {
                    sub_entry,
                    source: ContentSource::Online,
                    pager,
                    token,
                });
            }
            OptionMenuItem::Examples | OptionMenuItem::Detailed | OptionMenuItem::Full => {
                if let Some(category) = item.document_category() {
                    let request = FetchRequest::Document {
                        sub_entry: sub_entry.clone(),
                        category,
                    };
                    self.push_fetching_view(sub_entry, ContentSource::Document(category), request);
                }
            }
        }
    }

    fn on_parameter_list(&mut self, key: NavKey) -> Dispatch {
        let page = self.page_delta();
        let Some(stack) = &mut self.session else {
            return Dispatch::Continue;
        };
        let View::ParameterList { sub_entry, list } = stack.top_mut() else {
            return Dispatch::Continue;
        };
        match key {
            NavKey::Up => list.move_selection(-1),
            NavKey::Down => list.move_selection(1),
            NavKey::PageUp => list.move_selection(-page),
            NavKey::PageDown => list.move_selection(page),
            NavKey::Left => {
                stack.pop();
            }
            NavKey::Select => {
                if let Some(parameter) = list.selected().cloned() {
                    let sub_entry = sub_entry.clone();
                    let request = FetchRequest::ParameterHelp {
                        sub_entry: sub_entry.clone(),
                        parameter: parameter.clone(),
                    };
                    self.push_fetching_view(
                        sub_entry,
                        ContentSource::ParameterHelp(parameter),
                        request,
                    );
                }
            }
            NavKey::Char(_) | NavKey::Backspace | NavKey::Refresh | NavKey::Escape => {}
        }
        Dispatch::Continue
    }

    fn on_content(&mut self, key: NavKey, provider: &dyn ContentProvider) -> Dispatch {
        let page = self.page_delta();
        let Some(stack) = &mut self.session else {
            return Dispatch::Continue;
        };
        let View::Content {
            sub_entry,
            source,
            pager,
            token,
        } = stack.top_mut()
        else {
            return Dispatch::Continue;
        };
        match key {
            NavKey::Up => pager.scroll_by(-1),
            NavKey::Down => pager.scroll_by(1),
            NavKey::PageUp => pager.scroll_by(-page),
            NavKey::PageDown => pager.scroll_by(page),
            NavKey::Left => {
                let token = *token;
                if self.pending.as_ref().is_some_and(|p| p.token == token) {
                    debug!(?token, "abandoning pending fetch");
                    self.pending = None;
                }
                stack.pop();
            }
            NavKey::Select => {
                if *source == ContentSource::Online {
                    match provider.open_online_document(sub_entry) {
                        Ok(()) => {
                            let name = sub_entry.name.clone();
                            info!(command = %name, "opened online help");
                            self.set_status(
                                format!("Opened online help for '{name}'"),
                                PagerTone::Notice,
                            );
                        }
                        Err(e) => {
                            warn!(
                                command = %sub_entry.name,
                                error = %e,
                                "opening online help failed"
                            );
                            pager.load_error(format!("Error: {e}"));
                        }
                    }
                }
            }
            NavKey::Char(_) | NavKey::Backspace | NavKey::Refresh | NavKey::Escape => {}
        }
        Dispatch::Continue
    }

    // ===== Helpers =====

    fn issue_token(&mut self) -> ViewToken {
        self.next_token += 1;
        ViewToken(self.next_token)
    }

    fn push_view(&mut self, view: View) {
        if let Some(stack) = &mut self.session {
            stack.push(view);
        }
    }

    /// Push a content view showing a placeholder and queue its fetch.
    fn push_fetching_view(
        &mut self,
        sub_entry: SubEntry,
        source: ContentSource,
        request: FetchRequest,
    ) {
        let token = self.issue_token();
        let mut pager = ContentPager::new(self.page_size);
        pager.load_notice(format!("Fetching {} for '{}'…", source.label(), sub_entry.name));
        self.push_view(View::Content {
            sub_entry,
            source,
            pager,
            token,
        });
        self.pending = Some(PendingFetch { token, request });
    }

    /// The pager of the top view, if it is the content view with `token`.
    fn content_pager(&mut self, token: ViewToken) -> Option<&mut ContentPager> {
        match self.session.as_mut()?.top_mut() {
            View::Content {
                pager, token: t, ..
            } if *t == token => Some(pager),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "navigation_tests.rs"]
mod tests;
