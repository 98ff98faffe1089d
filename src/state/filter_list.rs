//! Filterable, scrollable, indexable list state.
//!
//! `PagedFilterList` owns the master item sequence plus every piece of
//! per-list UI state (filter text, filtered subset, selection, scroll offset,
//! page size). All mutation goes through methods that restore the list
//! invariants before returning:
//!
//! - `page_size >= 1`
//! - empty `filtered` ⇒ no selection and `scroll_offset == 0`
//! - non-empty `filtered` ⇒ `selected < filtered.len()`
//! - `scroll_offset <= max(0, filtered.len() - page_size)`
//! - `scroll_offset <= selected < scroll_offset + page_size`

use crate::model::Filterable;
use std::collections::HashSet;

/// Filterable list over items of type `T`.
///
/// `filtered` stores indices into `items`, so a selection keeps its identity
/// across refilters even when two items share a display name.
#[derive(Debug, Clone)]
pub struct PagedFilterList<T> {
    items: Vec<T>,
    filter: String,
    filtered: Vec<usize>,
    selected: Option<usize>,
    scroll_offset: usize,
    page_size: usize,
    collapse_families: bool,
}

/// Rows of a list currently inside the visible window.
#[derive(Debug, Clone, PartialEq)]
pub struct ListWindow<'a, T> {
    /// `(position in filtered, item)` for each visible row, top to bottom.
    pub rows: Vec<(usize, &'a T)>,
    /// Position in `filtered` of the selected row, if any.
    pub selected: Option<usize>,
    /// Rows exist above the window.
    pub more_above: bool,
    /// Rows exist below the window.
    pub more_below: bool,
}

impl<T: Filterable> PagedFilterList<T> {
    /// Create a list over `items` with an empty filter.
    ///
    /// Selects the first item if there is one.
    pub fn new(items: Vec<T>, page_size: usize) -> Self {
        let mut list = Self {
            items,
            filter: String::new(),
            filtered: Vec::new(),
            selected: None,
            scroll_offset: 0,
            page_size: page_size.max(1),
            collapse_families: false,
        };
        list.refilter(None);
        list
    }

    /// Create a list that hides all but the first member of each family
    /// while the filter is empty.
    pub fn with_family_collapse(items: Vec<T>, page_size: usize) -> Self {
        let mut list = Self::new(Vec::new(), page_size);
        list.collapse_families = true;
        list.items = items;
        list.refilter(None);
        list
    }

    // ===== Queries =====

    /// Master sequence, unfiltered.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Current filter text.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Rows per page, at least 1.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Position in the filtered subset of the first visible row.
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Position of the selection within the filtered subset.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Number of items passing the current filter.
    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// No item passes the filter.
    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }

    /// Items passing the current filter, in master order.
    pub fn filtered(&self) -> impl Iterator<Item = &T> + '_ {
        self.filtered.iter().map(|&i| &self.items[i])
    }

    /// Currently selected item.
    pub fn selected(&self) -> Option<&T> {
        self.selected
            .and_then(|pos| self.filtered.get(pos))
            .map(|&i| &self.items[i])
    }

    /// Whether family collapsing is enabled for this list.
    pub fn collapses_families(&self) -> bool {
        self.collapse_families
    }

    /// Number of master items sharing `item`'s family, excluding `item` itself.
    ///
    /// Only meaningful while families are collapsed; returns 0 otherwise.
    pub fn hidden_family_members(&self, item: &T) -> usize {
        if !self.is_collapsing() {
            return 0;
        }
        let Some(key) = item.group_key() else {
            return 0;
        };
        self.items
            .iter()
            .filter(|other| other.group_key() == Some(key))
            .count()
            .saturating_sub(1)
    }

    /// Slice of the filtered list to render, with "more" markers.
    pub fn visible_window(&self) -> ListWindow<'_, T> {
        let end = (self.scroll_offset + self.page_size).min(self.filtered.len());
        let rows = (self.scroll_offset..end)
            .map(|pos| (pos, &self.items[self.filtered[pos]]))
            .collect();
        ListWindow {
            rows,
            selected: self.selected,
            more_above: self.scroll_offset > 0,
            more_below: end < self.filtered.len(),
        }
    }

    // ===== Mutations =====

    /// Replace the filter text and recompute the filtered subset.
    ///
    /// Matching is a case-insensitive substring test on the display name.
    /// The previously selected item stays selected if it survives the filter;
    /// otherwise the first match is selected. The window is recentred on the
    /// selection.
    pub fn set_filter(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.filter {
            return;
        }
        let previous = self.selected_master_index();
        self.filter = text;
        self.refilter(previous);
        self.recentre();
    }

    /// Append one character to the filter.
    pub fn push_filter_char(&mut self, ch: char) {
        let mut text = self.filter.clone();
        text.push(ch);
        self.set_filter(text);
    }

    /// Remove the last filter character. Returns `false` if the filter was empty.
    pub fn pop_filter_char(&mut self) -> bool {
        let mut text = self.filter.clone();
        if text.pop().is_none() {
            return false;
        }
        self.set_filter(text);
        true
    }

    /// Clear the filter text.
    pub fn clear_filter(&mut self) {
        self.set_filter(String::new());
    }

    /// Move the selection by `delta` rows, clamped to the filtered range.
    ///
    /// The window scrolls just enough to keep the selection visible, so a
    /// single-row move scrolls by at most one row.
    pub fn move_selection(&mut self, delta: isize) {
        let Some(current) = self.selected else {
            return;
        };
        let last = self.filtered.len().saturating_sub(1);
        let target = current.saturating_add_signed(delta).min(last);
        self.selected = Some(target);
        self.keep_selection_visible();
    }

    /// Select the filtered position `index`, clamped to the valid range.
    pub fn select_index(&mut self, index: usize) {
        if self.filtered.is_empty() {
            return;
        }
        self.selected = Some(index.min(self.filtered.len() - 1));
        self.keep_selection_visible();
    }

    /// Select the first filtered item whose display name equals `name`.
    ///
    /// Returns `false` (leaving the selection unchanged) if none matches.
    pub fn select_by_name(&mut self, name: &str) -> bool {
        let found = self
            .filtered
            .iter()
            .position(|&i| self.items[i].display_name() == name);
        match found {
            Some(pos) => {
                self.select_index(pos);
                true
            }
            None => false,
        }
    }

    /// Add items to the end of the master list, keeping the selection.
    pub fn append(&mut self, items: impl IntoIterator<Item = T>) {
        let previous = self.selected_master_index();
        self.items.extend(items);
        self.refilter(previous);
        self.keep_selection_visible();
    }

    /// Replace the master list wholesale, keeping the filter text.
    ///
    /// Identity does not survive a replace, so the selection is carried over
    /// by display name when possible.
    pub fn replace(&mut self, items: Vec<T>) {
        let previous_name = self.selected().map(|item| item.display_name().to_string());
        self.items = items;
        self.refilter(None);
        if let Some(name) = previous_name {
            self.select_by_name(&name);
        }
        self.recentre();
    }

    /// Change the page size, keeping the selection where it is.
    ///
    /// Values below 1 are clamped to 1. The scroll offset moves only as far
    /// as needed to satisfy the invariants.
    pub fn resize(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.keep_selection_visible();
    }

    // ===== Internals =====

    fn selected_master_index(&self) -> Option<usize> {
        self.selected.and_then(|pos| self.filtered.get(pos).copied())
    }

    fn is_collapsing(&self) -> bool {
        self.collapse_families && self.filter.is_empty()
    }

    /// Recompute `filtered` and pick the selection.
    ///
    /// `previous` is the master index of the item selected before the change.
    fn refilter(&mut self, previous: Option<usize>) {
        let needle = self.filter.to_lowercase();
        let collapsing = self.is_collapsing();

        self.filtered = {
            let mut seen_families: HashSet<&str> = HashSet::new();
            self.items
                .iter()
                .enumerate()
                .filter(|&(_, item)| item.display_name().to_lowercase().contains(&needle))
                .filter(|&(_, item)| {
                    if !collapsing {
                        return true;
                    }
                    match item.group_key() {
                        Some(key) => seen_families.insert(key),
                        None => true,
                    }
                })
                .map(|(i, _)| i)
                .collect()
        };

        self.selected = if self.filtered.is_empty() {
            None
        } else {
            let kept = previous.and_then(|master| self.filtered.iter().position(|&i| i == master));
            Some(kept.unwrap_or(0))
        };
        self.clamp_scroll();
    }

    fn max_scroll(&self) -> usize {
        self.filtered.len().saturating_sub(self.page_size)
    }

    fn clamp_scroll(&mut self) {
        if self.filtered.is_empty() {
            self.scroll_offset = 0;
        } else {
            self.scroll_offset = self.scroll_offset.min(self.max_scroll());
        }
    }

    /// Put the selection roughly in the middle of the page.
    fn recentre(&mut self) {
        self.scroll_offset = match self.selected {
            Some(selected) => selected.saturating_sub(self.page_size / 2),
            None => 0,
        };
        self.clamp_scroll();
    }

    fn keep_selection_visible(&mut self) {
        self.clamp_scroll();
        if let Some(selected) = self.selected {
            if selected < self.scroll_offset {
                self.scroll_offset = selected;
            } else if selected >= self.scroll_offset + self.page_size {
                self.scroll_offset = selected + 1 - self.page_size;
            }
        }
    }
}

#[cfg(test)]
#[path = "filter_list_tests.rs"]
mod tests;
