//! External collaborators that supply catalog data (impure shell).
//!
//! The navigator only ever talks to these traits. Two implementations ship
//! with the crate:
//! - [`PwshProvider`] asks a PowerShell executable for live module data
//! - [`FixtureProvider`] serves a JSON catalog file

pub mod fixture;
pub mod pwsh;

pub use fixture::FixtureProvider;
pub use pwsh::PwshProvider;

use crate::model::{DocumentCategory, Entry, Parameter, ProviderError, SubEntry};

/// Enumerates top-level entries.
pub trait Catalog {
    /// List entries whose name matches `filter` (provider-defined matching).
    ///
    /// An empty result is not an error.
    fn list_entries(&self, filter: Option<&str>) -> Result<Vec<Entry>, ProviderError>;
}

/// Enumerates sub-entries and fetches long-form text for them.
pub trait ContentProvider {
    /// All sub-entries of `entry`, in display order.
    fn list_sub_entries(&self, entry: &Entry) -> Result<Vec<SubEntry>, ProviderError>;

    /// A help document for `sub_entry`, one string per line.
    fn fetch_document(
        &self,
        sub_entry: &SubEntry,
        category: DocumentCategory,
    ) -> Result<Vec<String>, ProviderError>;

    /// Parameters accepted by `sub_entry`.
    fn list_parameters(&self, sub_entry: &SubEntry) -> Result<Vec<Parameter>, ProviderError>;

    /// Help text for one parameter. May be empty.
    fn fetch_parameter_help(
        &self,
        sub_entry: &SubEntry,
        parameter: &Parameter,
    ) -> Result<String, ProviderError>;

    /// Open the online documentation of `sub_entry` (fire-and-forget).
    fn open_online_document(&self, sub_entry: &SubEntry) -> Result<(), ProviderError>;
}

/// Split provider text output into display lines.
///
/// Trailing whitespace and trailing blank lines are dropped; tabs become
/// four spaces so the renderer never sees control characters.
pub(crate) fn text_to_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = text
        .lines()
        .map(|line| line.trim_end().replace('\t', "    "))
        .collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    while lines.first().is_some_and(|line| line.is_empty()) {
        lines.remove(0);
    }
    lines
}
