//! Catalog items: entries (modules), sub-entries (commands), parameters and
//! the fixed option menu.
//!
//! All types here are immutable once produced by a provider.

use serde::Deserialize;
use std::fmt;

/// Anything that can be shown and filtered in a [`PagedFilterList`].
///
/// [`PagedFilterList`]: crate::state::PagedFilterList
pub trait Filterable {
    /// Name matched by the filter and shown in the list pane.
    fn display_name(&self) -> &str;

    /// Family key used when collapsing large families of items.
    ///
    /// `None` means the item never collapses.
    fn group_key(&self) -> Option<&str> {
        None
    }
}

/// A top-level selectable item (a module).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    name: String,
    version: Option<String>,
    group_key: String,
}

impl Entry {
    /// Create an entry. The group key is derived from the name.
    pub fn new(name: impl Into<String>, version: Option<String>) -> Self {
        let name = name.into();
        let group_key = derive_group_key(&name).to_string();
        Self {
            name,
            version: version.filter(|v| !v.trim().is_empty()),
            group_key,
        }
    }

    /// Module name as reported by the provider.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version string, if the provider reported a non-blank one.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Family key: the name up to the first `.`, or the whole name.
    pub fn family(&self) -> &str {
        &self.group_key
    }
}

impl Filterable for Entry {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn group_key(&self) -> Option<&str> {
        Some(&self.group_key)
    }
}

/// Derive the family key of an entry name.
///
/// `Az.Accounts` and `Az.Compute` share the key `Az`; a name without a dot is
/// its own family.
pub fn derive_group_key(name: &str) -> &str {
    match name.split_once('.') {
        Some((prefix, _)) if !prefix.is_empty() => prefix,
        _ => name,
    }
}

/// How a sub-entry was defined. Controls display styling only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubEntryKind {
    /// Compiled command (cmdlet).
    Primary,
    /// Script-defined command (function, filter, script).
    Derived,
    /// Alias pointing at another command.
    Alias,
}

impl SubEntryKind {
    /// Type label shown in the description pane.
    pub fn label(self) -> &'static str {
        match self {
            Self::Primary => "Cmdlet",
            Self::Derived => "Function",
            Self::Alias => "Alias",
        }
    }
}

/// An item under an [`Entry`] (a command or alias).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubEntry {
    /// Command name.
    pub name: String,
    /// How the command was defined.
    pub kind: SubEntryKind,
    /// Module the command belongs to.
    pub source_module: String,
    /// Alias target (or full definition) as reported by the provider.
    pub raw_definition: String,
    /// One-line description, possibly empty.
    pub summary: String,
}

impl SubEntry {
    /// Create a sub-entry with an empty definition and summary.
    pub fn new(
        name: impl Into<String>,
        kind: SubEntryKind,
        source_module: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            source_module: source_module.into(),
            raw_definition: String::new(),
            summary: String::new(),
        }
    }

    /// Set the raw definition (alias target for aliases).
    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.raw_definition = definition.into();
        self
    }

    /// Set the one-line description.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Target command name for aliases, `None` for everything else.
    pub fn alias_target(&self) -> Option<&str> {
        match self.kind {
            SubEntryKind::Alias if !self.raw_definition.trim().is_empty() => {
                Some(self.raw_definition.trim())
            }
            _ => None,
        }
    }
}

impl Filterable for SubEntry {
    fn display_name(&self) -> &str {
        &self.name
    }
}

/// An input accepted by a [`SubEntry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name without the leading `-`.
    pub name: String,
    /// Cross-cutting parameter (Verbose, ErrorAction, ...).
    pub is_common: bool,
    /// Fallback description used when the provider has no help text.
    pub help_text: Option<String>,
}

impl Parameter {
    /// Create a parameter without fallback help.
    pub fn new(name: impl Into<String>, is_common: bool) -> Self {
        Self {
            name: name.into(),
            is_common,
            help_text: None,
        }
    }

    /// Attach fallback help; blank text is dropped.
    pub fn with_help_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.help_text = (!text.trim().is_empty()).then_some(text);
        self
    }
}

impl Filterable for Parameter {
    fn display_name(&self) -> &str {
        &self.name
    }
}

/// Order parameters so that common ones come after the rest.
///
/// The sort is stable: provider order is kept within each group.
pub fn sort_parameters(parameters: &mut [Parameter]) {
    parameters.sort_by_key(|p| p.is_common);
}

/// Content categories offered for every sub-entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionMenuItem {
    /// Usage examples.
    Examples,
    /// Detailed help.
    Detailed,
    /// Full help.
    Full,
    /// Online help page.
    Online,
    /// Parameter list.
    Parameters,
}

impl OptionMenuItem {
    /// The menu in display order.
    pub const ALL: [OptionMenuItem; 5] = [
        Self::Examples,
        Self::Detailed,
        Self::Full,
        Self::Online,
        Self::Parameters,
    ];

    /// Menu row text.
    pub fn label(self) -> &'static str {
        match self {
            Self::Examples => "Examples",
            Self::Detailed => "Detailed",
            Self::Full => "Full",
            Self::Online => "Online",
            Self::Parameters => "Parameters",
        }
    }

    /// The document category fetched for this option, if it fetches one.
    pub fn document_category(self) -> Option<DocumentCategory> {
        match self {
            Self::Examples => Some(DocumentCategory::Examples),
            Self::Detailed => Some(DocumentCategory::Detailed),
            Self::Full => Some(DocumentCategory::Full),
            Self::Online | Self::Parameters => None,
        }
    }
}

impl Filterable for OptionMenuItem {
    fn display_name(&self) -> &str {
        self.label()
    }
}

/// Text documents a content provider can fetch for a sub-entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentCategory {
    /// Examples section only.
    Examples,
    /// Description, parameters and examples.
    Detailed,
    /// Everything the help system has.
    Full,
}

impl fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Examples => "Examples",
            Self::Detailed => "Detailed",
            Self::Full => "Full",
        };
        f.write_str(name)
    }
}
