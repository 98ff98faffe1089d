//! Domain model types (pure).
//!
//! All types in this module are pure data with small constructors.

pub mod entry;
pub mod error;
pub mod key;

// Re-export for convenience
pub use entry::{
    derive_group_key, sort_parameters, DocumentCategory, Entry, Filterable, OptionMenuItem,
    Parameter, SubEntry, SubEntryKind,
};
pub use error::ProviderError;
pub use key::{is_filter_char, NavKey};
