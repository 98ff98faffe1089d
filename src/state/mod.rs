//! Navigator state (pure).
//!
//! All transitions are plain functions over owned values, testable without a
//! terminal. Collaborators are reached only through the provider traits.

pub mod filter_list;
pub mod navigation;
pub mod pager;
pub mod resize;

pub use filter_list::{ListWindow, PagedFilterList};
pub use navigation::{
    ContentSource, Dispatch, FetchRequest, NavigationStack, Navigator, StatusLine, View,
    ViewKind, ViewToken,
};
pub use pager::{ContentPager, PagerTone, PagerWindow, EMPTY_CONTENT_PLACEHOLDER};
pub use resize::{page_size_for, ResizeAdapter, CHROME_ROWS};
