//! Property tests over random key sequences.

use crate::model::NavKey;
use crate::provider::Catalog;
use crate::state::{Dispatch, Navigator, ViewKind};
use crate::test_harness::FakeProvider;
use crate::view::project;
use proptest::prelude::*;

fn nav_key() -> impl Strategy<Value = NavKey> {
    prop_oneof![
        3 => prop::sample::select(vec![
            NavKey::Up,
            NavKey::Down,
            NavKey::Left,
            NavKey::Select,
            NavKey::PageUp,
            NavKey::PageDown,
            NavKey::Backspace,
        ]),
        1 => prop::sample::select(vec!['a', 'e', 'g', 'f', 'B', '-', 'x']).prop_map(NavKey::Char),
    ]
}

/// Apply keys until one quits; returns whether a quit happened.
fn drive(nav: &mut Navigator, provider: &FakeProvider, keys: &[NavKey]) -> bool {
    for &key in keys {
        let dispatch = nav.handle_key(key, provider);
        nav.resolve_pending(provider);
        if dispatch == Dispatch::Quit {
            return true;
        }
    }
    false
}

fn navigator(provider: &FakeProvider, page_size: usize) -> Navigator {
    let entries = provider.list_entries(None).unwrap_or_default();
    Navigator::new(entries, page_size, false)
}

proptest! {
    #[test]
    fn panes_never_exceed_the_page(
        keys in prop::collection::vec(nav_key(), 0..40),
        page_size in 6usize..20,
    ) {
        let provider = FakeProvider::alpha_beta();
        let mut nav = navigator(&provider, page_size);
        drive(&mut nav, &provider, &keys);

        let frame = project(&nav);
        prop_assert!(frame.left.rows.len() <= page_size);
        prop_assert!(frame.right.rows.len() <= page_size);
        prop_assert!(frame.left.rows.iter().filter(|r| r.selected).count() <= 1);
        prop_assert!(!nav.has_pending_fetch());
    }

    #[test]
    fn breadcrumb_tracks_stack_depth(keys in prop::collection::vec(nav_key(), 0..40)) {
        let provider = FakeProvider::alpha_beta();
        let mut nav = navigator(&provider, 10);
        drive(&mut nav, &provider, &keys);

        let depth = nav.session().map_or(0, |stack| stack.depth());
        prop_assert_eq!(nav.breadcrumb().len(), depth + 1);
        prop_assert_eq!(nav.view_kind() == ViewKind::EntryList, depth == 0);
    }

    #[test]
    fn escape_always_quits(keys in prop::collection::vec(nav_key(), 0..40)) {
        let provider = FakeProvider::alpha_beta();
        let mut nav = navigator(&provider, 10);
        prop_assume!(!drive(&mut nav, &provider, &keys));

        prop_assert_eq!(nav.handle_key(NavKey::Escape, &provider), Dispatch::Quit);
        prop_assert!(nav.session().is_none());
        prop_assert!(!nav.has_pending_fetch());
    }

    #[test]
    fn resize_twice_equals_resize_once(
        keys in prop::collection::vec(nav_key(), 0..30),
        page_size in 1usize..30,
    ) {
        let provider = FakeProvider::alpha_beta();
        let mut nav = navigator(&provider, 10);
        drive(&mut nav, &provider, &keys);

        nav.resize(page_size);
        let once = format!("{nav:?}");
        nav.resize(page_size);
        prop_assert_eq!(format!("{nav:?}"), once);
    }
}
