//! Property tests for the capture/restore round trip

use proptest::prelude::*;
use revmeta_core::{MirrorConfig, RevisionMirror};
use revmeta_store::MetaValue;
use revmeta_test_utils::TestSite;

const KEYS: [&str; 4] = ["color", "size", "o'clock", r"path\to"];

fn meta_value() -> impl Strategy<Value = MetaValue> {
    let leaf = prop_oneof![
        Just(MetaValue::Null),
        any::<bool>().prop_map(MetaValue::Bool),
        any::<i64>().prop_map(MetaValue::Int),
        "[a-z0-9'\"\\\\ ]{0,10}".prop_map(MetaValue::Str),
    ];
    leaf.prop_recursive(2, 12, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..3).prop_map(MetaValue::List),
            prop::collection::btree_map("[a-z]{1,3}", inner, 0..3).prop_map(MetaValue::Record),
        ]
    })
}

/// Values per key, indexed like `KEYS`
fn item_state() -> impl Strategy<Value = Vec<Vec<MetaValue>>> {
    prop::collection::vec(prop::collection::vec(meta_value(), 0..4), KEYS.len())
}

proptest! {
    #[test]
    fn test_restore_of_capture_reproduces_tracked_values(
        tracked in prop::sample::subsequence(KEYS.to_vec(), 0..=KEYS.len()),
        saved in item_state(),
        edited in item_state(),
    ) {
        let mut mirror = RevisionMirror::new(MirrorConfig::default());
        for key in &tracked {
            mirror.register(*key, None);
        }
        let mut site = TestSite::new(mirror);
        let post = site.create_item();

        for (key, values) in KEYS.iter().zip(&saved) {
            site.set_meta_values(post, key, values.clone());
        }
        let revision = site.save(post);

        for (key, values) in KEYS.iter().zip(&edited) {
            site.set_meta_values(post, key, values.clone());
        }
        site.restore(post, revision);

        for (i, key) in KEYS.iter().enumerate() {
            let expected = if tracked.contains(key) { &saved[i] } else { &edited[i] };
            prop_assert_eq!(&site.meta(post, key), expected, "key {}", key);
        }
    }

    #[test]
    fn test_revision_holds_exactly_the_tracked_values(saved in item_state()) {
        let mut site = TestSite::tracking(&KEYS[..2]);
        let post = site.create_item();
        for (key, values) in KEYS.iter().zip(&saved) {
            site.set_meta_values(post, key, values.clone());
        }

        let revision = site.save(post);

        for (i, key) in KEYS.iter().enumerate() {
            let expected = if i < 2 { saved[i].clone() } else { Vec::new() };
            prop_assert_eq!(site.meta(revision, key), expected);
        }
    }
}
