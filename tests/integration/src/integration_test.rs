//! End-to-end integration test for the revision metadata mirror
//!
//! Exercises the complete flow: config loading -> logging -> key
//! registration from several components -> save / restore / compare.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use revmeta_core::lifecycle::{CAPTURE_PRIORITY, LifecycleSubscriber};
use revmeta_core::mirror::FIELD_ID;
use revmeta_core::{LifecycleEvent, MirrorConfig, Result, RevisionMirror, logging, renderer};
use revmeta_store::{Item, ItemId, MetaStore, MetaValue, add_slashes, slash_deep};
use revmeta_test_utils::TestSite;
use revmeta_test_utils::config::TestConfig;

/// Stamps a "last saved by" value onto live items as they are saved,
/// the way an editor integration would.
struct EditorStamp;

impl LifecycleSubscriber for EditorStamp {
    fn name(&self) -> &str {
        "editor-stamp"
    }

    fn on_item_persisted(&self, store: &mut dyn MetaStore, item: &Item) -> Result<()> {
        if item.is_revision() {
            return Ok(());
        }
        let key = add_slashes("_last_editor");
        store.delete(item.id, &key)?;
        store.add(item.id, &key, slash_deep(&MetaValue::from("O'Brien")), true)?;
        Ok(())
    }
}

fn wired_site(config: MirrorConfig) -> TestSite {
    let mut mirror = RevisionMirror::new(config);
    // Two components tracking overlapping keys
    mirror.register("color", None);
    mirror.register("_last_editor", None);
    mirror.register(
        "dimensions",
        Some(renderer(|value| match value {
            MetaValue::Record(fields) => format!(
                "<code>{}x{}</code>",
                fields.get("w").map(|v| v.to_string()).unwrap_or_default(),
                fields.get("h").map(|v| v.to_string()).unwrap_or_default()
            ),
            other => other.to_string(),
        })),
    );
    mirror.register("color", None);
    TestSite::new(mirror)
}

#[test]
fn test_config_file_drives_debug_logging() {
    let file = TestConfig::with_debug(true);
    let config = MirrorConfig::load(&file.path()).unwrap();
    assert!(config.debug);

    // Fails if another test in this binary installed a subscriber first
    let _ = logging::init_for(&config);

    let mut site = wired_site(config);
    let post = site.create_item();
    site.set_meta(post, "color", &["red"]);
    let revision = site.save(post);
    site.restore(post, revision);
    site.assert_meta(post, "color", &["red"]);
}

#[test]
fn test_missing_config_falls_back_to_quiet() {
    let file = TestConfig::with_debug(true);
    let missing = file.dir().join("absent.toml");
    let config = MirrorConfig::load_or_default(&missing).unwrap();
    assert_eq!(config, MirrorConfig::default());
}

#[test]
fn test_duplicate_registrations_collapse() {
    let site = wired_site(MirrorConfig::default());
    assert_eq!(
        site.mirror.registry().keys(),
        vec!["color", "_last_editor", "dimensions"]
    );
}

#[test]
fn test_earlier_subscriber_output_is_captured() {
    let mut site = wired_site(MirrorConfig::default());
    site.bus.subscribe(
        LifecycleEvent::ItemPersisted,
        CAPTURE_PRIORITY - 5,
        Arc::new(EditorStamp),
    );
    assert_eq!(
        site.bus.subscribers(LifecycleEvent::ItemPersisted),
        vec!["editor-stamp", "revision-mirror"]
    );

    let post = site.create_item();
    let revision = site.save(post);

    site.assert_meta(post, "_last_editor", &["O'Brien"]);
    site.assert_meta(revision, "_last_editor", &["O'Brien"]);
}

#[test]
fn test_editing_session() {
    let mut site = wired_site(MirrorConfig::default());
    let post = site.create_item();

    // First draft
    site.set_meta(post, "color", &["red", "blue"]);
    site.set_meta_values(
        post,
        "dimensions",
        vec![MetaValue::record([
            ("w", MetaValue::Int(640)),
            ("h", MetaValue::Int(480)),
        ])],
    );
    site.set_meta(post, "_edit_lock", &["1700000000:1"]);
    let draft = site.save(post);

    // Second draft drops dimensions and changes color
    site.set_meta(post, "color", &["green"]);
    site.set_meta_values(post, "dimensions", vec![]);
    let second = site.save(post);
    assert!(site.meta(second, "dimensions").is_empty());

    // Untracked metadata never reaches revisions
    assert!(site.meta(draft, "_edit_lock").is_empty());

    // Compare the first draft
    let html = site.render(FIELD_ID, draft).unwrap();
    assert!(html.contains("<div>red</div><div>blue</div>"));
    assert!(html.contains("<code>640x480</code>"));

    // Roll back to the first draft
    site.restore(post, draft);
    site.assert_meta(post, "color", &["red", "blue"]);
    assert_eq!(
        site.meta(post, "dimensions"),
        vec![MetaValue::record([
            ("w", MetaValue::Int(640)),
            ("h", MetaValue::Int(480)),
        ])]
    );
    site.assert_meta(post, "_edit_lock", &["1700000000:1"]);

    // And forward again
    site.restore(post, second);
    site.assert_meta(post, "color", &["green"]);
    assert!(site.meta(post, "dimensions").is_empty());
}

#[test]
fn test_restore_of_unknown_revision_clears_tracked_keys() {
    let mut site = wired_site(MirrorConfig::default());
    let post = site.create_item();
    site.set_meta(post, "color", &["red"]);

    site.restore(post, ItemId::new(999));

    assert!(site.meta(post, "color").is_empty());
}
