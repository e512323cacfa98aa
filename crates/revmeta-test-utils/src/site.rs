//! [`TestSite`] builder for mirror test scenarios.

use std::sync::Arc;

use revmeta_core::{
    LifecycleBus, MirrorConfig, Renderer, RevisionFields, RevisionMirror, SharedMirror,
};
use revmeta_store::{InMemoryMetaStore, Item, ItemId, MetaStore, MetaValue};

/// An in-memory host with a [`RevisionMirror`] attached to its lifecycle
/// bus.
///
/// Helpers drive the host the way its editor would: save an item (which
/// snapshots a revision and fires the save event for it), restore a
/// revision, open the comparison view.
///
/// # Example
///
/// ```rust
/// use revmeta_test_utils::TestSite;
///
/// let mut site = TestSite::tracking(&["color"]);
/// let post = site.create_item();
/// site.set_meta(post, "color", &["red", "blue"]);
/// let revision = site.save(post);
/// site.assert_meta(revision, "color", &["red", "blue"]);
/// ```
pub struct TestSite {
    pub store: InMemoryMetaStore,
    pub bus: LifecycleBus,
    pub mirror: SharedMirror,
}

impl TestSite {
    /// Wire an already configured mirror into a fresh host.
    pub fn new(mirror: RevisionMirror) -> Self {
        let mirror = Arc::new(mirror);
        let mut bus = LifecycleBus::new();
        RevisionMirror::attach(&mirror, &mut bus);
        Self {
            store: InMemoryMetaStore::new(),
            bus,
            mirror,
        }
    }

    /// A host whose mirror tracks `keys` with generic rendering.
    pub fn tracking(keys: &[&str]) -> Self {
        Self::tracking_with(MirrorConfig::default(), keys.iter().map(|k| (*k, None)))
    }

    /// A host whose mirror tracks the given keys and renderers.
    pub fn tracking_with<'a, I>(config: MirrorConfig, keys: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Option<Renderer>)>,
    {
        let mut mirror = RevisionMirror::new(config);
        for (key, renderer) in keys {
            mirror.register(key, renderer);
        }
        Self::new(mirror)
    }

    /// Create a live item with no metadata
    pub fn create_item(&mut self) -> ItemId {
        self.store.create_live_item()
    }

    /// Replace every value under `key` on `item` with string values.
    pub fn set_meta(&mut self, item: ItemId, key: &str, values: &[&str]) {
        let values: Vec<MetaValue> = values.iter().map(|v| MetaValue::from(*v)).collect();
        self.set_meta_values(item, key, values);
    }

    /// Replace every value under `key` on `item`, storing them raw.
    ///
    /// # Panics
    /// Panics if `item` does not exist.
    pub fn set_meta_values(&mut self, item: ItemId, key: &str, values: Vec<MetaValue>) {
        self.store
            .delete(item, &revmeta_store::add_slashes(key))
            .unwrap_or_else(|e| panic!("set_meta: delete failed: {e}"));
        for value in values {
            self.store
                .put_raw(item, key, value)
                .unwrap_or_else(|e| panic!("set_meta: write to {item} failed: {e}"));
        }
    }

    /// Raw values stored under `key` on `item`
    pub fn meta(&self, item: ItemId, key: &str) -> Vec<MetaValue> {
        self.store
            .get(item, key)
            .unwrap_or_else(|e| panic!("meta: read of {item} failed: {e}"))
    }

    /// Fire the save event for `item` itself, without snapshotting.
    pub fn persist(&mut self, item: &Item) {
        self.bus
            .item_persisted(&mut self.store, item)
            .unwrap_or_else(|e| panic!("persist: save hook failed for {}: {e}", item.id));
    }

    /// Save `item`: fire the save event for the live item, snapshot a
    /// revision of it and fire the save event for the revision.
    ///
    /// Returns the new revision's id.
    ///
    /// # Panics
    /// Panics if `item` does not exist or a hook fails.
    pub fn save(&mut self, item: ItemId) -> ItemId {
        let live = *self
            .store
            .item(item)
            .unwrap_or_else(|| panic!("save: unknown item {item}"));
        self.persist(&live);

        let revision = self
            .store
            .create_revision(item)
            .unwrap_or_else(|e| panic!("save: revision of {item} failed: {e}"));
        self.persist(&revision);
        revision.id
    }

    /// Restore `revision` onto `item`.
    ///
    /// # Panics
    /// Panics if a restore hook fails.
    pub fn restore(&mut self, item: ItemId, revision: ItemId) {
        self.bus
            .snapshot_restored(&mut self.store, item, revision)
            .unwrap_or_else(|e| panic!("restore: {revision} onto {item} failed: {e}"));
    }

    /// The comparison view's field list, starting from the host defaults
    pub fn comparison_fields(&self) -> RevisionFields {
        let defaults: RevisionFields = [
            ("post_title", "Title"),
            ("post_content", "Content"),
            ("post_excerpt", "Excerpt"),
        ]
        .into_iter()
        .collect();
        self.bus.revision_fields(defaults)
    }

    /// Markup the comparison view gets for `field` of `revision`
    pub fn render(&self, field: &str, revision: ItemId) -> Option<String> {
        self.bus
            .render_field(&self.store, field, revision)
            .unwrap_or_else(|e| panic!("render: {field} of {revision} failed: {e}"))
    }

    /// Assert the string values stored under `key` on `item`.
    ///
    /// # Panics
    /// Panics if the stored values differ.
    pub fn assert_meta(&self, item: ItemId, key: &str, expected: &[&str]) {
        let expected: Vec<MetaValue> = expected.iter().map(|v| MetaValue::from(*v)).collect();
        let actual = self.meta(item, key);
        assert_eq!(
            actual, expected,
            "metadata {key:?} on item {item} does not match"
        );
    }
}
