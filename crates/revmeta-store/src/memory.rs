//! In-memory host store
//!
//! Follows the host's conventions closely enough to exercise the mirror
//! without a database: one id space for items and revisions, ordered
//! multi-valued metadata, and unslashing on writes.

use std::collections::{BTreeMap, HashMap};

use crate::error::{Error, Result};
use crate::item::{Item, ItemId};
use crate::slash::{strip_slashes, unslash_deep};
use crate::store::MetaStore;
use crate::value::MetaValue;

/// A `MetaStore` backed by process memory.
#[derive(Debug, Default)]
pub struct InMemoryMetaStore {
    items: BTreeMap<ItemId, Item>,
    /// Metadata rows per item, in insertion order across keys.
    meta: HashMap<ItemId, Vec<(String, MetaValue)>>,
    last_id: u64,
    writes: usize,
}

impl InMemoryMetaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item with an explicit id.
    ///
    /// Replaces any item already stored under the same id.
    pub fn insert_item(&mut self, item: Item) {
        self.last_id = self.last_id.max(item.id.get());
        self.items.insert(item.id, item);
    }

    /// Create a live item with the next free id
    pub fn create_live_item(&mut self) -> ItemId {
        let id = self.next_id();
        self.insert_item(Item::live(id));
        id
    }

    /// Create a revision snapshot of `parent` with the next free id.
    ///
    /// Only the item record is created; copying metadata onto the new
    /// revision is the mirror's job.
    pub fn create_revision(&mut self, parent: ItemId) -> Result<Item> {
        if !self.items.contains_key(&parent) {
            return Err(Error::MissingParent { parent });
        }
        let item = Item::revision(self.next_id(), parent);
        self.insert_item(item);
        Ok(item)
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    /// All items, ordered by id
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Revisions taken of `parent`, oldest first
    pub fn revisions_of(&self, parent: ItemId) -> Vec<ItemId> {
        self.items
            .values()
            .filter(|item| item.is_revision() && item.parent == Some(parent))
            .map(|item| item.id)
            .collect()
    }

    /// Store a value exactly as given, bypassing the unslashing write path.
    ///
    /// Mirrors a direct insert into the host's metadata table.
    pub fn put_raw(&mut self, item: ItemId, key: &str, value: MetaValue) -> Result<()> {
        self.ensure_item(item)?;
        self.meta
            .entry(item)
            .or_default()
            .push((key.to_string(), value));
        Ok(())
    }

    /// Distinct keys present on `item`, in first-insertion order
    pub fn keys(&self, item: ItemId) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for (key, _) in self.meta.get(&item).into_iter().flatten() {
            if !keys.contains(key) {
                keys.push(key.clone());
            }
        }
        keys
    }

    /// Number of `add` and `delete` calls that reached the store
    pub fn write_count(&self) -> usize {
        self.writes
    }

    fn next_id(&mut self) -> ItemId {
        self.last_id += 1;
        ItemId::new(self.last_id)
    }

    fn ensure_item(&self, item: ItemId) -> Result<()> {
        if self.items.contains_key(&item) {
            Ok(())
        } else {
            Err(Error::UnknownItem { id: item })
        }
    }
}

impl MetaStore for InMemoryMetaStore {
    fn get(&self, item: ItemId, key: &str) -> Result<Vec<MetaValue>> {
        Ok(self
            .meta
            .get(&item)
            .into_iter()
            .flatten()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .collect())
    }

    fn add(&mut self, item: ItemId, key: &str, value: MetaValue, unique: bool) -> Result<bool> {
        self.writes += 1;
        self.ensure_item(item)?;

        let key = strip_slashes(key);
        if key.is_empty() {
            return Ok(false);
        }

        let rows = self.meta.entry(item).or_default();
        if unique && rows.iter().any(|(k, _)| *k == key) {
            return Ok(false);
        }

        tracing::trace!(%item, key = %key, "Adding metadata row");
        rows.push((key, unslash_deep(&value)));
        Ok(true)
    }

    fn delete(&mut self, item: ItemId, key: &str) -> Result<bool> {
        self.writes += 1;
        let key = strip_slashes(key);
        let Some(rows) = self.meta.get_mut(&item) else {
            return Ok(false);
        };
        let before = rows.len();
        rows.retain(|(k, _)| *k != key);
        Ok(rows.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store_with_item() -> (InMemoryMetaStore, ItemId) {
        let mut store = InMemoryMetaStore::new();
        let id = store.create_live_item();
        (store, id)
    }

    #[test]
    fn test_ids_are_sequential_across_kinds() {
        let mut store = InMemoryMetaStore::new();
        let post = store.create_live_item();
        let rev = store.create_revision(post).unwrap();
        assert_eq!(post, ItemId::new(1));
        assert_eq!(rev.id, ItemId::new(2));
        assert_eq!(rev.parent, Some(post));
        assert_eq!(store.revisions_of(post), vec![rev.id]);
    }

    #[test]
    fn test_insert_item_advances_ids() {
        let mut store = InMemoryMetaStore::new();
        store.insert_item(Item::live(ItemId::new(40)));
        assert_eq!(store.create_live_item(), ItemId::new(41));

        let kinds: Vec<(u64, bool)> = store
            .items()
            .map(|item| (item.id.get(), item.is_revision()))
            .collect();
        assert_eq!(kinds, vec![(40, false), (41, false)]);
    }

    #[test]
    fn test_create_revision_requires_parent() {
        let mut store = InMemoryMetaStore::new();
        let err = store.create_revision(ItemId::new(9)).unwrap_err();
        assert!(matches!(err, Error::MissingParent { .. }));
    }

    #[test]
    fn test_get_preserves_order_and_multiplicity() {
        let (mut store, id) = store_with_item();
        store.add(id, "color", "red".into(), false).unwrap();
        store.add(id, "size", "xl".into(), false).unwrap();
        store.add(id, "color", "red".into(), false).unwrap();
        store.add(id, "color", "blue".into(), false).unwrap();

        assert_eq!(
            store.get(id, "color").unwrap(),
            vec![
                MetaValue::from("red"),
                MetaValue::from("red"),
                MetaValue::from("blue")
            ]
        );
        assert_eq!(store.keys(id), vec!["color".to_string(), "size".to_string()]);
    }

    #[test]
    fn test_get_unknown_is_empty() {
        let (store, id) = store_with_item();
        assert!(store.get(id, "missing").unwrap().is_empty());
        assert!(store.get(ItemId::new(99), "missing").unwrap().is_empty());
    }

    #[test]
    fn test_add_unslashes_key_and_value() {
        let (mut store, id) = store_with_item();
        store
            .add(id, r"k\'ey", MetaValue::from(r#"a \"b\""#), false)
            .unwrap();
        assert_eq!(
            store.get(id, "k'ey").unwrap(),
            vec![MetaValue::from(r#"a "b""#)]
        );
    }

    #[test]
    fn test_add_unique_refuses_existing_key() {
        let (mut store, id) = store_with_item();
        assert!(store.add(id, "k", "one".into(), true).unwrap());
        assert!(!store.add(id, "k", "two".into(), true).unwrap());
        assert!(store.add(id, "k", "three".into(), false).unwrap());
        assert_eq!(
            store.get(id, "k").unwrap(),
            vec![MetaValue::from("one"), MetaValue::from("three")]
        );
    }

    #[test]
    fn test_add_to_unknown_item_fails() {
        let mut store = InMemoryMetaStore::new();
        let err = store
            .add(ItemId::new(5), "k", "v".into(), false)
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown item: 5");
    }

    #[test]
    fn test_add_empty_key_is_ignored() {
        let (mut store, id) = store_with_item();
        assert!(!store.add(id, "", "v".into(), false).unwrap());
        assert!(store.keys(id).is_empty());
    }

    #[test]
    fn test_delete_removes_all_values_for_key() {
        let (mut store, id) = store_with_item();
        store.add(id, "color", "red".into(), false).unwrap();
        store.add(id, "color", "blue".into(), false).unwrap();
        store.add(id, "size", "xl".into(), false).unwrap();

        assert!(store.delete(id, "color").unwrap());
        assert!(store.get(id, "color").unwrap().is_empty());
        assert_eq!(store.get(id, "size").unwrap(), vec![MetaValue::from("xl")]);
        assert!(!store.delete(id, "color").unwrap());
    }

    #[test]
    fn test_put_raw_bypasses_unslashing() {
        let (mut store, id) = store_with_item();
        store.put_raw(id, "path", MetaValue::from(r"C:\dir")).unwrap();
        assert_eq!(
            store.get(id, "path").unwrap(),
            vec![MetaValue::from(r"C:\dir")]
        );
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_write_count_tracks_add_and_delete() {
        let (mut store, id) = store_with_item();
        store.add(id, "k", "v".into(), false).unwrap();
        store.delete(id, "k").unwrap();
        store.get(id, "k").unwrap();
        assert_eq!(store.write_count(), 2);
    }
}
