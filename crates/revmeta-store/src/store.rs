//! Host metadata store abstraction

use crate::error::Result;
use crate::item::ItemId;
use crate::value::MetaValue;

/// The host's metadata API.
///
/// An item may hold several values under one key; the store keeps them
/// in insertion order.
///
/// Writes follow the host's form-data convention: keys and values passed
/// to [`add`](MetaStore::add) and keys passed to
/// [`delete`](MetaStore::delete) arrive slashed and are unslashed by the
/// store. Reads through [`get`](MetaStore::get) take a raw key and return
/// raw values.
pub trait MetaStore {
    /// All values stored under `key` on `item`, in insertion order.
    ///
    /// Unknown items and keys yield an empty sequence.
    fn get(&self, item: ItemId, key: &str) -> Result<Vec<MetaValue>>;

    /// Append a value under `key` on `item`.
    ///
    /// With `unique` set, nothing is written when the item already holds a
    /// value under the key. Returns whether a value was written.
    fn add(&mut self, item: ItemId, key: &str, value: MetaValue, unique: bool) -> Result<bool>;

    /// Remove every value stored under `key` on `item`.
    ///
    /// Returns whether anything was removed.
    fn delete(&mut self, item: ItemId, key: &str) -> Result<bool>;
}
