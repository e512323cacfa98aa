//! Host-side data model for the revision metadata mirror.
//!
//! This crate is the layer the mirror talks to. It holds no mirroring
//! logic of its own; it describes what the host platform looks like:
//!
//! - **Items**: live content items and the revision snapshots taken of them
//! - **Values**: the closed set of metadata value shapes ([`MetaValue`])
//! - **Store**: the host metadata API ([`MetaStore`]) with get/add/delete
//! - **Slashing**: the reserved-character escaping the store expects on writes
//!
//! # Escaping convention
//!
//! Values handed to [`MetaStore::add`] are expected to arrive escaped, the
//! way form-submitted data does. The store strips the escaping before it
//! persists anything. Values returned by [`MetaStore::get`] are raw, so any
//! value read from one item and written to another must pass through
//! [`slash_deep`] exactly once:
//!
//! ```
//! use revmeta_store::{InMemoryMetaStore, MetaStore, MetaValue, slash_deep};
//!
//! let mut store = InMemoryMetaStore::new();
//! let a = store.create_live_item();
//! let b = store.create_live_item();
//!
//! store.put_raw(a, "quote", MetaValue::from(r#"say "hi" \o/"#)).unwrap();
//! for value in store.get(a, "quote").unwrap() {
//!     store.add(b, "quote", slash_deep(&value), false).unwrap();
//! }
//! assert_eq!(store.get(a, "quote").unwrap(), store.get(b, "quote").unwrap());
//! ```

pub mod error;
pub mod item;
pub mod memory;
pub mod slash;
pub mod store;
pub mod value;

pub use error::{Error, Result};
pub use item::{Item, ItemId, ItemKind};
pub use memory::InMemoryMetaStore;
pub use slash::{add_slashes, slash_deep, strip_slashes, unslash_deep};
pub use store::MetaStore;
pub use value::MetaValue;
