//! Error types for revmeta-store

use crate::item::ItemId;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by a host metadata store
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A write targeted an item the store does not know about
    #[error("Unknown item: {id}")]
    UnknownItem { id: ItemId },

    /// A revision was requested for a parent that does not exist
    #[error("Cannot create revision of {parent}: parent item does not exist")]
    MissingParent { parent: ItemId },
}
