//! Items and revision snapshots as the host classifies them

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an item or a revision snapshot.
///
/// Live items and their revisions share one id space, as they do in the
/// host's content table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the host classifies a stored item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A regular content item that users edit
    #[default]
    Live,
    /// A historical snapshot of a live item
    Revision,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Live => write!(f, "live"),
            ItemKind::Revision => write!(f, "revision"),
        }
    }
}

/// The slice of a host item the mirror needs to see on save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub kind: ItemKind,
    /// The live item a revision was taken from. `None` for live items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ItemId>,
}

impl Item {
    /// A live item
    pub fn live(id: ItemId) -> Self {
        Self {
            id,
            kind: ItemKind::Live,
            parent: None,
        }
    }

    /// A revision snapshot of `parent`
    pub fn revision(id: ItemId, parent: ItemId) -> Self {
        Self {
            id,
            kind: ItemKind::Revision,
            parent: Some(parent),
        }
    }

    pub fn is_revision(&self) -> bool {
        self.kind == ItemKind::Revision
    }
}
