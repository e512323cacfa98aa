//! The metadata revision mirror
//!
//! [`RevisionMirror`] owns the key registry and runs the three operations
//! the host triggers:
//!
//! - **capture** (`capture.rs`): copy tracked keys from a live item onto a
//!   freshly created revision
//! - **restore** (`restore.rs`): replace tracked keys on a live item with
//!   the values held by a revision
//! - **render** (`render.rs`): format a revision's tracked keys for the
//!   comparison view
//!
//! All three are stateless over the registry and the host store.

mod capture;
mod render;
mod restore;

use std::fmt;
use std::sync::Arc;

use revmeta_store::{ItemId, MetaValue};

use crate::config::MirrorConfig;
use crate::registry::{Registry, Renderer};

pub use render::{
    DisplayFilter, EMPTY_PLACEHOLDER, FIELD_ID, FIELD_LABEL, RevisionFields, display_filter,
    escape_html,
};

/// Mirrors tracked metadata between live items and their revisions.
///
/// Build one during application wiring, register keys, then share it
/// (usually behind an `Arc`) with the lifecycle bus.
pub struct RevisionMirror {
    registry: Registry,
    config: MirrorConfig,
    display_filter: Option<DisplayFilter>,
}

impl RevisionMirror {
    pub fn new(config: MirrorConfig) -> Self {
        Self {
            registry: Registry::new(),
            config,
            display_filter: None,
        }
    }

    /// Track a metadata key. See [`Registry::register`].
    pub fn register(&mut self, key: impl Into<String>, renderer: Option<Renderer>) -> bool {
        self.registry.register(key, renderer)
    }

    /// Whether any key is tracked
    pub fn has_keys(&self) -> bool {
        self.registry.has_keys()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }

    /// Override the filter applied to escaped generic renderings.
    ///
    /// The filter receives the escaped text, the key and the value, and
    /// returns the markup to embed.
    pub fn set_display_filter(&mut self, filter: DisplayFilter) {
        self.display_filter = Some(filter);
    }

    fn filter_display(&self, escaped: String, key: &str, value: &MetaValue) -> String {
        match &self.display_filter {
            Some(filter) => filter(escaped, key, value),
            None => escaped,
        }
    }
}

impl Default for RevisionMirror {
    fn default() -> Self {
        Self::new(MirrorConfig::default())
    }
}

impl fmt::Debug for RevisionMirror {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevisionMirror")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("display_filter", &self.display_filter.is_some())
            .finish()
    }
}

/// Why an operation did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The saved item is not a revision snapshot
    NotARevision,
    /// No metadata keys are tracked
    NoTrackedKeys,
    /// The revision does not name the live item it was taken from
    MissingParent,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotARevision => write!(f, "item is not a revision"),
            Self::NoTrackedKeys => write!(f, "no metadata keys are tracked"),
            Self::MissingParent => write!(f, "revision has no parent item"),
        }
    }
}

/// Values copied for one key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCopy {
    pub key: String,
    /// Number of values written to the target
    pub values: usize,
}

/// What a capture or restore wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorReport {
    /// Item the values were read from
    pub source: ItemId,
    /// Item the values were written to
    pub target: ItemId,
    /// Keys touched, in registration order
    pub keys: Vec<KeyCopy>,
}

impl MirrorReport {
    fn new(source: ItemId, target: ItemId) -> Self {
        Self {
            source,
            target,
            keys: Vec::new(),
        }
    }

    /// Total values written across all keys
    pub fn total_values(&self) -> usize {
        self.keys.iter().map(|k| k.values).sum()
    }

    pub fn key(&self, key: &str) -> Option<&KeyCopy> {
        self.keys.iter().find(|k| k.key == key)
    }
}

/// Result of a capture or restore
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorOutcome {
    /// Guard condition hit; the store was not touched
    Skipped(SkipReason),
    /// The operation ran
    Applied(MirrorReport),
}

impl MirrorOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MirrorOutcome::Applied(_))
    }

    pub fn report(&self) -> Option<&MirrorReport> {
        match self {
            MirrorOutcome::Applied(report) => Some(report),
            MirrorOutcome::Skipped(_) => None,
        }
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            MirrorOutcome::Skipped(reason) => Some(*reason),
            MirrorOutcome::Applied(_) => None,
        }
    }
}

/// Shared handle used when wiring the mirror into a lifecycle bus
pub type SharedMirror = Arc<RevisionMirror>;
