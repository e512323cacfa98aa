//! Revision metadata mirror
//!
//! Content hosts keep revision snapshots of their items but usually leave
//! the items' metadata out of them. This crate fills that gap for a chosen
//! set of metadata keys:
//!
//! - **Capture**: when a revision is saved, tracked keys are copied from
//!   the live item onto the revision
//! - **Restore**: when a revision is restored, tracked keys on the live
//!   item are replaced with the revision's values
//! - **Render**: the revision comparison view gets a "Post Meta" field
//!   listing each tracked key's captured values
//!
//! # Architecture
//!
//! ```text
//!              host lifecycle
//!                    |
//!              LifecycleBus
//!                    |
//!             RevisionMirror ---- Registry
//!                    |
//!        revmeta-store (MetaStore)
//! ```
//!
//! The host owns storage and calls the bus at fixed lifecycle points.
//! The mirror holds no data of its own beyond the registry.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use revmeta_core::{LifecycleBus, MirrorConfig, RevisionMirror};
//! use revmeta_store::{InMemoryMetaStore, MetaStore, MetaValue};
//!
//! let mut mirror = RevisionMirror::new(MirrorConfig::default());
//! mirror.register("color", None);
//! let mirror = Arc::new(mirror);
//!
//! let mut bus = LifecycleBus::new();
//! RevisionMirror::attach(&mirror, &mut bus);
//!
//! let mut store = InMemoryMetaStore::new();
//! let post = store.create_live_item();
//! store.put_raw(post, "color", MetaValue::from("red")).unwrap();
//!
//! let revision = store.create_revision(post).unwrap();
//! bus.item_persisted(&mut store, &revision).unwrap();
//!
//! assert_eq!(store.get(revision.id, "color").unwrap(), vec![MetaValue::from("red")]);
//! ```

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod mirror;
pub mod registry;

pub use config::MirrorConfig;
pub use error::{Error, Result};
pub use lifecycle::{LifecycleBus, LifecycleEvent, LifecycleSubscriber};
pub use mirror::{
    DisplayFilter, KeyCopy, MirrorOutcome, MirrorReport, RevisionFields, RevisionMirror,
    SharedMirror, SkipReason, display_filter,
};
pub use registry::{KeyDescriptor, Registry, Renderer, renderer};
