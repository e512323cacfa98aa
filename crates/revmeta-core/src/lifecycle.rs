//! Lifecycle events the host fires into the mirror
//!
//! The host calls into a [`LifecycleBus`] at four points: after an item
//! is persisted, after a revision is restored onto an item, when the
//! comparison view collects its fields, and when it renders one. Each
//! subscriber is attached per event with an explicit priority; lower
//! priorities run first and ties keep subscription order.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use revmeta_store::{Item, ItemId, MetaStore};

use crate::error::Result;
use crate::mirror::{RevisionFields, RevisionMirror, SharedMirror};

/// Priority the mirror captures at after a save
pub const CAPTURE_PRIORITY: i32 = 10;
/// Priority the mirror restores at
pub const RESTORE_PRIORITY: i32 = 10;
/// Priority the mirror adds its comparison field at
pub const FIELD_LIST_PRIORITY: i32 = 10;
/// Priority the mirror renders its field at, ahead of host defaults
pub const FIELD_RENDER_PRIORITY: i32 = 1;

/// Points in the host's item lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifecycleEvent {
    /// Any item was saved, live or revision
    ItemPersisted,
    /// A revision was applied back onto its item
    SnapshotRestored,
    /// The comparison view is collecting its field list
    RevisionFieldList,
    /// The comparison view is rendering one field
    RevisionFieldRender,
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ItemPersisted => write!(f, "item-persisted"),
            Self::SnapshotRestored => write!(f, "snapshot-restored"),
            Self::RevisionFieldList => write!(f, "revision-field-list"),
            Self::RevisionFieldRender => write!(f, "revision-field-render"),
        }
    }
}

impl LifecycleEvent {
    /// Parse an event from its kebab-case name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "item-persisted" => Some(Self::ItemPersisted),
            "snapshot-restored" => Some(Self::SnapshotRestored),
            "revision-field-list" => Some(Self::RevisionFieldList),
            "revision-field-render" => Some(Self::RevisionFieldRender),
            _ => None,
        }
    }

    /// List all valid event names
    pub fn all_names() -> &'static [&'static str] {
        &[
            "item-persisted",
            "snapshot-restored",
            "revision-field-list",
            "revision-field-render",
        ]
    }
}

/// Receives lifecycle events. Every method defaults to doing nothing.
pub trait LifecycleSubscriber: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    fn on_item_persisted(&self, _store: &mut dyn MetaStore, _item: &Item) -> Result<()> {
        Ok(())
    }

    fn on_snapshot_restored(
        &self,
        _store: &mut dyn MetaStore,
        _item: ItemId,
        _revision: ItemId,
    ) -> Result<()> {
        Ok(())
    }

    fn on_revision_field_list(&self, _fields: &mut RevisionFields) {}

    /// Markup for `field` of `revision`, or `None` to defer
    fn on_revision_field_render(
        &self,
        _store: &dyn MetaStore,
        _field: &str,
        _revision: ItemId,
    ) -> Result<Option<String>> {
        Ok(None)
    }
}

struct Subscription {
    event: LifecycleEvent,
    priority: i32,
    subscriber: Arc<dyn LifecycleSubscriber>,
}

/// Dispatches host lifecycle events to subscribers in priority order
#[derive(Default)]
pub struct LifecycleBus {
    subscriptions: Vec<Subscription>,
}

impl LifecycleBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `subscriber` to `event`
    pub fn subscribe(
        &mut self,
        event: LifecycleEvent,
        priority: i32,
        subscriber: Arc<dyn LifecycleSubscriber>,
    ) {
        tracing::debug!(%event, priority, subscriber = subscriber.name(), "Subscribing");
        self.subscriptions.push(Subscription {
            event,
            priority,
            subscriber,
        });
    }

    /// Subscriber names for `event`, in dispatch order
    pub fn subscribers(&self, event: LifecycleEvent) -> Vec<&str> {
        self.matching(event)
            .into_iter()
            .map(|s| s.subscriber.name())
            .collect()
    }

    /// Fire [`LifecycleEvent::ItemPersisted`]. Stops at the first error.
    pub fn item_persisted(&self, store: &mut dyn MetaStore, item: &Item) -> Result<()> {
        for sub in self.matching(LifecycleEvent::ItemPersisted) {
            sub.subscriber.on_item_persisted(store, item)?;
        }
        Ok(())
    }

    /// Fire [`LifecycleEvent::SnapshotRestored`]. Stops at the first error.
    pub fn snapshot_restored(
        &self,
        store: &mut dyn MetaStore,
        item: ItemId,
        revision: ItemId,
    ) -> Result<()> {
        for sub in self.matching(LifecycleEvent::SnapshotRestored) {
            sub.subscriber.on_snapshot_restored(store, item, revision)?;
        }
        Ok(())
    }

    /// Fire [`LifecycleEvent::RevisionFieldList`], threading the list through
    /// every subscriber
    pub fn revision_fields(&self, mut fields: RevisionFields) -> RevisionFields {
        for sub in self.matching(LifecycleEvent::RevisionFieldList) {
            sub.subscriber.on_revision_field_list(&mut fields);
        }
        fields
    }

    /// Fire [`LifecycleEvent::RevisionFieldRender`].
    ///
    /// The first subscriber returning markup wins; `None` means the host
    /// should render the field itself.
    pub fn render_field(
        &self,
        store: &dyn MetaStore,
        field: &str,
        revision: ItemId,
    ) -> Result<Option<String>> {
        for sub in self.matching(LifecycleEvent::RevisionFieldRender) {
            if let Some(markup) = sub.subscriber.on_revision_field_render(store, field, revision)? {
                return Ok(Some(markup));
            }
        }
        Ok(None)
    }

    fn matching(&self, event: LifecycleEvent) -> Vec<&Subscription> {
        let mut matching: Vec<&Subscription> = self
            .subscriptions
            .iter()
            .filter(|s| s.event == event)
            .collect();
        // stable: equal priorities keep subscription order
        matching.sort_by_key(|s| s.priority);
        matching
    }
}

impl fmt::Debug for LifecycleBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for s in &self.subscriptions {
            list.entry(&(s.event, s.priority, s.subscriber.name()));
        }
        list.finish()
    }
}

impl RevisionMirror {
    /// Subscribe `mirror` to all four lifecycle events at its default
    /// priorities
    pub fn attach(mirror: &SharedMirror, bus: &mut LifecycleBus) {
        bus.subscribe(LifecycleEvent::ItemPersisted, CAPTURE_PRIORITY, mirror.clone());
        bus.subscribe(LifecycleEvent::SnapshotRestored, RESTORE_PRIORITY, mirror.clone());
        bus.subscribe(LifecycleEvent::RevisionFieldList, FIELD_LIST_PRIORITY, mirror.clone());
        bus.subscribe(
            LifecycleEvent::RevisionFieldRender,
            FIELD_RENDER_PRIORITY,
            mirror.clone(),
        );
    }
}

impl LifecycleSubscriber for RevisionMirror {
    fn name(&self) -> &str {
        "revision-mirror"
    }

    fn on_item_persisted(&self, store: &mut dyn MetaStore, item: &Item) -> Result<()> {
        self.capture(store, item).map(|_| ())
    }

    fn on_snapshot_restored(
        &self,
        store: &mut dyn MetaStore,
        item: ItemId,
        revision: ItemId,
    ) -> Result<()> {
        self.restore(store, item, revision).map(|_| ())
    }

    fn on_revision_field_list(&self, fields: &mut RevisionFields) {
        self.revision_fields(fields);
    }

    fn on_revision_field_render(
        &self,
        store: &dyn MetaStore,
        field: &str,
        revision: ItemId,
    ) -> Result<Option<String>> {
        self.render_field(store, field, revision)
    }
}
