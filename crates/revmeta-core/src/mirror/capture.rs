//! Capture: copy tracked metadata onto a new revision

use revmeta_store::{Item, MetaStore, add_slashes, slash_deep};

use super::{KeyCopy, MirrorOutcome, MirrorReport, RevisionMirror, SkipReason};
use crate::error::Result;

impl RevisionMirror {
    /// Copy every tracked key from the revision's parent onto the revision.
    ///
    /// Runs on every save; anything other than a revision is skipped
    /// without touching the store. Keys with no values on the parent are
    /// skipped so the revision gets no empty entries. Each value is
    /// written once, in order, slashed for the store's write path.
    pub fn capture<S>(&self, store: &mut S, revision: &Item) -> Result<MirrorOutcome>
    where
        S: MetaStore + ?Sized,
    {
        if !revision.is_revision() {
            return Ok(MirrorOutcome::Skipped(SkipReason::NotARevision));
        }
        if !self.has_keys() {
            return Ok(MirrorOutcome::Skipped(SkipReason::NoTrackedKeys));
        }
        let Some(parent) = revision.parent else {
            return Ok(MirrorOutcome::Skipped(SkipReason::MissingParent));
        };

        let mut report = MirrorReport::new(parent, revision.id);
        for descriptor in &self.registry {
            let key = descriptor.key();
            let values = store.get(parent, key)?;
            if values.is_empty() {
                continue;
            }

            let slashed_key = add_slashes(key);
            for value in &values {
                store.add(revision.id, &slashed_key, slash_deep(value), false)?;
            }

            if self.config.debug {
                tracing::info!(
                    key,
                    revision = %revision.id,
                    item = %parent,
                    values = values.len(),
                    "Added metadata to revision"
                );
            }
            report.keys.push(KeyCopy {
                key: key.to_string(),
                values: values.len(),
            });
        }

        Ok(MirrorOutcome::Applied(report))
    }
}
