//! Restore: write a revision's tracked metadata back onto the live item

use revmeta_store::{ItemId, MetaStore, add_slashes, slash_deep};

use super::{KeyCopy, MirrorOutcome, MirrorReport, RevisionMirror, SkipReason};
use crate::error::Result;

impl RevisionMirror {
    /// Replace every tracked key on `item` with the values held by
    /// `revision`.
    ///
    /// Each key is cleared on the item first, even when the revision holds
    /// nothing for it: a key absent from the revision ends up absent from
    /// the item. Values are re-slashed before writing because direct reads
    /// return them raw, and written one by one without the unique flag so
    /// multiplicity and order match the revision exactly.
    pub fn restore<S>(&self, store: &mut S, item: ItemId, revision: ItemId) -> Result<MirrorOutcome>
    where
        S: MetaStore + ?Sized,
    {
        if !self.has_keys() {
            return Ok(MirrorOutcome::Skipped(SkipReason::NoTrackedKeys));
        }

        let mut report = MirrorReport::new(revision, item);
        for descriptor in &self.registry {
            let key = descriptor.key();
            let slashed_key = add_slashes(key);
            store.delete(item, &slashed_key)?;

            let values = store.get(revision, key)?;
            for value in &values {
                if self.config.debug {
                    tracing::info!(key, %item, "Setting metadata");
                }
                store.add(item, &slashed_key, slash_deep(value), false)?;
            }

            if self.config.debug && !values.is_empty() {
                tracing::info!(key, %item, %revision, "Restored metadata from revision");
            }
            report.keys.push(KeyCopy {
                key: key.to_string(),
                values: values.len(),
            });
        }

        Ok(MirrorOutcome::Applied(report))
    }
}
