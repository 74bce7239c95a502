//! Outstanding recipient tracking

use crate::predicate::TerminalPredicate;
use blastwave_protocol::{BatchId, RecipientId, StatusRecord};
use std::collections::BTreeSet;

/// Which batch a poll reconciles against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchScope {
    /// Only records of this batch count
    Batch(BatchId),
    /// Records of any batch on the campaign count; used for direct sends
    AnyBatch,
}

impl BatchScope {
    /// Whether a record from `batch_id` belongs to this scope
    pub fn matches(&self, batch_id: BatchId) -> bool {
        match self {
            Self::Batch(id) => *id == batch_id,
            Self::AnyBatch => true,
        }
    }
}

impl From<BatchId> for BatchScope {
    fn from(batch_id: BatchId) -> Self {
        Self::Batch(batch_id)
    }
}

/// Recipients still awaiting a terminal result for one batch.
///
/// Built once from the submitted recipients and only ever shrinks; an empty set
/// means every recipient has finished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientSet {
    outstanding: BTreeSet<RecipientId>,
}

impl RecipientSet {
    /// Number of outstanding recipients
    pub fn len(&self) -> usize {
        self.outstanding.len()
    }

    /// Whether every recipient has finished
    pub fn is_empty(&self) -> bool {
        self.outstanding.is_empty()
    }

    /// Whether `id` is still outstanding
    pub fn contains(&self, id: &RecipientId) -> bool {
        self.outstanding.contains(id)
    }

    /// Iterate outstanding recipients in order
    pub fn iter(&self) -> impl Iterator<Item = &RecipientId> {
        self.outstanding.iter()
    }

    /// Stop tracking `id`; returns whether it was outstanding
    pub fn remove(&mut self, id: &RecipientId) -> bool {
        self.outstanding.remove(id)
    }

    /// Outstanding recipients in order
    pub fn into_vec(self) -> Vec<RecipientId> {
        self.outstanding.into_iter().collect()
    }

    /// Remove every recipient that `records` reports as finished within `scope`.
    ///
    /// Pending records, records rejected by `predicate` and records of other
    /// batches are ignored. Returns the recipients removed by this call.
    pub fn reconcile<P>(
        &mut self,
        records: &[StatusRecord],
        scope: BatchScope,
        predicate: &P,
    ) -> Vec<RecipientId>
    where
        P: TerminalPredicate + ?Sized,
    {
        let mut resolved = Vec::new();
        for record in records {
            let Some(result) = record.result else {
                continue;
            };
            if !predicate.is_terminal(result) || !scope.matches(record.batch_id) {
                continue;
            }
            if self.outstanding.remove(&record.recipient_id) {
                resolved.push(record.recipient_id.clone());
            }
        }
        resolved
    }
}

impl<R: Into<RecipientId>> FromIterator<R> for RecipientSet {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self {
            outstanding: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl IntoIterator for RecipientSet {
    type Item = RecipientId;
    type IntoIter = std::collections::btree_set::IntoIter<RecipientId>;

    fn into_iter(self) -> Self::IntoIter {
        self.outstanding.into_iter()
    }
}
