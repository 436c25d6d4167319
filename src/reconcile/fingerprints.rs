use std::collections::BTreeMap;

use futures::stream::{self, StreamExt};
use tracing::debug;

use crate::core::group::{FamilyMembers, FingerprintMap};
use crate::core::types::ProteinId;
use crate::diagnostics::{Caveat, Diagnostics};
use crate::reconcile::ReconcileConfig;
use crate::remote::retry::RetryPolicy;
use crate::remote::FingerprintLookup;

/// Resolves OMA fingerprints for a whole family in batches.
///
/// Batches are issued concurrently up to `concurrency`. A batch that fails
/// permanently does not abort the run: its proteins are treated as having no
/// fingerprint and a [`Caveat::BatchResolutionFailure`] is recorded.
pub struct FingerprintResolver<'a> {
    lookup: &'a dyn FingerprintLookup,
    batch_size: usize,
    concurrency: usize,
    retry: &'a RetryPolicy,
}

impl<'a> FingerprintResolver<'a> {
    #[must_use]
    pub fn new(lookup: &'a dyn FingerprintLookup, config: &'a ReconcileConfig) -> Self {
        Self {
            lookup,
            batch_size: config.batch_size.max(1),
            concurrency: config.concurrency.max(1),
            retry: &config.retry,
        }
    }

    /// Map every family member to its fingerprint (or none).
    ///
    /// The returned map has exactly one entry per family member.
    pub async fn resolve(
        &self,
        family: &FamilyMembers,
        diagnostics: &mut Diagnostics,
    ) -> FingerprintMap {
        let ids: Vec<ProteinId> = family.iter().cloned().collect();
        let batches: Vec<&[ProteinId]> = ids.chunks(self.batch_size).collect();
        let total_batches = batches.len();

        debug!(
            "Resolving fingerprints for {} proteins in {total_batches} batch(es)",
            ids.len()
        );

        let mut outcomes: Vec<_> = stream::iter(batches.into_iter().enumerate())
            .map(move |(index, batch)| async move {
                let label = format!("fingerprint batch {}/{total_batches}", index + 1);
                let attempt = self
                    .retry
                    .run(&label, || self.lookup.bulk_resolve_fingerprints(batch))
                    .await;
                (index, batch, attempt)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        // Completion order is arbitrary; record caveats in batch order
        outcomes.sort_by_key(|(index, _, _)| *index);

        let mut entries = BTreeMap::new();
        for (index, batch, attempt) in outcomes {
            diagnostics.note_retries(attempt.retries());
            match attempt.outcome {
                Ok(mut found) => {
                    for id in batch {
                        let fingerprint = found.remove(id).flatten();
                        entries.insert(id.clone(), fingerprint);
                    }
                }
                Err(e) => {
                    entries.extend(batch.iter().map(|id| (id.clone(), None)));
                    diagnostics.record(Caveat::BatchResolutionFailure {
                        batch: index + 1,
                        total_batches,
                        identifiers: batch.to_vec(),
                        attempts: attempt.attempts,
                        error: e.to_string(),
                    });
                }
            }
        }

        let map = FingerprintMap::new(entries);
        debug!(
            "{} of {} proteins have an OMA fingerprint",
            map.assigned_count(),
            map.len()
        );
        map
    }
}
