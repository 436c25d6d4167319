use std::collections::HashMap;

use futures::stream::{self, StreamExt};
use tracing::debug;

use crate::core::protein::ProteinAnnotation;
use crate::core::types::ProteinId;
use crate::diagnostics::{Caveat, Diagnostics};
use crate::reconcile::ReconcileConfig;
use crate::remote::DescriptionLookup;

/// Metadata fetched for report proteins
pub type Annotations = HashMap<ProteinId, ProteinAnnotation>;

/// Fetch descriptive metadata for `ids`, best effort.
///
/// Batched and fanned out like fingerprint resolution. A batch that fails
/// permanently leaves its proteins without metadata and records a
/// [`Caveat::EnrichmentUnavailable`]; it never fails the run.
pub async fn enrich(
    lookup: &dyn DescriptionLookup,
    ids: &[ProteinId],
    config: &ReconcileConfig,
    diagnostics: &mut Diagnostics,
) -> Annotations {
    let batches: Vec<&[ProteinId]> = ids.chunks(config.batch_size.max(1)).collect();
    let total = batches.len();
    let retry = &config.retry;

    let mut outcomes: Vec<_> = stream::iter(batches.into_iter().enumerate())
        .map(move |(index, batch)| async move {
            let label = format!("description batch {}/{total}", index + 1);
            let attempt = retry
                .run(&label, || lookup.fetch_descriptions(batch))
                .await;
            (index, batch, attempt)
        })
        .buffer_unordered(config.concurrency.max(1))
        .collect()
        .await;

    outcomes.sort_by_key(|(index, _, _)| *index);

    let mut annotations = Annotations::new();
    for (_, batch, attempt) in outcomes {
        diagnostics.note_retries(attempt.retries());
        match attempt.outcome {
            Ok(found) => annotations.extend(found),
            Err(e) => diagnostics.record(Caveat::EnrichmentUnavailable {
                identifiers: batch.to_vec(),
                error: e.to_string(),
            }),
        }
    }

    debug!("Fetched metadata for {} of {} proteins", annotations.len(), ids.len());
    annotations
}
