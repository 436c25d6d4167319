use std::collections::{BTreeMap, BTreeSet};

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::debug;

use crate::core::group::{AmbiguousCandidate, Candidate, FamilyMembers, GroupRecord};
use crate::core::types::{Fingerprint, ProteinId};
use crate::diagnostics::{Caveat, Diagnostics};
use crate::remote::retry::RetryPolicy;
use crate::remote::GroupMemberLookup;

/// Outcome of comparing retained groups' full membership against the family
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Discrepancy {
    /// Proteins outside the family linked to exactly one retained group, by accession
    pub candidates: Vec<Candidate>,
    /// Proteins outside the family linked to two or more retained groups, by accession
    pub ambiguous: Vec<AmbiguousCandidate>,
    /// Candidates contributed by each resolved group
    pub candidate_counts: BTreeMap<Fingerprint, usize>,
}

impl Discrepancy {
    #[must_use]
    pub fn candidates_for(&self, fingerprint: &Fingerprint) -> usize {
        self.candidate_counts.get(fingerprint).copied().unwrap_or(0)
    }
}

/// Fetch the full member set of every retained group.
///
/// Groups keep their order. A group whose query fails permanently is returned
/// unresolved (`members == None`) and a [`Caveat::ResolutionIncomplete`] is
/// recorded for it.
pub async fn resolve_group_members(
    lookup: &dyn GroupMemberLookup,
    groups: Vec<GroupRecord>,
    concurrency: usize,
    retry: &RetryPolicy,
    diagnostics: &mut Diagnostics,
) -> Vec<GroupRecord> {
    let mut outcomes: Vec<_> = stream::iter(groups.into_iter().enumerate())
        .map(move |(index, group)| async move {
            let label = format!("OMA group {}", group.fingerprint);
            let attempt = retry
                .run(&label, || lookup.fetch_group_members(&group.fingerprint))
                .await;
            (index, group, attempt)
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    outcomes.sort_by_key(|(index, _, _)| *index);

    outcomes
        .into_iter()
        .map(|(_, group, attempt)| {
            diagnostics.note_retries(attempt.retries());
            match attempt.outcome {
                Ok(members) => {
                    debug!("OMA group {}: {} members", group.fingerprint, members.len());
                    group.with_members(members)
                }
                Err(e) => {
                    diagnostics.record(Caveat::ResolutionIncomplete {
                        fingerprint: group.fingerprint.clone(),
                        attempts: attempt.attempts,
                        error: e.to_string(),
                    });
                    group
                }
            }
        })
        .collect()
}

/// Compute OMA-only candidates for the retained groups.
///
/// Every protein in a resolved group's member set that is not a family member
/// is a raw candidate. Raw candidates linked to exactly one retained group are
/// kept; the rest are reported as ambiguous. Unresolved groups contribute
/// nothing.
#[must_use]
pub fn find_candidates(family: &FamilyMembers, groups: &[GroupRecord]) -> Discrepancy {
    // Reverse mapping: raw candidate -> retained fingerprints it belongs to
    let mut links: BTreeMap<&ProteinId, BTreeSet<&Fingerprint>> = BTreeMap::new();
    for group in groups {
        let Some(members) = &group.members else {
            continue;
        };
        for id in members.iter().filter(|id| !family.contains(id)) {
            links.entry(id).or_default().insert(&group.fingerprint);
        }
    }

    let mut discrepancy = Discrepancy::default();
    for group in groups.iter().filter(|g| g.is_resolved()) {
        discrepancy
            .candidate_counts
            .insert(group.fingerprint.clone(), 0);
    }

    for (id, fingerprints) in links {
        let mut fingerprints = fingerprints.into_iter();
        match (fingerprints.next(), fingerprints.next()) {
            (Some(only), None) => {
                *discrepancy
                    .candidate_counts
                    .entry(only.clone())
                    .or_default() += 1;
                discrepancy.candidates.push(Candidate {
                    id: id.clone(),
                    fingerprint: only.clone(),
                });
            }
            (Some(first), Some(second)) => {
                let mut all = vec![first.clone(), second.clone()];
                all.extend(fingerprints.cloned());
                discrepancy.ambiguous.push(AmbiguousCandidate {
                    id: id.clone(),
                    fingerprints: all,
                });
            }
            (None, _) => {}
        }
    }

    debug!(
        "{} candidates, {} ambiguous",
        discrepancy.candidates.len(),
        discrepancy.ambiguous.len()
    );
    discrepancy
}
