use tracing::info;

use crate::core::group::{FamilyMembers, GroupRecord};
use crate::core::types::FamilyId;
use crate::diagnostics::Diagnostics;
use crate::reconcile::aggregate::GroupIndex;
use crate::reconcile::discrepancy::{find_candidates, resolve_group_members, Discrepancy};
use crate::reconcile::fingerprints::FingerprintResolver;
use crate::reconcile::ReconcileConfig;
use crate::remote::{FingerprintLookup, GroupMemberLookup};
use crate::source::{load_family, FamilySource, SourceError};

/// Ranked groups for a family, before any member-set queries
#[derive(Debug, Clone)]
pub struct GroupRanking {
    pub family_id: FamilyId,
    pub family_size: usize,
    /// Family members with an OMA fingerprint
    pub fingerprinted: usize,
    /// Distinct fingerprints seen in the family
    pub distinct_groups: usize,
    /// Groups passing `min_count`, ranked
    pub retained: Vec<GroupRecord>,
}

/// Full result of one reconciliation run
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub family_id: FamilyId,
    pub family: FamilyMembers,
    pub fingerprinted: usize,
    pub distinct_groups: usize,
    /// Retained groups, ranked, with member sets where resolution succeeded
    pub groups: Vec<GroupRecord>,
    pub discrepancy: Discrepancy,
}

/// Runs the reconciliation stages against a set of collaborators
pub struct Reconciler<'a> {
    source: &'a dyn FamilySource,
    fingerprints: &'a dyn FingerprintLookup,
    groups: &'a dyn GroupMemberLookup,
    config: ReconcileConfig,
}

impl<'a> Reconciler<'a> {
    #[must_use]
    pub fn new(
        source: &'a dyn FamilySource,
        fingerprints: &'a dyn FingerprintLookup,
        groups: &'a dyn GroupMemberLookup,
        config: ReconcileConfig,
    ) -> Self {
        Self {
            source,
            fingerprints,
            groups,
            config,
        }
    }

    /// Identifier source -> fingerprints -> aggregation -> discrepancy.
    ///
    /// # Errors
    ///
    /// Only identifier-source failures are terminal. Later failures degrade the
    /// result and are recorded in `diagnostics`.
    pub async fn run(
        &self,
        family_id: &FamilyId,
        diagnostics: &mut Diagnostics,
    ) -> Result<Reconciliation, SourceError> {
        let (family, index, fingerprinted) = self.index_family(family_id, diagnostics).await?;

        let retained = index.retain(self.config.min_count);
        info!(
            "{} of {} OMA groups have >= {} family members",
            retained.len(),
            index.len(),
            self.config.min_count
        );

        let groups = resolve_group_members(
            self.groups,
            retained,
            self.config.concurrency,
            &self.config.retry,
            diagnostics,
        )
        .await;

        let discrepancy = find_candidates(&family, &groups);
        info!(
            "{} OMA-only candidates ({} ambiguous)",
            discrepancy.candidates.len(),
            discrepancy.ambiguous.len()
        );

        Ok(Reconciliation {
            family_id: family_id.clone(),
            family,
            fingerprinted,
            distinct_groups: index.len(),
            groups,
            discrepancy,
        })
    }

    /// Identifier source -> fingerprints -> aggregation, without member queries.
    ///
    /// # Errors
    ///
    /// Returns the identifier source's error.
    pub async fn rank_only(
        &self,
        family_id: &FamilyId,
        diagnostics: &mut Diagnostics,
    ) -> Result<GroupRanking, SourceError> {
        let (family, index, fingerprinted) = self.index_family(family_id, diagnostics).await?;

        Ok(GroupRanking {
            family_id: family_id.clone(),
            family_size: family.len(),
            fingerprinted,
            distinct_groups: index.len(),
            retained: index.retain(self.config.min_count),
        })
    }

    async fn index_family(
        &self,
        family_id: &FamilyId,
        diagnostics: &mut Diagnostics,
    ) -> Result<(FamilyMembers, GroupIndex, usize), SourceError> {
        let family = load_family(self.source, family_id).await?;

        let fingerprints = FingerprintResolver::new(self.fingerprints, &self.config)
            .resolve(&family, diagnostics)
            .await;

        let index = GroupIndex::build(&family, &fingerprints);
        Ok((family, index, fingerprints.assigned_count()))
    }
}
