use std::collections::BTreeMap;

use crate::core::group::{FamilyMembers, FingerprintMap, GroupRecord};
use crate::core::types::Fingerprint;

/// Per-fingerprint occurrence counts within the family
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupIndex {
    groups: BTreeMap<Fingerprint, usize>,
}

impl GroupIndex {
    /// Index the fingerprint map, restricted to the family.
    ///
    /// Proteins without a fingerprint, and proteins outside the family, never
    /// contribute to any count.
    #[must_use]
    pub fn build(family: &FamilyMembers, fingerprints: &FingerprintMap) -> Self {
        let mut groups: BTreeMap<Fingerprint, usize> = BTreeMap::new();
        for (id, fingerprint) in fingerprints.assigned() {
            if family.contains(id) {
                *groups.entry(fingerprint.clone()).or_default() += 1;
            }
        }
        Self { groups }
    }

    /// Number of distinct fingerprints seen in the family
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Family members carrying `fingerprint`
    #[must_use]
    pub fn occurrence_count(&self, fingerprint: &Fingerprint) -> usize {
        self.groups.get(fingerprint).copied().unwrap_or(0)
    }

    /// Every group, by descending occurrence count then fingerprint
    #[must_use]
    pub fn ranked(&self) -> Vec<GroupRecord> {
        let mut records: Vec<GroupRecord> = self
            .groups
            .iter()
            .map(|(fingerprint, count)| GroupRecord::new(fingerprint.clone(), *count))
            .collect();

        records.sort_by(|a, b| {
            b.occurrence_count
                .cmp(&a.occurrence_count)
                .then_with(|| a.fingerprint.cmp(&b.fingerprint))
        });
        records
    }

    /// Groups with at least `min_count` family occurrences, ranked
    #[must_use]
    pub fn retain(&self, min_count: usize) -> Vec<GroupRecord> {
        self.ranked()
            .into_iter()
            .filter(|record| record.occurrence_count >= min_count)
            .collect()
    }
}
