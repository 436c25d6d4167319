use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::core::types::{Fingerprint, ProteinId};

/// Read-only snapshot of the proteins belonging to the target family
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FamilyMembers {
    members: BTreeSet<ProteinId>,
}

impl FamilyMembers {
    #[must_use]
    pub fn new(members: impl IntoIterator<Item = ProteinId>) -> Self {
        Self {
            members: members.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn contains(&self, id: &ProteinId) -> bool {
        self.members.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in accession order
    pub fn iter(&self) -> impl Iterator<Item = &ProteinId> {
        self.members.iter()
    }
}

impl From<HashSet<ProteinId>> for FamilyMembers {
    fn from(set: HashSet<ProteinId>) -> Self {
        Self::new(set)
    }
}

/// Protein -> OMA fingerprint assignment produced by the fingerprint resolver.
///
/// Every resolved protein has an entry; `None` means "no fingerprint", either
/// because UniProt has no OMA cross-reference or because its batch failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FingerprintMap {
    entries: BTreeMap<ProteinId, Option<Fingerprint>>,
}

impl FingerprintMap {
    #[must_use]
    pub fn new(entries: BTreeMap<ProteinId, Option<Fingerprint>>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn get(&self, id: &ProteinId) -> Option<&Fingerprint> {
        self.entries.get(id).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of proteins that carry a fingerprint
    #[must_use]
    pub fn assigned_count(&self) -> usize {
        self.entries.values().filter(|fp| fp.is_some()).count()
    }

    /// Iterate over (protein, fingerprint) pairs, skipping unassigned proteins
    pub fn assigned(&self) -> impl Iterator<Item = (&ProteinId, &Fingerprint)> {
        self.entries
            .iter()
            .filter_map(|(id, fp)| fp.as_ref().map(|fp| (id, fp)))
    }
}

impl FromIterator<(ProteinId, Option<Fingerprint>)> for FingerprintMap {
    fn from_iter<T: IntoIterator<Item = (ProteinId, Option<Fingerprint>)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// One OMA group seen in the family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub fingerprint: Fingerprint,

    /// Number of family members assigned to this fingerprint
    pub occurrence_count: usize,

    /// Every UniProt protein carrying this fingerprint, family or not.
    /// `None` until resolved, and stays `None` if resolution failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<BTreeSet<ProteinId>>,
}

impl GroupRecord {
    #[must_use]
    pub fn new(fingerprint: Fingerprint, occurrence_count: usize) -> Self {
        Self {
            fingerprint,
            occurrence_count,
            members: None,
        }
    }

    #[must_use]
    pub fn with_members(mut self, members: impl IntoIterator<Item = ProteinId>) -> Self {
        self.members = Some(members.into_iter().collect());
        self
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.members.is_some()
    }

    #[must_use]
    pub fn total_members(&self) -> Option<usize> {
        self.members.as_ref().map(BTreeSet::len)
    }
}

/// A protein OMA links to exactly one retained group but the family omits
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Candidate {
    pub id: ProteinId,
    pub fingerprint: Fingerprint,
}

/// A protein outside the family linked to two or more retained groups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbiguousCandidate {
    pub id: ProteinId,
    /// Retained fingerprints it belongs to, in lexical order
    pub fingerprints: Vec<Fingerprint>,
}
