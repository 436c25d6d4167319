//! In-memory collaborators for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::core::protein::ProteinAnnotation;
use crate::core::types::{FamilyId, Fingerprint, ProteinId};
use crate::remote::{DescriptionLookup, FetchError, FingerprintLookup, GroupMemberLookup};
use crate::source::{FamilySource, SourceError};

pub fn pid(s: &str) -> ProteinId {
    ProteinId::new(s)
}

pub fn fp(s: &str) -> Fingerprint {
    Fingerprint::new(s)
}

pub fn ids(items: &[&str]) -> Vec<ProteinId> {
    items.iter().map(|s| pid(s)).collect()
}

fn unavailable() -> FetchError {
    FetchError::Status {
        status: 503,
        url: "http://fake.test".to_string(),
    }
}

/// A tiny UniProt: family membership, OMA cross-references, group member sets
/// and annotations, with switchable failures.
#[derive(Default)]
pub struct FakeUniProt {
    pub family: HashSet<ProteinId>,
    pub fingerprints: HashMap<ProteinId, Fingerprint>,
    pub groups: HashMap<Fingerprint, HashSet<ProteinId>>,
    pub annotations: HashMap<ProteinId, ProteinAnnotation>,
    /// Any fingerprint batch containing one of these fails every attempt
    pub poisoned: HashSet<ProteinId>,
    /// Member queries for these groups fail every attempt
    pub broken_groups: HashSet<Fingerprint>,
    pub descriptions_down: bool,
    pub source_down: bool,
    pub fingerprint_calls: AtomicUsize,
    pub group_calls: AtomicUsize,
}

impl FakeUniProt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn family(mut self, members: &[&str]) -> Self {
        self.family.extend(ids(members));
        self
    }

    /// Give each protein the fingerprint `group` and add it to that group's members
    pub fn assign(mut self, group: &str, members: &[&str]) -> Self {
        for id in ids(members) {
            self.fingerprints.insert(id.clone(), fp(group));
            self.groups.entry(fp(group)).or_default().insert(id);
        }
        self
    }

    /// Add proteins to a group's member set without touching their own fingerprint
    pub fn link(mut self, group: &str, members: &[&str]) -> Self {
        self.groups.entry(fp(group)).or_default().extend(ids(members));
        self
    }

    pub fn annotate(mut self, id: &str, annotation: ProteinAnnotation) -> Self {
        self.annotations.insert(pid(id), annotation);
        self
    }
}

#[async_trait]
impl FamilySource for FakeUniProt {
    async fn supply(&self, _family: &FamilyId) -> Result<HashSet<ProteinId>, SourceError> {
        if self.source_down {
            return Err(SourceError::Unavailable("fake source down".to_string()));
        }
        Ok(self.family.clone())
    }

    fn describe(&self) -> String {
        "fake".to_string()
    }
}

#[async_trait]
impl FingerprintLookup for FakeUniProt {
    async fn bulk_resolve_fingerprints(
        &self,
        ids: &[ProteinId],
    ) -> Result<HashMap<ProteinId, Option<Fingerprint>>, FetchError> {
        self.fingerprint_calls.fetch_add(1, Ordering::SeqCst);
        if ids.iter().any(|id| self.poisoned.contains(id)) {
            return Err(unavailable());
        }
        Ok(ids
            .iter()
            .map(|id| (id.clone(), self.fingerprints.get(id).cloned()))
            .collect())
    }
}

#[async_trait]
impl GroupMemberLookup for FakeUniProt {
    async fn fetch_group_members(
        &self,
        fingerprint: &Fingerprint,
    ) -> Result<HashSet<ProteinId>, FetchError> {
        self.group_calls.fetch_add(1, Ordering::SeqCst);
        if self.broken_groups.contains(fingerprint) {
            return Err(unavailable());
        }
        Ok(self.groups.get(fingerprint).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl DescriptionLookup for FakeUniProt {
    async fn fetch_description(
        &self,
        id: &ProteinId,
    ) -> Result<Option<ProteinAnnotation>, FetchError> {
        if self.descriptions_down {
            return Err(unavailable());
        }
        Ok(self.annotations.get(id).cloned())
    }
}
