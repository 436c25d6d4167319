//! Report model and renderers.
//!
//! A [`ReportModel`] is an owned snapshot of one run: it holds no references
//! into the reconciliation state and is never mutated after it is built.
//! Rendering is a pure function of the model:
//!
//! - [`text::render`]: the human-readable report
//! - [`json::render`]: the model serialized with serde
//! - [`tsv::render`]: one row per candidate
//!
//! Descriptive metadata is gathered beforehand by [`enrich::enrich`]; anything
//! it could not fetch is rendered as unavailable.

use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::core::group::AmbiguousCandidate;
use crate::core::protein::ProteinAnnotation;
use crate::core::types::{FamilyId, Fingerprint, Kingdom, ProteinId};
use crate::diagnostics::Caveat;
use crate::reconcile::pipeline::Reconciliation;
use crate::report::enrich::Annotations;

pub mod enrich;
pub mod json;
pub mod text;
pub mod tsv;

/// How candidates are grouped in the text report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Under the retained group that links them to the family
    #[default]
    ByGroup,
    /// Under the kingdom derived from their lineage
    ByKingdom,
}

/// One retained group as reported
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    pub fingerprint: Fingerprint,
    pub occurrence_count: usize,
    /// All UniProt proteins in the group; `None` if the group was skipped
    pub total_members: Option<usize>,
    /// OMA-only candidates it contributed; `None` if the group was skipped
    pub candidates: Option<usize>,
}

impl GroupSummary {
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.total_members.is_some()
    }
}

/// A candidate with whatever metadata could be fetched
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateEntry {
    pub id: ProteinId,
    pub fingerprint: Fingerprint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<ProteinAnnotation>,
}

impl CandidateEntry {
    #[must_use]
    pub fn kingdom(&self) -> Kingdom {
        self.annotation
            .as_ref()
            .map_or(Kingdom::Unknown, ProteinAnnotation::kingdom)
    }
}

/// An ambiguous near-miss with whatever metadata could be fetched
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmbiguousEntry {
    pub id: ProteinId,
    pub fingerprints: Vec<Fingerprint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<ProteinAnnotation>,
}

/// Everything a renderer needs, owned
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportModel {
    pub family_id: FamilyId,
    pub min_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub layout: Layout,
    pub family_size: usize,
    pub fingerprinted: usize,
    pub distinct_groups: usize,
    /// Retained groups, ranked
    pub groups: Vec<GroupSummary>,
    /// Candidates, by accession
    pub candidates: Vec<CandidateEntry>,
    pub ambiguous: Vec<AmbiguousEntry>,
    pub caveats: Vec<Caveat>,
}

impl ReportModel {
    /// Snapshot a finished run.
    #[must_use]
    pub fn build(
        reconciliation: &Reconciliation,
        annotations: &Annotations,
        caveats: &[Caveat],
        min_count: usize,
    ) -> Self {
        let discrepancy = &reconciliation.discrepancy;

        let groups = reconciliation
            .groups
            .iter()
            .map(|group| GroupSummary {
                fingerprint: group.fingerprint.clone(),
                occurrence_count: group.occurrence_count,
                total_members: group.total_members(),
                candidates: group
                    .is_resolved()
                    .then(|| discrepancy.candidates_for(&group.fingerprint)),
            })
            .collect();

        let candidates = discrepancy
            .candidates
            .iter()
            .map(|c| CandidateEntry {
                id: c.id.clone(),
                fingerprint: c.fingerprint.clone(),
                annotation: annotations.get(&c.id).cloned(),
            })
            .collect();

        let ambiguous = discrepancy
            .ambiguous
            .iter()
            .map(|AmbiguousCandidate { id, fingerprints }| AmbiguousEntry {
                id: id.clone(),
                fingerprints: fingerprints.clone(),
                annotation: annotations.get(id).cloned(),
            })
            .collect();

        Self {
            family_id: reconciliation.family_id.clone(),
            min_count,
            date: None,
            layout: Layout::default(),
            family_size: reconciliation.family.len(),
            fingerprinted: reconciliation.fingerprinted,
            distinct_groups: reconciliation.distinct_groups,
            groups,
            candidates,
            ambiguous,
            caveats: caveats.to_vec(),
        }
    }

    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Retained groups whose member sets could not be fetched
    pub fn skipped_groups(&self) -> impl Iterator<Item = &GroupSummary> {
        self.groups.iter().filter(|g| !g.is_resolved())
    }
}

/// Write the rendered report atomically.
///
/// The contents go to a temporary file next to `path`, which is then renamed
/// into place; `path` never holds a partial report.
///
/// # Errors
///
/// Returns an I/O error if the temporary file cannot be created, written or persisted.
pub fn write_report(path: &Path, contents: &str) -> std::io::Result<()> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::group::{Candidate, FamilyMembers, GroupRecord};
    use crate::core::types::ReviewStatus;
    use crate::reconcile::discrepancy::find_candidates;
    use crate::test_support::{fp, ids, pid};

    /// A small finished run: G1 resolved with candidate P6 and ambiguous P5,
    /// G2 resolved with candidate P7 (no metadata), G3 skipped.
    pub(crate) fn sample_model() -> ReportModel {
        let family = FamilyMembers::new(ids(&["P1", "P2", "P3", "P4", "P8", "P9", "P10"]));
        let groups = vec![
            GroupRecord::new(fp("GGGGGGA"), 3).with_members(ids(&["P1", "P2", "P3", "P5", "P6"])),
            GroupRecord::new(fp("GGGGGGB"), 3).with_members(ids(&["P5", "P7", "P8", "P9", "P10"])),
            GroupRecord::new(fp("GGGGGGC"), 3),
        ];
        let discrepancy = find_candidates(&family, &groups);
        let reconciliation = Reconciliation {
            family_id: FamilyId::new("PF10181"),
            family,
            fingerprinted: 6,
            distinct_groups: 4,
            groups,
            discrepancy,
        };

        let mut annotations = Annotations::new();
        annotations.insert(
            pid("P6"),
            ProteinAnnotation {
                entry_name: Some("KAD1_YEAST".to_string()),
                protein_name: Some("Adenylate kinase".to_string()),
                organism: Some("Saccharomyces cerevisiae".to_string()),
                lineage: vec!["Eukaryota".to_string(), "Fungi".to_string()],
                status: Some(ReviewStatus::SwissProt),
            },
        );

        let caveats = vec![Caveat::ResolutionIncomplete {
            fingerprint: fp("GGGGGGC"),
            attempts: 3,
            error: "HTTP 503".to_string(),
        }];

        ReportModel::build(&reconciliation, &annotations, &caveats, 3)
            .with_date(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap())
    }

    #[test]
    fn test_build() {
        let model = sample_model();

        assert_eq!(model.family_size, 7);
        assert_eq!(model.groups.len(), 3);
        assert_eq!(model.groups[0].total_members, Some(5));
        assert_eq!(model.groups[0].candidates, Some(1));
        assert_eq!(model.groups[2].candidates, None);
        assert_eq!(
            model.skipped_groups().map(|g| g.fingerprint.as_str()).collect::<Vec<_>>(),
            vec!["GGGGGGC"]
        );

        let candidates: Vec<Candidate> = model
            .candidates
            .iter()
            .map(|c| Candidate {
                id: c.id.clone(),
                fingerprint: c.fingerprint.clone(),
            })
            .collect();
        assert_eq!(
            candidates,
            vec![
                Candidate { id: pid("P6"), fingerprint: fp("GGGGGGA") },
                Candidate { id: pid("P7"), fingerprint: fp("GGGGGGB") },
            ]
        );
        assert_eq!(model.candidates[0].kingdom(), Kingdom::Fungi);
        assert_eq!(model.candidates[1].kingdom(), Kingdom::Unknown);
        assert_eq!(model.ambiguous[0].id, pid("P5"));
    }

    #[test]
    fn test_write_report_replaces_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");

        write_report(&path, "first\n").unwrap();
        write_report(&path, "second\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second\n");
        // Only the report itself remains in the directory
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_report_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.txt");
        assert!(write_report(&path, "x").is_err());
        assert!(!path.exists());
    }
}
