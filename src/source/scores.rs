use std::collections::HashSet;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::core::types::{FamilyId, ProteinId};
use crate::parsing::desc::family_id_for_dir;
use crate::parsing::scores::parse_scores_path;
use crate::parsing::ParseError;
use crate::source::{FamilySource, SourceError};

/// Family membership from the genuine hits of a local Pfam `scores` file
pub struct ScoresFileSource {
    path: PathBuf,
}

impl ScoresFileSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse the membership file into the set of hit accessions.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Unavailable` if the file is missing or malformed.
    /// A file with no genuine hits yields an empty set.
    pub fn fetch_member_file(&self) -> Result<HashSet<ProteinId>, SourceError> {
        match parse_scores_path(&self.path) {
            Ok(hits) => {
                debug!(
                    "{}: {} hits, {} insignificant rows, {} unrecognized names",
                    self.path.display(),
                    hits.accessions.len(),
                    hits.insignificant,
                    hits.unrecognized
                );
                Ok(hits.accessions.into_iter().collect())
            }
            Err(ParseError::NoHits(path)) => {
                debug!("{path}: no genuine hits");
                Ok(HashSet::new())
            }
            Err(e) => Err(SourceError::Unavailable(format!(
                "{}: {e}",
                self.path.display()
            ))),
        }
    }

    fn check_family(&self, family: &FamilyId) {
        if !self.path.is_dir() {
            return;
        }
        if let Some(found) = family_id_for_dir(&self.path) {
            if &found != family {
                warn!(
                    "{} looks like family {found}, not {family}",
                    self.path.display()
                );
            }
        }
    }
}

#[async_trait]
impl FamilySource for ScoresFileSource {
    async fn supply(&self, family: &FamilyId) -> Result<HashSet<ProteinId>, SourceError> {
        self.check_family(family);
        self.fetch_member_file()
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::load_family;

    #[tokio::test]
    async fn test_supply_from_family_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("scores"),
            "30.0 P12345.1/1-100 1-100 1e-08\n29.0 Q67890.3/5-90 5-90 1e-07\n",
        )
        .unwrap();

        let source = ScoresFileSource::new(dir.path());
        let members = source.supply(&FamilyId::new("PF10181")).await.unwrap();
        assert_eq!(members.len(), 2);
        assert!(members.contains(&ProteinId::new("Q67890")));
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let source = ScoresFileSource::new(dir.path().join("missing"));
        let result = source.supply(&FamilyId::new("PF10181")).await;
        assert!(matches!(result, Err(SourceError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_malformed_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores");
        std::fs::write(&path, "30.0\n").unwrap();

        let result = ScoresFileSource::new(&path)
            .supply(&FamilyId::new("PF10181"))
            .await;
        assert!(matches!(result, Err(SourceError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_no_hits_is_empty_family() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores");
        std::fs::write(&path, "# only a comment\n").unwrap();

        let source = ScoresFileSource::new(&path);
        let result = load_family(&source, &FamilyId::new("PF10181")).await;
        assert!(matches!(result, Err(SourceError::EmptyFamily(_))));
    }
}
