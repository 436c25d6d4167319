//! Pfam `scores` file parsing.
//!
//! A family build directory holds a `scores` file listing every sequence region
//! hit by the family HMM, one per line:
//!
//! ```text
//! 27.3  A0A0D2W0K3.1/14-195  14-195  1.2e-05
//! ```
//!
//! Only genuine hits are kept. A row is dropped when it
//!
//! - follows an inclusion-threshold marker line (`---- inclusion threshold ----`), or
//! - carries a trailing significance flag other than `!` (e.g. `?`), or
//! - names something that does not reduce to a UniProt accession.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::types::ProteinId;
use crate::parsing::{decode_text, ParseError};
use crate::utils::validation::normalize_accession;

/// Marker HMMER writes between reported and included hits
const INCLUSION_MARKER: &str = "inclusion threshold";

/// Flag marking a significant hit when a flag column is present
const SIGNIFICANT_FLAG: &str = "!";

/// Genuine hits extracted from a scores file
#[derive(Debug, Clone, Default)]
pub struct ScoreHits {
    /// Distinct accessions of genuine hits
    pub accessions: BTreeSet<ProteinId>,
    /// Rows below the inclusion threshold or flagged insignificant
    pub insignificant: usize,
    /// Rows whose sequence name is not a UniProt accession
    pub unrecognized: usize,
}

/// Resolve a family directory or file path to the scores file it denotes.
///
/// A directory resolves to `<dir>/scores`, falling back to `<dir>/scores.gz`.
#[must_use]
pub fn resolve_scores_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        let plain = path.join("scores");
        let gzipped = path.join("scores.gz");
        if !plain.exists() && gzipped.exists() {
            return gzipped;
        }
        return plain;
    }
    path.to_path_buf()
}

/// Parse a scores file, or the scores file inside a family directory.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, `ParseError::InvalidFormat`
/// if a data row has fewer than two fields, or `ParseError::NoHits` if no genuine
/// hits remain after filtering.
pub fn parse_scores_path(path: &Path) -> Result<ScoreHits, ParseError> {
    let scores_path = resolve_scores_path(path);
    let bytes = std::fs::read(&scores_path)?;
    let text = decode_text(&bytes)?;

    let hits = parse_scores_text(&text)?;
    if hits.accessions.is_empty() {
        return Err(ParseError::NoHits(scores_path.display().to_string()));
    }
    Ok(hits)
}

/// Parse scores text into the set of genuine hit accessions.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a data row has fewer than two fields.
pub fn parse_scores_text(text: &str) -> Result<ScoreHits, ParseError> {
    let mut hits = ScoreHits::default();
    let mut below_threshold = false;

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.to_lowercase().contains(INCLUSION_MARKER) {
            below_threshold = true;
            continue;
        }

        if line.starts_with('#') {
            continue;
        }

        // Line numbers in errors are 1-based for user friendliness
        let line_num = i + 1;

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 2 {
            return Err(ParseError::InvalidFormat(format!(
                "Line {line_num} has fewer than 2 fields"
            )));
        }

        let flagged_insignificant = fields.get(4).is_some_and(|flag| *flag != SIGNIFICANT_FLAG);
        if below_threshold || flagged_insignificant {
            hits.insignificant += 1;
            continue;
        }

        match normalize_accession(fields[1]) {
            Some(accession) => {
                hits.accessions.insert(accession);
            }
            None => {
                debug!(
                    "Skipping unrecognized sequence name on line {line_num}: {}",
                    fields[1]
                );
                hits.unrecognized += 1;
            }
        }
    }

    Ok(hits)
}
