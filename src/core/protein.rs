use serde::{Deserialize, Serialize};

use crate::core::types::{Kingdom, ReviewStatus};

/// Descriptive metadata for one protein, as reported by UniProt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProteinAnnotation {
    /// UniProtKB entry name (e.g. `KAD1_HUMAN`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_name: Option<String>,

    /// Recommended or submitted protein name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein_name: Option<String>,

    /// Scientific name of the source organism
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organism: Option<String>,

    /// Taxonomic lineage, root first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lineage: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReviewStatus>,
}

impl ProteinAnnotation {
    /// Best available free-text description: protein name, then entry name
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.protein_name
            .as_deref()
            .or(self.entry_name.as_deref())
            .filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn kingdom(&self) -> Kingdom {
        Kingdom::from_lineage(&self.lineage)
    }
}

/// Parse a UniProt TSV lineage cell.
///
/// UniProt renders lineages as `cellular organisms (no rank), Eukaryota (superkingdom), ...`.
/// Rank annotations in parentheses are dropped.
#[must_use]
pub fn parse_lineage(text: &str) -> Vec<String> {
    text.split(',')
        .map(|taxon| {
            let taxon = taxon.trim();
            match taxon.rfind(" (") {
                Some(idx) if taxon.ends_with(')') => taxon[..idx].trim(),
                _ => taxon,
            }
        })
        .filter(|taxon| !taxon.is_empty())
        .map(str::to_string)
        .collect()
}

/// Truncate a description for single-line display, appending `...` when cut
#[must_use]
pub fn truncate_description(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lineage_drops_ranks() {
        let lineage = parse_lineage(
            "cellular organisms (no rank), Eukaryota (superkingdom), Fungi (kingdom), Saccharomyces",
        );
        assert_eq!(
            lineage,
            vec!["cellular organisms", "Eukaryota", "Fungi", "Saccharomyces"]
        );
    }

    #[test]
    fn test_parse_lineage_empty() {
        assert!(parse_lineage("").is_empty());
        assert!(parse_lineage(" , ").is_empty());
    }

    #[test]
    fn test_description_fallbacks() {
        let mut annotation = ProteinAnnotation {
            entry_name: Some("KAD1_HUMAN".to_string()),
            ..Default::default()
        };
        assert_eq!(annotation.description(), Some("KAD1_HUMAN"));

        annotation.protein_name = Some("Adenylate kinase isoenzyme 1".to_string());
        assert_eq!(annotation.description(), Some("Adenylate kinase isoenzyme 1"));

        assert_eq!(ProteinAnnotation::default().description(), None);
    }

    #[test]
    fn test_truncate_description() {
        assert_eq!(truncate_description("short", 80), "short");
        let long = "x".repeat(85);
        let cut = truncate_description(&long, 80);
        assert_eq!(cut.len(), 83);
        assert!(cut.ends_with("..."));
    }
}
