//! Centralized validation and normalization of identifiers.

use crate::core::types::{FamilyId, Fingerprint, ProteinId};

/// Largest accession batch sent in one UniProt request
pub const MAX_BATCH_SIZE: usize = 500;

/// Upper bound on concurrent requests against UniProt
pub const MAX_CONCURRENCY: usize = 16;

/// Length of an OMA group fingerprint
pub const FINGERPRINT_LENGTH: usize = 7;

/// Validate a Pfam family accession (`PF` followed by five digits).
///
/// # Examples
///
/// ```
/// use pfam_oma::utils::validation::is_valid_pfam_id;
///
/// assert!(is_valid_pfam_id("PF10181"));
/// assert!(!is_valid_pfam_id("PF1018"));
/// assert!(!is_valid_pfam_id("pf10181"));
/// ```
#[must_use]
pub fn is_valid_pfam_id(s: &str) -> bool {
    s.len() == 7 && s.starts_with("PF") && s[2..].chars().all(|c| c.is_ascii_digit())
}

/// Normalize a Pfam accession, dropping a version suffix (`PF10181.12` -> `PF10181`).
/// Returns None if the result is not a valid Pfam accession.
#[must_use]
pub fn normalize_family_id(s: &str) -> Option<FamilyId> {
    let trimmed = s.trim();
    let base = trimmed.split('.').next().unwrap_or(trimmed);
    if is_valid_pfam_id(base) {
        Some(FamilyId::new(base))
    } else {
        None
    }
}

/// Validate a UniProt accession: 6-10 uppercase letters or digits.
///
/// # Examples
///
/// ```
/// use pfam_oma::utils::validation::is_valid_accession;
///
/// assert!(is_valid_accession("P69905"));
/// assert!(is_valid_accession("A0A023GPI8"));
/// assert!(!is_valid_accession("P6990"));
/// assert!(!is_valid_accession("p69905"));
/// ```
#[must_use]
pub fn is_valid_accession(s: &str) -> bool {
    (6..=10).contains(&s.len())
        && s.chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

/// Normalize a sequence name from an alignment or scores file to a bare accession.
///
/// Strips a region suffix (`/12-150`) and a version suffix (`.2`):
/// `A0A1B2C3D4.2/12-150` -> `A0A1B2C3D4`. Returns None for names that do not
/// reduce to a valid accession.
#[must_use]
pub fn normalize_accession(name: &str) -> Option<ProteinId> {
    let name = name.trim();
    let without_region = name.split('/').next().unwrap_or(name);
    let base = without_region.split('.').next().unwrap_or(without_region);
    if is_valid_accession(base) {
        Some(ProteinId::new(base))
    } else {
        None
    }
}

/// Validate an OMA fingerprint: exactly seven uppercase ASCII letters
#[must_use]
pub fn is_valid_fingerprint(s: &str) -> bool {
    s.len() == FINGERPRINT_LENGTH && s.chars().all(|c| c.is_ascii_uppercase())
}

/// Extract the first valid fingerprint from a UniProt OMA cross-reference cell.
///
/// The cell is a `;`-separated list (`NKRTAWQ;`). Empty or malformed cells
/// yield None.
#[must_use]
pub fn first_fingerprint(cell: &str) -> Option<Fingerprint> {
    cell.split(|c: char| c == ';' || c.is_whitespace())
        .map(str::trim)
        .find(|token| is_valid_fingerprint(token))
        .map(Fingerprint::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_family_id() {
        assert_eq!(
            normalize_family_id("PF10181.12"),
            Some(FamilyId::new("PF10181"))
        );
        assert_eq!(normalize_family_id(" PF00001 "), Some(FamilyId::new("PF00001")));
        assert_eq!(normalize_family_id("PF25203_C"), None);
        assert_eq!(normalize_family_id("CL0023"), None);
    }

    #[test]
    fn test_normalize_accession() {
        assert_eq!(
            normalize_accession("A0A1B2C3D4.2/12-150"),
            Some(ProteinId::new("A0A1B2C3D4"))
        );
        assert_eq!(normalize_accession("P69905"), Some(ProteinId::new("P69905")));
        assert_eq!(normalize_accession("HBA_HUMAN/1-141"), None);
        assert_eq!(normalize_accession(""), None);
    }

    #[test]
    fn test_is_valid_fingerprint() {
        assert!(is_valid_fingerprint("NKRTAWQ"));
        assert!(!is_valid_fingerprint("NKRTAW"));
        assert!(!is_valid_fingerprint("NKRTAW1"));
        assert!(!is_valid_fingerprint("nkrtawq"));
    }

    #[test]
    fn test_first_fingerprint() {
        assert_eq!(first_fingerprint("NKRTAWQ;"), Some(Fingerprint::new("NKRTAWQ")));
        assert_eq!(
            first_fingerprint("bad; NKRTAWQ; AAAAAAA;"),
            Some(Fingerprint::new("NKRTAWQ"))
        );
        assert_eq!(first_fingerprint(""), None);
        assert_eq!(first_fingerprint(";"), None);
    }
}
