use std::path::Path;

use crate::core::types::FamilyId;
use crate::parsing::ParseError;
use crate::utils::validation::normalize_family_id;

/// Read the family accession from a Pfam `DESC` file (`AC   PF10181.12`)
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read.
pub fn parse_desc_file(path: &Path) -> Result<Option<FamilyId>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_desc_text(&content))
}

/// Extract the family accession from `DESC` text, if it has a valid `AC` line
#[must_use]
pub fn parse_desc_text(text: &str) -> Option<FamilyId> {
    text.lines()
        .filter_map(|line| line.strip_prefix("AC"))
        .filter_map(|rest| rest.split_whitespace().next())
        .find_map(|value| normalize_family_id(value.trim_end_matches(';')))
}

/// Infer the family accession of a family directory.
///
/// The directory name wins when it is itself an accession (`.../PF10181`);
/// otherwise the `DESC` file inside it is consulted.
#[must_use]
pub fn family_id_for_dir(dir: &Path) -> Option<FamilyId> {
    let from_name = dir
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(normalize_family_id);

    from_name.or_else(|| parse_desc_file(&dir.join("DESC")).ok().flatten())
}
