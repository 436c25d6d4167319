use std::collections::HashMap;

use crate::parsing::ParseError;

/// A parsed tab-separated table with a header row, as returned by UniProt
#[derive(Debug, Clone, Default)]
pub struct TsvTable {
    columns: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

impl TsvTable {
    /// Index of a column by its header label (case-insensitive)
    #[must_use]
    pub fn column(&self, label: &str) -> Option<usize> {
        self.columns.get(&label.to_lowercase()).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over rows as cell slices
    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Cell value for a row and column; missing trailing cells read as empty
    #[must_use]
    pub fn cell<'a>(row: &'a [String], index: Option<usize>) -> &'a str {
        index
            .and_then(|i| row.get(i))
            .map_or("", String::as_str)
    }
}

/// Parse UniProt TSV text: a header line followed by data lines.
///
/// Blank lines are skipped. An empty body (no header at all) parses to an
/// empty table, which is what UniProt returns for queries with no results.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if the header lacks the required column.
pub fn parse_tsv_text(text: &str, required_column: &str) -> Result<TsvTable, ParseError> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let Some(header) = lines.next() else {
        return Ok(TsvTable::default());
    };

    let columns: HashMap<String, usize> = header
        .split('\t')
        .enumerate()
        .map(|(i, label)| (label.trim().to_lowercase(), i))
        .collect();

    if !columns.contains_key(&required_column.to_lowercase()) {
        return Err(ParseError::InvalidFormat(format!(
            "TSV header is missing column '{required_column}': '{header}'"
        )));
    }

    let rows = lines
        .map(|line| line.split('\t').map(|cell| cell.trim().to_string()).collect())
        .collect();

    Ok(TsvTable { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tsv_text() {
        let tsv = "Entry\tOMA\nP12345\tNKRTAWQ;\nQ67890\t\n";

        let table = parse_tsv_text(tsv, "Entry").unwrap();
        assert_eq!(table.len(), 2);

        let entry = table.column("entry");
        let oma = table.column("OMA");
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(TsvTable::cell(rows[0], entry), "P12345");
        assert_eq!(TsvTable::cell(rows[0], oma), "NKRTAWQ;");
        assert_eq!(TsvTable::cell(rows[1], oma), "");
    }

    #[test]
    fn test_parse_tsv_empty_body() {
        let table = parse_tsv_text("", "Entry").unwrap();
        assert!(table.is_empty());

        let table = parse_tsv_text("Entry\n", "Entry").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_parse_tsv_missing_column() {
        let result = parse_tsv_text("Accession\tOMA\nP12345\t\n", "Entry");
        assert!(matches!(result, Err(ParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_tsv_short_row() {
        let table = parse_tsv_text("Entry\tOrganism\nP12345\n", "Entry").unwrap();
        let row = table.rows().next().unwrap();
        assert_eq!(TsvTable::cell(row, table.column("Organism")), "");
    }
}
