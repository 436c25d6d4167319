use crate::report::{CandidateEntry, ReportModel};

const HEADER: &str = "accession\tfingerprint\tentry_name\torganism\tkingdom\tstatus\tdescription";

/// Render one tab-separated row per candidate; empty cells mean unavailable.
///
/// Caveats precede the header as `# caveat: ...` comment lines.
#[must_use]
pub fn render(model: &ReportModel) -> String {
    let mut out = String::new();
    for caveat in &model.caveats {
        out.push_str("# caveat: ");
        out.push_str(&caveat.to_string().replace('\n', " "));
        out.push('\n');
    }
    out.push_str(HEADER);
    out.push('\n');
    for candidate in &model.candidates {
        out.push_str(&row(candidate));
        out.push('\n');
    }
    out
}

fn row(candidate: &CandidateEntry) -> String {
    let annotation = candidate.annotation.as_ref();
    let clean = |s: &str| s.replace(['\t', '\n'], " ");

    let entry_name = annotation
        .and_then(|a| a.entry_name.as_deref())
        .map(clean)
        .unwrap_or_default();
    let organism = annotation
        .and_then(|a| a.organism.as_deref())
        .map(clean)
        .unwrap_or_default();
    let status = annotation
        .and_then(|a| a.status)
        .map(|s| s.to_string())
        .unwrap_or_default();
    let description = annotation
        .and_then(|a| a.description())
        .map(clean)
        .unwrap_or_default();

    format!(
        "{}\t{}\t{entry_name}\t{organism}\t{}\t{status}\t{description}",
        candidate.id,
        candidate.fingerprint,
        candidate.kingdom()
    )
}
