use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use crate::core::protein::{truncate_description, ProteinAnnotation};
use crate::core::types::{Fingerprint, Kingdom, ProteinId};
use crate::diagnostics::Caveat;
use crate::report::{CandidateEntry, Layout, ReportModel};

/// Descriptions longer than this are cut in candidate lines
pub const MAX_DESCRIPTION_CHARS: usize = 80;

const UNAVAILABLE: &str = "unavailable";

/// Render the plain-text report
#[must_use]
pub fn render(model: &ReportModel) -> String {
    TextReport(model).to_string()
}

struct TextReport<'a>(&'a ReportModel);

impl Display for TextReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let model = self.0;
        let rule = "=".repeat(80);

        writeln!(f, "{rule}")?;
        writeln!(f, "Pfam/OMA orthologue reconciliation: {}", model.family_id)?;
        writeln!(f, "{rule}")?;
        if let Some(date) = model.date {
            writeln!(f, "Analysis date: {}", date.format("%Y-%m-%d"))?;
        }
        writeln!(f, "Minimum family members per OMA group: {}", model.min_count)?;

        write_summary(f, model)?;
        write_groups(f, model)?;
        match model.layout {
            Layout::ByGroup => write_candidates_by_group(f, model)?,
            Layout::ByKingdom => write_candidates_by_kingdom(f, model)?,
        }
        write_ambiguous(f, model)?;
        write_caveats(f, &model.caveats)?;

        writeln!(f)?;
        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "Candidates are proteins OMA places with family members but Pfam does not list."
        )?;
        writeln!(f, "They are leads for curation, not verified family members.")?;
        writeln!(f, "{rule}")
    }
}

fn section(f: &mut Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "{title}")?;
    writeln!(f, "{}", "-".repeat(50))
}

fn write_summary(f: &mut Formatter<'_>, model: &ReportModel) -> fmt::Result {
    section(f, "SUMMARY")?;
    writeln!(f, "Family: {}", model.family_id)?;
    writeln!(f, "Family size: {}", model.family_size)?;
    writeln!(f, "With OMA fingerprint: {}", model.fingerprinted)?;
    writeln!(f, "Distinct OMA groups: {}", model.distinct_groups)?;
    writeln!(f, "Retained OMA groups: {}", model.groups.len())?;
    writeln!(f, "Candidates: {}", model.candidates.len())?;
    writeln!(f, "Ambiguous near-misses: {}", model.ambiguous.len())?;
    writeln!(f, "Caveats: {}", model.caveats.len())
}

fn write_groups(f: &mut Formatter<'_>, model: &ReportModel) -> fmt::Result {
    section(f, "RETAINED OMA GROUPS")?;
    if model.groups.is_empty() {
        return writeln!(f, "  None.");
    }

    let width = model.groups.len().to_string().len();
    for (rank, group) in model.groups.iter().enumerate() {
        let detail = match (group.total_members, group.candidates) {
            (Some(total), Some(candidates)) => {
                format!("{total} total in OMA, {candidates} candidates")
            }
            _ => "members unavailable (skipped)".to_string(),
        };
        writeln!(
            f,
            "  {:>width$}. {}  {} in family, {detail}",
            rank + 1,
            group.fingerprint,
            group.occurrence_count,
        )?;
    }
    Ok(())
}

fn write_candidates_by_group(f: &mut Formatter<'_>, model: &ReportModel) -> fmt::Result {
    section(f, "CANDIDATES")?;
    if model.candidates.is_empty() {
        return writeln!(f, "  None found.");
    }

    for group in &model.groups {
        let members: Vec<&CandidateEntry> = model
            .candidates
            .iter()
            .filter(|c| c.fingerprint == group.fingerprint)
            .collect();
        if members.is_empty() {
            continue;
        }

        writeln!(f, "  {} ({})", group.fingerprint, members.len())?;
        for candidate in members {
            write_candidate(f, candidate)?;
        }
    }
    Ok(())
}

fn write_candidates_by_kingdom(f: &mut Formatter<'_>, model: &ReportModel) -> fmt::Result {
    section(f, "CANDIDATES BY KINGDOM")?;
    if model.candidates.is_empty() {
        return writeln!(f, "  None found.");
    }

    let mut by_kingdom: BTreeMap<Kingdom, Vec<&CandidateEntry>> = BTreeMap::new();
    for candidate in &model.candidates {
        by_kingdom
            .entry(candidate.kingdom())
            .or_default()
            .push(candidate);
    }

    for (kingdom, members) in by_kingdom {
        writeln!(f, "  {kingdom} ({})", members.len())?;
        for candidate in members {
            write_candidate(f, candidate)?;
        }
    }
    Ok(())
}

fn write_candidate(f: &mut Formatter<'_>, candidate: &CandidateEntry) -> fmt::Result {
    writeln!(
        f,
        "      {} | {} | {}",
        candidate.id,
        candidate.fingerprint,
        describe(candidate.annotation.as_ref())
    )
}

/// `organism | description [status]`, with unavailable fields marked
fn describe(annotation: Option<&ProteinAnnotation>) -> String {
    let Some(annotation) = annotation else {
        return format!("{UNAVAILABLE} | {UNAVAILABLE}");
    };

    let organism = annotation.organism.as_deref().unwrap_or(UNAVAILABLE);
    let description = annotation.description().map_or_else(
        || UNAVAILABLE.to_string(),
        |d| truncate_description(d, MAX_DESCRIPTION_CHARS),
    );

    match annotation.status {
        Some(status) => format!("{organism} | {description} [{status}]"),
        None => format!("{organism} | {description}"),
    }
}

fn write_ambiguous(f: &mut Formatter<'_>, model: &ReportModel) -> fmt::Result {
    section(f, "AMBIGUOUS NEAR-MISSES (linked to more than one retained group)")?;
    if model.ambiguous.is_empty() {
        return writeln!(f, "  None.");
    }

    for entry in &model.ambiguous {
        let fingerprints: Vec<&str> = entry.fingerprints.iter().map(Fingerprint::as_str).collect();
        writeln!(
            f,
            "      {} | {} | {}",
            entry.id,
            fingerprints.join(", "),
            describe(entry.annotation.as_ref())
        )?;
    }
    Ok(())
}

fn write_caveats(f: &mut Formatter<'_>, caveats: &[Caveat]) -> fmt::Result {
    section(f, "CAVEATS")?;
    if caveats.is_empty() {
        return writeln!(f, "  None.");
    }

    for caveat in caveats {
        writeln!(f, "  - {caveat}")?;
        match caveat {
            Caveat::BatchResolutionFailure { identifiers, .. }
            | Caveat::EnrichmentUnavailable { identifiers, .. } => {
                let ids: Vec<&str> = identifiers.iter().map(ProteinId::as_str).collect();
                writeln!(f, "    {}", ids.join(", "))?;
            }
            Caveat::ResolutionIncomplete { .. } => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::sample_model;

    #[test]
    fn test_render_sections() {
        let text = render(&sample_model());

        assert!(text.contains("Pfam/OMA orthologue reconciliation: PF10181"));
        assert!(text.contains("Analysis date: 2026-10-18"));
        assert!(text.contains("Family size: 7"));
        assert!(text.contains("Retained OMA groups: 3"));
        assert!(text.contains("Candidates: 2"));
        assert!(text.contains("  1. GGGGGGA  3 in family, 5 total in OMA, 1 candidates"));
        assert!(text.contains("  3. GGGGGGC  3 in family, members unavailable (skipped)"));
        assert!(text.contains(
            "      P6 | GGGGGGA | Saccharomyces cerevisiae | Adenylate kinase [Swiss-Prot]"
        ));
        assert!(text.contains("      P7 | GGGGGGB | unavailable | unavailable"));
        assert!(text.contains("      P5 | GGGGGGA, GGGGGGB | unavailable | unavailable"));
        assert!(text.contains("Members of OMA group GGGGGGC could not be fetched"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let model = sample_model();
        assert_eq!(render(&model), render(&model.clone()));
        assert_eq!(render(&model).as_bytes(), render(&sample_model()).as_bytes());
    }

    #[test]
    fn test_render_by_kingdom() {
        let text = render(&sample_model().with_layout(Layout::ByKingdom));

        let fungi = text.find("  Fungi (1)").unwrap();
        let unknown = text.find("  Unknown (1)").unwrap();
        assert!(fungi < unknown);
        assert!(text.contains("CANDIDATES BY KINGDOM"));
    }

    #[test]
    fn test_render_without_candidates() {
        let mut model = sample_model();
        model.candidates.clear();
        model.ambiguous.clear();
        model.caveats.clear();

        let text = render(&model);
        assert!(text.contains("CANDIDATES\n--------------------------------------------------\n  None found."));
        assert!(text.contains("CAVEATS\n--------------------------------------------------\n  None."));
    }

    #[test]
    fn test_long_descriptions_are_truncated() {
        let annotation = ProteinAnnotation {
            protein_name: Some("x".repeat(120)),
            ..ProteinAnnotation::default()
        };
        let line = describe(Some(&annotation));
        assert!(line.ends_with(&format!("{}...", "x".repeat(80))));
    }
}
