use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::cli::{OutputFormat, RunArgs};
use crate::core::types::ProteinId;
use crate::diagnostics::Diagnostics;
use crate::reconcile::Reconciler;
use crate::report::enrich::{enrich, Annotations};
use crate::report::{json, text, tsv, write_report, Layout, ReportModel};

#[derive(Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Report file to write
    #[arg(short, long, default_value = "report.txt")]
    pub output: PathBuf,

    /// Group candidates by kingdom instead of by OMA group
    #[arg(long)]
    pub by_kingdom: bool,

    /// Skip fetching organism and description for candidates
    #[arg(long)]
    pub no_descriptions: bool,
}

/// Execute analyze subcommand
///
/// # Errors
///
/// Returns an error if the family cannot be loaded or the report cannot be
/// written. Degraded lookups are reported as caveats, not errors.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: AnalyzeArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let family_id = args.run.family_id()?;
    let config = args.run.config();
    let client = args.run.client()?;
    let source = args.run.source(&client);

    info!(
        "Analyzing {family_id} from {} (min count {})",
        source.describe(),
        config.min_count
    );

    let mut diagnostics = Diagnostics::new();
    let runtime = tokio::runtime::Runtime::new()?;
    let (reconciliation, annotations) = runtime.block_on(async {
        let reconciler = Reconciler::new(source.as_ref(), &client, &client, config.clone());
        let reconciliation = reconciler.run(&family_id, &mut diagnostics).await?;

        let annotations = if args.no_descriptions {
            Annotations::new()
        } else {
            let ids: Vec<ProteinId> = reconciliation
                .discrepancy
                .candidates
                .iter()
                .map(|c| c.id.clone())
                .chain(reconciliation.discrepancy.ambiguous.iter().map(|a| a.id.clone()))
                .collect();
            enrich(&client, &ids, &config, &mut diagnostics).await
        };

        anyhow::Ok((reconciliation, annotations))
    })?;

    let layout = if args.by_kingdom {
        Layout::ByKingdom
    } else {
        Layout::ByGroup
    };
    let model = ReportModel::build(
        &reconciliation,
        &annotations,
        diagnostics.caveats(),
        config.min_count,
    )
    .with_date(chrono::Local::now().date_naive())
    .with_layout(layout);

    let contents = match format {
        OutputFormat::Text => text::render(&model),
        OutputFormat::Json => json::render(&model)?,
        OutputFormat::Tsv => tsv::render(&model),
    };

    write_report(&args.output, &contents)
        .with_context(|| format!("Failed to write report to {}", args.output.display()))?;

    print_summary(&model, &args.output, diagnostics.retries(), verbose);
    Ok(())
}

fn print_summary(model: &ReportModel, output: &Path, retries: u32, verbose: bool) {
    println!("Report written to {}", output.display());
    println!(
        "  Family {}: {} members ({} with OMA fingerprint)",
        model.family_id, model.family_size, model.fingerprinted
    );
    println!(
        "  Retained OMA groups: {} (min count {})",
        model.groups.len(),
        model.min_count
    );
    let skipped: Vec<&str> = model
        .skipped_groups()
        .map(|g| g.fingerprint.as_str())
        .collect();
    if !skipped.is_empty() {
        println!("  Skipped OMA groups: {}", skipped.join(", "));
    }
    println!(
        "  Candidates: {} ({} ambiguous)",
        model.candidates.len(),
        model.ambiguous.len()
    );
    println!("  Caveats: {}", model.caveats.len());
    for caveat in &model.caveats {
        println!("    - {caveat}");
    }
    if verbose {
        println!("  Retried requests: {retries}");
    }
}
