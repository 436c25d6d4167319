use clap::Args;
use serde::Serialize;

use crate::cli::{OutputFormat, RunArgs};
use crate::core::group::GroupRecord;
use crate::diagnostics::{Caveat, Diagnostics};
use crate::reconcile::{GroupRanking, Reconciler};

#[derive(Args)]
pub struct GroupsArgs {
    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Serialize)]
struct GroupsOutput<'a> {
    family_id: &'a str,
    min_count: usize,
    family_size: usize,
    fingerprinted: usize,
    distinct_groups: usize,
    groups: &'a [GroupRecord],
    caveats: &'a [Caveat],
}

/// Execute groups subcommand
///
/// # Errors
///
/// Returns an error if the family cannot be loaded.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: GroupsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let family_id = args.run.family_id()?;
    let config = args.run.config();
    let client = args.run.client()?;
    let source = args.run.source(&client);
    let min_count = config.min_count;

    let mut diagnostics = Diagnostics::new();
    let runtime = tokio::runtime::Runtime::new()?;
    let ranking = runtime.block_on(async {
        Reconciler::new(source.as_ref(), &client, &client, config)
            .rank_only(&family_id, &mut diagnostics)
            .await
    })?;

    match format {
        OutputFormat::Text => print_text(&ranking, min_count, &diagnostics, verbose),
        OutputFormat::Json => {
            let output = GroupsOutput {
                family_id: ranking.family_id.as_str(),
                min_count,
                family_size: ranking.family_size,
                fingerprinted: ranking.fingerprinted,
                distinct_groups: ranking.distinct_groups,
                groups: &ranking.retained,
                caveats: diagnostics.caveats(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("fingerprint\toccurrence_count");
            for group in &ranking.retained {
                println!("{}\t{}", group.fingerprint, group.occurrence_count);
            }
        }
    }

    Ok(())
}

fn print_text(ranking: &GroupRanking, min_count: usize, diagnostics: &Diagnostics, verbose: bool) {
    println!(
        "{}: {} members, {} with OMA fingerprint, {} distinct OMA groups",
        ranking.family_id, ranking.family_size, ranking.fingerprinted, ranking.distinct_groups
    );
    println!(
        "OMA groups with >= {min_count} family members: {}",
        ranking.retained.len()
    );

    let width = ranking.retained.len().to_string().len();
    for (rank, group) in ranking.retained.iter().enumerate() {
        println!(
            "  {:>width$}. {}  {}",
            rank + 1,
            group.fingerprint,
            group.occurrence_count
        );
    }

    if !diagnostics.caveats().is_empty() {
        println!("\nCaveats:");
        for caveat in diagnostics.caveats() {
            println!("  - {caveat}");
        }
    }
    if verbose {
        println!("\nRetried requests: {}", diagnostics.retries());
    }
}
