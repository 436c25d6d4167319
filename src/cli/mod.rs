//! Command-line interface for pfam-oma.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **analyze**: Reconcile a Pfam family with OMA and write a candidate report
//! - **groups**: Rank the OMA groups in a family, to help pick `--min-count`
//!
//! ## Usage
//!
//! ```text
//! # Report OMA-only candidates for a family
//! pfam-oma analyze PF10181
//!
//! # Read the family from a local Pfam build directory instead of UniProt
//! pfam-oma analyze PF10181 --scores ./PF10181
//!
//! # Lower the threshold and group candidates by kingdom
//! pfam-oma analyze PF10181 -c 1 --by-kingdom -o PF10181_report.txt
//!
//! # See how many family members each OMA group has
//! pfam-oma groups PF10181 -c 1
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing::warn;

use crate::core::types::FamilyId;
use crate::parsing::desc::family_id_for_dir;
use crate::reconcile::ReconcileConfig;
use crate::remote::retry::RetryPolicy;
use crate::remote::uniprot::{UniProtClient, DEFAULT_BASE_URL};
use crate::remote::FetchError;
use crate::source::scores::ScoresFileSource;
use crate::source::uniprot::UniProtFamilySource;
use crate::source::{FamilySource, SourceError};
use crate::utils::validation::{normalize_family_id, MAX_BATCH_SIZE, MAX_CONCURRENCY};

pub mod analyze;
pub mod groups;

#[derive(Parser)]
#[command(name = "pfam-oma")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Find OMA orthologues missing from a Pfam family")]
#[command(
    long_about = "pfam-oma reconciles a Pfam family with OMA orthologous groups.\n\nIt collects the family's UniProt members, looks up their OMA groups, keeps the groups that several family members share, and reports the other members of those groups that Pfam does not list:\n- Ranked OMA groups with family and total member counts\n- OMA-only candidates with organism and description\n- Ambiguous near-misses and any degraded lookups"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reconcile a family with OMA and write a candidate report
    Analyze(analyze::AnalyzeArgs),

    /// Rank the OMA groups found in a family
    Groups(groups::GroupsArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Options shared by every command that runs the pipeline
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Pfam family accession (e.g. PF10181)
    #[arg(required = true)]
    pub family: String,

    /// Minimum family members an OMA group needs to be retained
    /// (1 maximizes recall, higher values cut false positives)
    #[arg(short = 'c', long, default_value = "3", value_parser = clap::value_parser!(u32).range(1..))]
    pub min_count: u32,

    /// Read family members from a Pfam scores file (or a family directory
    /// containing one) instead of querying UniProt
    #[arg(long)]
    pub scores: Option<PathBuf>,

    /// Proteins per UniProt request
    #[arg(long, default_value = "100", value_parser = clap::value_parser!(u32).range(1..=500))]
    pub batch_size: u32,

    /// Maximum concurrent UniProt requests
    #[arg(long, default_value = "4", value_parser = clap::value_parser!(u32).range(1..=16))]
    pub concurrency: u32,

    /// Attempts per request before giving up (including the first)
    #[arg(long, default_value = "3", value_parser = clap::value_parser!(u32).range(1..=10))]
    pub max_attempts: u32,

    /// Timeout for each UniProt request, in seconds
    #[arg(long, default_value = "60", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// UniProt REST base URL
    #[arg(long, env = "PFAM_OMA_UNIPROT_URL", default_value = DEFAULT_BASE_URL)]
    pub uniprot_url: String,
}

impl RunArgs {
    /// Resolve the family accession.
    ///
    /// Querying UniProt needs a valid accession. With `--scores` the accession
    /// only labels the report, so a non-standard name is accepted (falling back
    /// to the family directory's own accession when it has one).
    ///
    /// # Errors
    ///
    /// Returns `SourceError::InvalidFamily` if the accession is invalid in network mode.
    pub fn family_id(&self) -> Result<FamilyId, SourceError> {
        if let Some(family) = normalize_family_id(&self.family) {
            return Ok(family);
        }

        match &self.scores {
            None => Err(SourceError::InvalidFamily(self.family.clone())),
            Some(path) => {
                let family = family_id_for_dir(path)
                    .unwrap_or_else(|| FamilyId::new(self.family.trim()));
                warn!(
                    "'{}' is not a Pfam accession; labelling the report {family}",
                    self.family
                );
                Ok(family)
            }
        }
    }

    #[must_use]
    pub fn config(&self) -> ReconcileConfig {
        ReconcileConfig {
            min_count: self.min_count as usize,
            batch_size: (self.batch_size as usize).min(MAX_BATCH_SIZE),
            concurrency: (self.concurrency as usize).min(MAX_CONCURRENCY),
            retry: RetryPolicy {
                max_attempts: self.max_attempts,
                timeout: self.timeout(),
                ..RetryPolicy::default()
            },
        }
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn client(&self) -> Result<UniProtClient, FetchError> {
        UniProtClient::new(&self.uniprot_url, self.timeout())
    }

    /// The identifier source selected by `--scores`
    #[must_use]
    pub fn source(&self, client: &UniProtClient) -> Box<dyn FamilySource> {
        match &self.scores {
            Some(path) => Box::new(ScoresFileSource::new(path)),
            None => Box::new(UniProtFamilySource::new(
                client.clone(),
                self.config().retry,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pfam-oma").chain(args.iter().copied())).unwrap()
    }

    fn run_args(cli: Cli) -> RunArgs {
        match cli.command {
            Commands::Analyze(args) => args.run,
            Commands::Groups(args) => args.run,
        }
    }

    #[test]
    fn test_defaults() {
        let args = run_args(parse(&["analyze", "PF10181"]));
        let config = args.config();

        assert_eq!(config, ReconcileConfig::default());
        assert_eq!(args.family_id().unwrap(), FamilyId::new("PF10181"));
        assert!(args.scores.is_none());
    }

    #[test]
    fn test_options() {
        let args = run_args(parse(&[
            "groups",
            "PF10181.12",
            "-c",
            "1",
            "--batch-size",
            "50",
            "--max-attempts",
            "5",
            "--timeout-secs",
            "10",
        ]));
        let config = args.config();

        assert_eq!(args.family_id().unwrap(), FamilyId::new("PF10181"));
        assert_eq!(config.min_count, 1);
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_out_of_range_options_are_rejected() {
        let parse = |args: &[&str]| {
            Cli::try_parse_from(std::iter::once("pfam-oma").chain(args.iter().copied()))
        };
        assert!(parse(&["analyze", "PF10181", "-c", "0"]).is_err());
        assert!(parse(&["analyze", "PF10181", "--batch-size", "501"]).is_err());
        assert!(parse(&["analyze", "PF10181", "--concurrency", "0"]).is_err());
    }

    #[test]
    fn test_invalid_family_requires_scores() {
        let args = run_args(parse(&["analyze", "not-a-family"]));
        assert!(matches!(
            args.family_id(),
            Err(SourceError::InvalidFamily(_))
        ));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_str().unwrap();
        let args = run_args(parse(&["analyze", "DUF2052", "--scores", path]));
        assert_eq!(args.family_id().unwrap(), FamilyId::new("DUF2052"));
    }
}
