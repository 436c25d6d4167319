//! # pfam-oma
//!
//! A library for finding orthologues that a Pfam family's membership list omits.
//!
//! Pfam groups proteins by a shared sequence domain; OMA groups them by
//! phylogeny. The two classifications are built independently, so an OMA group
//! that several family members belong to often contains further proteins Pfam
//! does not list. `pfam-oma` surfaces those proteins as candidates for curation.
//!
//! ## Pipeline
//!
//! 1. **Identifier source**: the family's UniProt accessions, from a bulk UniProt
//!    query or the genuine hits of a local Pfam `scores` file
//! 2. **Fingerprint resolver**: each accession's OMA group fingerprint, in batches
//! 3. **Group aggregator**: occurrence counts per fingerprint, ranked; groups with
//!    at least `min_count` family members are retained
//! 4. **Discrepancy resolver**: each retained group's full membership minus the
//!    family, keeping proteins linked to exactly one retained group
//! 5. **Report builder**: a deterministic text, JSON or TSV report
//!
//! Only identifier-source failures abort a run. Failed batches, skipped groups
//! and missing descriptions are recorded as caveats and shown in the report.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use pfam_oma::diagnostics::Diagnostics;
//! use pfam_oma::reconcile::{ReconcileConfig, Reconciler};
//! use pfam_oma::remote::uniprot::{UniProtClient, DEFAULT_BASE_URL};
//! use pfam_oma::source::uniprot::UniProtFamilySource;
//! use pfam_oma::FamilyId;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ReconcileConfig::default();
//! let client = UniProtClient::new(DEFAULT_BASE_URL, Duration::from_secs(60))?;
//! let source = UniProtFamilySource::new(client.clone(), config.retry.clone());
//!
//! let mut diagnostics = Diagnostics::new();
//! let result = Reconciler::new(&source, &client, &client, config)
//!     .run(&FamilyId::new("PF10181"), &mut diagnostics)
//!     .await?;
//!
//! for candidate in &result.discrepancy.candidates {
//!     println!("{} via {}", candidate.id, candidate.fingerprint);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Identifiers, family snapshot, group records and candidates
//! - [`source`]: Identifier sources (UniProt or a local scores file)
//! - [`remote`]: UniProt client, collaborator traits and retry policy
//! - [`reconcile`]: Fingerprint resolution, aggregation and discrepancy stages
//! - [`report`]: Report model, enrichment and renderers
//! - [`diagnostics`]: Run-scoped caveat sink
//! - [`parsing`]: Parsers for scores, DESC and UniProt TSV files
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod diagnostics;
pub mod parsing;
pub mod reconcile;
pub mod remote;
pub mod report;
pub mod source;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types for convenience
pub use core::group::{Candidate, FamilyMembers, GroupRecord};
pub use core::types::*;
pub use diagnostics::{Caveat, Diagnostics};
pub use reconcile::{ReconcileConfig, Reconciler, Reconciliation};
