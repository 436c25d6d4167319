//! The reconciliation core.
//!
//! Stages run strictly in order, each consuming only the frozen output of the
//! previous one:
//!
//! 1. [`fingerprints`]: protein -> OMA fingerprint, batched and fanned out
//! 2. [`aggregate`]: fingerprint -> occurrence count within the family, ranking, retention
//! 3. [`discrepancy`]: full member sets of retained groups, set difference, uniqueness filter
//!
//! [`pipeline::Reconciler`] wires them together with the identifier source.
//!
//! ## Threshold
//!
//! `min_count` trades recall for precision. A group is retained only when at
//! least `min_count` family members carry its fingerprint. `1` surfaces every
//! orthology hint (many false positives); `3` is the default.

use crate::remote::retry::RetryPolicy;

pub mod aggregate;
pub mod discrepancy;
pub mod fingerprints;
pub mod pipeline;

pub use aggregate::GroupIndex;
pub use discrepancy::{find_candidates, Discrepancy};
pub use fingerprints::FingerprintResolver;
pub use pipeline::{GroupRanking, Reconciler, Reconciliation};

pub const DEFAULT_MIN_COUNT: usize = 3;
pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Knobs for one reconciliation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileConfig {
    /// Minimum family occurrences for a group to be retained
    pub min_count: usize,
    /// Proteins per fingerprint/description request
    pub batch_size: usize,
    /// Maximum concurrent external requests per stage
    pub concurrency: usize,
    pub retry: RetryPolicy,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            min_count: DEFAULT_MIN_COUNT,
            batch_size: DEFAULT_BATCH_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
            retry: RetryPolicy::default(),
        }
    }
}
