//! Run-scoped diagnostics sink.
//!
//! A [`Diagnostics`] value lives for exactly one analysis run. Stages record
//! non-fatal degradations into it once their fan-out has joined; the report
//! lists every recorded [`Caveat`] so nothing degrades silently.

use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::core::types::{Fingerprint, ProteinId};

/// A non-fatal degradation of the run's scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Caveat {
    /// A fingerprint batch failed permanently; its proteins were treated as fingerprint-less
    BatchResolutionFailure {
        /// 1-based batch number
        batch: usize,
        total_batches: usize,
        identifiers: Vec<ProteinId>,
        attempts: u32,
        error: String,
    },

    /// A retained group's member set could not be fetched; it contributes no candidates
    ResolutionIncomplete {
        fingerprint: Fingerprint,
        attempts: u32,
        error: String,
    },

    /// Descriptive metadata could not be fetched for these proteins
    EnrichmentUnavailable {
        identifiers: Vec<ProteinId>,
        error: String,
    },
}

impl fmt::Display for Caveat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BatchResolutionFailure {
                batch,
                total_batches,
                identifiers,
                attempts,
                error,
            } => write!(
                f,
                "Fingerprint batch {batch}/{total_batches} ({} proteins) failed after {attempts} attempt(s); treated as fingerprint-less: {error}",
                identifiers.len()
            ),
            Self::ResolutionIncomplete {
                fingerprint,
                attempts,
                error,
            } => write!(
                f,
                "Members of OMA group {fingerprint} could not be fetched after {attempts} attempt(s); group skipped: {error}"
            ),
            Self::EnrichmentUnavailable { identifiers, error } => write!(
                f,
                "Descriptions unavailable for {} protein(s): {error}",
                identifiers.len()
            ),
        }
    }
}

/// Collects caveats and retry counts for one run
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    caveats: Vec<Caveat>,
    retries: u32,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, caveat: Caveat) {
        info!("{caveat}");
        self.caveats.push(caveat);
    }

    pub fn note_retries(&mut self, retries: u32) {
        self.retries += retries;
    }

    #[must_use]
    pub fn caveats(&self) -> &[Caveat] {
        &self.caveats
    }

    #[must_use]
    pub fn retries(&self) -> u32 {
        self.retries
    }
}
