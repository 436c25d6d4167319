//! External collaborators queried during reconciliation.
//!
//! Each lookup is a small object-safe async trait so that the reconciliation
//! stages can run against UniProt in production and against in-memory fakes in
//! tests:
//!
//! - [`FingerprintLookup`]: protein -> OMA fingerprint, in bulk
//! - [`GroupMemberLookup`]: OMA fingerprint -> every protein carrying it
//! - [`DescriptionLookup`]: protein -> organism, lineage and description
//!
//! [`uniprot::UniProtClient`] implements all three against the UniProt REST API.
//! Retries are not the collaborators' concern; callers wrap single attempts in
//! a [`retry::RetryPolicy`].

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::protein::ProteinAnnotation;
use crate::core::types::{Fingerprint, ProteinId};

pub mod retry;
pub mod uniprot;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { status: u16, url: String },

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("could not decode response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Whether retrying the same request may succeed.
    ///
    /// Timeouts, connection failures, rate limiting (429) and server errors are
    /// transient; other client errors and undecodable bodies are not.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request() || e.is_body(),
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Timeout(_) => true,
            Self::Decode(_) => false,
        }
    }
}

/// Bulk protein -> OMA fingerprint cross-reference lookup
#[async_trait]
pub trait FingerprintLookup: Send + Sync {
    /// Resolve one batch of proteins. Proteins without an OMA cross-reference
    /// map to `None`; proteins absent from the response may be omitted.
    async fn bulk_resolve_fingerprints(
        &self,
        ids: &[ProteinId],
    ) -> Result<HashMap<ProteinId, Option<Fingerprint>>, FetchError>;
}

/// Full membership of one OMA group
#[async_trait]
pub trait GroupMemberLookup: Send + Sync {
    async fn fetch_group_members(
        &self,
        fingerprint: &Fingerprint,
    ) -> Result<HashSet<ProteinId>, FetchError>;
}

/// Descriptive metadata for proteins
#[async_trait]
pub trait DescriptionLookup: Send + Sync {
    async fn fetch_description(
        &self,
        id: &ProteinId,
    ) -> Result<Option<ProteinAnnotation>, FetchError>;

    /// Batched variant; the default issues one request per protein.
    async fn fetch_descriptions(
        &self,
        ids: &[ProteinId],
    ) -> Result<HashMap<ProteinId, ProteinAnnotation>, FetchError> {
        let mut found = HashMap::new();
        for id in ids {
            if let Some(annotation) = self.fetch_description(id).await? {
                found.insert(id.clone(), annotation);
            }
        }
        Ok(found)
    }
}
