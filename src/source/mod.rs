//! Identifier sources: where the family membership snapshot comes from.
//!
//! Two interchangeable variants implement [`FamilySource`]:
//!
//! - [`uniprot::UniProtFamilySource`]: bulk UniProt query for `xref:pfam-<ID>`
//! - [`scores::ScoresFileSource`]: genuine hits in a local Pfam `scores` file
//!
//! The CLI picks one by configuration (`--scores`). Everything downstream sees
//! only the resulting [`FamilyMembers`].

use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::core::group::FamilyMembers;
use crate::core::types::{FamilyId, ProteinId};

pub mod scores;
pub mod uniprot;

/// Terminal failures of the identifier source
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("family source unavailable: {0}")]
    Unavailable(String),

    #[error("family {0} has no members")]
    EmptyFamily(FamilyId),

    #[error("invalid Pfam family accession: '{0}' (expected e.g. PF10181)")]
    InvalidFamily(String),
}

/// Supplies the set of proteins belonging to a family
#[async_trait]
pub trait FamilySource: Send + Sync {
    async fn supply(&self, family: &FamilyId) -> Result<HashSet<ProteinId>, SourceError>;

    /// Short label for logs and the report header
    fn describe(&self) -> String;
}

/// Load the family snapshot, rejecting an empty family.
///
/// # Errors
///
/// Propagates the source's error, or returns `SourceError::EmptyFamily` if the
/// source returned no members.
pub async fn load_family(
    source: &dyn FamilySource,
    family: &FamilyId,
) -> Result<FamilyMembers, SourceError> {
    let members = source.supply(family).await?;
    if members.is_empty() {
        return Err(SourceError::EmptyFamily(family.clone()));
    }

    info!(
        "Loaded {} members of {family} from {}",
        members.len(),
        source.describe()
    );
    Ok(FamilyMembers::from(members))
}
