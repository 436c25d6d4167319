//! Core data types for Pfam/OMA reconciliation.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`ProteinId`], [`Fingerprint`], [`FamilyId`]: opaque identifiers
//! - [`FamilyMembers`]: the read-only Pfam family snapshot
//! - [`FingerprintMap`]: protein -> OMA fingerprint assignment
//! - [`GroupRecord`]: an OMA group with its family occurrence count and full member set
//! - [`Candidate`], [`AmbiguousCandidate`]: proteins outside the family linked by OMA
//! - [`ProteinAnnotation`]: descriptive metadata used by the report
//!
//! ## Identifiers
//!
//! | Kind        | Example      | Source           |
//! |-------------|--------------|------------------|
//! | Protein     | `Q9XYZ1`     | UniProtKB        |
//! | Fingerprint | `NKRTAWQ`    | OMA (via UniProt)|
//! | Family      | `PF10181`    | Pfam             |

pub mod group;
pub mod protein;
pub mod types;

pub use group::{AmbiguousCandidate, Candidate, FamilyMembers, FingerprintMap, GroupRecord};
pub use protein::ProteinAnnotation;
pub use types::{FamilyId, Fingerprint, Kingdom, ProteinId, ReviewStatus};
