//! Parsers for Pfam family files and UniProt tabular responses.
//!
//! This module provides parsers for:
//!
//! - **Pfam `scores` files**: per-sequence hit lists from a family build directory
//! - **Pfam `DESC` files**: the family accession (`AC` line)
//! - **UniProt TSV**: tab-separated responses from the UniProt REST API
//!
//! ## Example
//!
//! ```rust,no_run
//! use pfam_oma::parsing::scores::parse_scores_path;
//! use std::path::Path;
//!
//! // A family directory containing a `scores` file, or the file itself
//! let hits = parse_scores_path(Path::new("PF10181")).unwrap();
//! println!("{} genuine hits", hits.accessions.len());
//! ```
//!
//! Gzip-compressed inputs (`scores.gz`, compressed API responses) are inflated
//! transparently.

use std::io::Read;

use flate2::read::GzDecoder;
use thiserror::Error;

pub mod desc;
pub mod scores;
pub mod tsv;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("No genuine alignment hits found in {0}")]
    NoHits(String),
}

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Check whether a byte buffer starts with the gzip magic number
#[must_use]
pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[..2] == GZIP_MAGIC
}

/// Decode a byte buffer to text, inflating it first if it is gzip-compressed.
///
/// NUL bytes and carriage returns are dropped and invalid UTF-8 is replaced,
/// since UniProt streams occasionally carry both.
///
/// # Errors
///
/// Returns `ParseError::Io` if the gzip stream is corrupt.
pub fn decode_text(bytes: &[u8]) -> Result<String, ParseError> {
    let text = if is_gzip(bytes) {
        let mut inflated = Vec::new();
        GzDecoder::new(bytes).read_to_end(&mut inflated)?;
        String::from_utf8_lossy(&inflated).into_owned()
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    };

    Ok(text.replace(['\0', '\r'], ""))
}
