//! UniProt REST client.
//!
//! All lookups are bulk TSV queries:
//!
//! | Purpose              | Endpoint                 | Query                         |
//! |----------------------|--------------------------|-------------------------------|
//! | Family members       | `/uniprotkb/stream`      | `(xref:pfam-PF10181)`         |
//! | Group members        | `/uniprotkb/stream`      | `(xref:oma-NKRTAWQ)`          |
//! | Fingerprints         | `/uniprotkb/accessions`  | `accessions=A,B,C` + `xref_oma` |
//! | Descriptions         | `/uniprotkb/accessions`  | `accessions=A,B,C` + names    |
//!
//! Stream responses are requested gzip-compressed and inflated locally.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::core::protein::{parse_lineage, ProteinAnnotation};
use crate::core::types::{FamilyId, Fingerprint, ProteinId, ReviewStatus};
use crate::parsing::decode_text;
use crate::parsing::tsv::{parse_tsv_text, TsvTable};
use crate::remote::{DescriptionLookup, FetchError, FingerprintLookup, GroupMemberLookup};
use crate::utils::validation::{first_fingerprint, normalize_accession};

pub const DEFAULT_BASE_URL: &str = "https://rest.uniprot.org";

const USER_AGENT: &str = concat!("pfam-oma/", env!("CARGO_PKG_VERSION"));

const STREAM_PATH: &str = "/uniprotkb/stream";
const ACCESSIONS_PATH: &str = "/uniprotkb/accessions";

const FINGERPRINT_FIELDS: &str = "accession,xref_oma";
const DESCRIPTION_FIELDS: &str = "accession,id,protein_name,organism_name,lineage,reviewed";

/// Async UniProt client shared by every stage of a run
#[derive(Debug, Clone)]
pub struct UniProtClient {
    http: reqwest::Client,
    base_url: String,
}

impl UniProtClient {
    /// Create a client against `base_url` (e.g. [`DEFAULT_BASE_URL`]).
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Every accession in the given Pfam family
    ///
    /// # Errors
    ///
    /// Returns a `FetchError` if the request fails or the response is not TSV.
    pub async fn fetch_family_members(
        &self,
        family: &FamilyId,
    ) -> Result<HashSet<ProteinId>, FetchError> {
        self.stream_accessions(&format!("(xref:pfam-{family})"))
            .await
    }

    async fn stream_accessions(&self, query: &str) -> Result<HashSet<ProteinId>, FetchError> {
        let table = self
            .get_tsv(
                STREAM_PATH,
                &[
                    ("query", query),
                    ("fields", "accession"),
                    ("format", "tsv"),
                    ("compressed", "true"),
                ],
            )
            .await?;

        let entry = table.column("Entry");
        let accessions: HashSet<ProteinId> = table
            .rows()
            .filter_map(|row| normalize_accession(TsvTable::cell(row, entry)))
            .collect();

        debug!("{query}: {} accessions", accessions.len());
        Ok(accessions)
    }

    async fn fetch_by_accessions(
        &self,
        ids: &[ProteinId],
        fields: &str,
    ) -> Result<TsvTable, FetchError> {
        if ids.is_empty() {
            return Ok(TsvTable::default());
        }

        let accessions = ids
            .iter()
            .map(ProteinId::as_str)
            .collect::<Vec<_>>()
            .join(",");

        self.get_tsv(
            ACCESSIONS_PATH,
            &[
                ("accessions", accessions.as_str()),
                ("fields", fields),
                ("format", "tsv"),
            ],
        )
        .await
    }

    async fn get_tsv(&self, path: &str, params: &[(&str, &str)]) -> Result<TsvTable, FetchError> {
        let url = format!("{}{path}", self.base_url);
        let response = self.http.get(&url).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let bytes = response.bytes().await?;
        let text = decode_text(&bytes).map_err(|e| FetchError::Decode(e.to_string()))?;
        parse_tsv_text(&text, "Entry").map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl FingerprintLookup for UniProtClient {
    async fn bulk_resolve_fingerprints(
        &self,
        ids: &[ProteinId],
    ) -> Result<HashMap<ProteinId, Option<Fingerprint>>, FetchError> {
        let table = self.fetch_by_accessions(ids, FINGERPRINT_FIELDS).await?;
        let entry = table.column("Entry");
        let oma = table.column("OMA");

        Ok(table
            .rows()
            .filter_map(|row| {
                let id = normalize_accession(TsvTable::cell(row, entry))?;
                Some((id, first_fingerprint(TsvTable::cell(row, oma))))
            })
            .collect())
    }
}

#[async_trait]
impl GroupMemberLookup for UniProtClient {
    async fn fetch_group_members(
        &self,
        fingerprint: &Fingerprint,
    ) -> Result<HashSet<ProteinId>, FetchError> {
        self.stream_accessions(&format!("(xref:oma-{fingerprint})"))
            .await
    }
}

#[async_trait]
impl DescriptionLookup for UniProtClient {
    async fn fetch_description(
        &self,
        id: &ProteinId,
    ) -> Result<Option<ProteinAnnotation>, FetchError> {
        let mut found = self.fetch_descriptions(std::slice::from_ref(id)).await?;
        Ok(found.remove(id))
    }

    async fn fetch_descriptions(
        &self,
        ids: &[ProteinId],
    ) -> Result<HashMap<ProteinId, ProteinAnnotation>, FetchError> {
        let table = self.fetch_by_accessions(ids, DESCRIPTION_FIELDS).await?;
        Ok(annotations_from_table(&table))
    }
}

fn annotations_from_table(table: &TsvTable) -> HashMap<ProteinId, ProteinAnnotation> {
    let entry = table.column("Entry");
    let entry_name = table.column("Entry Name");
    let protein_names = table.column("Protein names");
    let organism = table.column("Organism");
    let lineage = table.column("Taxonomic lineage");
    let reviewed = table.column("Reviewed");

    let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());

    table
        .rows()
        .filter_map(|row| {
            let id = normalize_accession(TsvTable::cell(row, entry))?;
            let annotation = ProteinAnnotation {
                entry_name: non_empty(TsvTable::cell(row, entry_name)),
                protein_name: non_empty(TsvTable::cell(row, protein_names)),
                organism: non_empty(TsvTable::cell(row, organism)),
                lineage: parse_lineage(TsvTable::cell(row, lineage)),
                status: ReviewStatus::parse(TsvTable::cell(row, reviewed)),
            };
            Some((id, annotation))
        })
        .collect()
}
