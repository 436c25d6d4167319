use std::collections::HashSet;

use async_trait::async_trait;

use crate::core::types::{FamilyId, ProteinId};
use crate::remote::retry::RetryPolicy;
use crate::remote::uniprot::UniProtClient;
use crate::source::{FamilySource, SourceError};

/// Family membership from a bulk UniProt `xref:pfam` query
pub struct UniProtFamilySource {
    client: UniProtClient,
    retry: RetryPolicy,
}

impl UniProtFamilySource {
    #[must_use]
    pub fn new(client: UniProtClient, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }
}

#[async_trait]
impl FamilySource for UniProtFamilySource {
    async fn supply(&self, family: &FamilyId) -> Result<HashSet<ProteinId>, SourceError> {
        let label = format!("{family} members");
        let attempt = self
            .retry
            .run(&label, || self.client.fetch_family_members(family))
            .await;

        attempt.outcome.map_err(|e| {
            SourceError::Unavailable(format!(
                "UniProt query for {family} failed after {} attempt(s): {e}",
                attempt.attempts
            ))
        })
    }

    fn describe(&self) -> String {
        format!("UniProt ({})", self.client.base_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::time::Duration;

    fn source(server: &MockServer, attempts: u32) -> UniProtFamilySource {
        let client = UniProtClient::new(server.base_url(), Duration::from_secs(5)).unwrap();
        UniProtFamilySource::new(client, RetryPolicy::immediate(attempts))
    }

    #[tokio::test]
    async fn test_supply() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/uniprotkb/stream")
                    .query_param("query", "(xref:pfam-PF10181)");
                then.status(200).body("Entry\nP11111\nP22222\n");
            })
            .await;

        let members = source(&server, 1)
            .supply(&FamilyId::new("PF10181"))
            .await
            .unwrap();
        assert_eq!(members.len(), 2);
    }

    #[tokio::test]
    async fn test_persistent_failure_is_unavailable() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/uniprotkb/stream");
                then.status(500);
            })
            .await;

        let result = source(&server, 2).supply(&FamilyId::new("PF10181")).await;

        assert!(matches!(result, Err(SourceError::Unavailable(_))));
        mock.assert_hits_async(2).await;
    }
}
