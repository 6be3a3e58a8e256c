use log::{debug, info};
use serde::Deserialize;
use serde_json::{json, Map};

use super::client::WizClient;
use super::types::{lenient_nodes, nullable, CloudAccount};
use crate::error::Result;

const CLOUD_ACCOUNTS_QUERY: &str = include_str!("queries/cloud_accounts.graphql");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CloudAccountsData {
    #[serde(default, deserialize_with = "nullable")]
    cloud_accounts: CloudAccountConnection,
}

#[derive(Debug, Default, Deserialize)]
struct CloudAccountConnection {
    #[serde(default, deserialize_with = "lenient_nodes")]
    nodes: Vec<CloudAccount>,
}

/// The search is fuzzy; only a case-sensitive equal `externalId` counts.
fn find_exact_match(candidates: Vec<CloudAccount>, external_id: &str) -> Option<CloudAccount> {
    candidates
        .into_iter()
        .find(|account| account.external_id == external_id)
}

impl WizClient {
    /// Resolve an AWS account ID or Azure subscription ID to its Wiz account.
    ///
    /// `Ok(None)` means the platform does not know the account.
    pub async fn resolve_account(&self, external_id: &str) -> Result<Option<CloudAccount>> {
        let mut variables = Map::new();
        variables.insert("externalId".to_string(), json!([external_id]));

        let data: CloudAccountsData = self.query(CLOUD_ACCOUNTS_QUERY, Some(variables)).await?;
        let candidates = data.cloud_accounts.nodes;
        debug!(
            "Search for {external_id} returned {} candidate(s)",
            candidates.len()
        );

        let account = find_exact_match(candidates, external_id);
        if account.is_none() {
            info!("No exact match for {external_id}");
        }

        Ok(account)
    }
}
