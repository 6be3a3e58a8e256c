use log::info;
use serde::Deserialize;
use serde_json::{json, Map};

use super::client::WizClient;
use super::types::{nullable, IssueSummary};
use crate::error::Result;

// Page size is fixed in the document (first: 100); no further pages are requested.
const ISSUES_QUERY: &str = include_str!("queries/issues.graphql");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssuesData {
    #[serde(default, deserialize_with = "nullable")]
    issues_v2: IssueSummary,
}

impl WizClient {
    /// Fetch open and in-progress issues for a Wiz-internal account id.
    pub async fn fetch_issues(&self, account_id: &str) -> Result<IssueSummary> {
        let mut variables = Map::new();
        variables.insert("subscriptionId".to_string(), json!([account_id]));

        let data: IssuesData = self.query(ISSUES_QUERY, Some(variables)).await?;
        let issues = data.issues_v2;

        if issues.total_count > issues.nodes.len() as u64 {
            info!(
                "Fetched {} of {} issues; counts are server totals",
                issues.nodes.len(),
                issues.total_count
            );
        }

        Ok(issues)
    }
}
