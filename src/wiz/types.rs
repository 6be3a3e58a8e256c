use chrono::{DateTime, Utc};
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Treat an explicit `null` the same as a missing field.
pub(super) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode a node list, skipping entries that do not fit `T`.
///
/// A `null` or missing list is empty.
pub(super) fn lenient_nodes<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let nodes = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();

    Ok(nodes
        .into_iter()
        .filter_map(|node| match serde_json::from_value(node) {
            Ok(node) => Some(node),
            Err(e) => {
                warn!("Skipping malformed node: {e}");
                None
            }
        })
        .collect())
}

/// A cloud account (AWS account, Azure subscription, ...) as known to Wiz.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudAccount {
    /// Wiz-internal identifier, used to scope issue queries.
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub external_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub cloud_provider: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Informational,
    #[serde(other)]
    Unknown,
}

impl Severity {
    /// Severity buckets in reporting order.
    pub const BUCKETS: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Informational,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Informational => "INFORMATIONAL",
            Severity::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueStatus {
    Open,
    InProgress,
    Resolved,
    Rejected,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceRule {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Snapshot of the resource an issue was raised on.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySnapshot {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub entity_type: Option<String>,
    pub native_type: Option<String>,
    pub cloud_platform: Option<String>,
    pub region: Option<String>,
    pub subscription_external_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    pub severity: Severity,
    pub status: IssueStatus,
    pub created_at: DateTime<Utc>,
    pub source_rule: Option<SourceRule>,
    pub entity_snapshot: Option<EntitySnapshot>,
}

/// First page of open issues plus the server's aggregate counts.
///
/// The counts cover every matching issue, not just the returned `nodes`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueSummary {
    #[serde(default, deserialize_with = "nullable")]
    pub total_count: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub critical_severity_count: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub high_severity_count: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub medium_severity_count: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub low_severity_count: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub informational_severity_count: u64,
    #[serde(default, deserialize_with = "lenient_nodes")]
    pub nodes: Vec<Issue>,
}

impl IssueSummary {
    pub fn count(&self, severity: Severity) -> u64 {
        match severity {
            Severity::Critical => self.critical_severity_count,
            Severity::High => self.high_severity_count,
            Severity::Medium => self.medium_severity_count,
            Severity::Low => self.low_severity_count,
            Severity::Informational => self.informational_severity_count,
            Severity::Unknown => 0,
        }
    }
}
