mod accounts;
mod client;
mod issues;
mod types;

pub use client::WizClient;
pub use types::{
    CloudAccount, EntitySnapshot, Issue, IssueStatus, IssueSummary, Severity, SourceRule,
};
