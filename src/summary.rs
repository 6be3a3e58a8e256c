use crate::wiz::{CloudAccount, IssueSummary, Severity};

const HEAVY_RULE_WIDTH: usize = 60;
const LIGHT_RULE_WIDTH: usize = 30;

/// Render the fixed-width review block for one account.
///
/// Counts are the server's totals and are printed as-is, whatever the
/// number of issue records that came back with them.
pub fn render(account: &CloudAccount, issues: &IssueSummary) -> String {
    let heavy = "=".repeat(HEAVY_RULE_WIDTH);

    let mut lines = vec![
        String::new(),
        heavy.clone(),
        "SECURITY REVIEW SUMMARY".to_string(),
        heavy.clone(),
        format!("Account Name:  {}", account.name),
        format!("Account ID:    {}", account.external_id),
        format!("Cloud:         {}", account.cloud_provider),
        heavy.clone(),
        format!("Total Issues:  {}", issues.total_count),
        "-".repeat(LIGHT_RULE_WIDTH),
    ];

    for severity in Severity::BUCKETS {
        let label = format!("{}:", severity.label());
        lines.push(format!("  {label:<15}{}", issues.count(severity)));
    }

    lines.push(heavy);

    let mut rendered = lines.join("\n");
    rendered.push('\n');
    rendered
}
