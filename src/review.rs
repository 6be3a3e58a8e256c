use std::io::{BufRead, Write};

use log::{debug, warn};

use crate::auth::{authenticate, AccessToken};
use crate::config::Config;
use crate::error::{Result, WizError};
use crate::http::build_client;
use crate::summary;
use crate::wiz::WizClient;

pub const PROMPT: &str = "Enter AWS Account ID or Azure Subscription ID: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Reported,
    AccountNotFound,
}

/// Prompt for an account identifier and read one trimmed line.
pub fn read_account_id<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<String> {
    write!(out, "{PROMPT}")?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    let account_id = line.trim();
    if account_id.is_empty() {
        return Err(WizError::Config("No account ID provided".to_string()));
    }
    Ok(account_id.to_string())
}

fn report_token_scope<W: Write>(token: &AccessToken, out: &mut W) -> Result<()> {
    match token.scope() {
        Ok(Some(scope)) => writeln!(out, "Token scopes: {scope}")?,
        Ok(None) => writeln!(out, "Token scopes: No scopes found")?,
        Err(e) => warn!("Could not inspect token scopes: {e}"),
    }

    if let Ok(Some(expires_at)) = token.expires_at() {
        debug!("Access token expires at {expires_at}");
    }

    Ok(())
}

/// Run one review: authenticate, resolve the account, fetch its issues and
/// print the summary.
///
/// An unknown account is a normal outcome, reported on `out`; every other
/// failure aborts before anything further is printed.
pub async fn run<R: BufRead, W: Write>(
    config: &Config,
    input: &mut R,
    out: &mut W,
) -> Result<Outcome> {
    let account_id = read_account_id(input, out)?;

    let client = build_client(config.accept_invalid_certs)?;

    writeln!(out, "\nAuthenticating with Wiz...")?;
    let token = authenticate(&client, &config.credentials).await?;
    writeln!(out, "Authentication successful!")?;
    report_token_scope(&token, out)?;

    let wiz = WizClient::new(client, config.credentials.api_url.clone(), token);

    writeln!(out, "\nLooking up account: {account_id}")?;
    let Some(account) = wiz.resolve_account(&account_id).await? else {
        writeln!(out, "Error: Account {account_id} not found in Wiz")?;
        return Ok(Outcome::AccountNotFound);
    };
    writeln!(out, "Found: {} ({})", account.name, account.cloud_provider)?;

    writeln!(out, "\nFetching issues...")?;
    let issues = wiz.fetch_issues(&account.id).await?;

    write!(out, "{}", summary::render(&account, &issues))?;
    Ok(Outcome::Reported)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Mock, Server};
    use serde_json::json;
    use std::io::Cursor;

    // {"scope":"read:issues"}
    const TOKEN: &str = "abc.eyJzY29wZSI6InJlYWQ6aXNzdWVzIn0.sig";

    fn config_for(server: &Server) -> Config {
        Config::new(
            Some("client".to_string()),
            Some("secret".to_string()),
            Some(format!("{}/oauth/token", server.url())),
            Some(format!("{}/graphql", server.url())),
            false,
        )
        .unwrap()
    }

    async fn mock_token(server: &mut Server) -> Mock {
        server
            .mock("POST", "/oauth/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "access_token": TOKEN }).to_string())
            .create_async()
            .await
    }

    async fn mock_accounts(server: &mut Server, body: serde_json::Value) -> Mock {
        server
            .mock("POST", "/graphql")
            .match_header("authorization", format!("Bearer {TOKEN}").as_str())
            .match_body(Matcher::PartialJson(json!({
                "variables": { "externalId": ["111"] }
            })))
            .with_status(200)
            .with_body(body.to_string())
            .create_async()
            .await
    }

    fn issues_matcher() -> Matcher {
        Matcher::PartialJson(json!({ "variables": { "subscriptionId": ["a-1"] } }))
    }

    fn found_account() -> serde_json::Value {
        json!({ "data": { "cloudAccounts": { "nodes": [
            { "id": "a-2", "name": "partial", "externalId": "1112", "cloudProvider": "AWS" },
            { "id": "a-1", "name": "Production", "externalId": "111", "cloudProvider": "AWS" }
        ] } } })
    }

    fn output_of(out: Vec<u8>) -> String {
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_read_account_id_prompts_and_trims() {
        let mut input = Cursor::new("  123456789012 \n");
        let mut out = Vec::new();

        let id = read_account_id(&mut input, &mut out).unwrap();

        assert_eq!(id, "123456789012");
        assert_eq!(output_of(out), PROMPT);
    }

    #[test]
    fn test_read_account_id_rejects_eof() {
        let mut input = Cursor::new("");
        let mut out = Vec::new();

        let err = read_account_id(&mut input, &mut out).unwrap_err();

        assert!(matches!(err, WizError::Config(_)));
    }

    #[tokio::test]
    async fn test_run_prints_summary() {
        let mut server = Server::new_async().await;
        let token = mock_token(&mut server).await;
        let accounts = mock_accounts(&mut server, found_account()).await;
        let issues = server
            .mock("POST", "/graphql")
            .match_body(issues_matcher())
            .with_status(200)
            .with_body(
                json!({ "data": { "issuesV2": {
                    "nodes": [],
                    "totalCount": 57,
                    "criticalSeverityCount": 3,
                    "highSeverityCount": 10,
                    "mediumSeverityCount": 20,
                    "lowSeverityCount": 20,
                    "informationalSeverityCount": 4
                } } })
                .to_string(),
            )
            .create_async()
            .await;

        let config = config_for(&server);
        let mut input = Cursor::new("111\n");
        let mut out = Vec::new();

        let outcome = run(&config, &mut input, &mut out).await.unwrap();

        assert_eq!(outcome, Outcome::Reported);
        let output = output_of(out);
        assert!(output.starts_with(PROMPT));
        assert!(output.contains("Authentication successful!"));
        assert!(output.contains("Token scopes: read:issues"));
        assert!(output.contains("Found: Production (AWS)"));
        assert!(output.contains("Total Issues:  57"));
        assert!(output.contains("  CRITICAL:      3"));
        assert!(output.contains("  INFORMATIONAL: 4"));

        token.assert_async().await;
        accounts.assert_async().await;
        issues.assert_async().await;
    }

    #[tokio::test]
    async fn test_run_account_not_found_skips_issue_fetch() {
        let mut server = Server::new_async().await;
        let _token = mock_token(&mut server).await;
        let accounts = mock_accounts(
            &mut server,
            json!({ "data": { "cloudAccounts": { "nodes": [
                { "id": "a-2", "name": "partial", "externalId": "1112", "cloudProvider": "AWS" }
            ] } } }),
        )
        .await;
        let issues = server
            .mock("POST", "/graphql")
            .match_body(issues_matcher())
            .expect(0)
            .create_async()
            .await;

        let config = config_for(&server);
        let mut input = Cursor::new("111\n");
        let mut out = Vec::new();

        let outcome = run(&config, &mut input, &mut out).await.unwrap();

        assert_eq!(outcome, Outcome::AccountNotFound);
        let output = output_of(out);
        assert!(output.contains("Error: Account 111 not found in Wiz"));
        assert!(output.starts_with(PROMPT));
        assert!(!output.contains("SECURITY REVIEW SUMMARY"));

        accounts.assert_async().await;
        issues.assert_async().await;
    }

    #[tokio::test]
    async fn test_run_query_error_prints_no_summary() {
        let mut server = Server::new_async().await;
        let _token = mock_token(&mut server).await;
        let _accounts = mock_accounts(&mut server, found_account()).await;
        let _issues = server
            .mock("POST", "/graphql")
            .match_body(issues_matcher())
            .with_status(200)
            .with_body(r#"{"errors":[{"message":"Resolver failed"}]}"#)
            .create_async()
            .await;

        let config = config_for(&server);
        let mut input = Cursor::new("111\n");
        let mut out = Vec::new();

        let err = run(&config, &mut input, &mut out).await.unwrap_err();

        assert!(matches!(err, WizError::Query(ref errors) if errors[0]["message"] == "Resolver failed"));
        assert!(!output_of(out).contains("SECURITY REVIEW SUMMARY"));
    }

    #[tokio::test]
    async fn test_run_auth_failure_stops_before_queries() {
        let mut server = Server::new_async().await;
        let _token = server
            .mock("POST", "/oauth/token")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;
        let graphql = server
            .mock("POST", "/graphql")
            .expect(0)
            .create_async()
            .await;

        let config = config_for(&server);
        let mut input = Cursor::new("111\n");
        let mut out = Vec::new();

        let err = run(&config, &mut input, &mut out).await.unwrap_err();

        assert!(matches!(err, WizError::Transport { .. }));
        assert!(!output_of(out).contains("Authentication successful!"));
        graphql.assert_async().await;
    }

    #[tokio::test]
    async fn test_run_account_search_failure_skips_issue_fetch() {
        let mut server = Server::new_async().await;
        let _token = mock_token(&mut server).await;
        let accounts = server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({
                "variables": { "externalId": ["111"] }
            })))
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;
        let issues = server
            .mock("POST", "/graphql")
            .match_body(issues_matcher())
            .expect(0)
            .create_async()
            .await;

        let config = config_for(&server);
        let mut input = Cursor::new("111\n");
        let mut out = Vec::new();

        let err = run(&config, &mut input, &mut out).await.unwrap_err();

        assert!(matches!(
            err,
            WizError::Transport { status, ref body, .. }
                if status == reqwest::StatusCode::BAD_GATEWAY && body == "bad gateway"
        ));
        let output = output_of(out);
        assert!(!output.contains("Found:"));
        assert!(!output.contains("SECURITY REVIEW SUMMARY"));
        accounts.assert_async().await;
        issues.assert_async().await;
    }

    #[tokio::test]
    async fn test_run_empty_account_id_makes_no_requests() {
        let mut server = Server::new_async().await;
        let token = server
            .mock("POST", "/oauth/token")
            .expect(0)
            .create_async()
            .await;

        let config = config_for(&server);
        let mut input = Cursor::new("\n");
        let mut out = Vec::new();

        let err = run(&config, &mut input, &mut out).await.unwrap_err();

        assert!(matches!(err, WizError::Config(_)));
        token.assert_async().await;
    }

    #[tokio::test]
    async fn test_run_opaque_token_still_completes_lookup() {
        let mut server = Server::new_async().await;
        let _token = server
            .mock("POST", "/oauth/token")
            .with_status(200)
            .with_body(r#"{"access_token":"opaque"}"#)
            .create_async()
            .await;
        let _accounts = server
            .mock("POST", "/graphql")
            .match_header("authorization", "Bearer opaque")
            .with_status(200)
            .with_body(r#"{"data":{"cloudAccounts":{"nodes":[]}}}"#)
            .create_async()
            .await;

        let config = config_for(&server);
        let mut input = Cursor::new("111\n");
        let mut out = Vec::new();

        let outcome = run(&config, &mut input, &mut out).await.unwrap();

        assert_eq!(outcome, Outcome::AccountNotFound);
        assert!(!output_of(out).contains("Token scopes:"));
    }
}
