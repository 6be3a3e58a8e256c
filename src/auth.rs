mod token;

pub use token::{AccessToken, ClaimsError};

use log::{debug, info};
use reqwest::Client;
use serde::Deserialize;

use crate::config::Credentials;
use crate::error::{Result, WizError};
use crate::http::ensure_success;

const AUDIENCE: &str = "wiz-api";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
}

/// Exchange client credentials for a bearer token (OAuth2 client-credentials grant).
pub async fn authenticate(client: &Client, credentials: &Credentials) -> Result<AccessToken> {
    info!("Requesting access token from {}", credentials.auth_url);

    let form = [
        ("grant_type", "client_credentials"),
        ("client_id", credentials.client_id.as_str()),
        ("client_secret", credentials.client_secret.as_str()),
        ("audience", AUDIENCE),
    ];

    let response = client
        .post(credentials.auth_url.clone())
        .form(&form)
        .send()
        .await?;
    let response = ensure_success(response).await?;

    let body: TokenResponse = response.json().await?;
    if let Some(expires_in) = body.expires_in {
        debug!("Access token valid for {expires_in}s");
    }

    body.access_token
        .map(AccessToken::from)
        .ok_or_else(|| WizError::Auth("token response did not contain an access_token".into()))
}
