use log::warn;
use reqwest::{Client, Response};

use crate::error::{Result, WizError};

const USER_AGENT: &str = concat!("wiz-review/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by every request of a run.
pub fn build_client(accept_invalid_certs: bool) -> Result<Client> {
    if accept_invalid_certs {
        warn!("TLS certificate verification is disabled");
    }

    Client::builder()
        .user_agent(USER_AGENT)
        .danger_accept_invalid_certs(accept_invalid_certs)
        .build()
        .map_err(|e| WizError::Config(format!("Failed to create HTTP client: {e}")))
}

/// Turn a non-2xx response into a `Transport` error carrying the body.
pub async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    Err(WizError::Transport { url, status, body })
}
