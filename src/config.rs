use std::env;

use url::Url;

use crate::error::{Result, WizError};

pub const CLIENT_ID_VAR: &str = "WIZ_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "WIZ_CLIENT_SECRET";
pub const AUTH_URL_VAR: &str = "WIZ_AUTH_URL";
pub const API_URL_VAR: &str = "WIZ_API_URL";
pub const INSECURE_VAR: &str = "WIZ_INSECURE_SKIP_TLS_VERIFY";

/// Service-account credentials and the two endpoints they are used against.
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: Url,
    pub api_url: Url,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("auth_url", &self.auth_url.as_str())
            .field("api_url", &self.api_url.as_str())
            .finish()
    }
}

#[derive(Debug)]
pub struct Config {
    pub credentials: Credentials,
    pub accept_invalid_certs: bool,
}

impl Config {
    /// Read every setting from the process environment.
    ///
    /// Credentials are never accepted on the command line.
    pub fn from_env() -> Result<Self> {
        Self::new(
            env::var(CLIENT_ID_VAR).ok(),
            env::var(CLIENT_SECRET_VAR).ok(),
            env::var(AUTH_URL_VAR).ok(),
            env::var(API_URL_VAR).ok(),
            parse_flag(env::var(INSECURE_VAR).ok(), INSECURE_VAR)?,
        )
    }

    /// Validate raw values (usually sourced from the environment).
    ///
    /// Fails before any network activity if a value is missing, blank, or
    /// an endpoint is not an absolute URL.
    pub fn new(
        client_id: Option<String>,
        client_secret: Option<String>,
        auth_url: Option<String>,
        api_url: Option<String>,
        accept_invalid_certs: bool,
    ) -> Result<Self> {
        let client_id = required(client_id, CLIENT_ID_VAR)?;
        let client_secret = required(client_secret, CLIENT_SECRET_VAR)?;
        let auth_url = parse_url(&required(auth_url, AUTH_URL_VAR)?, AUTH_URL_VAR)?;
        let api_url = parse_url(&required(api_url, API_URL_VAR)?, API_URL_VAR)?;

        Ok(Self {
            credentials: Credentials {
                client_id,
                client_secret,
                auth_url,
                api_url,
            },
            accept_invalid_certs,
        })
    }
}

fn required(value: Option<String>, var: &str) -> Result<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(WizError::Config(format!("{var} is not set"))),
    }
}

/// Unset or blank means `false`.
fn parse_flag(value: Option<String>, var: &str) -> Result<bool> {
    let Some(value) = value else {
        return Ok(false);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        other => Err(WizError::Config(format!(
            "{var} must be true or false, got {other:?}"
        ))),
    }
}

fn parse_url(value: &str, var: &str) -> Result<Url> {
    Url::parse(value).map_err(|e| WizError::Config(format!("{var} is not a valid URL: {e}")))
}
