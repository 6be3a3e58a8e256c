use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

/// Bearer token returned by the client-credentials exchange.
pub struct AccessToken(String);

#[derive(Error, Debug)]
pub enum ClaimsError {
    #[error("token is not a three-part JWT")]
    Malformed,

    #[error("token payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("token payload is not a JSON object: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<&str> for AccessToken {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for AccessToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the payload segment without verifying the signature.
    ///
    /// Only used for diagnostics; the platform is the authority on what the
    /// token grants.
    pub fn claims(&self) -> std::result::Result<Map<String, Value>, ClaimsError> {
        let mut parts = self.0.split('.');
        let (Some(_), Some(payload), Some(_), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ClaimsError::Malformed);
        };

        let payload = payload.trim_end_matches('=');
        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .or_else(|_| STANDARD_NO_PAD.decode(payload))?;

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// The `scope` claim; a list of scopes is joined with spaces.
    pub fn scope(&self) -> std::result::Result<Option<String>, ClaimsError> {
        let claims = self.claims()?;

        let scope = match claims.get("scope") {
            Some(Value::String(scope)) => Some(scope.clone()),
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            _ => None,
        };

        Ok(scope)
    }

    pub fn expires_at(&self) -> std::result::Result<Option<DateTime<Utc>>, ClaimsError> {
        let claims = self.claims()?;

        Ok(claims
            .get("exp")
            .and_then(Value::as_i64)
            .and_then(|secs| DateTime::from_timestamp(secs, 0)))
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<redacted>")
    }
}
