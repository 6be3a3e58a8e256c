use thiserror::Error;

#[derive(Error, Debug)]
pub enum WizError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Request to {url} failed with status {status}: {body}")]
    Transport {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response's `errors` member, exactly as received.
    #[error("GraphQL errors: {0}")]
    Query(serde_json::Value),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WizError>;
