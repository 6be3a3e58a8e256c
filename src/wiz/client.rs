use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

use crate::auth::AccessToken;
use crate::error::{Result, WizError};
use crate::http::ensure_success;

pub struct WizClient {
    pub client: Client,
    pub api_url: Url,
    pub token: AccessToken,
}

#[derive(Debug, Serialize)]
struct QueryBody<'a> {
    query: &'a str,
    variables: Map<String, Value>,
}

impl WizClient {
    pub fn new(client: Client, api_url: Url, token: AccessToken) -> Self {
        Self {
            client,
            api_url,
            token,
        }
    }

    /// Execute a GraphQL document and return its `data` member.
    ///
    /// # Errors
    /// * `Transport` if the endpoint answers with a non-2xx status
    /// * `Query` if the response carries an `errors` member (even `null` or
    ///   alongside data); the member is kept as received
    pub async fn run_query(
        &self,
        query: &str,
        variables: Option<Map<String, Value>>,
    ) -> Result<Value> {
        let body = QueryBody {
            query,
            variables: variables.unwrap_or_default(),
        };

        debug!("POST {} ({} bytes of query)", self.api_url, query.len());

        let response = self
            .client
            .post(self.api_url.clone())
            .bearer_auth(self.token.as_str())
            .json(&body)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let mut envelope: Map<String, Value> = response.json().await?;
        if let Some(errors) = envelope.remove("errors") {
            return Err(WizError::Query(errors));
        }

        match envelope.remove("data") {
            None | Some(Value::Null) => Ok(Value::Object(Map::new())),
            Some(data) => Ok(data),
        }
    }

    /// Like [`run_query`](Self::run_query), deserialising `data` into `T`.
    pub async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Option<Map<String, Value>>,
    ) -> Result<T> {
        let data = self.run_query(query, variables).await?;
        Ok(serde_json::from_value(data)?)
    }
}
