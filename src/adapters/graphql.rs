use crate::domain::ports::GraphqlTransport;
use crate::utils::error::{ImportError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RelayRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<Value>,
}

/// Best available error text from a relay or GraphQL body.
fn error_message(body: &Value) -> Option<String> {
    if let Some(error) = body.get("error").and_then(Value::as_str) {
        return Some(error.to_string());
    }
    if let Some(message) = body.get("message").and_then(Value::as_str) {
        return Some(message.to_string());
    }
    body.get("errors")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first())
        .and_then(|first| first.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Posts GraphQL documents to the relay, which performs the authenticated
/// call against the statistics provider.
///
/// Two credentials travel with every request: `relay_token` authenticates to
/// the relay itself (bearer header) and `api_key` is forwarded upstream in the
/// body.
#[derive(Debug, Clone)]
pub struct GraphqlProxyClient {
    client: Client,
    relay_url: String,
    relay_token: String,
    api_key: String,
}

impl GraphqlProxyClient {
    pub fn new(
        relay_url: impl Into<String>,
        relay_token: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            relay_url: relay_url.into(),
            relay_token: relay_token.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl GraphqlTransport for GraphqlProxyClient {
    async fn call(&self, query: &str, variables: Option<Value>) -> Result<Value> {
        if self.api_key.trim().is_empty() {
            return Err(ImportError::config("statistics API key is empty"));
        }

        tracing::debug!("POST {} (GraphQL via relay)", self.relay_url);
        let response = self
            .client
            .post(&self.relay_url)
            .bearer_auth(&self.relay_token)
            .json(&RelayRequest {
                api_key: &self.api_key,
                query,
                variables,
            })
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Relay response status: {}", status);

        let text = response.text().await?;
        let body: Value = match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(e) if status.is_success() => return Err(e.into()),
            Err(_) => Value::Null,
        };

        if !status.is_success() {
            return Err(ImportError::remote(error_message(&body).unwrap_or_else(|| {
                format!(
                    "relay returned {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("")
                )
                .trim_end()
                .to_string()
            })));
        }

        if body.get("data").map_or(true, Value::is_null) {
            return Err(ImportError::remote(
                error_message(&body).unwrap_or_else(|| "response has no data field".to_string()),
            ));
        }

        Ok(body)
    }
}
