//! Stateless pass-through that forwards GraphQL calls to the statistics
//! provider with the caller's API key.
//!
//! `POST /` takes `{apiKey, query, variables?}`. Upstream JSON is returned
//! verbatim on success; every failure becomes HTTP 400 with
//! `{error, details}`.

use axum::{
    body::Bytes,
    extract::State,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderMap, HeaderName, Method, StatusCode,
    },
    routing::post,
    Json, Router,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

pub const DEFAULT_UPSTREAM_URL: &str = "https://api.grid.gg/live-data-feed/graphql";

const FAILURE_DETAILS: &str = "Failed to call statistics API";

#[derive(Debug, Clone)]
pub struct RelayState {
    client: Client,
    upstream_url: String,
    access_token: Option<String>,
}

impl RelayState {
    /// `access_token`, when set, must arrive as `Authorization: Bearer <token>`.
    pub fn new(upstream_url: impl Into<String>, access_token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            upstream_url: upstream_url.into(),
            access_token: access_token.filter(|t| !t.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelayPayload {
    api_key: Option<String>,
    #[serde(default)]
    query: String,
    variables: Option<Value>,
}

#[derive(Debug, Serialize)]
struct RelayFailure {
    error: String,
    details: String,
}

type RelayResponse = (StatusCode, Json<Value>);

fn failure(status: StatusCode, error: impl Into<String>) -> RelayResponse {
    let body = RelayFailure {
        error: error.into(),
        details: FAILURE_DETAILS.to_string(),
    };
    (status, Json(json!(body)))
}

pub fn create_router(state: RelayState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ]);

    Router::new()
        .route("/", post(relay_graphql).options(|| async { "ok" }))
        .with_state(state)
        .layer(cors)
}

fn is_authorized(state: &RelayState, headers: &HeaderMap) -> bool {
    let Some(expected) = state.access_token.as_deref() else {
        return true;
    };
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| token == expected)
}

/// POST /
async fn relay_graphql(
    State(state): State<RelayState>,
    headers: HeaderMap,
    body: Bytes,
) -> RelayResponse {
    if !is_authorized(&state, &headers) {
        return failure(StatusCode::UNAUTHORIZED, "Missing or invalid relay token");
    }

    let payload: RelayPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => return failure(StatusCode::BAD_REQUEST, format!("Invalid request body: {}", e)),
    };

    let Some(api_key) = payload.api_key.filter(|k| !k.trim().is_empty()) else {
        return failure(StatusCode::BAD_REQUEST, "Statistics API key is required");
    };

    let upstream_body = json!({
        "query": payload.query,
        "variables": payload.variables.unwrap_or_else(|| json!({})),
    });

    let response = match state
        .client
        .post(&state.upstream_url)
        .bearer_auth(&api_key)
        .json(&upstream_body)
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Error calling statistics API: {}", e);
            return failure(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    let status = response.status();
    let data: Value = match response.json().await {
        Ok(data) => data,
        Err(e) => {
            tracing::error!("Unreadable statistics API response ({}): {}", status, e);
            return failure(StatusCode::BAD_REQUEST, format!("Invalid upstream response: {}", e));
        }
    };

    if !status.is_success() {
        let message = data
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error");
        tracing::error!("Statistics API returned {}", status);
        return failure(
            StatusCode::BAD_REQUEST,
            format!("upstream error: {} - {}", status.as_u16(), message),
        );
    }

    tracing::info!("Relayed GraphQL call ({})", status);
    (StatusCode::OK, Json(data))
}
