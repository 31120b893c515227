//! HTTP client for the geosearch `/tiles/search` endpoint.
//!
//! Unlike the assistant, geosearch failures are fatal to the enclosing
//! query: there is no safe placeholder for search results, so transport
//! errors, non-2xx statuses, and non-JSON bodies all propagate as
//! [`SearchError`]. A well-formed body with a missing or non-array `tiles`
//! field is an empty result set, not an error.

use std::time::Duration;

use reqwest::{Client, Url};
use serde_json::Value;

use crate::error::SearchError;
use crate::payload::SearchPayload;

const SEARCH_PATH: &str = "tiles/search";

/// Client for the geosearch tile index.
///
/// Use [`GeosearchClient::new`] with the configured base URL, or point it at
/// a wiremock server in tests.
pub struct GeosearchClient {
    client: Client,
    search_url: Url,
}

impl GeosearchClient {
    /// Creates a client for the geosearch service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SearchError::InvalidUrl`] if `base_url`
    /// does not parse as a URL.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent.to_owned())
            .build()?;

        let raw = format!("{}/{SEARCH_PATH}", base_url.trim_end_matches('/'));
        let search_url =
            Url::parse(&raw).map_err(|_| SearchError::InvalidUrl(base_url.to_string()))?;

        Ok(Self { client, search_url })
    }

    /// Posts a search payload and returns the raw tile records.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Http`] on network failure or timeout.
    /// - [`SearchError::Status`] on a non-2xx response; the (truncated) body
    ///   is preserved for the error response.
    /// - [`SearchError::Deserialize`] if the body is not valid JSON.
    pub async fn search(&self, payload: &SearchPayload) -> Result<Vec<Value>, SearchError> {
        tracing::info!(
            url = %self.search_url,
            has_text = payload.text.is_some(),
            has_bbox = payload.bbox.is_some(),
            "posting geosearch request"
        );

        let response = self
            .client
            .post(self.search_url.clone())
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SearchError::Status {
                status: status.as_u16(),
                body: truncate(&body, 1000),
            });
        }

        let document: Value =
            serde_json::from_str(&body).map_err(|e| SearchError::Deserialize {
                context: self.search_url.to_string(),
                source: e,
            })?;

        Ok(extract_tiles(document))
    }
}

/// Pulls the `tiles` array out of a search response document.
///
/// A missing or non-array `tiles` field is a valid empty result, matching
/// how the index responds to queries with no hits.
fn extract_tiles(document: Value) -> Vec<Value> {
    match document {
        Value::Object(mut obj) => match obj.remove("tiles") {
            Some(Value::Array(tiles)) => tiles,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn truncate(body: &str, limit: usize) -> String {
    if body.len() <= limit {
        body.to_string()
    } else {
        let mut end = limit;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &body[..end])
    }
}
