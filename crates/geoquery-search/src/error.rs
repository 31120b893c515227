use thiserror::Error;

/// Errors returned by the geosearch client.
///
/// All of these are fatal to the enclosing query: there is no safe
/// placeholder for search results, so nothing here is defaulted or retried.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL could not be parsed. Surfaces at startup,
    /// never during a request.
    #[error("invalid geosearch base URL '{0}'")]
    InvalidUrl(String),

    /// The geosearch service returned a non-2xx status.
    #[error("geosearch returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not valid JSON.
    #[error("invalid JSON from geosearch at {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
