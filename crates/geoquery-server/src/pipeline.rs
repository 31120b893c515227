//! The query orchestration pipeline.
//!
//! Five sequential stages with no back-branching:
//! intent extraction → payload construction → geosearch call → tile
//! aggregation → response assembly. Only the geosearch call can fail the
//! request; every assistant-side failure degrades to searching on the raw
//! query text.

use serde::{Deserialize, Serialize};

use geoquery_assistant::{intent_from_response, AssistantClient, ExtractedIntent};
use geoquery_search::{aggregate_tiles, GeosearchClient, SearchError, SearchPayload};

/// Inbound request body for `POST /api/v1/process_query`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryRequest {
    pub query: Option<String>,
    /// Accepted for forward compatibility with image queries; does not
    /// currently affect the search payload.
    pub b64_image: Option<String>,
}

/// Outbound response body. The three sequences are index-aligned and always
/// the same length.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub lat_longs: Vec<[f64; 2]>,
    pub input_caption: String,
    pub captions: Vec<String>,
    pub thumbnails: Vec<Option<String>>,
}

/// Runs one query through the full pipeline.
///
/// # Errors
///
/// Returns [`SearchError`] only for geosearch failures (transport, non-2xx,
/// non-JSON body); assistant failures never propagate.
pub async fn run_query(
    assistant: Option<&AssistantClient>,
    search: &GeosearchClient,
    request: QueryRequest,
) -> Result<QueryResponse, SearchError> {
    let query_text = request.query.unwrap_or_default();
    if request.b64_image.is_some() {
        tracing::debug!("ignoring b64_image; image search is not wired into the payload");
    }

    let intent = if query_text.is_empty() {
        // Nothing to parse; skip the assistant call entirely.
        ExtractedIntent::fallback("")
    } else {
        extract_intent(assistant, &query_text).await
    };
    tracing::debug!(
        content = %intent.content,
        location = ?intent.location,
        has_bbox = intent.bbox.is_some(),
        "extracted intent"
    );

    let payload = SearchPayload::new(&intent.content, intent.bbox);
    let tiles = search.search(&payload).await?;

    let set = aggregate_tiles(&tiles);
    tracing::info!(
        tiles = tiles.len(),
        usable = set.len(),
        "aggregated geosearch tiles"
    );

    Ok(QueryResponse {
        lat_longs: set.coordinates.iter().map(|c| [c.lat, c.lon]).collect(),
        input_caption: intent.content,
        captions: set.captions,
        thumbnails: set.thumbnails,
    })
}

/// Stage one: derive structured intent from the query text.
///
/// An unconfigured assistant, a failed call, or unparseable output all fall
/// back to `{content: query, location: None, bbox: None}`.
async fn extract_intent(assistant: Option<&AssistantClient>, query: &str) -> ExtractedIntent {
    let Some(client) = assistant else {
        tracing::info!("assistant not configured; searching on raw query text");
        return ExtractedIntent::fallback(query);
    };

    match client.parse_query(query).await {
        Ok(text) => intent_from_response(&text, query),
        Err(error) => {
            tracing::warn!(%error, "assistant call failed; searching on raw query text");
            ExtractedIntent::fallback(query)
        }
    }
}
