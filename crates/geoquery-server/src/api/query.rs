use axum::{extract::State, http::StatusCode, Extension, Json};

use geoquery_search::SearchError;

use crate::middleware::RequestId;
use crate::pipeline::{run_query, QueryRequest, QueryResponse};

use super::{ApiError, AppState};

pub(super) async fn process_query(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    let response = run_query(state.assistant.as_deref(), &state.search, request)
        .await
        .map_err(|e| map_search_error(req_id.0, &e))?;

    Ok(Json(response))
}

/// Maps fatal geosearch failures onto API error responses.
///
/// An upstream non-2xx keeps its status so the caller can distinguish index
/// errors from gateway errors; transport and decoding failures are 502.
fn map_search_error(request_id: String, error: &SearchError) -> ApiError {
    tracing::error!(%error, "geosearch request failed");
    match error {
        SearchError::Status { status, .. } => {
            let status_code =
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY);
            ApiError::new(
                status_code,
                request_id,
                "upstream_error",
                format!("geosearch returned {status}"),
            )
        }
        SearchError::Http(_) => ApiError::new(
            StatusCode::BAD_GATEWAY,
            request_id,
            "bad_gateway",
            "error contacting geosearch service",
        ),
        SearchError::Deserialize { .. } => ApiError::new(
            StatusCode::BAD_GATEWAY,
            request_id,
            "bad_gateway",
            "invalid JSON from geosearch service",
        ),
        SearchError::InvalidUrl(_) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            request_id,
            "internal_error",
            "geosearch client misconfigured",
        ),
    }
}
