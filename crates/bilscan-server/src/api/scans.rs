use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use bilscan_core::{aggregate, AggregateView, CountryFilter};
use bilscan_scraper::correlatable;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

/// Header a client sends to rescan within an existing session.
pub(super) const SESSION_HEADER: &str = "x-session-id";

#[derive(Debug, Deserialize)]
pub(super) struct ScanRequest {
    pub search_url: String,
    pub max_results: Option<usize>,
}

#[derive(Debug, Serialize)]
pub(super) struct ScanSummary {
    session_id: Uuid,
    listing_count: usize,
    with_identifier_count: usize,
    with_registry_count: usize,
}

#[derive(Debug, Deserialize)]
pub(super) struct ResultsQuery {
    pub country: Option<String>,
}

fn parse_session(request_id: &str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| {
        ApiError::validation(request_id, format!("invalid session id \"{raw}\""))
    })
}

/// Runs a full scan and stores the batch under the caller's session.
///
/// Any batch the session held before is discarded before scanning starts.
pub(super) async fn start_scan(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    Json(body): Json<ScanRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ScanSummary>>), ApiError> {
    let max_results = body.max_results.unwrap_or(state.default_max_results);
    if max_results == 0 {
        return Err(ApiError::validation(
            req_id.0,
            "max_results must be greater than zero",
        ));
    }

    let session_id = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .unwrap_or_else(Uuid::new_v4);

    state.store.clear(session_id).await;
    tracing::info!(%session_id, search_url = %body.search_url, max_results, "scan started");

    let batch = state.scanner.scan(&body.search_url, max_results).await;
    let summary = ScanSummary {
        session_id,
        listing_count: batch.len(),
        with_identifier_count: correlatable(&batch),
        with_registry_count: batch.iter().filter(|r| r.registry.is_some()).count(),
    };
    state.store.put(session_id, batch).await;

    tracing::info!(
        %session_id,
        listing_count = summary.listing_count,
        with_registry_count = summary.with_registry_count,
        "scan finished"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(summary, req_id.0)),
    ))
}

/// Aggregate view of a session's batch. A session with no stored batch
/// yields an empty view rather than an error.
pub(super) async fn get_results(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(session_id): Path<String>,
    Query(query): Query<ResultsQuery>,
) -> Result<Json<ApiResponse<AggregateView>>, ApiError> {
    let session_id = parse_session(&req_id.0, &session_id)?;
    let filter = CountryFilter::parse(query.country.as_deref().unwrap_or_default());

    let data = match state.store.get(session_id).await {
        Some(batch) if !batch.is_empty() => aggregate(&batch, &filter),
        _ => AggregateView::empty(&CountryFilter::All),
    };

    Ok(Json(ApiResponse::new(data, req_id.0)))
}

pub(super) async fn clear_results(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let session_id = parse_session(&req_id.0, &session_id)?;
    state.store.clear(session_id).await;
    Ok(StatusCode::NO_CONTENT)
}
