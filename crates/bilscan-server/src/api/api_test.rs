use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::Request;
use bilscan_core::{EnrichedRecord, ListingReference, RegistryRecord};
use bilscan_scraper::SiteClient;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use super::*;

fn test_state() -> AppState {
    let site = SiteClient::new("bilscan-test/0.1", "nb-NO", 5, 5).expect("site client");
    AppState {
        scanner: Arc::new(Scanner::new(site, None, 2)),
        store: BatchStore::new(Duration::from_secs(60)),
        default_max_results: 200,
    }
}

fn record(id: &str, price: Option<i64>, country: Option<&str>) -> EnrichedRecord {
    let mut r = EnrichedRecord::bare(ListingReference {
        id: id.to_string(),
        url: format!("https://www.finn.no/mobility/item/{id}"),
    });
    r.price = price;
    r.registry = country.map(|c| {
        RegistryRecord(json!({
            "godkjenning": {
                "forstegangsGodkjenning": {
                    "bruktimport": { "importland": { "landNavn": c } }
                }
            }
        }))
    });
    r
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json parse")
}

#[test]
fn validation_error_maps_to_bad_request() {
    let response = ApiError::validation("req-1", "invalid input").into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn error_codes_map_to_statuses() {
    assert_eq!(ErrorCode::NotFound.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        serde_json::to_value(ErrorCode::ValidationError).expect("serialize"),
        json!("validation_error")
    );
}

#[tokio::test]
async fn health_echoes_request_id() {
    let app = build_app(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
        Some("req-42")
    );
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["meta"]["request_id"], "req-42");
}

#[tokio::test]
async fn unknown_route_uses_error_envelope() {
    let app = build_app(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/nope")
                .header("x-request-id", "req-404")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "not_found");
    assert_eq!(json["meta"]["request_id"], "req-404");
}

#[tokio::test]
async fn oversized_request_id_is_replaced() {
    let app = build_app(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .header("x-request-id", "r".repeat(500))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    let echoed = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .expect("request id header")
        .to_owned();
    assert!(Uuid::parse_str(&echoed).is_ok());
    let json = body_json(response).await;
    assert_eq!(json["meta"]["request_id"], echoed);
}

#[tokio::test]
async fn results_are_filtered_and_sorted() {
    let state = test_state();
    let session = Uuid::new_v4();
    state
        .store
        .put(
            session,
            vec![
                record("1", Some(300), Some("Tyskland")),
                record("2", None, None),
                record("3", Some(100), Some("Tyskland")),
            ],
        )
        .await;

    let app = build_app(state);
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/scans/{session}?country=imported"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let ids: Vec<&str> = json["data"]["records"]
        .as_array()
        .expect("records array")
        .iter()
        .filter_map(|r| r["listing"]["id"].as_str())
        .collect();
    assert_eq!(ids, ["3", "1"]);
    assert_eq!(json["data"]["selected_filter"], "imported");
    assert_eq!(json["data"]["countries"], json!(["Tyskland", "unknown"]));
    assert_eq!(json["data"]["histogram"][0]["country"], "Tyskland");
    assert_eq!(json["data"]["histogram"][0]["count"], 2);
}

#[tokio::test]
async fn unknown_session_yields_empty_view() {
    let app = build_app(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/scans/{}?country=Sverige", Uuid::new_v4()))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["records"], json!([]));
    assert_eq!(json["data"]["selected_filter"], "all");
}

#[tokio::test]
async fn malformed_session_id_is_rejected() {
    let app = build_app(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/scans/not-a-uuid")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn delete_clears_session() {
    let state = test_state();
    let session = Uuid::new_v4();
    state.store.put(session, vec![record("1", Some(1), None)]).await;

    let app = build_app(state.clone());
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/v1/scans/{session}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(state.store.get(session).await.is_none());
}

#[tokio::test]
async fn scan_rejects_zero_max_results() {
    let app = build_app(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/scans")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({"search_url": "https://www.finn.no/mobility/search/car", "max_results": 0})
                        .to_string(),
                ))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn scan_with_malformed_url_stores_empty_batch_in_existing_session() {
    let state = test_state();
    let session = Uuid::new_v4();
    state.store.put(session, vec![record("old", Some(1), None)]).await;

    let app = build_app(state.clone());
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/scans")
                .header("content-type", "application/json")
                .header("x-session-id", session.to_string())
                .body(Body::from(
                    json!({"search_url": "not a url", "max_results": 10}).to_string(),
                ))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["session_id"], session.to_string());
    assert_eq!(json["data"]["listing_count"], 0);

    let stored = state.store.get(session).await.expect("batch stored");
    assert!(stored.is_empty(), "previous batch must be replaced");
}
