//! HTTP API tests
//!
//! Drives the router in-process with `tower::ServiceExt::oneshot`.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use biorisk_guard::ledger::{read_jsonl, verify_blocks};
use biorisk_guard::server;

mod common;
use common::*;

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn json(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = server::router(create_test_service(7.0));
    let (status, body) = send(&app, "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["status"], "healthy");
}

#[tokio::test]
async fn test_assessment_appends_to_ledger() {
    let app = server::router(create_test_service(7.0));

    let (status, body) = send(&app, "POST", "/vendors/V2/assessments").await;
    assert_eq!(status, StatusCode::CREATED);
    let block = json(&body);
    assert_eq!(block["id"], 1);
    assert_eq!(block["subjectId"], "V2");

    let (status, body) = send(&app, "GET", "/ledger").await;
    assert_eq!(status, StatusCode::OK);
    let blocks = json(&body);
    let blocks = blocks.as_array().unwrap();
    assert_eq!(blocks.len(), 2);
    // Most recent first
    assert_eq!(blocks[0]["id"], 1);
    assert_eq!(blocks[1]["previousHash"], biorisk_guard::ledger::GENESIS_PREVIOUS_HASH);
}

#[tokio::test]
async fn test_unknown_vendor_is_not_found() {
    let app = server::router(create_test_service(7.0));
    let (status, body) = send(&app, "POST", "/vendors/V404/assessments").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json(&body)["error"].as_str().unwrap().contains("V404"));
}

#[tokio::test]
async fn test_verify_and_merkle_root() {
    let app = server::router(create_test_service(7.0));
    for vendor in ["V1", "V3", "V5"] {
        send(&app, "POST", &format!("/vendors/{}/assessments", vendor)).await;
    }

    let (status, body) = send(&app, "GET", "/ledger/verify").await;
    assert_eq!(status, StatusCode::OK);
    let verification = json(&body);
    assert_eq!(verification["valid"], true);
    assert_eq!(verification["blockCount"], 4);
    assert!(verification.get("brokenAtIndex").is_none());

    let (status, body) = send(&app, "GET", "/ledger/merkle-root").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json(&body)["merkleRoot"].as_str().unwrap().starts_with("sha256:"));
}

#[tokio::test]
async fn test_export_is_verifiable_jsonl() {
    let app = server::router(create_test_service(7.0));
    send(&app, "POST", "/vendors/V4/assessments").await;
    send(&app, "POST", "/vendors/V4/assessments").await;

    let (status, body) = send(&app, "GET", "/ledger/export").await;
    assert_eq!(status, StatusCode::OK);

    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("export.jsonl");
    std::fs::write(&path, body).unwrap();

    let blocks = read_jsonl(&path).unwrap();
    assert_eq!(blocks.len(), 3);
    assert!(verify_blocks(&blocks).valid);
}

#[tokio::test]
async fn test_alerts_endpoint_matches_threshold() {
    // Threshold zero alerts on every assessment
    let app = server::router(create_test_service(0.0));
    send(&app, "POST", "/vendors/V1/assessments").await;
    send(&app, "POST", "/vendors/V2/assessments").await;

    let (status, body) = send(&app, "GET", "/alerts").await;
    assert_eq!(status, StatusCode::OK);
    let alerts = json(&body);
    let alerts = alerts.as_array().unwrap();
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0]["subjectId"], "V1");
    assert_eq!(alerts[1]["blockId"], 2);
}
