// SPDX-FileCopyrightText: 2026 Jotsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router-level tests driving the journal API through `tower::ServiceExt::oneshot`.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use insta::assert_json_snapshot;
use jotsync_gateway::{AppState, build_router};
use jotsync_test_utils::TestHarness;
use serde_json::{Value, json};
use tower::ServiceExt;

fn router(h: &TestHarness) -> Router {
    build_router(AppState::new(h.service.clone()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn entry_body(client_id: &str, timestamp: i64) -> Value {
    json!({
        "client_id": client_id,
        "prompt": "What went well today?",
        "text": "Shipped the sync endpoint.",
        "timestamp": timestamp,
    })
}

#[tokio::test]
async fn liveness_endpoints() {
    let h = TestHarness::memory().await.unwrap();
    let app = router(&h);

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_json_snapshot!(body, @r#"
    {
      "status": "healthy"
    }
    "#);

    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "AI Journal API is running");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn create_returns_full_entry() {
    let h = TestHarness::sqlite().await.unwrap();
    let app = router(&h);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/journals",
        Some(entry_body("c-1", 1_700_000_000_000)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_json_snapshot!(body, {
        ".created_at" => "[timestamp]",
        ".updated_at" => "[timestamp]"
    }, @r#"
    {
      "client_id": "c-1",
      "created_at": "[timestamp]",
      "prompt": "What went well today?",
      "surrogate_id": 1,
      "text": "Shipped the sync endpoint.",
      "timestamp": 1700000000000,
      "updated_at": "[timestamp]"
    }
    "#);
}

#[tokio::test]
async fn posting_existing_client_id_updates_in_place() {
    let h = TestHarness::sqlite().await.unwrap();
    let app = router(&h);

    let (_, first) = send(&app, Method::POST, "/api/journals", Some(entry_body("c-1", 100))).await;
    let (status, second) = send(
        &app,
        Method::POST,
        "/api/journals",
        Some(json!({
            "client_id": "c-1",
            "prompt": "p2",
            "text": "t2",
            "timestamp": 200,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["surrogate_id"], first["surrogate_id"]);
    assert_eq!(second["created_at"], first["created_at"]);
    assert_eq!(second["text"], "t2");
    assert_eq!(second["timestamp"], 200);

    let (_, page) = send(&app, Method::GET, "/api/journals", None).await;
    assert_eq!(page["count"], 1);
}

#[tokio::test]
async fn create_rejects_bad_bodies() {
    let h = TestHarness::memory().await.unwrap();
    let app = router(&h);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/journals",
        Some(json!({"client_id": "a", "prompt": "p", "text": "t"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("timestamp"));

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/journals",
        Some(json!({"client_id": "a", "prompt": "p", "text": "t", "timestamp": "soon"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(&app, Method::POST, "/api/journals", Some(entry_body("", 1))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_json_snapshot!(body, @r#"
    {
      "detail": "client_id must not be empty"
    }
    "#);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/journals")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (_, listing) = send(&app, Method::GET, "/api/journals", None).await;
    assert_eq!(listing["count"], 0);
}

#[tokio::test]
async fn list_filters_paginates_and_reports_total() {
    let h = TestHarness::sqlite().await.unwrap();
    for ts in [100, 300, 200, 400] {
        h.seed(&format!("e{ts}"), ts).await.unwrap();
    }
    let app = router(&h);

    let (status, body) = send(&app, Method::GET, "/api/journals?since=100&skip=1&limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["journals"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["client_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["e300", "e200"]);
    assert_eq!(body["count"], 4);
}

#[tokio::test]
async fn list_rejects_bad_query_values() {
    let h = TestHarness::memory().await.unwrap();
    let app = router(&h);

    for uri in [
        "/api/journals?skip=-1",
        "/api/journals?limit=0",
        "/api/journals?limit=abc",
        "/api/journals?since=yesterday",
    ] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
        assert!(body["detail"].is_string(), "{uri}");
    }
}

#[tokio::test]
async fn unknown_client_id_is_404() {
    let h = TestHarness::memory().await.unwrap();
    let app = router(&h);

    let (status, body) = send(&app, Method::GET, "/api/journals/ghost", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_json_snapshot!(body, @r#"
    {
      "detail": "Journal not found"
    }
    "#);

    let (status, body) = send(&app, Method::DELETE, "/api/journals/ghost", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_json_snapshot!(body, @r#"
    {
      "detail": "Journal not found"
    }
    "#);

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/journals/ghost",
        Some(json!({"text": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Journal not found");
}

#[tokio::test]
async fn put_merges_only_supplied_fields() {
    let h = TestHarness::sqlite().await.unwrap();
    let app = router(&h);
    send(&app, Method::POST, "/api/journals", Some(entry_body("c-1", 100))).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/journals/c-1",
        Some(json!({"text": "edited"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "edited");
    assert_eq!(body["prompt"], "What went well today?");
    assert_eq!(body["timestamp"], 100);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/journals/c-1",
        Some(json!({"prompt": null})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, fetched) = send(&app, Method::GET, "/api/journals/c-1", None).await;
    assert_eq!(fetched["prompt"], "What went well today?");
    assert_eq!(fetched["text"], "edited");
}

#[tokio::test]
async fn delete_then_get_is_404() {
    let h = TestHarness::sqlite().await.unwrap();
    let app = router(&h);
    send(&app, Method::POST, "/api/journals", Some(entry_body("c-1", 100))).await;

    let (status, body) = send(&app, Method::DELETE, "/api/journals/c-1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_json_snapshot!(body, @r#"
    {
      "message": "Journal deleted successfully",
      "success": true
    }
    "#);

    let (status, _) = send(&app, Method::GET, "/api/journals/c-1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn storage_failure_is_503() {
    let h = TestHarness::memory().await.unwrap();
    h.memory_store().unwrap().set_unavailable(true);
    let app = router(&h);

    let (status, body) = send(&app, Method::GET, "/api/journals", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["detail"], "Storage unavailable");
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let h = TestHarness::memory().await.unwrap();
    let app = router(&h);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/journals")
                .header(header::ORIGIN, "http://192.168.1.20:19006")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );

    let preflight = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/journals/c-1")
                .header(header::ORIGIN, "https://example.org")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(preflight.status(), StatusCode::OK);
    assert!(
        preflight
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS)
    );
}
