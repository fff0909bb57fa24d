//! Router-level tests for the board API.
//!
//! Each test builds the full application over an in-memory store seeded with
//! the same boards, then drives it with `oneshot` requests.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use life::board::BoardManager;
use life::io::memory_store::MemoryStore;
use life::test_support::{CountingStore, blinker, dies_out, temp_file_store};
use life_server::app;
use life_server::state::AppState;

/// Seeds boards 1..=4: single cell, blinker, dies-out pattern, blinker.
fn seeded_app() -> Router {
    let boards = BoardManager::new(Arc::new(MemoryStore::new()));
    for cells in [vec![vec![true]], blinker(), dies_out(), blinker()] {
        boards.create(cells).expect("seed board");
    }
    app(AppState::new(boards, 1000))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, String::from_utf8(body.to_vec()).expect("utf-8 body"))
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::get(uri).body(Body::empty()).expect("request");
    let (status, body) = send(app, request).await;
    (status, serde_json::from_str(&body).expect("json body"))
}

async fn post_board(app: &Router, body: &str) -> (StatusCode, Value) {
    let request = Request::post("/board")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");
    let (status, body) = send(app, request).await;
    (status, serde_json::from_str(&body).expect("json body"))
}

/// 5x5 grid written as 0/1 for readability.
fn cells(rows: &[[u8; 5]; 5]) -> Value {
    let grid: Vec<Vec<bool>> = rows
        .iter()
        .map(|row| row.iter().map(|&c| c == 1).collect())
        .collect();
    json!(grid)
}

#[tokio::test]
async fn fetch_existing_board() {
    let app = seeded_app();
    let (status, body) = get_json(&app, "/board/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"id": 1, "cells": [[true]], "generation": 0, "final": false})
    );
}

#[tokio::test]
async fn create_new_board() {
    let app = seeded_app();
    let (status, body) = post_board(&app, r#"{"cells":[[true, false]]}"#).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"id": 5}));

    let (status, body) = get_json(&app, "/board/5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cells"], json!([[true, false]]));
}

#[tokio::test]
async fn blinker_advances_one_then_seventy_five() {
    let app = seeded_app();

    let (status, body) = get_json(&app, "/board/2?state=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 2);
    assert_eq!(
        body["cells"],
        cells(&[
            [0, 0, 0, 0, 0],
            [0, 0, 1, 0, 0],
            [0, 0, 1, 0, 0],
            [0, 0, 1, 0, 0],
            [0, 0, 0, 0, 0],
        ])
    );
    assert_eq!(body["generation"], 1);
    assert_eq!(body["final"], false);

    let (status, body) = get_json(&app, "/board/2?state=75").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["cells"],
        cells(&[
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 1, 1, 1, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
        ])
    );
    assert_eq!(body["generation"], 76);
    assert_eq!(body["final"], false);
}

#[tokio::test]
async fn request_past_extinction_returns_final_generation() {
    let app = seeded_app();
    let (status, body) = get_json(&app, "/board/3?state=100").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "id": 3,
            "cells": cells(&[[0; 5]; 5]),
            "generation": 14,
            "final": true
        })
    );
}

#[tokio::test]
async fn final_route_reports_unreached_final_state() {
    let app = seeded_app();
    let (status, body) = get_json(&app, "/board/4/final?state=1000").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "final state not reached"}));

    // The advance itself was still persisted.
    let (_, body) = get_json(&app, "/board/4").await;
    assert_eq!(body["generation"], 1000);
}

#[tokio::test]
async fn final_route_returns_extinct_board() {
    let app = seeded_app();
    let (status, body) = get_json(&app, "/board/3/final?state=20").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["generation"], 14);
    assert_eq!(body["final"], true);
}

#[tokio::test]
async fn final_route_requires_positive_state() {
    let app = seeded_app();
    for uri in ["/board/3/final", "/board/3/final?state=0", "/board/3/final?state=-4"] {
        let (status, body) = get_json(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body, json!({"error": "state must be greater than 0"}));
    }
}

#[tokio::test]
async fn state_above_ceiling_is_clamped() {
    let app = seeded_app();
    let (status, body) = get_json(&app, "/board/2?state=5000").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["generation"], 1000);
}

#[tokio::test]
async fn negative_state_is_a_plain_read() {
    let app = seeded_app();
    let (status, body) = get_json(&app, "/board/2?state=-10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["generation"], 0);
}

#[tokio::test]
async fn unknown_board_is_not_found() {
    let app = seeded_app();
    let (status, body) = get_json(&app, "/board/99?state=3").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "not found"}));
}

#[tokio::test]
async fn malformed_id_and_state_are_rejected() {
    let app = seeded_app();

    let (status, body) = get_json(&app, "/board/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "invalid id"}));

    // Well-formed but negative ids cannot exist.
    let (status, body) = get_json(&app, "/board/-1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "not found"}));

    let (status, body) = get_json(&app, "/board/1?state=ten").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "invalid state"}));
}

#[tokio::test]
async fn create_rejects_missing_or_empty_cells() {
    let app = seeded_app();

    let (status, body) = post_board(&app, "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "missing body"}));

    let (status, body) = post_board(&app, "{}").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "missing cells"}));

    let (status, body) = post_board(&app, "null").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "missing cells"}));

    let (status, body) = post_board(&app, r#"{"cells":[]}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "empty cells"}));

    let (status, body) = post_board(&app, r#"{"cells":"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn html_view_is_served_to_browsers() {
    let app = seeded_app();
    let request = Request::get("/board/2?state=1")
        .header(header::ACCEPT, "text/html")
        .body(Body::empty())
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"));

    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let html = String::from_utf8(body.to_vec()).expect("utf-8");
    assert!(html.contains("<h1>Board 2</h1>"));
    assert!(html.contains("Generation 1</p>"));
}

#[tokio::test]
async fn responses_allow_any_origin() {
    let app = seeded_app();
    let request = Request::get("/board/1")
        .header(header::ORIGIN, "https://editor.example")
        .body(Body::empty())
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn file_backed_app_persists_advances() {
    let (_temp, store) = temp_file_store().expect("store");
    let app = app(AppState::new(BoardManager::new(Arc::new(store)), 1000));

    let (status, body) = post_board(
        &app,
        r#"{"cells":[[false,true,false],[false,true,false],[false,true,false]]}"#,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"id": 1}));

    let (_, body) = get_json(&app, "/board/1?state=1").await;
    assert_eq!(
        body["cells"],
        json!([[false, false, false], [true, true, true], [false, false, false]])
    );

    let (_, body) = get_json(&app, "/board/1").await;
    assert_eq!(body["generation"], 1);
}

#[tokio::test]
async fn health_check_responds_ok() {
    let app = seeded_app();
    let request = Request::get("/health").body(Body::empty()).expect("request");
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn failed_save_is_an_internal_error() {
    let store = Arc::new(CountingStore::new(MemoryStore::new()));
    let boards = BoardManager::new(store.clone());
    boards.create(blinker()).expect("seed board");
    let app = app(AppState::new(boards, 1000));
    store.fail_saves(true);

    let (status, body) = get_json(&app, "/board/1?state=1").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().expect("error message");
    assert!(message.starts_with("save: "), "{message}");

    store.fail_saves(false);
    let (status, body) = get_json(&app, "/board/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["generation"], 0);
}
