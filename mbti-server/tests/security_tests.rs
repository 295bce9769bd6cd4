//! Security tests for mbti-server
//!
//! Tests security-critical features:
//! - Protected routes reject missing, tampered, foreign-secret and expired tokens
//! - Public routes stay reachable without a token
//! - Request bodies over the size limit are rejected

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::util::ServiceExt;
use uuid::Uuid;

use mbti_common::auth::{issue_token, Claims, TOKEN_TTL_MS};
use mbti_common::db::init_database;
use mbti_common::time;
use mbti_server::{build_router, AppState, MAX_BODY_BYTES};

const SECRET: &str = "security-test-secret";

async fn setup_app() -> (TempDir, Router) {
    let dir = tempfile::tempdir().expect("temp dir");
    let pool = init_database(&dir.path().join("mbti.db"))
        .await
        .expect("Database initialization failed");
    (dir, build_router(AppState::new(pool, SECRET)))
}

async fn get_results(app: &Router, authorization: Option<String>) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("GET")
        .uri("/api/personality/results");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }

    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn valid_token() -> String {
    issue_token(
        &Claims::new(Uuid::new_v4(), "alice", time::now_millis()),
        SECRET,
    )
    .unwrap()
}

// =============================================================================
// Bearer token checks
// =============================================================================

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let (_dir, app) = setup_app().await;

    let (status, body) = get_results(&app, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Authentication required");
}

#[tokio::test]
async fn test_non_bearer_scheme_is_unauthorized() {
    let (_dir, app) = setup_app().await;

    let (status, _) = get_results(&app, Some(format!("Basic {}", valid_token()))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = get_results(&app, Some("Bearer ".to_string())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_valid_token_is_accepted() {
    let (_dir, app) = setup_app().await;

    let (status, body) = get_results(&app, Some(format!("Bearer {}", valid_token()))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"], json!([]));
}

#[tokio::test]
async fn test_tampered_token_is_forbidden() {
    let (_dir, app) = setup_app().await;

    let mut token = valid_token();
    let last = token.pop().unwrap();
    token.push(if last == '0' { '1' } else { '0' });

    let (status, body) = get_results(&app, Some(format!("Bearer {}", token))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["message"], "Invalid or expired token");
}

#[tokio::test]
async fn test_token_from_other_secret_is_forbidden() {
    let (_dir, app) = setup_app().await;

    let token = issue_token(
        &Claims::new(Uuid::new_v4(), "alice", time::now_millis()),
        "some-other-secret",
    )
    .unwrap();

    let (status, _) = get_results(&app, Some(format!("Bearer {}", token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_expired_token_is_forbidden() {
    let (_dir, app) = setup_app().await;

    let issued_at = time::now_millis() - 2 * TOKEN_TTL_MS;
    let token = issue_token(&Claims::new(Uuid::new_v4(), "alice", issued_at), SECRET).unwrap();

    let (status, _) = get_results(&app, Some(format!("Bearer {}", token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_garbage_token_is_forbidden() {
    let (_dir, app) = setup_app().await;

    let (status, _) = get_results(&app, Some("Bearer not-a-token".to_string())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_public_routes_need_no_token() {
    let (_dir, app) = setup_app().await;

    for uri in ["/health", "/api/personality/questions"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
    }
}

#[tokio::test]
async fn test_unknown_route_is_not_found_without_token() {
    let (_dir, app) = setup_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Body Size Limit
// =============================================================================

#[tokio::test]
async fn test_oversized_body_rejected() {
    let (_dir, app) = setup_app().await;

    let padding = "x".repeat(MAX_BODY_BYTES + 1024);
    let body = json!({
        "username": padding,
        "email": "big@example.com",
        "password": "pw",
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
