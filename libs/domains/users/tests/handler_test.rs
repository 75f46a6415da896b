//! Handler tests for the Users domain
//!
//! These drive `handlers::router` over the in-memory repository and check:
//! - status codes for every route
//! - JSON bodies, including the error shape
//! - that storage is left untouched by rejected requests
//!
//! The Postgres-backed variant lives in `integration_test.rs`.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::middleware;
use axum_helpers::{ApiKeyConfig, ErrorResponse, api_key_auth};
use domain_users::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

fn app() -> (Router, InMemoryUserRepository) {
    let repo = InMemoryUserRepository::new();
    let router = handlers::router(UserService::new(repo.clone()));
    (router, repo)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::delete(uri).body(Body::empty()).unwrap()
}

fn with_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn parse<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> T {
    serde_json::from_slice(bytes).unwrap()
}

#[tokio::test]
async fn test_alice_lifecycle() {
    let (app, _) = app();

    let (status, body) = send(
        &app,
        with_json(
            "POST",
            "/api/v1/users/",
            json!({"username": "alice", "email": "a@x.com", "full_name": "Alice A"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let created: User = parse(&body);
    assert!(created.id > 0);
    assert!(!created.uuid.is_nil());

    let (status, body) = send(&app, get("/api/v1/users/username/alice")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse::<User>(&body).uuid, created.uuid);

    let (status, body) = send(&app, delete(&format!("/api/v1/users/{}", created.uuid))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let (status, body) = send(&app, get("/api/v1/users/username/alice")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ErrorResponse = parse(&body);
    assert_eq!(error.error, "NOT_FOUND");
}

#[tokio::test]
async fn test_created_user_round_trips_through_get_by_uuid() {
    let (app, _) = app();

    let (_, body) = send(
        &app,
        with_json(
            "POST",
            "/api/v1/users",
            json!({"username": "carol", "email": "c@x.com", "full_name": "Carol C"}),
        ),
    )
    .await;
    let created: User = parse(&body);

    let (status, body) = send(&app, get(&format!("/api/v1/users/{}", created.uuid))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse::<User>(&body), created);

    let (status, body) = send(&app, get(&format!("/api/v1/users/id/{}", created.id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse::<User>(&body), created);
}

#[tokio::test]
async fn test_duplicate_create_returns_409_and_keeps_original() {
    let (app, repo) = app();
    let bob = json!({"username": "bob", "email": "b@x.com"});

    let (status, body) = send(&app, with_json("POST", "/api/v1/users/", bob.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let original: User = parse(&body);
    assert_eq!(original.full_name, "");

    let (status, body) = send(&app, with_json("POST", "/api/v1/users/", bob)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let error: ErrorResponse = parse(&body);
    assert_eq!(error.error, "CONFLICT");
    assert_eq!(error.message, "username or email already exists");

    let users = repo.list().await.unwrap();
    assert_eq!(users, vec![original]);
}

#[tokio::test]
async fn test_email_collision_alone_is_a_conflict() {
    let (app, _) = app();
    send(
        &app,
        with_json("POST", "/api/v1/users", json!({"username": "a", "email": "same@x.com"})),
    )
    .await;

    let (status, _) = send(
        &app,
        with_json("POST", "/api/v1/users", json!({"username": "b", "email": "same@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_get_by_id_rejects_non_integer() {
    let (app, _) = app();

    let (status, body) = send(&app, get("/api/v1/users/id/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = parse(&body);
    assert_eq!(error.error, "INVALID_PATH_PARAMETER");
}

#[tokio::test]
async fn test_get_by_id_missing_is_404() {
    let (app, _) = app();

    let (status, _) = send(&app, get("/api/v1/users/id/999999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_empty_is_array() {
    let (app, _) = app();

    for uri in ["/api/v1/users", "/api/v1/users/"] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse::<Value>(&body), json!([]));
    }
}

#[tokio::test]
async fn test_list_returns_every_user() {
    let (app, _) = app();
    for i in 0..3 {
        send(
            &app,
            with_json(
                "POST",
                "/api/v1/users",
                json!({"username": format!("user{i}"), "email": format!("u{i}@x.com")}),
            ),
        )
        .await;
    }

    let (_, body) = send(&app, get("/api/v1/users/")).await;
    assert_eq!(parse::<Vec<User>>(&body).len(), 3);
}

#[tokio::test]
async fn test_update_changes_fields_but_not_identifiers() {
    let (app, _) = app();
    let (_, body) = send(
        &app,
        with_json("POST", "/api/v1/users", json!({"username": "dave", "email": "d@x.com"})),
    )
    .await;
    let created: User = parse(&body);

    let (status, body) = send(
        &app,
        with_json(
            "PATCH",
            &format!("/api/v1/users/{}", created.uuid),
            json!({"id": 12345, "uuid": "00000000-0000-0000-0000-000000000000",
                   "username": "david", "email": "d@x.com", "full_name": "David D"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let updated: User = parse(&body);
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.uuid, created.uuid);
    assert_eq!(updated.username, "david");
    assert_eq!(updated.full_name, "David D");
}

#[tokio::test]
async fn test_update_into_existing_username_is_409() {
    let (app, _) = app();
    send(
        &app,
        with_json("POST", "/api/v1/users", json!({"username": "erin", "email": "e@x.com"})),
    )
    .await;
    let (_, body) = send(
        &app,
        with_json("POST", "/api/v1/users", json!({"username": "frank", "email": "f@x.com"})),
    )
    .await;
    let frank: User = parse(&body);

    let (status, _) = send(
        &app,
        with_json(
            "PATCH",
            &format!("/api/v1/users/{}", frank.uuid),
            json!({"username": "erin", "email": "f@x.com"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_update_and_delete_unknown_uuid_are_404() {
    let (app, repo) = app();
    let unknown = uuid::Uuid::new_v4();

    let (status, _) = send(
        &app,
        with_json(
            "PATCH",
            &format!("/api/v1/users/{unknown}"),
            json!({"username": "x", "email": "x@x.com"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, delete(&format!("/api/v1/users/{unknown}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert!(repo.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_uuid_is_404() {
    let (app, _) = app();

    let (status, _) = send(&app, delete("/api/v1/users/not-a-uuid")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, get("/api/v1/users/not-a-uuid")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_second_delete_is_404() {
    let (app, _) = app();
    let (_, body) = send(
        &app,
        with_json("POST", "/api/v1/users", json!({"username": "gina", "email": "g@x.com"})),
    )
    .await;
    let user: User = parse(&body);
    let uri = format!("/api/v1/users/{}", user.uuid);

    assert_eq!(send(&app, delete(&uri)).await.0, StatusCode::NO_CONTENT);
    assert_eq!(send(&app, delete(&uri)).await.0, StatusCode::NOT_FOUND);
    assert_eq!(send(&app, delete(&uri)).await.0, StatusCode::NOT_FOUND);
    assert_eq!(send(&app, get(&uri)).await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_body_is_400() {
    let (app, repo) = app();

    let bad_syntax = Request::post("/api/v1/users")
        .header("content-type", "application/json")
        .body(Body::from("{\"username\": "))
        .unwrap();
    let (status, body) = send(&app, bad_syntax).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse::<ErrorResponse>(&body).error, "INVALID_JSON");

    let wrong_type = with_json("POST", "/api/v1/users", json!({"username": 42}));
    assert_eq!(send(&app, wrong_type).await.0, StatusCode::BAD_REQUEST);

    let no_content_type = Request::post("/api/v1/users")
        .body(Body::from(r#"{"username":"x","email":"y"}"#))
        .unwrap();
    assert_eq!(send(&app, no_content_type).await.0, StatusCode::BAD_REQUEST);

    assert!(repo.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_routes_behind_api_key_gate() {
    let (router, _) = app();
    let gated = router.layer(middleware::from_fn_with_state(
        ApiKeyConfig::new(Some("s3cret".into())),
        api_key_auth,
    ));

    assert_eq!(send(&gated, get("/api/v1/users")).await.0, StatusCode::UNAUTHORIZED);

    let wrong = Request::get("/api/v1/users")
        .header("X-API-Key", "nope")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&gated, wrong).await.0, StatusCode::FORBIDDEN);

    let right = Request::get("/api/v1/users")
        .header("X-API-Key", "s3cret")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&gated, right).await.0, StatusCode::OK);
}
