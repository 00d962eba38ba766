use crate::common;

use axum::{
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use serde_json::json;
use serial_test::serial;
use tower::ServiceExt;

async fn register_user(app: &axum::Router, email: &str) -> Response<Body> {
    let request = json!({
        "name": "Maria Santos",
        "email": email,
        "password": "password123"
    });

    app.clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/auth/register")
                .method("POST")
                .header("content-type", "application/json")
                .body(Body::from(request.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Pulls the `refreshToken=...` pair out of the Set-Cookie header.
fn refresh_cookie_pair(response: &Response<Body>) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("Set-Cookie header missing")
        .to_str()
        .unwrap();

    assert!(set_cookie.starts_with("refreshToken="));
    set_cookie.split(';').next().unwrap().to_string()
}

#[tokio::test]
#[serial]
async fn test_register_sets_scoped_refresh_cookie() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let state = common::create_test_app_state(pool.clone());
    let app = veranda::presentation::router::app(state).unwrap();

    let response = register_user(&app, "maria@example.com").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();

    assert!(set_cookie.starts_with("refreshToken="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Strict"));
    assert!(set_cookie.contains("Path=/api/v1/auth/refresh-token"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["success"], true);
    assert!(json["token"].is_string());
    assert_eq!(json["user"]["email"], "maria@example.com");
    // The raw refresh token must never appear in the body
    assert!(json.get("refreshToken").is_none());

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_register_duplicate_email_rejected() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let state = common::create_test_app_state(pool.clone());
    let app = veranda::presentation::router::app(state).unwrap();

    let first = register_user(&app, "maria@example.com").await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = register_user(&app, "maria@example.com").await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_login_success() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let state = common::create_test_app_state(pool.clone());
    let app = veranda::presentation::router::app(state).unwrap();

    register_user(&app, "maria@example.com").await;

    let login_request = json!({
        "email": "maria@example.com",
        "password": "password123"
    });

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/auth/login")
                .method("POST")
                .header("content-type", "application/json")
                .body(Body::from(login_request.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let cookie = refresh_cookie_pair(&response);
    assert!(cookie.len() > "refreshToken=".len());

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["success"], true);
    assert!(json["token"].is_string());

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_login_wrong_password() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let state = common::create_test_app_state(pool.clone());
    let app = veranda::presentation::router::app(state).unwrap();

    register_user(&app, "maria@example.com").await;

    let login_request = json!({
        "email": "maria@example.com",
        "password": "wrong-password"
    });

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/auth/login")
                .method("POST")
                .header("content-type", "application/json")
                .body(Body::from(login_request.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "INVALID_CREDENTIALS");

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_refresh_flow_mints_new_access_token() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let state = common::create_test_app_state(pool.clone());
    let app = veranda::presentation::router::app(state).unwrap();

    let register_response = register_user(&app, "maria@example.com").await;
    let cookie = refresh_cookie_pair(&register_response);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/auth/refresh-token")
                .method("POST")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["success"], true);
    assert!(json["token"].is_string());
    assert_eq!(json["user"]["email"], "maria@example.com");

    // The token is not rotated, so the same cookie keeps working
    let again = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/auth/refresh-token")
                .method("POST")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(again.status(), StatusCode::OK);

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_refresh_without_cookie() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let state = common::create_test_app_state(pool.clone());
    let app = veranda::presentation::router::app(state).unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/auth/refresh-token")
                .method("POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["code"], "REFRESH_TOKEN_MISSING");

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_logout_revokes_refresh_token() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let state = common::create_test_app_state(pool.clone());
    let app = veranda::presentation::router::app(state).unwrap();

    let register_response = register_user(&app, "maria@example.com").await;
    let cookie = refresh_cookie_pair(&register_response);

    let logout_response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/auth/logout")
                .method("POST")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(logout_response.status(), StatusCode::OK);

    // The cookie is cleared
    let set_cookie = logout_response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("refreshToken="));

    // And the revoked token no longer refreshes
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/auth/refresh-token")
                .method("POST")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["code"], "INVALID_REFRESH_TOKEN");

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_me_returns_current_user() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let state = common::create_test_app_state(pool.clone());
    let app = veranda::presentation::router::app(state).unwrap();

    let register_response = register_user(&app, "maria@example.com").await;
    let body = axum::body::to_bytes(register_response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let token = json["token"].as_str().unwrap().to_string();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/auth/me")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["data"]["email"], "maria@example.com");
    assert_eq!(json["data"]["name"], "Maria Santos");

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_me_requires_token() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let state = common::create_test_app_state(pool.clone());
    let app = veranda::presentation::router::app(state).unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/auth/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    common::cleanup_test_db(&pool).await;
}
