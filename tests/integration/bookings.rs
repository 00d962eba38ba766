use crate::common;

use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
};
use serde_json::{Value, json};
use serial_test::serial;
use tower::ServiceExt;

fn booking_request(check_in: &str, check_out: &str) -> Value {
    json!({
        "firstName": "Maria",
        "lastName": "Santos",
        "email": "maria@example.com",
        "phone": "+639171234567",
        "roomTitle": "Deluxe-201",
        "roomCategory": "deluxe-room",
        "checkIn": check_in,
        "checkOut": check_out,
        "guests": 2,
        "basePrice": 4000.0,
        "taxAndFees": 480.0,
        "totalPrice": 4480.0
    })
}

async fn create_booking(app: &axum::Router, body: Value) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/bookings")
                .method("POST")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
#[serial]
async fn test_guest_booking_created() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let state = common::create_test_app_state(pool.clone());
    let app = veranda::presentation::router::app(state).unwrap();

    let response = create_booking(&app, booking_request("2024-06-01", "2024-06-05")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["status"], "confirmed");
    assert_eq!(json["data"]["paymentStatus"], "paid");
    assert_eq!(json["data"]["nights"], 4);
    assert!(json["data"]["bookingId"].as_str().unwrap().starts_with("BK-"));
    // Guest booking carries no user id
    assert!(json["data"].get("userId").is_none());

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_booking_attributed_to_authenticated_user() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let state = common::create_test_app_state(pool.clone());
    let app = veranda::presentation::router::app(state).unwrap();

    let register = json!({
        "name": "Maria Santos",
        "email": "maria@example.com",
        "password": "password123"
    });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/auth/register")
                .method("POST")
                .header("content-type", "application/json")
                .body(Body::from(register.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let auth = body_json(response).await;
    let token = auth["token"].as_str().unwrap();
    let user_id = auth["user"]["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/bookings")
                .method("POST")
                .header("content-type", "application/json")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::from(
                    booking_request("2024-06-01", "2024-06-05").to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["userId"], user_id.as_str());

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_overlapping_booking_conflicts() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let state = common::create_test_app_state(pool.clone());
    let app = veranda::presentation::router::app(state).unwrap();

    let first = create_booking(&app, booking_request("2024-06-01", "2024-06-05")).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    // Overlaps the middle of the existing stay
    let second = create_booking(&app, booking_request("2024-06-03", "2024-06-07")).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);

    // Back-to-back is allowed: checkout day is excluded
    let third = create_booking(&app, booking_request("2024-06-05", "2024-06-08")).await;
    assert_eq!(third.status(), StatusCode::CREATED);

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_invalid_date_order_rejected() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let state = common::create_test_app_state(pool.clone());
    let app = veranda::presentation::router::app(state).unwrap();

    let response = create_booking(&app, booking_request("2024-06-05", "2024-06-01")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_check_availability_with_suggestions() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let state = common::create_test_app_state(pool.clone());
    let app = veranda::presentation::router::app(state).unwrap();

    create_booking(&app, booking_request("2024-06-01", "2024-06-05")).await;

    // Conflicting range reports unavailable and suggests later windows
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(
                    "/api/v1/bookings/check-availability?roomCategory=deluxe-room\
                     &roomTitle=Deluxe-201&checkIn=2024-06-03&checkOut=2024-06-06",
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["available"], false);
    let suggestions = json["suggestions"].as_array().unwrap();
    assert_eq!(suggestions.len(), 3);
    assert_eq!(suggestions[0]["checkIn"], "2024-06-06");

    // A clear range is available with no suggestions
    let response = app
        .oneshot(
            Request::builder()
                .uri(
                    "/api/v1/bookings/check-availability?roomCategory=deluxe-room\
                     &roomTitle=Deluxe-201&checkIn=2024-06-05&checkOut=2024-06-08",
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["available"], true);
    assert!(json.get("suggestions").is_none());

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_lookup_by_reference_and_list() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let state = common::create_test_app_state(pool.clone());
    let app = veranda::presentation::router::app(state).unwrap();

    let created = create_booking(&app, booking_request("2024-06-01", "2024-06-05")).await;
    let created = body_json(created).await;
    let reference = created["data"]["bookingId"].as_str().unwrap().to_string();
    let id = created["data"]["id"].as_str().unwrap().to_string();
    let token = common::generate_test_token(uuid::Uuid::new_v4());

    for key in [&reference, &id] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/bookings/{}", key))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["bookingId"], reference.as_str());
    }

    // Listing without a token is rejected
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/bookings?email=maria@example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/bookings?email=maria@example.com")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 1);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/bookings?email=other@example.com")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json = body_json(response).await;
    assert_eq!(json["count"], 0);

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_unknown_booking_not_found() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let state = common::create_test_app_state(pool.clone());
    let app = veranda::presentation::router::app(state).unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/bookings/BK-DOESNOTEX")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_cancel_frees_the_dates() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let state = common::create_test_app_state(pool.clone());
    let app = veranda::presentation::router::app(state).unwrap();

    let created = create_booking(&app, booking_request("2024-06-01", "2024-06-05")).await;
    let created = body_json(created).await;
    let reference = created["data"]["bookingId"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/bookings/{}/cancel", reference))
                .method("PUT")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "cancelled");
    assert_eq!(json["data"]["paymentStatus"], "refunded");

    // Cancelling again is idempotent
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/bookings/{}/cancel", reference))
                .method("PUT")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The dates are bookable again
    let rebook = create_booking(&app, booking_request("2024-06-01", "2024-06-05")).await;
    assert_eq!(rebook.status(), StatusCode::CREATED);

    common::cleanup_test_db(&pool).await;
}
