use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use taxitera_api::middleware::auth::CustomerClaims;
use taxitera_api::state::{AppState, AuthConfig};
use taxitera_api::app;
use taxitera_booking::{BookingManager, MemoryStore};
use taxitera_pricing::PricingEngine;
use tower::ServiceExt;

const SECRET: &str = "test-secret";

fn test_app() -> Router {
    let store = Arc::new(MemoryStore::new());
    let state = AppState {
        bookings: Arc::new(BookingManager::new(store)),
        pricing: Arc::new(PricingEngine::default()),
        redis: None,
        rate_limit_per_minute: 100,
        auth: AuthConfig {
            secret: SECRET.to_string(),
            expiration: 3600,
        },
    };
    app(state)
}

fn token(sub: &str, role: &str) -> String {
    let claims = CustomerClaims {
        sub: sub.to_string(),
        email: None,
        role: role.to_string(),
        exp: (Utc::now().timestamp() + 3600) as usize,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
}

fn authed_json(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {}", token))
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authed(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

async fn body_json(res: axum::response::Response) -> Value {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn create_body() -> Value {
    json!({
        "route": "Piassa - Meskel Square",
        "type": "minibus",
        "date": "2026-09-01",
        "time": "08:30",
        "seatsBooked": 2,
        "passengerNames": ["Abel", "Sara"],
        "price": 46.0
    })
}

async fn create_booking(app: &Router, token: &str) -> Value {
    let res = app
        .clone()
        .oneshot(authed_json("POST", "/v1/bookings", token, create_body()))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    body_json(res).await
}

#[tokio::test]
async fn create_booking_returns_confirmed_booking() {
    let app = test_app();
    let token = token("user-1", "CUSTOMER");

    let booking = create_booking(&app, &token).await;
    assert_eq!(booking["status"], "confirmed");
    assert_eq!(booking["user"], "user-1");
    assert_eq!(booking["seatsBooked"], 2);
    assert_eq!(booking["passengerNames"].as_array().unwrap().len(), 2);
    assert_eq!(booking["price"], 46.0);
}

#[tokio::test]
async fn create_booking_rejects_seat_name_mismatch() {
    let app = test_app();
    let token = token("user-1", "CUSTOMER");

    let mut body = create_body();
    body["passengerNames"] = json!(["Abel"]);
    let res = app
        .clone()
        .oneshot(authed_json("POST", "/v1/bookings", &token, body))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_booking_requires_auth() {
    let app = test_app();

    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/bookings")
                .header("Content-Type", "application/json")
                .body(Body::from(create_body().to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn get_booking_by_id_is_owner_scoped() {
    let app = test_app();
    let owner = token("user-1", "CUSTOMER");
    let stranger = token("user-2", "CUSTOMER");

    let booking = create_booking(&app, &owner).await;
    let uri = format!("/v1/bookings/{}", booking["id"].as_str().unwrap());

    let res = app.clone().oneshot(authed("GET", &uri, &owner)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched = body_json(res).await;
    assert_eq!(fetched["id"], booking["id"]);
    assert_eq!(fetched["user"], "user-1");

    let res = app.clone().oneshot(authed("GET", &uri, &stranger)).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let uri = format!("/v1/bookings/{}", uuid::Uuid::new_v4());
    let res = app.clone().oneshot(authed("GET", &uri, &owner)).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cancel_twice_is_idempotent() {
    let app = test_app();
    let token = token("user-1", "CUSTOMER");

    let booking = create_booking(&app, &token).await;
    let id = booking["id"].as_str().unwrap().to_string();
    let uri = format!("/v1/bookings/{}/cancel", id);

    let res = app
        .clone()
        .oneshot(authed_json("POST", &uri, &token, json!({ "reason": "change of plans" })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["status"], "cancelled");

    let res = app
        .clone()
        .oneshot(authed_json("POST", &uri, &token, json!({ "reason": null })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["status"], "cancelled");
}

#[tokio::test]
async fn cancel_unknown_booking_is_404() {
    let app = test_app();
    let token = token("user-1", "CUSTOMER");

    let uri = format!("/v1/bookings/{}/cancel", uuid::Uuid::new_v4());
    let res = app
        .clone()
        .oneshot(authed_json("POST", &uri, &token, json!({ "reason": "whatever" })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_adds_fee_and_is_blocked_after_cancel() {
    let app = test_app();
    let token = token("user-1", "CUSTOMER");

    let booking = create_booking(&app, &token).await;
    let id = booking["id"].as_str().unwrap().to_string();

    let res = app
        .clone()
        .oneshot(authed_json(
            "POST",
            &format!("/v1/bookings/{}/update", id),
            &token,
            json!({ "date": "2026-09-02", "time": "10:00", "additionalFee": 20.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated = body_json(res).await;
    assert_eq!(updated["price"], 66.0);
    assert_eq!(updated["date"], "2026-09-02");
    assert_eq!(updated["route"], booking["route"]);

    let res = app
        .clone()
        .oneshot(authed_json(
            "POST",
            &format!("/v1/bookings/{}/cancel", id),
            &token,
            json!({ "reason": "done" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .clone()
        .oneshot(authed_json(
            "POST",
            &format!("/v1/bookings/{}/update", id),
            &token,
            json!({ "date": "2026-09-03", "time": "11:00", "additionalFee": 5.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn other_users_cannot_touch_my_booking() {
    let app = test_app();
    let owner = token("user-1", "CUSTOMER");
    let stranger = token("user-2", "CUSTOMER");

    let booking = create_booking(&app, &owner).await;
    let uri = format!("/v1/bookings/{}/cancel", booking["id"].as_str().unwrap());

    let res = app
        .clone()
        .oneshot(authed_json("POST", &uri, &stranger, json!({ "reason": "nope" })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn my_bookings_are_listed_most_recent_first() {
    let app = test_app();
    let token = token("user-1", "CUSTOMER");

    create_booking(&app, &token).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = create_booking(&app, &token).await;

    let res = app
        .clone()
        .oneshot(authed("GET", "/v1/bookings/me", &token))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let list = body_json(res).await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["id"], second["id"]);
}

#[tokio::test]
async fn admin_listing_requires_admin_role() {
    let app = test_app();
    let customer = token("user-1", "CUSTOMER");
    let admin = token("ops-1", "ADMIN");

    create_booking(&app, &customer).await;

    let res = app
        .clone()
        .oneshot(authed("GET", "/v1/bookings", &customer))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app
        .clone()
        .oneshot(authed("GET", "/v1/bookings?status=confirmed", &admin))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn pricing_calculate_is_public_and_deterministic() {
    let app = test_app();

    let uri = "/v1/pricing/calculate?from=Piassa&to=Meskel%20Square&vehicleType=minibus&passengers=2";
    let res = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let quote = body_json(res).await;
    assert_eq!(quote["totalPrice"], 46.0);

    let res = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let again = body_json(res).await;
    assert_eq!(again["totalPrice"], quote["totalPrice"]);
}

#[tokio::test]
async fn pricing_rejects_unknown_vehicle_class() {
    let app = test_app();

    let uri = "/v1/pricing/calculate?from=Piassa&to=Merkato&vehicleType=tram";
    let res = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn guest_token_can_create_bookings() {
    let app = test_app();

    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/auth/guest")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let auth = body_json(res).await;
    let guest_token = auth["token"].as_str().unwrap().to_string();

    let res = app
        .clone()
        .oneshot(authed_json("POST", "/v1/bookings", &guest_token, create_body()))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
}
