//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycles against the cart router.

use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
    Router,
};
use cart_ledger::{api::create_router, AppState, CartLedger, KeyValueStore, MemoryStore};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> (Router, MemoryStore) {
    let store = MemoryStore::new();
    let state = AppState::new(CartLedger::new(store.clone()));
    (create_router(state), store)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

async fn add(app: &Router, id: u64, price: u32, stock: u32) -> Response<Body> {
    let body = format!(
        r#"{{"product":{{"id":{id},"name":"Product {id}","price":{price},"stock":{stock},"category":"ethnic"}}}}"#
    );
    send(app, "POST", "/cart/items", Some(&body)).await
}

async fn login(app: &Router) {
    let response = send(
        app,
        "PUT",
        "/session",
        Some(
            r#"{"token":"jwt-1","type":"Bearer","userId":1,"name":"Asha","email":"asha@example.com","role":"USER"}"#,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

// == Cart Endpoint Tests ==

#[tokio::test]
async fn test_empty_cart() {
    let (app, _) = create_test_app();

    let response = send(&app, "GET", "/cart", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["state"], "empty");
    assert_eq!(json["item_count"], 0);
    assert_eq!(json["items"].as_array().unwrap().len(), 0);
    assert_eq!(json["totals"]["shipping"], "0");
}

#[tokio::test]
async fn test_add_item_twice_increments() {
    let (app, _) = create_test_app();

    add(&app, 1, 600, 5).await;
    let response = add(&app, 1, 600, 5).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["state"], "non_empty");
    assert_eq!(json["items"].as_array().unwrap().len(), 1);
    assert_eq!(json["items"][0]["quantity"], 2);
    assert_eq!(json["items"][0]["category"], "ethnic");
}

#[tokio::test]
async fn test_add_item_invalid_body() {
    let (app, _) = create_test_app();

    let response = send(
        &app,
        "POST",
        "/cart/items",
        Some(r#"{"product":{"id":1,"name":"","price":10}}"#),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn test_add_item_out_of_range_keeps_cart_readable() {
    let (app, store) = create_test_app();
    add(&app, 1, 600, 5).await;

    let response = send(
        &app,
        "POST",
        "/cart/items",
        Some(r#"{"product":{"id":2,"name":"Gold","price":1e26,"stock":0},"quantity":4000000000}"#),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"], "Cart amount is out of range");

    let response = send(&app, "GET", "/cart", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["item_count"], 1);
    assert!(!store.get("cart").unwrap().contains("Gold"));

    let response = send(&app, "GET", "/cart/totals", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_update_quantity_endpoint() {
    let (app, _) = create_test_app();
    add(&app, 1, 100, 3).await;

    let response = send(&app, "PATCH", "/cart/items/1", Some(r#"{"quantity":2}"#)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["item_count"], 2);

    // Clamped to stock
    let response = send(&app, "PATCH", "/cart/items/1", Some(r#"{"quantity":9}"#)).await;
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["item_count"], 3);

    // Zero is ignored
    let response = send(&app, "PATCH", "/cart/items/1", Some(r#"{"quantity":0}"#)).await;
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["item_count"], 3);
}

#[tokio::test]
async fn test_remove_item_endpoint() {
    let (app, _) = create_test_app();
    add(&app, 1, 100, 3).await;

    let response = send(&app, "DELETE", "/cart/items/1", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["state"], "empty");

    // Removing again is still fine
    let response = send(&app, "DELETE", "/cart/items/1", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// == Totals Endpoint Tests ==

#[tokio::test]
async fn test_totals_below_threshold() {
    let (app, _) = create_test_app();
    add(&app, 1, 600, 5).await;

    let response = send(&app, "GET", "/cart/totals", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["subtotal"], "600");
    assert_eq!(json["shipping"], "50");
    assert_eq!(json["display"]["tax"], "108.00");
    assert_eq!(json["display"]["total"], "758.00");
    assert_eq!(json["amount_until_free_shipping"], "400");
}

#[tokio::test]
async fn test_totals_above_threshold() {
    let (app, _) = create_test_app();
    add(&app, 1, 1200, 5).await;

    let json = body_to_json(send(&app, "GET", "/cart/totals", None).await.into_body()).await;
    assert_eq!(json["shipping"], "0");
    assert_eq!(json["display"]["total"], "1416.00");
    assert_eq!(json["free_shipping"], true);
}

#[tokio::test]
async fn test_count_endpoint() {
    let (app, _) = create_test_app();
    add(&app, 1, 100, 0).await;
    add(&app, 2, 100, 0).await;
    add(&app, 2, 100, 0).await;

    let json = body_to_json(send(&app, "GET", "/cart/count", None).await.into_body()).await;
    assert_eq!(json["count"], 3);
}

// == Checkout Endpoint Tests ==

#[tokio::test]
async fn test_checkout_requires_session() {
    let (app, store) = create_test_app();
    add(&app, 1, 100, 3).await;

    let response = send(&app, "POST", "/cart/checkout", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(store.get("cart").is_some());
}

#[tokio::test]
async fn test_checkout_rejects_mismatched_token() {
    let (app, _) = create_test_app();
    login(&app).await;
    add(&app, 1, 100, 3).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/cart/checkout")
                .header("authorization", "Bearer someone-else")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_checkout_empty_cart() {
    let (app, _) = create_test_app();
    login(&app).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/cart/checkout")
                .header("authorization", "Bearer jwt-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"], "Your cart is empty");
}

#[tokio::test]
async fn test_checkout_success_clears_store() {
    let (app, store) = create_test_app();
    login(&app).await;
    add(&app, 1, 600, 5).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/cart/checkout")
                .header("authorization", "Bearer jwt-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["message"], "Order placed successfully");
    assert_eq!(json["item_count"], 1);
    assert_eq!(json["totals"]["total"], "758.00");
    assert!(json["confirmation_id"].as_str().is_some());

    assert!(store.get("cart").is_none());
    let cart = body_to_json(send(&app, "GET", "/cart", None).await.into_body()).await;
    assert_eq!(cart["state"], "empty");
}

// == Session Endpoint Tests ==

#[tokio::test]
async fn test_session_without_token_rejected() {
    let (app, _) = create_test_app();

    let response = send(
        &app,
        "PUT",
        "/session",
        Some(r#"{"userId":1,"name":"Asha","email":"asha@example.com"}"#),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_logout_blocks_checkout() {
    let (app, store) = create_test_app();
    login(&app).await;
    add(&app, 1, 100, 3).await;

    let response = send(&app, "DELETE", "/session", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(store.get("token").is_none());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/cart/checkout")
                .header("authorization", "Bearer jwt-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = create_test_app();

    let response = send(&app, "GET", "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}
