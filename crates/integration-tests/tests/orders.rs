//! Order placement, totals, ownership, and cancellation.

use axum::http::StatusCode;
use serde_json::{Value, json};
use shopkit_integration_tests::{TestApp, spawn_app};

fn order_body(items: Value) -> Value {
    json!({
        "items": items,
        "shippingAddress": {
            "street": "1 Main St",
            "city": "Springfield",
            "zipCode": "12345",
            "country": "US",
        },
        "paymentMethod": "card",
    })
}

async fn place_order(app: &TestApp, token: &str, items: Value) -> Value {
    let (status, body) = app
        .request("POST", "/api/orders", Some(token), Some(order_body(items)))
        .await;
    assert_eq!(status, StatusCode::CREATED, "order failed: {body}");
    body["data"]["order"].clone()
}

#[tokio::test]
async fn test_order_total_is_computed_server_side() {
    let app = spawn_app().await;
    let token = app.register("Ada", "ada@example.com", "correct-horse").await;

    // subtotal 100.00 -> * 1.1 + 5.99 = 115.99
    let order = place_order(
        &app,
        &token,
        json!([{ "productId": "p-1", "quantity": 1, "price": 100.00 }]),
    )
    .await;

    assert_eq!(order["totalAmount"], "115.99");
    assert_eq!(order["status"], "pending");
}

#[tokio::test]
async fn test_order_total_with_quantities() {
    let app = spawn_app().await;
    let token = app.register("Ada", "ada@example.com", "correct-horse").await;

    // subtotal 2*10 + 3*5 = 35; * 1.1 = 38.5; + 5.99 = 44.49
    let order = place_order(
        &app,
        &token,
        json!([
            { "productId": "p-1", "quantity": 2, "price": 10.00 },
            { "productId": "p-2", "quantity": 3, "price": 5.00 },
        ]),
    )
    .await;

    assert_eq!(order["totalAmount"], "44.49");
}

#[tokio::test]
async fn test_order_requires_auth() {
    let app = spawn_app().await;

    let (status, _) = app
        .request(
            "POST",
            "/api/orders",
            None,
            Some(order_body(json!([{ "productId": "p", "quantity": 1, "price": 1 }]))),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_order_validation() {
    let app = spawn_app().await;
    let token = app.register("Ada", "ada@example.com", "correct-horse").await;

    let (status, body) = app
        .request("POST", "/api/orders", Some(&token), Some(json!({})))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .expect("errors array")
        .iter()
        .map(|e| e["field"].as_str().unwrap_or(""))
        .collect();
    assert_eq!(fields, vec!["items", "shippingAddress", "paymentMethod"]);
}

#[tokio::test]
async fn test_type_mismatched_body_gets_error_envelope() {
    let app = spawn_app().await;
    let token = app.register("Ada", "ada@example.com", "correct-horse").await;

    // items should be an array; the rejection must still wear the envelope
    let (status, body) = app
        .request("POST", "/api/orders", Some(&token), Some(json!({ "items": 5 })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_orders_are_scoped_to_their_owner() {
    let app = spawn_app().await;
    let ada = app.register("Ada", "ada@example.com", "correct-horse").await;
    let bob = app.register("Bob", "bob@example.com", "other-password").await;

    let order = place_order(
        &app,
        &ada,
        json!([{ "productId": "p-1", "quantity": 1, "price": 10.00 }]),
    )
    .await;
    let id = order["id"].as_str().expect("order id");

    // Owner sees it
    let (status, _) = app
        .request("GET", &format!("/api/orders/{id}"), Some(&ada), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    // Someone else gets a 404, not a 403: existence is not leaked
    let (status, body) = app
        .request("GET", &format!("/api/orders/{id}"), Some(&bob), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Order not found");

    let (_, body) = app.request("GET", "/api/orders", Some(&bob), None).await;
    assert_eq!(body["results"], 0);
    assert_eq!(body["data"]["orders"], json!([]));
}

#[tokio::test]
async fn test_orders_list_newest_first() {
    let app = spawn_app().await;
    let token = app.register("Ada", "ada@example.com", "correct-horse").await;

    for price in [1.00, 2.00, 3.00] {
        place_order(
            &app,
            &token,
            json!([{ "productId": "p", "quantity": 1, "price": price }]),
        )
        .await;
        // created_at is the sort key; keep the timestamps distinct
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let (_, body) = app.request("GET", "/api/orders", Some(&token), None).await;
    assert_eq!(body["results"], 3);
    let totals: Vec<&str> = body["data"]["orders"]
        .as_array()
        .expect("orders array")
        .iter()
        .map(|o| o["totalAmount"].as_str().unwrap_or(""))
        .collect();

    // 3.00 * 1.1 + 5.99 = 9.29, then 8.19, then 7.09
    assert_eq!(totals, vec!["9.29", "8.19", "7.09"]);
}

#[tokio::test]
async fn test_cancel_pending_order() {
    let app = spawn_app().await;
    let token = app.register("Ada", "ada@example.com", "correct-horse").await;

    let order = place_order(
        &app,
        &token,
        json!([{ "productId": "p-1", "quantity": 1, "price": 10.00 }]),
    )
    .await;
    let id = order["id"].as_str().expect("order id");

    let (status, body) = app
        .request("PUT", &format!("/api/orders/{id}/cancel"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["order"]["status"], "cancelled");

    // A second cancel is rejected; the status stays cancelled
    let (status, body) = app
        .request("PUT", &format!("/api/orders/{id}/cancel"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Order cannot be cancelled at this stage");

    let (_, body) = app
        .request("GET", &format!("/api/orders/{id}"), Some(&token), None)
        .await;
    assert_eq!(body["data"]["order"]["status"], "cancelled");
}

#[tokio::test]
async fn test_cancel_shipped_order_rejected() {
    let app = spawn_app().await;
    let token = app.register("Ada", "ada@example.com", "correct-horse").await;

    let order = place_order(
        &app,
        &token,
        json!([{ "productId": "p-1", "quantity": 1, "price": 10.00 }]),
    )
    .await;
    let id = order["id"].as_str().expect("order id");

    sqlx::query("UPDATE orders SET status = 'shipped' WHERE id = ?")
        .bind(id)
        .execute(&app.pool)
        .await
        .expect("Failed to force status");

    let (status, body) = app
        .request("PUT", &format!("/api/orders/{id}/cancel"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Order cannot be cancelled at this stage");

    let (_, body) = app
        .request("GET", &format!("/api/orders/{id}"), Some(&token), None)
        .await;
    assert_eq!(body["data"]["order"]["status"], "shipped");
}

#[tokio::test]
async fn test_cancel_unknown_order() {
    let app = spawn_app().await;
    let token = app.register("Ada", "ada@example.com", "correct-horse").await;

    let (status, body) = app
        .request("PUT", "/api/orders/no-such-id/cancel", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Order not found");
}

#[tokio::test]
async fn test_line_prices_are_snapshotted() {
    let app = spawn_app().await;
    let admin = app.register_admin("admin@example.com").await;

    let (_, created) = app
        .request(
            "POST",
            "/api/products",
            Some(&admin),
            Some(json!({
                "name": "Widget",
                "description": "A widget",
                "price": 10.00,
                "category": "Home",
                "stock": 5,
            })),
        )
        .await;
    let product_id = created["data"]["product"]["id"]
        .as_str()
        .expect("product id")
        .to_owned();

    let order = place_order(
        &app,
        &admin,
        json!([{ "productId": product_id, "quantity": 1, "price": 10.00 }]),
    )
    .await;
    let order_id = order["id"].as_str().expect("order id").to_owned();

    // Raising the catalog price later must not change the stored order
    let (status, _) = app
        .request(
            "PUT",
            &format!("/api/products/{product_id}"),
            Some(&admin),
            Some(json!({
                "name": "Widget",
                "description": "A widget",
                "price": 99.00,
                "category": "Home",
                "stock": 5,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app
        .request("GET", &format!("/api/orders/{order_id}"), Some(&admin), None)
        .await;
    assert_eq!(body["data"]["order"]["items"][0]["price"], "10.00");
    assert_eq!(body["data"]["order"]["totalAmount"], "16.99");
}
