//! Catalog CRUD, filtering, sorting, and pagination.

use axum::http::StatusCode;
use serde_json::{Value, json};
use shopkit_integration_tests::{TestApp, spawn_app};

async fn create_product(app: &TestApp, token: &str, body: Value) -> Value {
    let (status, body) = app
        .request("POST", "/api/products", Some(token), Some(body))
        .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body["data"]["product"].clone()
}

fn product_body(name: &str, price: &str, category: &str) -> Value {
    json!({
        "name": name,
        "description": format!("{name} description"),
        "price": price.parse::<f64>().expect("numeric price"),
        "category": category,
        "stock": 10,
    })
}

fn names(body: &Value) -> Vec<String> {
    body["data"]["products"]
        .as_array()
        .expect("products array")
        .iter()
        .map(|p| p["name"].as_str().unwrap_or("").to_owned())
        .collect()
}

#[tokio::test]
async fn test_empty_catalog_lists_cleanly() {
    let app = spawn_app().await;

    let (status, body) = app.request("GET", "/api/products", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"], 0);
    assert_eq!(body["data"]["products"], json!([]));
    assert_eq!(body["data"]["pagination"]["total"], 0);
    assert_eq!(body["data"]["pagination"]["current"], 1);
}

#[tokio::test]
async fn test_writes_require_admin() {
    let app = spawn_app().await;
    let user_token = app.register("Ada", "ada@example.com", "correct-horse").await;
    let body = product_body("Widget", "9.99", "Home");

    let (status, response) = app
        .request("POST", "/api/products", Some(&user_token), Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(response["message"], "Access denied. Admin rights required.");

    let (status, _) = app.request("POST", "/api/products", None, Some(body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_and_fetch_product() {
    let app = spawn_app().await;
    let admin = app.register_admin("admin@example.com").await;

    let created = create_product(&app, &admin, product_body("Widget", "9.99", "Home")).await;
    assert_eq!(created["price"], "9.99");
    assert_eq!(created["image"], "default-product.jpg");
    assert_eq!(created["featured"], false);

    let id = created["id"].as_str().expect("product id");
    let (status, body) = app
        .request("GET", &format!("/api/products/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["product"]["name"], "Widget");
}

#[tokio::test]
async fn test_unknown_product_404() {
    let app = spawn_app().await;

    let (status, body) = app
        .request("GET", "/api/products/no-such-id", None, None)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn test_create_validation_errors() {
    let app = spawn_app().await;
    let admin = app.register_admin("admin@example.com").await;

    let (status, body) = app
        .request(
            "POST",
            "/api/products",
            Some(&admin),
            Some(json!({ "price": -2, "category": "Gadgets" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let messages: Vec<&str> = body["errors"]
        .as_array()
        .expect("errors array")
        .iter()
        .map(|e| e["message"].as_str().unwrap_or(""))
        .collect();
    assert!(messages.contains(&"Product name is required"));
    assert!(messages.contains(&"Price must be a positive number"));
    assert!(messages.contains(&"Invalid category"));
}

#[tokio::test]
async fn test_filter_by_category_and_search() {
    let app = spawn_app().await;
    let admin = app.register_admin("admin@example.com").await;

    create_product(&app, &admin, product_body("Laptop", "999.00", "Electronics")).await;
    create_product(&app, &admin, product_body("Phone", "499.00", "Electronics")).await;
    create_product(&app, &admin, product_body("Novel", "12.99", "Books")).await;

    let (_, body) = app
        .request("GET", "/api/products?category=Electronics", None, None)
        .await;
    assert_eq!(body["data"]["pagination"]["total"], 2);

    // Search is case-insensitive over name and description
    let (_, body) = app.request("GET", "/api/products?search=LAPTOP", None, None).await;
    assert_eq!(names(&body), vec!["Laptop"]);

    // Unknown category is an empty page, not an error
    let (status, body) = app
        .request("GET", "/api/products?category=Gadgets", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["total"], 0);
}

#[tokio::test]
async fn test_search_wildcards_match_literally() {
    let app = spawn_app().await;
    let admin = app.register_admin("admin@example.com").await;

    create_product(&app, &admin, product_body("100% Cotton Tee", "15.00", "Clothing")).await;
    // Would match a bare "100" but must not match a literal "100%"
    create_product(&app, &admin, product_body("100 Pack Socks", "8.00", "Clothing")).await;

    let (status, body) = app
        .request("GET", "/api/products?search=100%25", None, None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["100% Cotton Tee"]);
}

#[tokio::test]
async fn test_featured_filter() {
    let app = spawn_app().await;
    let admin = app.register_admin("admin@example.com").await;

    let mut featured = product_body("Star", "5.00", "Home");
    featured["featured"] = json!(true);
    create_product(&app, &admin, featured).await;
    create_product(&app, &admin, product_body("Plain", "5.00", "Home")).await;

    let (_, body) = app
        .request("GET", "/api/products?featured=true", None, None)
        .await;
    assert_eq!(names(&body), vec!["Star"]);
}

#[tokio::test]
async fn test_sort_by_price_numerically() {
    let app = spawn_app().await;
    let admin = app.register_admin("admin@example.com").await;

    // Lexical ordering would put "9.00" after "100.00"
    create_product(&app, &admin, product_body("Mid", "100.00", "Home")).await;
    create_product(&app, &admin, product_body("Cheap", "9.00", "Home")).await;
    create_product(&app, &admin, product_body("Dear", "250.00", "Home")).await;

    let (_, body) = app
        .request("GET", "/api/products?sort=price&order=asc", None, None)
        .await;
    assert_eq!(names(&body), vec!["Cheap", "Mid", "Dear"]);

    let (_, body) = app
        .request("GET", "/api/products?sort=price&order=desc", None, None)
        .await;
    assert_eq!(names(&body), vec!["Dear", "Mid", "Cheap"]);
}

#[tokio::test]
async fn test_unlisted_sort_field_falls_back() {
    let app = spawn_app().await;
    let admin = app.register_admin("admin@example.com").await;

    create_product(&app, &admin, product_body("First", "1.00", "Home")).await;
    create_product(&app, &admin, product_body("Second", "2.00", "Home")).await;

    // An arbitrary column name must not reach the database
    let (status, body) = app
        .request("GET", "/api/products?sort=password_hash", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["total"], 2);
}

#[tokio::test]
async fn test_pagination() {
    let app = spawn_app().await;
    let admin = app.register_admin("admin@example.com").await;

    for i in 0..5 {
        create_product(&app, &admin, product_body(&format!("P{i}"), "1.00", "Home")).await;
    }

    let (_, body) = app
        .request("GET", "/api/products?sort=name&limit=2&page=2", None, None)
        .await;

    assert_eq!(names(&body), vec!["P2", "P3"]);
    // results counts the page, total counts every match
    assert_eq!(body["results"], 2);
    assert_eq!(body["data"]["pagination"]["current"], 2);
    assert_eq!(body["data"]["pagination"]["pages"], 3);
    assert_eq!(body["data"]["pagination"]["total"], 5);
}

#[tokio::test]
async fn test_update_product() {
    let app = spawn_app().await;
    let admin = app.register_admin("admin@example.com").await;

    let created = create_product(&app, &admin, product_body("Widget", "9.99", "Home")).await;
    let id = created["id"].as_str().expect("product id");

    let mut update = product_body("Widget Pro", "19.99", "Home");
    update["stock"] = json!(3);
    let (status, body) = app
        .request("PUT", &format!("/api/products/{id}"), Some(&admin), Some(update))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["product"]["name"], "Widget Pro");
    assert_eq!(body["data"]["product"]["price"], "19.99");
    assert_eq!(body["data"]["product"]["stock"], 3);

    let (status, body) = app
        .request(
            "PUT",
            "/api/products/no-such-id",
            Some(&admin),
            Some(product_body("X", "1.00", "Home")),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn test_delete_product() {
    let app = spawn_app().await;
    let admin = app.register_admin("admin@example.com").await;

    let created = create_product(&app, &admin, product_body("Widget", "9.99", "Home")).await;
    let id = created["id"].as_str().expect("product id");

    let (status, body) = app
        .request("DELETE", &format!("/api/products/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product deleted successfully");

    let (status, _) = app
        .request("DELETE", &format!("/api/products/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
