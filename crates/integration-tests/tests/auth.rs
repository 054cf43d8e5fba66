//! Registration, login, and token verification.

use axum::http::StatusCode;
use serde_json::json;
use shopkit_integration_tests::spawn_app;

#[tokio::test]
async fn test_register_returns_token_and_user() {
    let app = spawn_app().await;

    let (status, body) = app
        .request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "name": "Ada",
                "email": "ada@example.com",
                "password": "correct-horse",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert!(body["token"].is_string());
    assert_eq!(body["data"]["user"]["email"], "ada@example.com");
    assert_eq!(body["data"]["user"]["role"], "user");
    // The hash must never appear on the wire
    assert!(body["data"]["user"].get("passwordHash").is_none());
    assert!(body["data"]["user"].get("password").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email_rejected() {
    let app = spawn_app().await;
    app.register("Ada", "ada@example.com", "correct-horse").await;

    let (status, body) = app
        .request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "name": "Imposter",
                "email": "ada@example.com",
                "password": "other-password",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User already exists with this email");

    // First registration still works
    let (status, _) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "ada@example.com", "password": "correct-horse" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_validation_errors() {
    let app = spawn_app().await;

    let (status, body) = app
        .request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({ "email": "nope", "password": "shrt" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .expect("errors array")
        .iter()
        .map(|e| e["field"].as_str().unwrap_or(""))
        .collect();
    assert_eq!(fields, vec!["name", "email", "password"]);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = spawn_app().await;
    app.register("Ada", "ada@example.com", "correct-horse").await;

    let (wrong_status, wrong_body) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "ada@example.com", "password": "wrong" })),
        )
        .await;

    let (unknown_status, unknown_body) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "nobody@example.com", "password": "wrong" })),
        )
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body["message"], unknown_body["message"]);
    assert_eq!(wrong_body["message"], "Incorrect email or password");
}

#[tokio::test]
async fn test_login_email_is_case_insensitive() {
    let app = spawn_app().await;
    app.register("Ada", "Ada@Example.COM", "correct-horse").await;

    let (status, body) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "ada@example.com", "password": "correct-horse" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["email"], "ada@example.com");
}

#[tokio::test]
async fn test_me_roundtrip() {
    let app = spawn_app().await;
    let token = app.register("Ada", "ada@example.com", "correct-horse").await;

    let (status, body) = app.request("GET", "/api/auth/me", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["name"], "Ada");
}

#[tokio::test]
async fn test_me_without_token() {
    let app = spawn_app().await;

    let (status, body) = app.request("GET", "/api/auth/me", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "No token provided, access denied");
}

#[tokio::test]
async fn test_me_with_garbage_token() {
    let app = spawn_app().await;

    let (status, body) = app
        .request("GET", "/api/auth/me", Some("not.a.jwt"), None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token is not valid");
}

#[tokio::test]
async fn test_deleted_user_is_deauthorized_immediately() {
    let app = spawn_app().await;
    let token = app.register("Ada", "ada@example.com", "correct-horse").await;

    sqlx::query("DELETE FROM users WHERE email = ?")
        .bind("ada@example.com")
        .execute(&app.pool)
        .await
        .expect("Failed to delete user");

    let (status, body) = app.request("GET", "/api/auth/me", Some(&token), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "User no longer exists");
}

#[tokio::test]
async fn test_unknown_route_404() {
    let app = spawn_app().await;

    let (status, body) = app.request("GET", "/api/nope", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Route not found");
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = spawn_app().await;

    let (status, _) = app.request("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.request("GET", "/health/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
}
