//! Test harness for driving the full API router in-process.
//!
//! Each [`TestApp`] owns a fresh in-memory `SQLite` database and a router
//! built exactly like the production one; requests go through
//! `tower::ServiceExt::oneshot`, so no listener or port is involved.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use tower::ServiceExt;

use shopkit_server::{config::ServerConfig, db, routes, state::AppState};

/// A router over a fresh database, plus direct pool access for setup that
/// has no API surface (promoting admins, forcing order states).
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
}

/// Build an app over an empty in-memory database.
///
/// # Panics
///
/// Panics if the database cannot be set up; tests cannot proceed without it.
pub async fn spawn_app() -> TestApp {
    let config = ServerConfig {
        database_url: SecretString::from("sqlite::memory:"),
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 0,
        jwt_secret: SecretString::from("integration-signing-key-0123456789abcdef"),
        token_ttl_days: 7,
    };

    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create test pool");
    db::migrate(&pool).await.expect("Failed to migrate test db");

    let state = AppState::new(config, pool.clone());
    TestApp {
        router: routes::router(state),
        pool,
    }
}

impl TestApp {
    /// Send one request and decode the JSON body (null if empty).
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router never fails");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();

        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Body is not JSON")
        };

        (status, value)
    }

    /// Register a user and return their token.
    ///
    /// # Panics
    ///
    /// Panics if registration does not succeed.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/api/auth/register",
                None,
                Some(json!({ "name": name, "email": email, "password": password })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED, "registration failed: {body}");
        body["token"]
            .as_str()
            .expect("registration returns a token")
            .to_owned()
    }

    /// Flip a registered user's role to admin, bypassing the API.
    ///
    /// Takes effect on the user's existing token immediately, since every
    /// authenticated request re-reads the user row.
    ///
    /// # Panics
    ///
    /// Panics if no user row matches the email.
    pub async fn promote_to_admin(&self, email: &str) {
        let result = sqlx::query("UPDATE users SET role = 'admin' WHERE email = ?")
            .bind(email)
            .execute(&self.pool)
            .await
            .expect("Failed to update role");
        assert_eq!(result.rows_affected(), 1, "no user with email {email}");
    }

    /// Register a fresh admin and return their token.
    ///
    /// # Panics
    ///
    /// Panics if registration or promotion fails.
    pub async fn register_admin(&self, email: &str) -> String {
        let token = self.register("Admin", email, "admin-password").await;
        self.promote_to_admin(email).await;
        token
    }
}
