//! Typed HTTP client for the Shopkit JSON API.
//!
//! Thin by intent: every method is one request, one envelope parse. Auth
//! endpoints are behind the [`AuthApi`] trait so session logic can be
//! tested against a stub instead of a live server.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

use shopkit_core::{Order, OrderItem, Product, ProductPage, User};

/// A failed API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with an error envelope.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request never completed, or the body was not the expected shape.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ApiError {
    /// A human-readable message suitable for direct display.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// A successful register or login: the user plus their bearer token.
#[derive(Debug, Clone)]
pub struct AuthSuccess {
    pub user: User,
    pub token: String,
}

/// The auth endpoints a session needs.
#[allow(async_fn_in_trait)]
pub trait AuthApi {
    /// `POST /api/auth/register`
    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSuccess, ApiError>;

    /// `POST /api/auth/login`
    async fn login(&self, email: &str, password: &str) -> Result<AuthSuccess, ApiError>;

    /// `GET /api/auth/me`
    async fn current_user(&self, token: &str) -> Result<User, ApiError>;
}

/// Catalog listing parameters; unset fields are omitted from the query
/// string and take the server's defaults.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Order submission body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub items: Vec<OrderItem>,
    pub shipping_address: shopkit_core::Address,
    pub payment_method: String,
}

/// HTTP client for the Shopkit API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for an API at `base_url` (no trailing slash).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `GET /api/products`
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the server rejects it.
    pub async fn list_products(&self, query: &ProductQuery) -> Result<ProductPage, ApiError> {
        let response = self
            .http
            .get(self.url("/api/products"))
            .query(query)
            .send()
            .await?;
        parse::<DataEnvelope<ProductPage>>(response).await.map(|e| e.data)
    }

    /// `GET /api/products/{id}`
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the product is unknown.
    pub async fn get_product(&self, id: &str) -> Result<Product, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("/api/products/{id}")))
            .send()
            .await?;
        parse::<DataEnvelope<ProductEnvelope>>(response)
            .await
            .map(|e| e.data.product)
    }

    /// `POST /api/orders`
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or validation rejects it.
    pub async fn create_order(&self, token: &str, order: &NewOrder) -> Result<Order, ApiError> {
        let response = self
            .http
            .post(self.url("/api/orders"))
            .bearer_auth(token)
            .json(order)
            .send()
            .await?;
        parse::<DataEnvelope<OrderEnvelope>>(response)
            .await
            .map(|e| e.data.order)
    }

    /// `GET /api/orders`
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn my_orders(&self, token: &str) -> Result<Vec<Order>, ApiError> {
        let response = self
            .http
            .get(self.url("/api/orders"))
            .bearer_auth(token)
            .send()
            .await?;
        parse::<DataEnvelope<OrdersEnvelope>>(response)
            .await
            .map(|e| e.data.orders)
    }

    /// `GET /api/orders/{id}`
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the order is unknown.
    pub async fn get_order(&self, token: &str, id: &str) -> Result<Order, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("/api/orders/{id}")))
            .bearer_auth(token)
            .send()
            .await?;
        parse::<DataEnvelope<OrderEnvelope>>(response)
            .await
            .map(|e| e.data.order)
    }

    /// `PUT /api/orders/{id}/cancel`
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the order is past pending.
    pub async fn cancel_order(&self, token: &str, id: &str) -> Result<Order, ApiError> {
        let response = self
            .http
            .put(self.url(&format!("/api/orders/{id}/cancel")))
            .bearer_auth(token)
            .send()
            .await?;
        parse::<DataEnvelope<OrderEnvelope>>(response)
            .await
            .map(|e| e.data.order)
    }
}

impl AuthApi for ApiClient {
    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSuccess, ApiError> {
        let response = self
            .http
            .post(self.url("/api/auth/register"))
            .json(&serde_json::json!({
                "name": name,
                "email": email,
                "password": password,
            }))
            .send()
            .await?;
        parse::<AuthEnvelope>(response).await.map(AuthEnvelope::into_success)
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthSuccess, ApiError> {
        let response = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await?;
        parse::<AuthEnvelope>(response).await.map(AuthEnvelope::into_success)
    }

    async fn current_user(&self, token: &str) -> Result<User, ApiError> {
        let response = self
            .http
            .get(self.url("/api/auth/me"))
            .bearer_auth(token)
            .send()
            .await?;
        parse::<DataEnvelope<UserEnvelope>>(response)
            .await
            .map(|e| e.data.user)
    }
}

// =============================================================================
// Envelope shapes
// =============================================================================

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct UserEnvelope {
    user: User,
}

#[derive(Debug, Deserialize)]
struct ProductEnvelope {
    product: Product,
}

#[derive(Debug, Deserialize)]
struct OrderEnvelope {
    order: Order,
}

#[derive(Debug, Deserialize)]
struct OrdersEnvelope {
    orders: Vec<Order>,
}

#[derive(Debug, Deserialize)]
struct AuthEnvelope {
    token: String,
    data: UserEnvelope,
}

impl AuthEnvelope {
    fn into_success(self) -> AuthSuccess {
        AuthSuccess {
            user: self.data.user,
            token: self.token,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    errors: Option<Vec<ErrorField>>,
}

#[derive(Debug, Deserialize)]
struct ErrorField {
    message: String,
}

impl ErrorBody {
    /// Flatten the envelope into one displayable message.
    fn into_message(self) -> String {
        if let Some(message) = self.message {
            return message;
        }
        match self.errors {
            Some(errors) if !errors.is_empty() => errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; "),
            _ => "Request failed".to_owned(),
        }
    }
}

/// Decode a response: success bodies into `T`, error bodies into `ApiError`.
async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body: ErrorBody = response.json().await.unwrap_or_default();
    Err(ApiError::Api {
        status: status.as_u16(),
        message: body.into_message(),
    })
}
