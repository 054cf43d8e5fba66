//! Order route handlers. Every route requires a logged-in user, and users
//! only ever see their own orders.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use shopkit_core::OrderId;

use crate::db::CancelOutcome;
use crate::error::{AppError, Result};
use crate::extract::{Json, RequireAuth};
use crate::services::orders::OrderService;
use crate::state::AppState;
use crate::validate::{OrderInput, validate_order};

/// `POST /api/orders`
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<OrderInput>,
) -> Result<impl IntoResponse> {
    let fields = validate_order(&input).map_err(AppError::Validation)?;
    let order = OrderService::new(state.pool()).create(&user.id, fields).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "data": { "order": order },
        })),
    ))
}

/// `GET /api/orders`
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let orders = OrderService::new(state.pool()).list(&user.id).await?;

    Ok(Json(json!({
        "status": "success",
        "results": orders.len(),
        "data": { "orders": orders },
    })))
}

/// `GET /api/orders/{id}`
pub async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let order = OrderService::new(state.pool())
        .get(&OrderId::new(id), &user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_owned()))?;

    Ok(Json(json!({
        "status": "success",
        "data": { "order": order },
    })))
}

/// `PUT /api/orders/{id}/cancel`
pub async fn cancel(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let outcome = OrderService::new(state.pool())
        .cancel(&OrderId::new(id), &user.id)
        .await?;

    match outcome {
        CancelOutcome::Cancelled(order) => Ok(Json(json!({
            "status": "success",
            "data": { "order": order },
        }))),
        CancelOutcome::NotPending => Err(AppError::BadRequest(
            "Order cannot be cancelled at this stage".to_owned(),
        )),
        CancelOutcome::NotFound => Err(AppError::NotFound("Order not found".to_owned())),
    }
}
