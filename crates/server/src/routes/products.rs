//! Product route handlers.
//!
//! Reads are public; writes require an admin.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use shopkit_core::ProductId;

use crate::error::{AppError, Result};
use crate::extract::{Json, RequireAdmin};
use crate::services::catalog::{CatalogQuery, CatalogService};
use crate::state::AppState;
use crate::validate::{ProductInput, validate_product};

/// `GET /api/products`
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<impl IntoResponse> {
    let page = CatalogService::new(state.pool()).list(&query).await?;

    Ok(Json(json!({
        "status": "success",
        "results": page.products.len(),
        "data": page,
    })))
}

/// `GET /api/products/{id}`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let product = CatalogService::new(state.pool())
        .get(&ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    Ok(Json(json!({
        "status": "success",
        "data": { "product": product },
    })))
}

/// `POST /api/products` (admin)
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> Result<impl IntoResponse> {
    let fields = validate_product(&input).map_err(AppError::Validation)?;
    let product = CatalogService::new(state.pool()).create(fields).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "data": { "product": product },
        })),
    ))
}

/// `PUT /api/products/{id}` (admin)
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ProductInput>,
) -> Result<impl IntoResponse> {
    let fields = validate_product(&input).map_err(AppError::Validation)?;
    let product = CatalogService::new(state.pool())
        .update(&ProductId::new(id), fields)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    Ok(Json(json!({
        "status": "success",
        "data": { "product": product },
    })))
}

/// `DELETE /api/products/{id}` (admin)
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let deleted = CatalogService::new(state.pool())
        .delete(&ProductId::new(id))
        .await?;

    if !deleted {
        return Err(AppError::NotFound("Product not found".to_owned()));
    }

    Ok(Json(json!({
        "status": "success",
        "message": "Product deleted successfully",
    })))
}
