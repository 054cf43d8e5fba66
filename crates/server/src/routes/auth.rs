//! Auth route handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::error::{AppError, Result};
use crate::extract::{Json, RequireAuth};
use crate::state::AppState;
use crate::validate::{LoginInput, RegisterInput, validate_login, validate_register};

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> Result<impl IntoResponse> {
    let email = validate_register(&input).map_err(AppError::Validation)?;

    let (user, token) = state
        .auth_service()
        .register(input.name.trim(), email.as_str(), &input.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "token": token,
            "data": { "user": user },
        })),
    ))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> Result<impl IntoResponse> {
    let email = validate_login(&input).map_err(AppError::Validation)?;

    let (user, token) = state.auth_service().login(&email, &input.password).await?;

    Ok(Json(json!({
        "status": "success",
        "token": token,
        "data": { "user": user },
    })))
}

/// `GET /api/auth/me`
pub async fn me(RequireAuth(user): RequireAuth) -> impl IntoResponse {
    Json(json!({
        "status": "success",
        "data": { "user": user },
    }))
}
