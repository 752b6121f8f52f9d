//! Registration and login endpoints. Both are public.
//!
//! Password hashing is CPU-bound, so the service calls run on the
//! blocking pool.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ApiResponse, ApiResult, ValidatedJson};
use crate::dto::{AuthResponse, AuthenticationRequest, RegisterRequest};
use crate::services::auth;

/// `POST /api/auth/register`
pub async fn register(
    State(ctx): State<ApiContext>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<AuthResponse> {
    let registered = tokio::task::spawn_blocking(move || -> Result<AuthResponse, ApiError> {
        let conn = ctx.core.open_db()?;
        Ok(auth::register(&conn, &ctx.core.jwt, &req)?)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("register task failed: {e}")))??;

    Ok(Json(ApiResponse::ok("Usuario registrado correctamente", registered)))
}

/// `POST /api/auth/login`
pub async fn login(
    State(ctx): State<ApiContext>,
    ValidatedJson(req): ValidatedJson<AuthenticationRequest>,
) -> ApiResult<AuthResponse> {
    let session = tokio::task::spawn_blocking(move || -> Result<AuthResponse, ApiError> {
        let conn = ctx.core.open_db()?;
        Ok(auth::authenticate(&conn, &ctx.core.jwt, &req)?)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("login task failed: {e}")))??;

    Ok(Json(ApiResponse::ok("Inicio de sesión exitoso", session)))
}
