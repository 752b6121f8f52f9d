//! Shared types for the REST layer: the response envelope, the router
//! context, the authenticated principal and request extractors.

use std::sync::Arc;

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::core_state::CoreState;
use crate::models::Role;
use crate::validation::Validate;

// ═══════════════════════════════════════════════════════════
// Response envelope
// ═══════════════════════════════════════════════════════════

/// Body of every response, success or failure.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    pub timestamp: NaiveDateTime,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::build(true, message.into(), Some(data))
    }

    pub fn fail(message: impl Into<String>, data: Option<T>) -> Self {
        Self::build(false, message.into(), data)
    }

    fn build(success: bool, message: String, data: Option<T>) -> Self {
        Self {
            success,
            message,
            data,
            timestamp: chrono::Local::now().naive_local(),
        }
    }
}

impl ApiResponse<()> {
    /// Success without a payload; `data` serializes as `null`.
    pub fn done(message: impl Into<String>) -> Self {
        Self::build(true, message.into(), None)
    }
}

/// Handler return type.
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

// ═══════════════════════════════════════════════════════════
// API context: shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

// ═══════════════════════════════════════════════════════════
// Principal: injected by the JWT filter
// ═══════════════════════════════════════════════════════════

/// The signed-in user, attached to request extensions once the bearer
/// token has been verified.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: i64,
    pub email: String,
    pub role: Role,
}

impl Principal {
    /// Granted authority, e.g. `ROLE_ADMIN`.
    pub fn authority(&self) -> &'static str {
        self.role.as_str()
    }
}

// ═══════════════════════════════════════════════════════════
// Extractors
// ═══════════════════════════════════════════════════════════

/// JSON body that has passed field validation.
///
/// A body that fails to decode is a 400 carrying the decoder message; a
/// decoded body with invalid fields is a 400 carrying the field map.
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        value.validate().map_err(ApiError::Validation)?;
        Ok(Self(value))
    }
}

/// Numeric `:id` path segment.
pub struct EntityId(pub i64);

#[axum::async_trait]
impl<S> FromRequestParts<S> for EntityId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(Self(id))
    }
}
