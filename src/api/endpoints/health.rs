//! Liveness probe.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::{ApiContext, ApiResponse, ApiResult};
use crate::config::{APP_NAME, APP_VERSION};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub name: &'static str,
    pub version: &'static str,
    pub database: bool,
}

/// `GET /api/health`. No authentication required.
pub async fn check(State(ctx): State<ApiContext>) -> ApiResult<HealthResponse> {
    let database = match ctx.core.open_db() {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not open the database");
            false
        }
    };

    Ok(Json(ApiResponse::ok(
        "Servicio disponible",
        HealthResponse {
            status: if database { "ok" } else { "degraded" },
            name: APP_NAME,
            version: APP_VERSION,
            database,
        },
    )))
}
