//! Specialty endpoints.
//!
//! Specialty names are unique; deleting one removes its doctors.

use axum::extract::State;
use axum::{Extension, Json};

use crate::api::middleware::audit::log_mutation;
use crate::api::types::{ApiContext, ApiResponse, ApiResult, EntityId, Principal, ValidatedJson};
use crate::dto::{SpecialtyRequest, SpecialtyResponse};
use crate::services::specialty;

/// `POST /api/specialties`
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(req): ValidatedJson<SpecialtyRequest>,
) -> ApiResult<SpecialtyResponse> {
    let conn = ctx.core.open_db()?;
    let created = specialty::create(&conn, &req)?;
    log_mutation(&principal, "create", "specialty", created.id);
    Ok(Json(ApiResponse::ok("Especialidad creada correctamente", created)))
}

/// `GET /api/specialties`
pub async fn list(State(ctx): State<ApiContext>) -> ApiResult<Vec<SpecialtyResponse>> {
    let conn = ctx.core.open_db()?;
    Ok(Json(ApiResponse::ok("Lista de especialidades", specialty::find_all(&conn)?)))
}

/// `GET /api/specialties/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    EntityId(id): EntityId,
) -> ApiResult<SpecialtyResponse> {
    let conn = ctx.core.open_db()?;
    Ok(Json(ApiResponse::ok("Especialidad encontrada", specialty::find_by_id(&conn, id)?)))
}

/// `PUT /api/specialties/:id`. Absent fields keep their stored value.
pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(principal): Extension<Principal>,
    EntityId(id): EntityId,
    ValidatedJson(req): ValidatedJson<SpecialtyRequest>,
) -> ApiResult<SpecialtyResponse> {
    let conn = ctx.core.open_db()?;
    let updated = specialty::update(&conn, id, &req)?;
    log_mutation(&principal, "update", "specialty", id);
    Ok(Json(ApiResponse::ok("Especialidad actualizada correctamente", updated)))
}

/// `DELETE /api/specialties/:id`
pub async fn remove(
    State(ctx): State<ApiContext>,
    Extension(principal): Extension<Principal>,
    EntityId(id): EntityId,
) -> ApiResult<()> {
    let conn = ctx.core.open_db()?;
    specialty::delete(&conn, id)?;
    log_mutation(&principal, "delete", "specialty", id);
    Ok(Json(ApiResponse::done("Especialidad eliminada correctamente")))
}
