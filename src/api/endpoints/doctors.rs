//! Doctor endpoints.

use axum::extract::State;
use axum::{Extension, Json};

use crate::api::middleware::audit::log_mutation;
use crate::api::types::{ApiContext, ApiResponse, ApiResult, EntityId, Principal, ValidatedJson};
use crate::dto::{DoctorRequest, DoctorResponse};
use crate::services::doctor;

/// `POST /api/doctors`
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(req): ValidatedJson<DoctorRequest>,
) -> ApiResult<DoctorResponse> {
    let conn = ctx.core.open_db()?;
    let created = doctor::create(&conn, &req)?;
    log_mutation(&principal, "create", "doctor", created.id);
    Ok(Json(ApiResponse::ok("Doctor creado correctamente", created)))
}

/// `GET /api/doctors`
pub async fn list(State(ctx): State<ApiContext>) -> ApiResult<Vec<DoctorResponse>> {
    let conn = ctx.core.open_db()?;
    Ok(Json(ApiResponse::ok("Lista de doctores", doctor::find_all(&conn)?)))
}

/// `GET /api/doctors/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    EntityId(id): EntityId,
) -> ApiResult<DoctorResponse> {
    let conn = ctx.core.open_db()?;
    Ok(Json(ApiResponse::ok("Doctor encontrado", doctor::find_by_id(&conn, id)?)))
}

/// `PUT /api/doctors/:id`
pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(principal): Extension<Principal>,
    EntityId(id): EntityId,
    ValidatedJson(req): ValidatedJson<DoctorRequest>,
) -> ApiResult<DoctorResponse> {
    let conn = ctx.core.open_db()?;
    let updated = doctor::update(&conn, id, &req)?;
    log_mutation(&principal, "update", "doctor", id);
    Ok(Json(ApiResponse::ok("Doctor actualizado correctamente", updated)))
}

/// `DELETE /api/doctors/:id`
pub async fn remove(
    State(ctx): State<ApiContext>,
    Extension(principal): Extension<Principal>,
    EntityId(id): EntityId,
) -> ApiResult<()> {
    let conn = ctx.core.open_db()?;
    doctor::delete(&conn, id)?;
    log_mutation(&principal, "delete", "doctor", id);
    Ok(Json(ApiResponse::done("Doctor eliminado correctamente")))
}
