//! Patient endpoints.
//!
//! Deleting a patient also removes their appointments and medical records.

use axum::extract::State;
use axum::{Extension, Json};

use crate::api::middleware::audit::log_mutation;
use crate::api::types::{ApiContext, ApiResponse, ApiResult, EntityId, Principal, ValidatedJson};
use crate::dto::{PatientRequest, PatientResponse};
use crate::services::patient;

/// `POST /api/patients`
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(req): ValidatedJson<PatientRequest>,
) -> ApiResult<PatientResponse> {
    let conn = ctx.core.open_db()?;
    let created = patient::create(&conn, &req)?;
    log_mutation(&principal, "create", "patient", created.id);
    Ok(Json(ApiResponse::ok("Paciente creado correctamente", created)))
}

/// `GET /api/patients`
pub async fn list(State(ctx): State<ApiContext>) -> ApiResult<Vec<PatientResponse>> {
    let conn = ctx.core.open_db()?;
    Ok(Json(ApiResponse::ok("Lista de pacientes", patient::find_all(&conn)?)))
}

/// `GET /api/patients/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    EntityId(id): EntityId,
) -> ApiResult<PatientResponse> {
    let conn = ctx.core.open_db()?;
    Ok(Json(ApiResponse::ok("Paciente encontrado", patient::find_by_id(&conn, id)?)))
}

/// `PUT /api/patients/:id`. Absent fields keep their stored value.
pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(principal): Extension<Principal>,
    EntityId(id): EntityId,
    ValidatedJson(req): ValidatedJson<PatientRequest>,
) -> ApiResult<PatientResponse> {
    let conn = ctx.core.open_db()?;
    let updated = patient::update(&conn, id, &req)?;
    log_mutation(&principal, "update", "patient", id);
    Ok(Json(ApiResponse::ok("Paciente actualizado correctamente", updated)))
}

/// `DELETE /api/patients/:id`
pub async fn remove(
    State(ctx): State<ApiContext>,
    Extension(principal): Extension<Principal>,
    EntityId(id): EntityId,
) -> ApiResult<()> {
    let conn = ctx.core.open_db()?;
    patient::delete(&conn, id)?;
    log_mutation(&principal, "delete", "patient", id);
    Ok(Json(ApiResponse::done("Paciente eliminado correctamente")))
}
