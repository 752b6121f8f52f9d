//! Appointment endpoints.
//!
//! Responses carry the patient and doctor display names.

use axum::extract::State;
use axum::{Extension, Json};

use crate::api::middleware::audit::log_mutation;
use crate::api::types::{ApiContext, ApiResponse, ApiResult, EntityId, Principal, ValidatedJson};
use crate::dto::{AppointmentRequest, AppointmentResponse};
use crate::services::appointment;

/// `POST /api/appointments`
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(req): ValidatedJson<AppointmentRequest>,
) -> ApiResult<AppointmentResponse> {
    let conn = ctx.core.open_db()?;
    let created = appointment::create(&conn, &req)?;
    log_mutation(&principal, "create", "appointment", created.id);
    Ok(Json(ApiResponse::ok("Cita creada correctamente", created)))
}

/// `GET /api/appointments`
pub async fn list(State(ctx): State<ApiContext>) -> ApiResult<Vec<AppointmentResponse>> {
    let conn = ctx.core.open_db()?;
    Ok(Json(ApiResponse::ok("Lista de citas", appointment::find_all(&conn)?)))
}

/// `GET /api/appointments/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    EntityId(id): EntityId,
) -> ApiResult<AppointmentResponse> {
    let conn = ctx.core.open_db()?;
    Ok(Json(ApiResponse::ok("Cita encontrada", appointment::find_by_id(&conn, id)?)))
}

/// `PUT /api/appointments/:id`. Absent fields keep their stored value.
pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(principal): Extension<Principal>,
    EntityId(id): EntityId,
    ValidatedJson(req): ValidatedJson<AppointmentRequest>,
) -> ApiResult<AppointmentResponse> {
    let conn = ctx.core.open_db()?;
    let updated = appointment::update(&conn, id, &req)?;
    log_mutation(&principal, "update", "appointment", id);
    Ok(Json(ApiResponse::ok("Cita actualizada correctamente", updated)))
}

/// `DELETE /api/appointments/:id`
pub async fn remove(
    State(ctx): State<ApiContext>,
    Extension(principal): Extension<Principal>,
    EntityId(id): EntityId,
) -> ApiResult<()> {
    let conn = ctx.core.open_db()?;
    appointment::delete(&conn, id)?;
    log_mutation(&principal, "delete", "appointment", id);
    Ok(Json(ApiResponse::done("Cita eliminada correctamente")))
}
