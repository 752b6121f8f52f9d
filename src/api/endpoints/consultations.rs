//! Consultation endpoints. One consultation per appointment.

use axum::extract::State;
use axum::{Extension, Json};

use crate::api::middleware::audit::log_mutation;
use crate::api::types::{ApiContext, ApiResponse, ApiResult, EntityId, Principal, ValidatedJson};
use crate::dto::{ConsultationRequest, ConsultationResponse};
use crate::services::consultation;

/// `POST /api/consultations`
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(req): ValidatedJson<ConsultationRequest>,
) -> ApiResult<ConsultationResponse> {
    let conn = ctx.core.open_db()?;
    let created = consultation::create(&conn, &req)?;
    log_mutation(&principal, "create", "consultation", created.id);
    Ok(Json(ApiResponse::ok("Consulta creada correctamente", created)))
}

/// `GET /api/consultations`
pub async fn list(State(ctx): State<ApiContext>) -> ApiResult<Vec<ConsultationResponse>> {
    let conn = ctx.core.open_db()?;
    Ok(Json(ApiResponse::ok("Lista de consultas", consultation::find_all(&conn)?)))
}

/// `GET /api/consultations/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    EntityId(id): EntityId,
) -> ApiResult<ConsultationResponse> {
    let conn = ctx.core.open_db()?;
    Ok(Json(ApiResponse::ok("Consulta encontrada", consultation::find_by_id(&conn, id)?)))
}

/// `PUT /api/consultations/:id`
pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(principal): Extension<Principal>,
    EntityId(id): EntityId,
    ValidatedJson(req): ValidatedJson<ConsultationRequest>,
) -> ApiResult<ConsultationResponse> {
    let conn = ctx.core.open_db()?;
    let updated = consultation::update(&conn, id, &req)?;
    log_mutation(&principal, "update", "consultation", id);
    Ok(Json(ApiResponse::ok("Consulta actualizada correctamente", updated)))
}

/// `DELETE /api/consultations/:id`
pub async fn remove(
    State(ctx): State<ApiContext>,
    Extension(principal): Extension<Principal>,
    EntityId(id): EntityId,
) -> ApiResult<()> {
    let conn = ctx.core.open_db()?;
    consultation::delete(&conn, id)?;
    log_mutation(&principal, "delete", "consultation", id);
    Ok(Json(ApiResponse::done("Consulta eliminada correctamente")))
}
