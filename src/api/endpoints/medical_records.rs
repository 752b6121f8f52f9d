use axum::extract::State;
use axum::{Extension, Json};

use crate::api::middleware::audit::log_mutation;
use crate::api::types::{ApiContext, ApiResponse, ApiResult, EntityId, Principal, ValidatedJson};
use crate::dto::{MedicalRecordRequest, MedicalRecordResponse};
use crate::services::medical_record;

pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(req): ValidatedJson<MedicalRecordRequest>,
) -> ApiResult<MedicalRecordResponse> {
    let conn = ctx.core.open_db()?;
    let created = medical_record::create(&conn, &req)?;
    log_mutation(&principal, "create", "medical_record", created.id);
    Ok(Json(ApiResponse::ok("Historia médica creada correctamente", created)))
}

pub async fn list(State(ctx): State<ApiContext>) -> ApiResult<Vec<MedicalRecordResponse>> {
    let conn = ctx.core.open_db()?;
    Ok(Json(ApiResponse::ok("Lista de historias médicas", medical_record::find_all(&conn)?)))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    EntityId(id): EntityId,
) -> ApiResult<MedicalRecordResponse> {
    let conn = ctx.core.open_db()?;
    Ok(Json(ApiResponse::ok("Historia médica encontrada", medical_record::find_by_id(&conn, id)?)))
}

pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(principal): Extension<Principal>,
    EntityId(id): EntityId,
    ValidatedJson(req): ValidatedJson<MedicalRecordRequest>,
) -> ApiResult<MedicalRecordResponse> {
    let conn = ctx.core.open_db()?;
    let updated = medical_record::update(&conn, id, &req)?;
    log_mutation(&principal, "update", "medical_record", id);
    Ok(Json(ApiResponse::ok("Historia médica actualizada correctamente", updated)))
}

pub async fn remove(
    State(ctx): State<ApiContext>,
    Extension(principal): Extension<Principal>,
    EntityId(id): EntityId,
) -> ApiResult<()> {
    let conn = ctx.core.open_db()?;
    medical_record::delete(&conn, id)?;
    log_mutation(&principal, "delete", "medical_record", id);
    Ok(Json(ApiResponse::done("Historia médica eliminada correctamente")))
}
