use rusqlite::Connection;

use super::{require_id, ServiceError, ServiceResult};
use crate::db;
use crate::dto::{
    apply_consultation_update, new_consultation, ConsultationRequest, ConsultationResponse,
};
use crate::models::Consultation;
use crate::validation::check_max_len;

fn require(conn: &Connection, id: i64) -> ServiceResult<Consultation> {
    db::get_consultation(conn, id)?
        .ok_or_else(|| ServiceError::NotFound(format!("Consulta no encontrada con ID: {id}")))
}

/// Notes cap, then the appointment and medical record lookups.
fn resolve(conn: &Connection, req: &ConsultationRequest) -> ServiceResult<(i64, i64)> {
    check_max_len(
        req.notes.as_deref(),
        500,
        "Las notas de la consulta no pueden tener más de 500 caracteres",
    )?;

    let appointment_id = require_id(req.appointment_id, "appointmentId", "La cita es obligatoria")?;
    let record_id = require_id(
        req.medical_record_id,
        "medicalRecordId",
        "La historia médica es obligatoria",
    )?;
    let appointment = super::appointment::require(conn, appointment_id)?;
    let record = super::medical_record::require(conn, record_id)?;
    Ok((appointment.id, record.id))
}

/// A second consultation for the same appointment fails at the storage
/// layer with a uniqueness violation.
pub fn create(conn: &Connection, req: &ConsultationRequest) -> ServiceResult<ConsultationResponse> {
    let (appointment_id, record_id) = resolve(conn, req)?;

    let mut consultation = new_consultation(req, appointment_id, record_id);
    consultation.id = db::insert_consultation(conn, &consultation)?;
    tracing::info!(consultation_id = consultation.id, appointment_id, "Consultation created");
    Ok(ConsultationResponse::from(&consultation))
}

pub fn update(
    conn: &Connection,
    id: i64,
    req: &ConsultationRequest,
) -> ServiceResult<ConsultationResponse> {
    let mut consultation = require(conn, id)?;
    let (appointment_id, record_id) = resolve(conn, req)?;

    apply_consultation_update(&mut consultation, req, appointment_id, record_id);
    db::update_consultation(conn, &consultation)?;
    Ok(ConsultationResponse::from(&consultation))
}

pub fn delete(conn: &Connection, id: i64) -> ServiceResult<()> {
    require(conn, id)?;
    db::delete_consultation(conn, id)?;
    tracing::info!(consultation_id = id, "Consultation deleted");
    Ok(())
}

pub fn find_by_id(conn: &Connection, id: i64) -> ServiceResult<ConsultationResponse> {
    Ok(ConsultationResponse::from(&require(conn, id)?))
}

pub fn find_all(conn: &Connection) -> ServiceResult<Vec<ConsultationResponse>> {
    Ok(db::list_consultations(conn)?
        .iter()
        .map(ConsultationResponse::from)
        .collect())
}
