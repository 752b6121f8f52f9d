use rusqlite::Connection;

use super::{require_id, ServiceError, ServiceResult};
use crate::db;
use crate::dto::{
    apply_medical_record_update, new_medical_record, MedicalRecordRequest, MedicalRecordResponse,
};
use crate::models::{MedicalRecord, MedicalRecordSummary, Patient};
use crate::validation::check_max_len;

pub(crate) fn require(conn: &Connection, id: i64) -> ServiceResult<MedicalRecord> {
    db::get_medical_record(conn, id)?.ok_or_else(|| {
        ServiceError::NotFound(format!("Historia médica no encontrada con ID: {id}"))
    })
}

fn check_rules(req: &MedicalRecordRequest) -> ServiceResult<()> {
    check_max_len(
        req.diagnosis.as_deref(),
        255,
        "El diagnóstico no puede tener más de 255 caracteres",
    )?;
    check_max_len(
        req.treatment.as_deref(),
        255,
        "El tratamiento no puede tener más de 255 caracteres",
    )?;
    check_max_len(req.notes.as_deref(), 500, "Las notas no pueden tener más de 500 caracteres")?;
    Ok(())
}

fn resolve_patient(conn: &Connection, req: &MedicalRecordRequest) -> ServiceResult<Patient> {
    let patient_id = require_id(req.patient_id, "patientId", "El paciente es obligatorio")?;
    super::patient::require(conn, patient_id)
}

fn respond(record: MedicalRecord, patient: &Patient) -> MedicalRecordResponse {
    MedicalRecordResponse::from(&MedicalRecordSummary {
        record,
        patient_name: patient.full_name(),
    })
}

pub fn create(conn: &Connection, req: &MedicalRecordRequest) -> ServiceResult<MedicalRecordResponse> {
    check_rules(req)?;
    let patient = resolve_patient(conn, req)?;

    let mut record = new_medical_record(req, patient.id);
    record.id = db::insert_medical_record(conn, &record)?;
    tracing::info!(record_id = record.id, patient_id = patient.id, "Medical record created");
    Ok(respond(record, &patient))
}

pub fn update(
    conn: &Connection,
    id: i64,
    req: &MedicalRecordRequest,
) -> ServiceResult<MedicalRecordResponse> {
    let mut record = require(conn, id)?;
    check_rules(req)?;
    let patient = resolve_patient(conn, req)?;

    apply_medical_record_update(&mut record, req, patient.id);
    db::update_medical_record(conn, &record)?;
    Ok(respond(record, &patient))
}

/// Remove a record and the consultations that reference it.
pub fn delete(conn: &Connection, id: i64) -> ServiceResult<()> {
    require(conn, id)?;
    db::delete_medical_record(conn, id)?;
    tracing::info!(record_id = id, "Medical record deleted");
    Ok(())
}

pub fn find_by_id(conn: &Connection, id: i64) -> ServiceResult<MedicalRecordResponse> {
    db::get_medical_record_summary(conn, id)?
        .map(|summary| MedicalRecordResponse::from(&summary))
        .ok_or_else(|| {
            ServiceError::NotFound(format!("Historia médica no encontrada con ID: {id}"))
        })
}

pub fn find_all(conn: &Connection) -> ServiceResult<Vec<MedicalRecordResponse>> {
    Ok(db::list_medical_record_summaries(conn)?
        .iter()
        .map(MedicalRecordResponse::from)
        .collect())
}
