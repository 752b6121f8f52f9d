use rusqlite::Connection;

use super::{ensure_unique, today, ServiceError, ServiceResult};
use crate::db;
use crate::dto::{apply_patient_update, new_patient, PatientRequest, PatientResponse};
use crate::models::Patient;
use crate::validation::{check_person, parse_birth_date};

const EMAIL_TAKEN: &str = "Ya existe un paciente con ese email";
const PHONE_TAKEN: &str = "Ya existe un paciente con ese teléfono";

/// Load a patient or fail with the user-facing not-found message.
pub(crate) fn require(conn: &Connection, id: i64) -> ServiceResult<Patient> {
    db::get_patient(conn, id)?
        .ok_or_else(|| ServiceError::NotFound(format!("Paciente no encontrado con ID: {id}")))
}

pub fn create(conn: &Connection, req: &PatientRequest) -> ServiceResult<PatientResponse> {
    check_person(
        req.first_name.as_deref(),
        req.last_name.as_deref(),
        req.phone.as_deref(),
        req.email.as_deref(),
    )?;
    let date_of_birth = parse_birth_date(req.date_of_birth.as_deref(), today())?;

    if let Some(email) = req.email.as_deref() {
        ensure_unique(db::patient_email_exists(conn, email)?, EMAIL_TAKEN)?;
    }
    if let Some(phone) = req.phone.as_deref() {
        ensure_unique(db::patient_phone_exists(conn, phone)?, PHONE_TAKEN)?;
    }

    let mut patient = new_patient(req, date_of_birth);
    patient.id = db::insert_patient(conn, &patient)?;
    tracing::info!(patient_id = patient.id, "Patient created");
    Ok(PatientResponse::from(&patient))
}

pub fn update(conn: &Connection, id: i64, req: &PatientRequest) -> ServiceResult<PatientResponse> {
    let mut patient = require(conn, id)?;

    check_person(
        req.first_name.as_deref(),
        req.last_name.as_deref(),
        req.phone.as_deref(),
        req.email.as_deref(),
    )?;
    let date_of_birth = parse_birth_date(req.date_of_birth.as_deref(), today())?;

    if let Some(email) = req.email.as_deref().filter(|e| *e != patient.email) {
        ensure_unique(db::patient_email_exists(conn, email)?, EMAIL_TAKEN)?;
    }
    if let Some(phone) = req.phone.as_deref().filter(|p| *p != patient.phone) {
        ensure_unique(db::patient_phone_exists(conn, phone)?, PHONE_TAKEN)?;
    }

    apply_patient_update(&mut patient, req, date_of_birth);
    db::update_patient(conn, &patient)?;
    Ok(PatientResponse::from(&patient))
}

/// Remove a patient together with their appointments and medical records.
pub fn delete(conn: &Connection, id: i64) -> ServiceResult<()> {
    require(conn, id)?;
    let appointments = db::list_appointments_for_patient(conn, id)?.len();
    let records = db::list_medical_records_for_patient(conn, id)?.len();

    db::delete_patient(conn, id)?;
    tracing::info!(patient_id = id, appointments, records, "Patient deleted");
    Ok(())
}

pub fn find_by_id(conn: &Connection, id: i64) -> ServiceResult<PatientResponse> {
    Ok(PatientResponse::from(&require(conn, id)?))
}

pub fn find_all(conn: &Connection) -> ServiceResult<Vec<PatientResponse>> {
    Ok(db::list_patients(conn)?.iter().map(PatientResponse::from).collect())
}
