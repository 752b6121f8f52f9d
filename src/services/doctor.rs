use rusqlite::Connection;

use super::{ensure_unique, require_id, ServiceError, ServiceResult};
use crate::db;
use crate::dto::{apply_doctor_update, new_doctor, DoctorRequest, DoctorResponse};
use crate::models::{Doctor, DoctorSummary};
use crate::validation::check_person;

const EMAIL_TAKEN: &str = "Ya existe un doctor con ese email";
const PHONE_TAKEN: &str = "Ya existe un doctor con ese teléfono";

pub(crate) fn require(conn: &Connection, id: i64) -> ServiceResult<Doctor> {
    db::get_doctor(conn, id)?
        .ok_or_else(|| ServiceError::NotFound(format!("Doctor no encontrado con ID: {id}")))
}

fn check_rules(req: &DoctorRequest) -> ServiceResult<()> {
    check_person(
        req.first_name.as_deref(),
        req.last_name.as_deref(),
        req.phone.as_deref(),
        req.email.as_deref(),
    )?;
    Ok(())
}

pub fn create(conn: &Connection, req: &DoctorRequest) -> ServiceResult<DoctorResponse> {
    check_rules(req)?;

    if let Some(email) = req.email.as_deref() {
        ensure_unique(db::doctor_email_exists(conn, email)?, EMAIL_TAKEN)?;
    }
    if let Some(phone) = req.phone.as_deref() {
        ensure_unique(db::doctor_phone_exists(conn, phone)?, PHONE_TAKEN)?;
    }

    let specialty_id = require_id(req.specialty_id, "specialtyId", "La especialidad es obligatoria")?;
    let specialty = super::specialty::require(conn, specialty_id)?;

    let mut doctor = new_doctor(req, specialty.id);
    doctor.id = db::insert_doctor(conn, &doctor)?;
    tracing::info!(doctor_id = doctor.id, specialty_id, "Doctor created");

    Ok(DoctorResponse::from(&DoctorSummary {
        doctor,
        specialty_name: specialty.name,
    }))
}

pub fn update(conn: &Connection, id: i64, req: &DoctorRequest) -> ServiceResult<DoctorResponse> {
    let mut doctor = require(conn, id)?;
    check_rules(req)?;

    if let Some(email) = req.email.as_deref().filter(|e| *e != doctor.email) {
        ensure_unique(db::doctor_email_exists(conn, email)?, EMAIL_TAKEN)?;
    }
    if let Some(phone) = req.phone.as_deref().filter(|p| *p != doctor.phone) {
        ensure_unique(db::doctor_phone_exists(conn, phone)?, PHONE_TAKEN)?;
    }

    let specialty_id = require_id(req.specialty_id, "specialtyId", "La especialidad es obligatoria")?;
    let specialty = super::specialty::require(conn, specialty_id)?;

    apply_doctor_update(&mut doctor, req, specialty.id);
    db::update_doctor(conn, &doctor)?;

    Ok(DoctorResponse::from(&DoctorSummary {
        doctor,
        specialty_name: specialty.name,
    }))
}

pub fn delete(conn: &Connection, id: i64) -> ServiceResult<()> {
    require(conn, id)?;
    db::delete_doctor(conn, id)?;
    tracing::info!(doctor_id = id, "Doctor deleted");
    Ok(())
}

pub fn find_by_id(conn: &Connection, id: i64) -> ServiceResult<DoctorResponse> {
    db::get_doctor_summary(conn, id)?
        .map(|summary| DoctorResponse::from(&summary))
        .ok_or_else(|| ServiceError::NotFound(format!("Doctor no encontrado con ID: {id}")))
}

pub fn find_all(conn: &Connection) -> ServiceResult<Vec<DoctorResponse>> {
    Ok(db::list_doctor_summaries(conn)?
        .iter()
        .map(DoctorResponse::from)
        .collect())
}
