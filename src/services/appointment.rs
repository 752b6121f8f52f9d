use rusqlite::Connection;

use super::{require_id, require_text, today, ServiceError, ServiceResult};
use crate::db;
use crate::dto::{
    apply_appointment_update, new_appointment, AppointmentRequest, AppointmentResponse,
    AppointmentSlot,
};
use crate::models::{Appointment, AppointmentStatus, AppointmentSummary, Doctor, Patient};
use crate::validation::{parse_appointment_date, parse_appointment_time, parse_status};

pub(crate) fn require(conn: &Connection, id: i64) -> ServiceResult<Appointment> {
    db::get_appointment(conn, id)?
        .ok_or_else(|| ServiceError::NotFound(format!("Cita no encontrada con ID: {id}")))
}

struct Resolved {
    slot: AppointmentSlot,
    status: Option<AppointmentStatus>,
    patient: Patient,
    doctor: Doctor,
}

/// Date, time and status rules, then the patient and doctor lookups.
fn resolve(conn: &Connection, req: &AppointmentRequest) -> ServiceResult<Resolved> {
    let date = parse_appointment_date(
        require_text(&req.date, "date", "La fecha es obligatoria")?,
        today(),
    )?;
    let time = parse_appointment_time(require_text(&req.time, "time", "La hora es obligatoria")?)?;
    let status = parse_status(req.status.as_deref())?;

    let patient_id = require_id(req.patient_id, "patientId", "El paciente es obligatorio")?;
    let doctor_id = require_id(req.doctor_id, "doctorId", "El doctor es obligatorio")?;
    let patient = super::patient::require(conn, patient_id)?;
    let doctor = super::doctor::require(conn, doctor_id)?;

    Ok(Resolved {
        slot: AppointmentSlot {
            patient_id: patient.id,
            doctor_id: doctor.id,
            date,
            time,
        },
        status,
        patient,
        doctor,
    })
}

fn respond(appointment: Appointment, patient: &Patient, doctor: &Doctor) -> AppointmentResponse {
    AppointmentResponse::from(&AppointmentSummary {
        appointment,
        patient_name: patient.full_name(),
        doctor_name: doctor.display_name(),
    })
}

pub fn create(conn: &Connection, req: &AppointmentRequest) -> ServiceResult<AppointmentResponse> {
    let resolved = resolve(conn, req)?;

    let mut appointment = new_appointment(req, resolved.slot, resolved.status);
    appointment.id = db::insert_appointment(conn, &appointment)?;
    tracing::info!(
        appointment_id = appointment.id,
        patient_id = appointment.patient_id,
        doctor_id = appointment.doctor_id,
        "Appointment created"
    );
    Ok(respond(appointment, &resolved.patient, &resolved.doctor))
}

pub fn update(
    conn: &Connection,
    id: i64,
    req: &AppointmentRequest,
) -> ServiceResult<AppointmentResponse> {
    let mut appointment = require(conn, id)?;
    let resolved = resolve(conn, req)?;

    apply_appointment_update(&mut appointment, req, resolved.slot, resolved.status);
    db::update_appointment(conn, &appointment)?;
    Ok(respond(appointment, &resolved.patient, &resolved.doctor))
}

/// Remove an appointment and its consultation, if any.
pub fn delete(conn: &Connection, id: i64) -> ServiceResult<()> {
    require(conn, id)?;
    db::delete_appointment(conn, id)?;
    tracing::info!(appointment_id = id, "Appointment deleted");
    Ok(())
}

pub fn find_by_id(conn: &Connection, id: i64) -> ServiceResult<AppointmentResponse> {
    db::get_appointment_summary(conn, id)?
        .map(|summary| AppointmentResponse::from(&summary))
        .ok_or_else(|| ServiceError::NotFound(format!("Cita no encontrada con ID: {id}")))
}

pub fn find_all(conn: &Connection) -> ServiceResult<Vec<AppointmentResponse>> {
    Ok(db::list_appointment_summaries(conn)?
        .iter()
        .map(AppointmentResponse::from)
        .collect())
}
