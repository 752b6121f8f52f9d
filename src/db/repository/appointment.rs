use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::*;

/// Storage format for appointment times.
const TIME_FORMAT: &str = "%H:%M:%S";

const SUMMARY_SELECT: &str =
    "SELECT a.id, a.patient_id, a.doctor_id, a.date, a.time, a.reason, a.status,
            p.first_name, p.last_name, d.first_name, d.last_name
     FROM appointments a
     JOIN patients p ON p.id = a.patient_id
     JOIN doctors d ON d.id = a.doctor_id";

struct AppointmentRow {
    id: i64,
    patient_id: i64,
    doctor_id: i64,
    date: String,
    time: String,
    reason: Option<String>,
    status: String,
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AppointmentRow> {
    Ok(AppointmentRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        doctor_id: row.get(2)?,
        date: row.get(3)?,
        time: row.get(4)?,
        reason: row.get(5)?,
        status: row.get(6)?,
    })
}

fn appointment_from_row(row: AppointmentRow) -> Result<Appointment, DatabaseError> {
    let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d").map_err(|_| {
        DatabaseError::CorruptValue {
            field: "appointments.date".into(),
            value: row.date.clone(),
        }
    })?;
    let time = NaiveTime::parse_from_str(&row.time, TIME_FORMAT).map_err(|_| {
        DatabaseError::CorruptValue {
            field: "appointments.time".into(),
            value: row.time.clone(),
        }
    })?;

    Ok(Appointment {
        id: row.id,
        patient_id: row.patient_id,
        doctor_id: row.doctor_id,
        date,
        time,
        reason: row.reason,
        status: AppointmentStatus::from_str(&row.status)?,
    })
}

struct SummaryRow {
    appointment: AppointmentRow,
    patient_first: String,
    patient_last: String,
    doctor_first: String,
    doctor_last: String,
}

fn read_summary_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SummaryRow> {
    Ok(SummaryRow {
        appointment: read_row(row)?,
        patient_first: row.get(7)?,
        patient_last: row.get(8)?,
        doctor_first: row.get(9)?,
        doctor_last: row.get(10)?,
    })
}

fn summary_from_row(row: SummaryRow) -> Result<AppointmentSummary, DatabaseError> {
    Ok(AppointmentSummary {
        appointment: appointment_from_row(row.appointment)?,
        patient_name: person_name(&row.patient_first, &row.patient_last),
        doctor_name: doctor_name(&row.doctor_first, &row.doctor_last),
    })
}

/// Insert an appointment and return its generated id.
pub fn insert_appointment(conn: &Connection, appt: &Appointment) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (patient_id, doctor_id, date, time, reason, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            appt.patient_id,
            appt.doctor_id,
            appt.date.to_string(),
            appt.time.format(TIME_FORMAT).to_string(),
            appt.reason,
            appt.status.as_str(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_appointment(conn: &Connection, id: i64) -> Result<Option<Appointment>, DatabaseError> {
    let result = conn.query_row(
        "SELECT id, patient_id, doctor_id, date, time, reason, status
         FROM appointments WHERE id = ?1",
        params![id],
        read_row,
    );

    match result {
        Ok(row) => Ok(Some(appointment_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_appointment_summary(
    conn: &Connection,
    id: i64,
) -> Result<Option<AppointmentSummary>, DatabaseError> {
    let result = conn.query_row(
        &format!("{SUMMARY_SELECT} WHERE a.id = ?1"),
        params![id],
        read_summary_row,
    );

    match result {
        Ok(row) => Ok(Some(summary_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_appointment_summaries(
    conn: &Connection,
) -> Result<Vec<AppointmentSummary>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{SUMMARY_SELECT} ORDER BY a.id"))?;
    let rows = stmt.query_map([], read_summary_row)?;

    let mut summaries = Vec::new();
    for row in rows {
        summaries.push(summary_from_row(row?)?);
    }
    Ok(summaries)
}

pub fn update_appointment(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE appointments SET patient_id = ?1, doctor_id = ?2, date = ?3, time = ?4,
         reason = ?5, status = ?6 WHERE id = ?7",
        params![
            appt.patient_id,
            appt.doctor_id,
            appt.date.to_string(),
            appt.time.format(TIME_FORMAT).to_string(),
            appt.reason,
            appt.status.as_str(),
            appt.id,
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Appointment".into(),
            id: appt.id,
        });
    }
    Ok(())
}

/// Delete an appointment. Its consultation cascades.
pub fn delete_appointment(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let changed = conn.execute("DELETE FROM appointments WHERE id = ?1", params![id])?;
    Ok(changed > 0)
}

/// Appointments for one patient, oldest first.
pub fn list_appointments_for_patient(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, doctor_id, date, time, reason, status
         FROM appointments WHERE patient_id = ?1 ORDER BY date, time",
    )?;
    let rows = stmt.query_map(params![patient_id], read_row)?;

    let mut appointments = Vec::new();
    for row in rows {
        appointments.push(appointment_from_row(row?)?);
    }
    Ok(appointments)
}
