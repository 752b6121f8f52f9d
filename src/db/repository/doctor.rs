use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::*;

const SUMMARY_SELECT: &str =
    "SELECT d.id, d.first_name, d.last_name, d.email, d.phone, d.specialty_id, s.name
     FROM doctors d JOIN specialties s ON s.id = d.specialty_id";

fn doctor_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Doctor> {
    Ok(Doctor {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        specialty_id: row.get(5)?,
    })
}

fn summary_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DoctorSummary> {
    Ok(DoctorSummary {
        doctor: doctor_from_row(row)?,
        specialty_name: row.get(6)?,
    })
}

/// Insert a doctor and return its generated id.
pub fn insert_doctor(conn: &Connection, doctor: &Doctor) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO doctors (first_name, last_name, email, phone, specialty_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            doctor.first_name,
            doctor.last_name,
            doctor.email,
            doctor.phone,
            doctor.specialty_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_doctor(conn: &Connection, id: i64) -> Result<Option<Doctor>, DatabaseError> {
    let result = conn.query_row(
        "SELECT id, first_name, last_name, email, phone, specialty_id FROM doctors WHERE id = ?1",
        params![id],
        doctor_from_row,
    );

    match result {
        Ok(doctor) => Ok(Some(doctor)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_doctor_summary(conn: &Connection, id: i64) -> Result<Option<DoctorSummary>, DatabaseError> {
    let result = conn.query_row(
        &format!("{SUMMARY_SELECT} WHERE d.id = ?1"),
        params![id],
        summary_from_row,
    );

    match result {
        Ok(summary) => Ok(Some(summary)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_doctor_summaries(conn: &Connection) -> Result<Vec<DoctorSummary>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{SUMMARY_SELECT} ORDER BY d.id"))?;
    let rows = stmt.query_map([], summary_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn update_doctor(conn: &Connection, doctor: &Doctor) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE doctors SET first_name = ?1, last_name = ?2, email = ?3, phone = ?4,
         specialty_id = ?5 WHERE id = ?6",
        params![
            doctor.first_name,
            doctor.last_name,
            doctor.email,
            doctor.phone,
            doctor.specialty_id,
            doctor.id,
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Doctor".into(),
            id: doctor.id,
        });
    }
    Ok(())
}

/// Delete a doctor. Appointments cascade.
pub fn delete_doctor(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let changed = conn.execute("DELETE FROM doctors WHERE id = ?1", params![id])?;
    Ok(changed > 0)
}

pub fn doctor_email_exists(conn: &Connection, email: &str) -> Result<bool, DatabaseError> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM doctors WHERE email = ?1)",
        params![email],
        |row| row.get::<_, bool>(0),
    )?;
    Ok(exists)
}

pub fn doctor_phone_exists(conn: &Connection, phone: &str) -> Result<bool, DatabaseError> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM doctors WHERE phone = ?1)",
        params![phone],
        |row| row.get::<_, bool>(0),
    )?;
    Ok(exists)
}
