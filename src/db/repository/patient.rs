use chrono::NaiveDate;
use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::*;

const PATIENT_COLUMNS: &str =
    "id, first_name, last_name, email, phone, address, date_of_birth";

struct PatientRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    address: Option<String>,
    date_of_birth: Option<String>,
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PatientRow> {
    Ok(PatientRow {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        address: row.get(5)?,
        date_of_birth: row.get(6)?,
    })
}

fn patient_from_row(row: PatientRow) -> Result<Patient, DatabaseError> {
    let date_of_birth = row
        .date_of_birth
        .map(|raw| {
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| DatabaseError::CorruptValue {
                field: "patients.date_of_birth".into(),
                value: raw,
            })
        })
        .transpose()?;

    Ok(Patient {
        id: row.id,
        first_name: row.first_name,
        last_name: row.last_name,
        email: row.email,
        phone: row.phone,
        address: row.address,
        date_of_birth,
    })
}

/// Insert a patient and return its generated id.
pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO patients (first_name, last_name, email, phone, address, date_of_birth)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            patient.first_name,
            patient.last_name,
            patient.email,
            patient.phone,
            patient.address,
            patient.date_of_birth.map(|d| d.to_string()),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_patient(conn: &Connection, id: i64) -> Result<Option<Patient>, DatabaseError> {
    let result = conn.query_row(
        &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?1"),
        params![id],
        read_row,
    );

    match result {
        Ok(row) => Ok(Some(patient_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("SELECT {PATIENT_COLUMNS} FROM patients ORDER BY id"))?;
    let rows = stmt.query_map([], read_row)?;

    let mut patients = Vec::new();
    for row in rows {
        patients.push(patient_from_row(row?)?);
    }
    Ok(patients)
}

pub fn update_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE patients SET first_name = ?1, last_name = ?2, email = ?3, phone = ?4,
         address = ?5, date_of_birth = ?6 WHERE id = ?7",
        params![
            patient.first_name,
            patient.last_name,
            patient.email,
            patient.phone,
            patient.address,
            patient.date_of_birth.map(|d| d.to_string()),
            patient.id,
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Patient".into(),
            id: patient.id,
        });
    }
    Ok(())
}

/// Delete a patient. Appointments and medical records cascade.
pub fn delete_patient(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let changed = conn.execute("DELETE FROM patients WHERE id = ?1", params![id])?;
    Ok(changed > 0)
}

pub fn patient_email_exists(conn: &Connection, email: &str) -> Result<bool, DatabaseError> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM patients WHERE email = ?1)",
        params![email],
        |row| row.get::<_, bool>(0),
    )?;
    Ok(exists)
}

pub fn patient_phone_exists(conn: &Connection, phone: &str) -> Result<bool, DatabaseError> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM patients WHERE phone = ?1)",
        params![phone],
        |row| row.get::<_, bool>(0),
    )?;
    Ok(exists)
}
