use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::*;

const CONSULTATION_COLUMNS: &str = "id, appointment_id, medical_record_id, notes";

fn consultation_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Consultation> {
    Ok(Consultation {
        id: row.get(0)?,
        appointment_id: row.get(1)?,
        medical_record_id: row.get(2)?,
        notes: row.get(3)?,
    })
}

/// Insert a consultation and return its generated id.
///
/// An appointment holds at most one consultation; a second insert for the
/// same appointment fails with a UNIQUE constraint violation.
pub fn insert_consultation(conn: &Connection, consultation: &Consultation) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO consultations (appointment_id, medical_record_id, notes) VALUES (?1, ?2, ?3)",
        params![
            consultation.appointment_id,
            consultation.medical_record_id,
            consultation.notes,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_consultation(conn: &Connection, id: i64) -> Result<Option<Consultation>, DatabaseError> {
    let result = conn.query_row(
        &format!("SELECT {CONSULTATION_COLUMNS} FROM consultations WHERE id = ?1"),
        params![id],
        consultation_from_row,
    );

    match result {
        Ok(consultation) => Ok(Some(consultation)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_consultations(conn: &Connection) -> Result<Vec<Consultation>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CONSULTATION_COLUMNS} FROM consultations ORDER BY id"
    ))?;
    let rows = stmt.query_map([], consultation_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn update_consultation(conn: &Connection, consultation: &Consultation) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE consultations SET appointment_id = ?1, medical_record_id = ?2, notes = ?3
         WHERE id = ?4",
        params![
            consultation.appointment_id,
            consultation.medical_record_id,
            consultation.notes,
            consultation.id,
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Consultation".into(),
            id: consultation.id,
        });
    }
    Ok(())
}

pub fn delete_consultation(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let changed = conn.execute("DELETE FROM consultations WHERE id = ?1", params![id])?;
    Ok(changed > 0)
}
