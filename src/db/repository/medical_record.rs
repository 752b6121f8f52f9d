use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::*;

const SUMMARY_SELECT: &str =
    "SELECT m.id, m.patient_id, m.diagnosis, m.treatment, m.notes, p.first_name, p.last_name
     FROM medical_records m JOIN patients p ON p.id = m.patient_id";

fn record_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MedicalRecord> {
    Ok(MedicalRecord {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        diagnosis: row.get(2)?,
        treatment: row.get(3)?,
        notes: row.get(4)?,
    })
}

fn summary_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MedicalRecordSummary> {
    let first: String = row.get(5)?;
    let last: String = row.get(6)?;
    Ok(MedicalRecordSummary {
        record: record_from_row(row)?,
        patient_name: person_name(&first, &last),
    })
}

/// Insert a medical record and return its generated id.
pub fn insert_medical_record(
    conn: &Connection,
    record: &MedicalRecord,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO medical_records (patient_id, diagnosis, treatment, notes)
         VALUES (?1, ?2, ?3, ?4)",
        params![record.patient_id, record.diagnosis, record.treatment, record.notes],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_medical_record(conn: &Connection, id: i64) -> Result<Option<MedicalRecord>, DatabaseError> {
    let result = conn.query_row(
        "SELECT id, patient_id, diagnosis, treatment, notes FROM medical_records WHERE id = ?1",
        params![id],
        record_from_row,
    );

    match result {
        Ok(record) => Ok(Some(record)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_medical_record_summary(
    conn: &Connection,
    id: i64,
) -> Result<Option<MedicalRecordSummary>, DatabaseError> {
    let result = conn.query_row(
        &format!("{SUMMARY_SELECT} WHERE m.id = ?1"),
        params![id],
        summary_from_row,
    );

    match result {
        Ok(summary) => Ok(Some(summary)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_medical_record_summaries(
    conn: &Connection,
) -> Result<Vec<MedicalRecordSummary>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{SUMMARY_SELECT} ORDER BY m.id"))?;
    let rows = stmt.query_map([], summary_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Records for one patient, in creation order.
pub fn list_medical_records_for_patient(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<MedicalRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, diagnosis, treatment, notes
         FROM medical_records WHERE patient_id = ?1 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![patient_id], record_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn update_medical_record(conn: &Connection, record: &MedicalRecord) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE medical_records SET patient_id = ?1, diagnosis = ?2, treatment = ?3, notes = ?4
         WHERE id = ?5",
        params![
            record.patient_id,
            record.diagnosis,
            record.treatment,
            record.notes,
            record.id,
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "MedicalRecord".into(),
            id: record.id,
        });
    }
    Ok(())
}

/// Delete a medical record. Its consultations cascade.
pub fn delete_medical_record(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let changed = conn.execute("DELETE FROM medical_records WHERE id = ?1", params![id])?;
    Ok(changed > 0)
}
