use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::*;

fn specialty_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Specialty> {
    Ok(Specialty {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
    })
}

/// Insert a specialty and return its generated id.
pub fn insert_specialty(conn: &Connection, specialty: &Specialty) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO specialties (name, description) VALUES (?1, ?2)",
        params![specialty.name, specialty.description],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_specialty(conn: &Connection, id: i64) -> Result<Option<Specialty>, DatabaseError> {
    let result = conn.query_row(
        "SELECT id, name, description FROM specialties WHERE id = ?1",
        params![id],
        specialty_from_row,
    );

    match result {
        Ok(specialty) => Ok(Some(specialty)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_specialties(conn: &Connection) -> Result<Vec<Specialty>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT id, name, description FROM specialties ORDER BY id")?;
    let rows = stmt.query_map([], specialty_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn update_specialty(conn: &Connection, specialty: &Specialty) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE specialties SET name = ?1, description = ?2 WHERE id = ?3",
        params![specialty.name, specialty.description, specialty.id],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Specialty".into(),
            id: specialty.id,
        });
    }
    Ok(())
}

/// Delete a specialty. Its doctors (and their appointments) cascade.
pub fn delete_specialty(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let changed = conn.execute("DELETE FROM specialties WHERE id = ?1", params![id])?;
    Ok(changed > 0)
}

pub fn specialty_name_exists(conn: &Connection, name: &str) -> Result<bool, DatabaseError> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM specialties WHERE name = ?1)",
        params![name],
        |row| row.get::<_, bool>(0),
    )?;
    Ok(exists)
}
