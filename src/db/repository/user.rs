use std::str::FromStr;

use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::*;

struct UserRow {
    id: i64,
    firstname: String,
    lastname: String,
    email: String,
    password_hash: String,
    role: String,
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        firstname: row.get(1)?,
        lastname: row.get(2)?,
        email: row.get(3)?,
        password_hash: row.get(4)?,
        role: row.get(5)?,
    })
}

fn user_from_row(row: UserRow) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.id,
        firstname: row.firstname,
        lastname: row.lastname,
        email: row.email,
        password_hash: row.password_hash,
        role: Role::from_str(&row.role)?,
    })
}

/// Insert a user and return its generated id.
pub fn insert_user(conn: &Connection, user: &User) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO users (firstname, lastname, email, password_hash, role)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user.firstname,
            user.lastname,
            user.email,
            user.password_hash,
            user.role.as_str(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>, DatabaseError> {
    let result = conn.query_row(
        "SELECT id, firstname, lastname, email, password_hash, role FROM users WHERE email = ?1",
        params![email],
        read_row,
    );

    match result {
        Ok(row) => Ok(Some(user_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn user_email_exists(conn: &Connection, email: &str) -> Result<bool, DatabaseError> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1)",
        params![email],
        |row| row.get::<_, bool>(0),
    )?;
    Ok(exists)
}
