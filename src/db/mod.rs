pub mod sqlite;
pub mod repository;

pub use sqlite::*;
pub use repository::*;

use std::fmt;

use rusqlite::ffi;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: i64 },

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Unreadable stored value for {field}: {value}")]
    CorruptValue { field: String, value: String },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Constraint violated: {0}")]
    ConstraintViolation(Constraint),
}

/// Constraint families reported by SQLite's extended result codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    PrimaryKey,
    ForeignKey,
    NotNull,
    Check,
    Other,
}

impl ConstraintKind {
    fn from_extended_code(code: i32) -> Self {
        match code {
            ffi::SQLITE_CONSTRAINT_UNIQUE => Self::Unique,
            ffi::SQLITE_CONSTRAINT_PRIMARYKEY => Self::PrimaryKey,
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Self::ForeignKey,
            ffi::SQLITE_CONSTRAINT_NOTNULL => Self::NotNull,
            ffi::SQLITE_CONSTRAINT_CHECK => Self::Check,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unique => "UNIQUE",
            Self::PrimaryKey => "PRIMARY KEY",
            Self::ForeignKey => "FOREIGN KEY",
            Self::NotNull => "NOT NULL",
            Self::Check => "CHECK",
            Self::Other => "CONSTRAINT",
        }
    }
}

/// A classified constraint failure.
///
/// `table` and `column` come from SQLite's `table.column` detail, which is
/// only reported for UNIQUE, PRIMARY KEY and NOT NULL failures. For
/// composite keys the first column is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub kind: ConstraintKind,
    pub table: Option<String>,
    pub column: Option<String>,
}

impl Constraint {
    pub fn classify(extended_code: i32, detail: Option<&str>) -> Self {
        let kind = ConstraintKind::from_extended_code(extended_code);
        let target = detail
            .and_then(|d| d.rsplit_once(": "))
            .and_then(|(_, cols)| cols.split(',').next())
            .and_then(|first| first.trim().split_once('.'));

        Self {
            kind,
            table: target.map(|(t, _)| t.to_string()),
            column: target.map(|(_, c)| c.to_string()),
        }
    }

    /// True for a uniqueness failure on an `email` column.
    pub fn is_duplicate_email(&self) -> bool {
        matches!(self.kind, ConstraintKind::Unique) && self.column.as_deref() == Some("email")
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self.kind, ConstraintKind::Unique | ConstraintKind::PrimaryKey)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.table, &self.column) {
            (Some(table), Some(column)) => {
                write!(f, "{} on {table}.{column}", self.kind.as_str())
            }
            _ => f.write_str(self.kind.as_str()),
        }
    }
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(ffi_err, detail) = &err {
            if ffi_err.code == rusqlite::ErrorCode::ConstraintViolation {
                return DatabaseError::ConstraintViolation(Constraint::classify(
                    ffi_err.extended_code,
                    detail.as_deref(),
                ));
            }
        }
        DatabaseError::Sqlite(err)
    }
}
