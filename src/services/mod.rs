//! Entity services: validate → uniqueness → resolve references → persist → map.
//!
//! Every function borrows a connection opened by the caller, so a request's
//! checks and writes all run on one connection.

pub mod appointment;
pub mod auth;
pub mod consultation;
pub mod doctor;
pub mod medical_record;
pub mod patient;
pub mod specialty;

use chrono::NaiveDate;

use crate::crypto::CryptoError;
use crate::db::DatabaseError;
use crate::validation::{FieldErrors, RuleViolation};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(FieldErrors),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BusinessRule(String),

    #[error("{0}")]
    BadCredentials(String),

    #[error("{0}")]
    UnknownUser(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl From<RuleViolation> for ServiceError {
    fn from(v: RuleViolation) -> Self {
        ServiceError::BusinessRule(v.0)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// A reference id the request must carry.
pub(crate) fn require_id(value: Option<i64>, field: &str, message: &str) -> ServiceResult<i64> {
    value.ok_or_else(|| ServiceError::Validation(FieldErrors::single(field, message)))
}

/// A text field the request must carry, non-blank.
pub(crate) fn require_text<'a>(
    value: &'a Option<String>,
    field: &str,
    message: &str,
) -> ServiceResult<&'a str> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ServiceError::Validation(FieldErrors::single(field, message))),
    }
}

/// Reject a value already taken by another row.
pub(crate) fn ensure_unique(taken: bool, message: &str) -> ServiceResult<()> {
    if taken {
        Err(ServiceError::BusinessRule(message.to_string()))
    } else {
        Ok(())
    }
}
