//! API endpoint handlers, one module per resource.
//!
//! Handlers open a connection, call the matching service and wrap the
//! result in the response envelope.

pub mod appointments;
pub mod auth;
pub mod consultations;
pub mod doctors;
pub mod health;
pub mod medical_records;
pub mod patients;
pub mod specialties;
