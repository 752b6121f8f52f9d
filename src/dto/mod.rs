//! Request and response bodies, with the mapping to and from entities.
//!
//! Requests keep every field optional so that a JSON `null` and an absent
//! field read the same; [`Validate`](crate::validation::Validate) decides
//! which ones are required. On update only the fields that are present
//! overwrite the stored entity.

pub mod appointment;
pub mod auth;
pub mod consultation;
pub mod doctor;
pub mod medical_record;
pub mod patient;
pub mod specialty;

pub use appointment::*;
pub use auth::*;
pub use consultation::*;
pub use doctor::*;
pub use medical_record::*;
pub use patient::*;
pub use specialty::*;

/// Owned copy of a field that validation has already required.
pub(crate) fn owned(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Overwrite `target` when the request carries a value.
pub(crate) fn overwrite<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(v) = value {
        *target = v.clone();
    }
}
