//! Repository layer: entity-scoped database operations.
//!
//! Plain functions over a borrowed `Connection`. Lookups return
//! `Option`; updates report a missing row as `DatabaseError::NotFound`;
//! deletes return whether a row was removed.

mod appointment;
mod consultation;
mod doctor;
mod medical_record;
mod patient;
mod specialty;
mod user;

pub use appointment::*;
pub use consultation::*;
pub use doctor::*;
pub use medical_record::*;
pub use patient::*;
pub use specialty::*;
pub use user::*;
