pub mod appointment;
pub mod consultation;
pub mod doctor;
pub mod enums;
pub mod medical_record;
pub mod patient;
pub mod specialty;
pub mod user;

pub use appointment::*;
pub use consultation::*;
pub use doctor::*;
pub use enums::*;
pub use medical_record::*;
pub use patient::*;
pub use specialty::*;
pub use user::*;
