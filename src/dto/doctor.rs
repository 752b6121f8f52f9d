use serde::{Deserialize, Serialize};

use super::{overwrite, owned};
use crate::models::{Doctor, DoctorSummary};
use crate::validation::fields::present;
use crate::validation::{FieldErrors, Validate};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub specialty_id: Option<i64>,
}

impl Validate for DoctorRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors
            .check("firstName", present(self.first_name.as_deref()), "El nombre es obligatorio")
            .check("lastName", present(self.last_name.as_deref()), "El apellido es obligatorio")
            .check("email", present(self.email.as_deref()), "El email es obligatorio")
            .check("phone", present(self.phone.as_deref()), "El teléfono es obligatorio")
            .check(
                "specialtyId",
                self.specialty_id.is_some(),
                "La especialidad es obligatoria",
            );
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub specialty_id: i64,
    pub specialty_name: String,
}

impl From<&DoctorSummary> for DoctorResponse {
    fn from(summary: &DoctorSummary) -> Self {
        let d = &summary.doctor;
        Self {
            id: d.id,
            first_name: d.first_name.clone(),
            last_name: d.last_name.clone(),
            email: d.email.clone(),
            phone: d.phone.clone(),
            specialty_id: d.specialty_id,
            specialty_name: summary.specialty_name.clone(),
        }
    }
}

pub fn new_doctor(req: &DoctorRequest, specialty_id: i64) -> Doctor {
    Doctor {
        id: 0,
        first_name: owned(&req.first_name),
        last_name: owned(&req.last_name),
        email: owned(&req.email),
        phone: owned(&req.phone),
        specialty_id,
    }
}

/// The specialty is always re-resolved, so it is passed separately.
pub fn apply_doctor_update(doctor: &mut Doctor, req: &DoctorRequest, specialty_id: i64) {
    overwrite(&mut doctor.first_name, &req.first_name);
    overwrite(&mut doctor.last_name, &req.last_name);
    overwrite(&mut doctor.email, &req.email);
    overwrite(&mut doctor.phone, &req.phone);
    doctor.specialty_id = specialty_id;
}
