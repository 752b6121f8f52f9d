use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{overwrite, owned};
use crate::models::Patient;
use crate::validation::fields::{len_at_most, len_between, looks_like_email, present};
use crate::validation::{FieldErrors, Validate};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<String>,
}

impl Validate for PatientRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let first_name = self.first_name.as_deref();
        let last_name = self.last_name.as_deref();
        let email = self.email.as_deref();
        let phone = self.phone.as_deref();

        let mut errors = FieldErrors::new();
        errors
            .check("firstName", present(first_name), "El nombre es obligatorio")
            .check(
                "firstName",
                len_between(first_name.unwrap_or_default(), 2, 50),
                "El nombre debe tener entre 2 y 50 caracteres",
            )
            .check("lastName", present(last_name), "El apellido es obligatorio")
            .check(
                "lastName",
                len_between(last_name.unwrap_or_default(), 2, 50),
                "El apellido debe tener entre 2 y 50 caracteres",
            )
            .check("email", present(email), "El email es obligatorio")
            .check(
                "email",
                looks_like_email(email.unwrap_or_default()),
                "El email debe ser válido",
            )
            .check("phone", present(phone), "El teléfono es obligatorio")
            .check(
                "phone",
                len_between(phone.unwrap_or_default(), 7, 20),
                "El teléfono debe tener entre 7 y 20 dígitos",
            )
            .check(
                "address",
                len_at_most(self.address.as_deref(), 255),
                "La dirección no puede tener más de 255 caracteres",
            );
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

impl From<&Patient> for PatientResponse {
    fn from(p: &Patient) -> Self {
        Self {
            id: p.id,
            first_name: p.first_name.clone(),
            last_name: p.last_name.clone(),
            email: p.email.clone(),
            phone: p.phone.clone(),
            address: p.address.clone(),
            date_of_birth: p.date_of_birth,
        }
    }
}

/// Build an unsaved patient; `date_of_birth` is the already-parsed value.
pub fn new_patient(req: &PatientRequest, date_of_birth: Option<NaiveDate>) -> Patient {
    Patient {
        id: 0,
        first_name: owned(&req.first_name),
        last_name: owned(&req.last_name),
        email: owned(&req.email),
        phone: owned(&req.phone),
        address: req.address.clone(),
        date_of_birth,
    }
}

pub fn apply_patient_update(
    patient: &mut Patient,
    req: &PatientRequest,
    date_of_birth: Option<NaiveDate>,
) {
    overwrite(&mut patient.first_name, &req.first_name);
    overwrite(&mut patient.last_name, &req.last_name);
    overwrite(&mut patient.email, &req.email);
    overwrite(&mut patient.phone, &req.phone);
    if req.address.is_some() {
        patient.address = req.address.clone();
    }
    if date_of_birth.is_some() {
        patient.date_of_birth = date_of_birth;
    }
}
