use serde::{Deserialize, Serialize};

use super::{overwrite, owned};
use crate::models::Consultation;
use crate::validation::fields::present;
use crate::validation::{FieldErrors, Validate};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationRequest {
    pub appointment_id: Option<i64>,
    pub medical_record_id: Option<i64>,
    pub notes: Option<String>,
}

impl Validate for ConsultationRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors
            .check("appointmentId", self.appointment_id.is_some(), "La cita es obligatoria")
            .check(
                "medicalRecordId",
                self.medical_record_id.is_some(),
                "La historia médica es obligatoria",
            )
            .check("notes", present(self.notes.as_deref()), "Las notas son obligatorias");
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationResponse {
    pub id: i64,
    pub appointment_id: i64,
    pub medical_record_id: i64,
    pub notes: String,
}

impl From<&Consultation> for ConsultationResponse {
    fn from(c: &Consultation) -> Self {
        Self {
            id: c.id,
            appointment_id: c.appointment_id,
            medical_record_id: c.medical_record_id,
            notes: c.notes.clone(),
        }
    }
}

pub fn new_consultation(
    req: &ConsultationRequest,
    appointment_id: i64,
    medical_record_id: i64,
) -> Consultation {
    Consultation {
        id: 0,
        appointment_id,
        medical_record_id,
        notes: owned(&req.notes),
    }
}

pub fn apply_consultation_update(
    consultation: &mut Consultation,
    req: &ConsultationRequest,
    appointment_id: i64,
    medical_record_id: i64,
) {
    consultation.appointment_id = appointment_id;
    consultation.medical_record_id = medical_record_id;
    overwrite(&mut consultation.notes, &req.notes);
}
