use serde::{Deserialize, Serialize};

use super::{overwrite, owned};
use crate::models::{MedicalRecord, MedicalRecordSummary};
use crate::validation::fields::present;
use crate::validation::{FieldErrors, Validate};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecordRequest {
    pub patient_id: Option<i64>,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub notes: Option<String>,
}

impl Validate for MedicalRecordRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors
            .check("patientId", self.patient_id.is_some(), "El paciente es obligatorio")
            .check(
                "diagnosis",
                present(self.diagnosis.as_deref()),
                "El diagnóstico es obligatorio",
            );
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecordResponse {
    pub id: i64,
    pub patient_id: i64,
    pub patient_name: String,
    pub diagnosis: String,
    pub treatment: Option<String>,
    pub notes: Option<String>,
}

impl From<&MedicalRecordSummary> for MedicalRecordResponse {
    fn from(summary: &MedicalRecordSummary) -> Self {
        let r = &summary.record;
        Self {
            id: r.id,
            patient_id: r.patient_id,
            patient_name: summary.patient_name.clone(),
            diagnosis: r.diagnosis.clone(),
            treatment: r.treatment.clone(),
            notes: r.notes.clone(),
        }
    }
}

pub fn new_medical_record(req: &MedicalRecordRequest, patient_id: i64) -> MedicalRecord {
    MedicalRecord {
        id: 0,
        patient_id,
        diagnosis: owned(&req.diagnosis),
        treatment: req.treatment.clone(),
        notes: req.notes.clone(),
    }
}

pub fn apply_medical_record_update(
    record: &mut MedicalRecord,
    req: &MedicalRecordRequest,
    patient_id: i64,
) {
    record.patient_id = patient_id;
    overwrite(&mut record.diagnosis, &req.diagnosis);
    if req.treatment.is_some() {
        record.treatment = req.treatment.clone();
    }
    if req.notes.is_some() {
        record.notes = req.notes.clone();
    }
}
