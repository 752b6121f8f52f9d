#[derive(Debug, Clone, PartialEq)]
pub struct MedicalRecord {
    pub id: i64,
    pub patient_id: i64,
    pub diagnosis: String,
    pub treatment: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MedicalRecordSummary {
    pub record: MedicalRecord,
    pub patient_name: String,
}
