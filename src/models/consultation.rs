#[derive(Debug, Clone, PartialEq)]
pub struct Consultation {
    pub id: i64,
    pub appointment_id: i64,
    pub medical_record_id: i64,
    pub notes: String,
}
