#[derive(Debug, Clone, PartialEq)]
pub struct Doctor {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub specialty_id: i64,
}

impl Doctor {
    pub fn display_name(&self) -> String {
        doctor_name(&self.first_name, &self.last_name)
    }
}

/// Display form used on appointment listings ("Dr. First Last").
pub fn doctor_name(first: &str, last: &str) -> String {
    format!("Dr. {first} {last}")
}

/// Doctor joined with the name of its specialty.
#[derive(Debug, Clone, PartialEq)]
pub struct DoctorSummary {
    pub doctor: Doctor,
    pub specialty_name: String,
}
