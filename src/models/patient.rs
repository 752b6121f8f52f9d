use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct Patient {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        person_name(&self.first_name, &self.last_name)
    }
}

/// "First Last", as shown wherever a patient is referenced.
pub fn person_name(first: &str, last: &str) -> String {
    format!("{first} {last}")
}
