use chrono::{NaiveDate, NaiveTime};

use super::enums::AppointmentStatus;

#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub reason: Option<String>,
    pub status: AppointmentStatus,
}

/// Appointment joined with the display names of its patient and doctor.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentSummary {
    pub appointment: Appointment,
    pub patient_name: String,
    pub doctor_name: String,
}
