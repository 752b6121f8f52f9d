use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::models::{Appointment, AppointmentStatus, AppointmentSummary};
use crate::validation::fields::present;
use crate::validation::{FieldErrors, Validate};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    pub patient_id: Option<i64>,
    pub doctor_id: Option<i64>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub reason: Option<String>,
    pub status: Option<String>,
}

impl Validate for AppointmentRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors
            .check("patientId", self.patient_id.is_some(), "El paciente es obligatorio")
            .check("doctorId", self.doctor_id.is_some(), "El doctor es obligatorio")
            .check("date", present(self.date.as_deref()), "La fecha es obligatoria")
            .check("time", present(self.time.as_deref()), "La hora es obligatoria");
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentResponse {
    pub id: i64,
    pub patient_id: i64,
    pub patient_name: String,
    pub doctor_id: i64,
    pub doctor_name: String,
    pub date: NaiveDate,
    pub time: String,
    pub reason: Option<String>,
    pub status: String,
}

impl From<&AppointmentSummary> for AppointmentResponse {
    fn from(summary: &AppointmentSummary) -> Self {
        let a = &summary.appointment;
        Self {
            id: a.id,
            patient_id: a.patient_id,
            patient_name: summary.patient_name.clone(),
            doctor_id: a.doctor_id,
            doctor_name: summary.doctor_name.clone(),
            date: a.date,
            time: format_time(a.time),
            reason: a.reason.clone(),
            status: a.status.as_str().to_string(),
        }
    }
}

/// `HH:MM`, or `HH:MM:SS` when the seconds are not zero.
pub fn format_time(time: NaiveTime) -> String {
    if time.second() == 0 {
        time.format("%H:%M").to_string()
    } else {
        time.format("%H:%M:%S").to_string()
    }
}

/// Parsed and resolved values that both create and update need.
#[derive(Debug, Clone, Copy)]
pub struct AppointmentSlot {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

pub fn new_appointment(
    req: &AppointmentRequest,
    slot: AppointmentSlot,
    status: Option<AppointmentStatus>,
) -> Appointment {
    Appointment {
        id: 0,
        patient_id: slot.patient_id,
        doctor_id: slot.doctor_id,
        date: slot.date,
        time: slot.time,
        reason: req.reason.clone(),
        status: status.unwrap_or_default(),
    }
}

pub fn apply_appointment_update(
    appt: &mut Appointment,
    req: &AppointmentRequest,
    slot: AppointmentSlot,
    status: Option<AppointmentStatus>,
) {
    appt.patient_id = slot.patient_id;
    appt.doctor_id = slot.doctor_id;
    appt.date = slot.date;
    appt.time = slot.time;
    if req.reason.is_some() {
        appt.reason = req.reason.clone();
    }
    if let Some(status) = status {
        appt.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot() -> AppointmentSlot {
        AppointmentSlot {
            patient_id: 1,
            doctor_id: 2,
            date: NaiveDate::from_ymd_opt(2030, 1, 10).unwrap(),
            time: NaiveTime::from_hms_opt(10, 15, 0).unwrap(),
        }
    }

    #[test]
    fn required_fields() {
        let errors = AppointmentRequest::default().validate().unwrap_err();
        assert_eq!(errors.get("patientId"), Some("El paciente es obligatorio"));
        assert_eq!(errors.get("doctorId"), Some("El doctor es obligatorio"));
        assert_eq!(errors.get("date"), Some("La fecha es obligatoria"));
        assert_eq!(errors.get("time"), Some("La hora es obligatoria"));
    }

    #[test]
    fn time_format_drops_zero_seconds() {
        assert_eq!(format_time(NaiveTime::from_hms_opt(9, 5, 0).unwrap()), "09:05");
        assert_eq!(format_time(NaiveTime::from_hms_opt(9, 5, 7).unwrap()), "09:05:07");
    }

    #[test]
    fn new_appointment_defaults_to_scheduled() {
        let appt = new_appointment(&AppointmentRequest::default(), slot(), None);
        assert_eq!(appt.status, AppointmentStatus::Scheduled);
    }

    #[test]
    fn update_keeps_status_when_absent() {
        let mut appt =
            new_appointment(&AppointmentRequest::default(), slot(), Some(AppointmentStatus::Completed));
        apply_appointment_update(&mut appt, &AppointmentRequest::default(), slot(), None);
        assert_eq!(appt.status, AppointmentStatus::Completed);

        apply_appointment_update(
            &mut appt,
            &AppointmentRequest::default(),
            slot(),
            Some(AppointmentStatus::Cancelled),
        );
        assert_eq!(appt.status, AppointmentStatus::Cancelled);
    }

    #[test]
    fn response_shape() {
        let summary = AppointmentSummary {
            appointment: new_appointment(&AppointmentRequest::default(), slot(), None),
            patient_name: "Ana Lopez".into(),
            doctor_name: "Dr. Luis Perez".into(),
        };
        let json = serde_json::to_value(AppointmentResponse::from(&summary)).unwrap();
        assert_eq!(json["date"], "2030-01-10");
        assert_eq!(json["time"], "10:15");
        assert_eq!(json["status"], "SCHEDULED");
        assert_eq!(json["doctorName"], "Dr. Luis Perez");
    }
}
