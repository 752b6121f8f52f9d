//! Business-rule validation shared by every entity service.
//!
//! Each check is a pure function over the raw request value and returns
//! the first violated rule as a [`RuleViolation`], which the service layer
//! reports as a 409. Date checks take `today` explicitly so callers decide
//! the clock.
//!
//! Field-presence checks (reported as 400) live in [`fields`].

pub mod fields;

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

use crate::models::AppointmentStatus;

pub use fields::{FieldErrors, Validate};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
});

/// A violated business rule, carrying the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct RuleViolation(pub String);

impl RuleViolation {
    fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

type RuleResult<T = ()> = Result<T, RuleViolation>;

fn char_len(value: &str) -> usize {
    value.chars().count()
}

// ═══════════════════════════════════════════════════════════
// People (patients and doctors)
// ═══════════════════════════════════════════════════════════

pub const FIRST_NAME_MIN: usize = 2;
pub const FIRST_NAME_MAX: usize = 25;
pub const LAST_NAME_MAX: usize = 20;
pub const PHONE_DIGITS: usize = 8;

pub fn check_first_name(first_name: &str) -> RuleResult {
    if char_len(first_name.trim()) < FIRST_NAME_MIN {
        return Err(RuleViolation::new("El nombre debe tener mínimo 2 letras"));
    }
    if char_len(first_name) > FIRST_NAME_MAX {
        return Err(RuleViolation::new("El nombre no puede tener más de 25 letras"));
    }
    Ok(())
}

pub fn check_last_name(last_name: &str) -> RuleResult {
    if char_len(last_name) > LAST_NAME_MAX {
        return Err(RuleViolation::new("El apellido no puede tener más de 20 letras"));
    }
    Ok(())
}

pub fn check_phone(phone: &str) -> RuleResult {
    if phone.len() != PHONE_DIGITS || !phone.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RuleViolation::new("El teléfono debe tener exactamente 8 dígitos"));
    }
    Ok(())
}

/// Email shape plus per-part length bounds.
///
/// The domain is everything between `@` and the last dot; the extension is
/// what follows the last dot.
pub fn check_email(email: &str) -> RuleResult {
    let email = email.trim();
    if !EMAIL_PATTERN.is_match(email) {
        return Err(RuleViolation::new(
            "El email debe contener solo letras, números, puntos y guiones bajos",
        ));
    }

    let Some((local, host)) = email.split_once('@') else {
        return Err(RuleViolation::new(
            "El email debe contener solo letras, números, puntos y guiones bajos",
        ));
    };

    let local_len = char_len(local);
    if local_len < 4 {
        return Err(RuleViolation::new(
            "La parte antes del @ debe tener mínimo 4 caracteres",
        ));
    }
    if local_len > 30 {
        return Err(RuleViolation::new(
            "La parte antes del @ debe tener máximo 30 caracteres",
        ));
    }

    let (domain, extension) = host.rsplit_once('.').unwrap_or((host, ""));
    if char_len(domain) > 20 {
        return Err(RuleViolation::new(
            "El dominio (después del @) debe tener máximo 20 caracteres",
        ));
    }
    if char_len(extension) > 20 {
        return Err(RuleViolation::new(
            "La extensión (después del último punto) debe tener máximo 20 caracteres",
        ));
    }
    Ok(())
}

/// Rules common to patients and doctors: name, surname, phone, then
/// email. Absent values are skipped.
pub fn check_person(
    first_name: Option<&str>,
    last_name: Option<&str>,
    phone: Option<&str>,
    email: Option<&str>,
) -> RuleResult {
    first_name.map_or(Ok(()), check_first_name)?;
    last_name.map_or(Ok(()), check_last_name)?;
    phone.map_or(Ok(()), check_phone)?;
    email.map_or(Ok(()), check_email)
}

// ═══════════════════════════════════════════════════════════
// Dates, times and status
// ═══════════════════════════════════════════════════════════

/// Earliest accepted date of birth.
pub fn min_birth_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Parse an optional ISO date of birth; blank means "not provided".
pub fn parse_birth_date(raw: Option<&str>, today: NaiveDate) -> RuleResult<Option<NaiveDate>> {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return Ok(None);
    };

    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        RuleViolation::new(format!("Formato de fecha de nacimiento inválido: {raw}"))
    })?;

    if date < min_birth_date() {
        return Err(RuleViolation::new(
            "La fecha de nacimiento no puede ser anterior a 1900-01-01",
        ));
    }
    if date > today {
        return Err(RuleViolation::new("La fecha de nacimiento no puede ser futura"));
    }
    Ok(Some(date))
}

/// Appointment dates must be today or later.
pub fn parse_appointment_date(raw: &str, today: NaiveDate) -> RuleResult<NaiveDate> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| RuleViolation::new(format!("Formato de fecha inválido: {raw}")))?;
    if date < today {
        return Err(RuleViolation::new("La fecha de la cita no puede ser en el pasado"));
    }
    Ok(date)
}

/// Accepts `HH:MM` and `HH:MM:SS`.
pub fn parse_appointment_time(raw: &str) -> RuleResult<NaiveTime> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| RuleViolation::new(format!("Formato de hora inválido: {raw}")))
}

/// Case-insensitive status; blank means "not provided".
pub fn parse_status(raw: Option<&str>) -> RuleResult<Option<AppointmentStatus>> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };
    AppointmentStatus::from_str(&raw.to_uppercase())
        .map(Some)
        .map_err(|_| {
            RuleViolation::new("El estado de la cita debe ser SCHEDULED, COMPLETED o CANCELLED")
        })
}

// ═══════════════════════════════════════════════════════════
// Free text and passwords
// ═══════════════════════════════════════════════════════════

/// Reject `value` when it is longer than `max` characters.
pub fn check_max_len(value: Option<&str>, max: usize, message: &str) -> RuleResult {
    match value {
        Some(v) if char_len(v) > max => Err(RuleViolation::new(message)),
        _ => Ok(()),
    }
}

pub const PASSWORD_MIN: usize = 6;
pub const PASSWORD_MAX: usize = 30;

pub fn check_password(password: &str) -> RuleResult {
    let len = char_len(password);
    if len < PASSWORD_MIN {
        return Err(RuleViolation::new("La contraseña debe tener mínimo 6 caracteres"));
    }
    if len > PASSWORD_MAX {
        return Err(RuleViolation::new("La contraseña debe tener máximo 30 caracteres"));
    }
    if password.starts_with(char::is_whitespace) || password.ends_with(char::is_whitespace) {
        return Err(RuleViolation::new(
            "La contraseña no puede empezar ni terminar con un espacio en blanco",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn message<T: std::fmt::Debug>(result: RuleResult<T>) -> String {
        result.unwrap_err().0
    }

    #[test]
    fn first_name_bounds() {
        assert!(check_first_name("Ana").is_ok());
        assert_eq!(message(check_first_name(" A ")), "El nombre debe tener mínimo 2 letras");
        assert_eq!(
            message(check_first_name(&"a".repeat(26))),
            "El nombre no puede tener más de 25 letras"
        );
    }

    #[test]
    fn last_name_max() {
        assert!(check_last_name(&"b".repeat(20)).is_ok());
        assert!(check_last_name(&"b".repeat(21)).is_err());
    }

    #[test]
    fn name_maximums_count_surrounding_spaces() {
        assert!(check_first_name(&format!(" {}", "a".repeat(24))).is_ok());
        assert_eq!(
            message(check_first_name(&format!("  {}", "a".repeat(25)))),
            "El nombre no puede tener más de 25 letras"
        );
        assert!(check_last_name(&format!("{} ", "b".repeat(19))).is_ok());
        assert_eq!(
            message(check_last_name(&format!("{} ", "b".repeat(20)))),
            "El apellido no puede tener más de 20 letras"
        );
    }

    #[test]
    fn phone_must_be_eight_digits() {
        assert!(check_phone("71234567").is_ok());
        for bad in ["7123456", "712345678", "7123456a", "+7123456"] {
            assert_eq!(
                message(check_phone(bad)),
                "El teléfono debe tener exactamente 8 dígitos",
                "{bad}"
            );
        }
    }

    #[test]
    fn email_shape() {
        assert!(check_email("ana.lopez@clinic.com").is_ok());
        assert!(check_email("  ana_lopez@mail.co  ").is_ok());
        assert_eq!(
            message(check_email("ana-lopez@clinic.com")),
            "El email debe contener solo letras, números, puntos y guiones bajos"
        );
        assert!(check_email("ana@lopez@clinic.com").is_err());
        assert!(check_email("analopez@clinic").is_err());
    }

    #[test]
    fn email_local_part_bounds() {
        assert_eq!(
            message(check_email("ana@clinic.com")),
            "La parte antes del @ debe tener mínimo 4 caracteres"
        );
        let long_local = format!("{}@clinic.com", "a".repeat(31));
        assert_eq!(
            message(check_email(&long_local)),
            "La parte antes del @ debe tener máximo 30 caracteres"
        );
    }

    #[test]
    fn email_domain_and_extension_bounds() {
        let long_domain = format!("anita@{}.com", "d".repeat(21));
        assert_eq!(
            message(check_email(&long_domain)),
            "El dominio (después del @) debe tener máximo 20 caracteres"
        );
        let long_ext = format!("anita@clinic.{}", "e".repeat(21));
        assert_eq!(
            message(check_email(&long_ext)),
            "La extensión (después del último punto) debe tener máximo 20 caracteres"
        );
        // Subdomains count toward the domain part.
        assert!(check_email("anita@mail.clinic.com").is_ok());
    }

    #[test]
    fn person_rules_report_in_order() {
        // Both name and phone are wrong: the name is reported.
        assert_eq!(
            message(check_person(Some("A"), Some("Lopez"), Some("1"), Some("ana.lopez@clinic.com"))),
            "El nombre debe tener mínimo 2 letras"
        );
        assert!(check_person(
            Some("Ana"),
            Some("Lopez"),
            Some("71234567"),
            Some("ana.lopez@clinic.com")
        )
        .is_ok());
        assert_eq!(
            message(check_person(None, None, Some("1"), None)),
            "El teléfono debe tener exactamente 8 dígitos"
        );
    }

    #[test]
    fn birth_date_bounds() {
        assert_eq!(parse_birth_date(None, today()).unwrap(), None);
        assert_eq!(parse_birth_date(Some("  "), today()).unwrap(), None);
        assert_eq!(
            parse_birth_date(Some("1900-01-01"), today()).unwrap(),
            NaiveDate::from_ymd_opt(1900, 1, 1)
        );
        assert_eq!(
            message(parse_birth_date(Some("1899-12-31"), today())),
            "La fecha de nacimiento no puede ser anterior a 1900-01-01"
        );
        assert_eq!(
            message(parse_birth_date(Some("2025-06-16"), today())),
            "La fecha de nacimiento no puede ser futura"
        );
        assert!(parse_birth_date(Some("2025-06-15"), today()).is_ok());
        assert_eq!(
            message(parse_birth_date(Some("17/05/1990"), today())),
            "Formato de fecha de nacimiento inválido: 17/05/1990"
        );
    }

    #[test]
    fn appointment_date_not_in_past() {
        assert!(parse_appointment_date("2025-06-15", today()).is_ok());
        assert_eq!(
            message(parse_appointment_date("2025-06-14", today())),
            "La fecha de la cita no puede ser en el pasado"
        );
        assert_eq!(
            message(parse_appointment_date("mañana", today())),
            "Formato de fecha inválido: mañana"
        );
    }

    #[test]
    fn appointment_time_formats() {
        assert_eq!(
            parse_appointment_time("09:30").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert_eq!(
            parse_appointment_time("09:30:15").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 15).unwrap()
        );
        assert_eq!(message(parse_appointment_time("25:00")), "Formato de hora inválido: 25:00");
    }

    #[test]
    fn status_is_case_insensitive() {
        assert_eq!(parse_status(None).unwrap(), None);
        assert_eq!(parse_status(Some(" ")).unwrap(), None);
        assert_eq!(
            parse_status(Some(" completed ")).unwrap(),
            Some(AppointmentStatus::Completed)
        );
        assert_eq!(
            message(parse_status(Some("PENDING"))),
            "El estado de la cita debe ser SCHEDULED, COMPLETED o CANCELLED"
        );
    }

    #[test]
    fn max_len_counts_characters() {
        assert!(check_max_len(None, 3, "too long").is_ok());
        assert!(check_max_len(Some("ñññ"), 3, "too long").is_ok());
        assert_eq!(message(check_max_len(Some("abcd"), 3, "too long")), "too long");
    }

    #[test]
    fn password_rules() {
        assert!(check_password("secret1").is_ok());
        assert_eq!(
            message(check_password("12345")),
            "La contraseña debe tener mínimo 6 caracteres"
        );
        assert_eq!(
            message(check_password(&"x".repeat(31))),
            "La contraseña debe tener máximo 30 caracteres"
        );
        assert_eq!(
            message(check_password(" secret1")),
            "La contraseña no puede empezar ni terminar con un espacio en blanco"
        );
    }
}
