use rusqlite::Connection;

use super::{ensure_unique, ServiceError, ServiceResult};
use crate::db;
use crate::dto::{apply_specialty_update, new_specialty, SpecialtyRequest, SpecialtyResponse};
use crate::models::Specialty;
use crate::validation::check_max_len;

const NAME_TAKEN: &str = "Ya existe una especialidad con ese nombre";

pub(crate) fn require(conn: &Connection, id: i64) -> ServiceResult<Specialty> {
    db::get_specialty(conn, id)?
        .ok_or_else(|| ServiceError::NotFound(format!("Especialidad no encontrada con ID: {id}")))
}

fn check_rules(req: &SpecialtyRequest) -> ServiceResult<()> {
    check_max_len(
        req.name.as_deref(),
        50,
        "El nombre de la especialidad no puede tener más de 50 caracteres",
    )?;
    check_max_len(
        req.description.as_deref(),
        255,
        "La descripción de la especialidad no puede tener más de 255 caracteres",
    )?;
    Ok(())
}

pub fn create(conn: &Connection, req: &SpecialtyRequest) -> ServiceResult<SpecialtyResponse> {
    check_rules(req)?;
    if let Some(name) = req.name.as_deref() {
        ensure_unique(db::specialty_name_exists(conn, name)?, NAME_TAKEN)?;
    }

    let mut specialty = new_specialty(req);
    specialty.id = db::insert_specialty(conn, &specialty)?;
    tracing::info!(specialty_id = specialty.id, "Specialty created");
    Ok(SpecialtyResponse::from(&specialty))
}

pub fn update(
    conn: &Connection,
    id: i64,
    req: &SpecialtyRequest,
) -> ServiceResult<SpecialtyResponse> {
    let mut specialty = require(conn, id)?;
    check_rules(req)?;
    if let Some(name) = req.name.as_deref().filter(|n| *n != specialty.name) {
        ensure_unique(db::specialty_name_exists(conn, name)?, NAME_TAKEN)?;
    }

    apply_specialty_update(&mut specialty, req);
    db::update_specialty(conn, &specialty)?;
    Ok(SpecialtyResponse::from(&specialty))
}

/// Remove a specialty and, through the cascade, its doctors.
pub fn delete(conn: &Connection, id: i64) -> ServiceResult<()> {
    require(conn, id)?;
    db::delete_specialty(conn, id)?;
    tracing::info!(specialty_id = id, "Specialty deleted");
    Ok(())
}

pub fn find_by_id(conn: &Connection, id: i64) -> ServiceResult<SpecialtyResponse> {
    Ok(SpecialtyResponse::from(&require(conn, id)?))
}

pub fn find_all(conn: &Connection) -> ServiceResult<Vec<SpecialtyResponse>> {
    Ok(db::list_specialties(conn)?
        .iter()
        .map(SpecialtyResponse::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::*;

    #[test]
    fn duplicate_name_is_rejected() {
        let conn = conn();
        create(&conn, &specialty_request("Cardiology")).unwrap();
        let err = create(&conn, &specialty_request("Cardiology")).unwrap_err();
        assert!(matches!(err, ServiceError::BusinessRule(ref m) if m == NAME_TAKEN));
    }

    #[test]
    fn length_caps() {
        let conn = conn();
        let err = create(&conn, &specialty_request(&"n".repeat(51))).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::BusinessRule(ref m)
                if m == "El nombre de la especialidad no puede tener más de 50 caracteres"
        ));

        let req = SpecialtyRequest {
            name: Some("Cardiology".into()),
            description: Some("d".repeat(256)),
        };
        assert!(matches!(create(&conn, &req), Err(ServiceError::BusinessRule(_))));
    }

    #[test]
    fn renaming_to_same_name_is_allowed() {
        let conn = conn();
        let created = create(&conn, &specialty_request("Cardiology")).unwrap();
        let req = SpecialtyRequest {
            name: Some("Cardiology".into()),
            description: None,
        };
        let updated = update(&conn, created.id, &req).unwrap();
        assert_eq!(updated.description.as_deref(), Some("Heart"));
    }

    #[test]
    fn delete_cascades_to_doctors() {
        let conn = conn();
        let (specialty_id, doctor_id, _) = seed(&conn);
        delete(&conn, specialty_id).unwrap();
        assert!(matches!(
            crate::services::doctor::find_by_id(&conn, doctor_id),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn find_all_in_creation_order() {
        let conn = conn();
        create(&conn, &specialty_request("Cardiology")).unwrap();
        create(&conn, &specialty_request("Neurology")).unwrap();
        let names: Vec<String> = find_all(&conn).unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["Cardiology", "Neurology"]);
    }
}
