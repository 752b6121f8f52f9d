use serde::{Deserialize, Serialize};

use super::{overwrite, owned};
use crate::models::Specialty;
use crate::validation::fields::present;
use crate::validation::{FieldErrors, Validate};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialtyRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Validate for SpecialtyRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check(
            "name",
            present(self.name.as_deref()),
            "El nombre de la especialidad es obligatorio",
        );
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialtyResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl From<&Specialty> for SpecialtyResponse {
    fn from(s: &Specialty) -> Self {
        Self {
            id: s.id,
            name: s.name.clone(),
            description: s.description.clone(),
        }
    }
}

pub fn new_specialty(req: &SpecialtyRequest) -> Specialty {
    Specialty {
        id: 0,
        name: owned(&req.name),
        description: req.description.clone(),
    }
}

pub fn apply_specialty_update(specialty: &mut Specialty, req: &SpecialtyRequest) {
    overwrite(&mut specialty.name, &req.name);
    if req.description.is_some() {
        specialty.description = req.description.clone();
    }
}
