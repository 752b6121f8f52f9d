use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::User;
use crate::validation::fields::{len_between, present};
use crate::validation::{FieldErrors, Validate};

static NAME_LETTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-ZáéíóúÁÉÍÓÚñÑüÜ\s]+$").unwrap());

static REGISTER_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._]{4,30}@[a-zA-Z0-9.-]{1,20}\.[a-zA-Z]{2,20}$").unwrap()
});

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let firstname = self.firstname.as_deref().unwrap_or_default();
        let lastname = self.lastname.as_deref().unwrap_or_default();
        let email = self.email.as_deref().unwrap_or_default();
        let password = self.password.as_deref().unwrap_or_default();

        let mut errors = FieldErrors::new();
        errors
            .check("firstname", present(self.firstname.as_deref()), "El nombre es obligatorio")
            .check(
                "firstname",
                NAME_LETTERS.is_match(firstname),
                "El nombre solo debe contener letras",
            )
            .check(
                "firstname",
                len_between(firstname, 2, 20),
                "El nombre debe tener entre 2 y 20 letras",
            )
            .check("lastname", present(self.lastname.as_deref()), "El apellido es obligatorio")
            .check(
                "lastname",
                NAME_LETTERS.is_match(lastname),
                "El apellido solo debe contener letras",
            )
            .check(
                "lastname",
                len_between(lastname, 0, 20),
                "El apellido no puede tener más de 20 caracteres",
            )
            .check("email", present(self.email.as_deref()), "El correo es obligatorio")
            .check(
                "email",
                REGISTER_EMAIL.is_match(email),
                "El email debe contener solo letras, números, puntos y guiones bajos. Parte local: 4-30 caracteres, dominio: máx 20, extensión: máx 20",
            )
            .check("password", present(self.password.as_deref()), "La contraseña es obligatoria")
            .check(
                "password",
                len_between(password, 6, 30),
                "La contraseña debe tener entre 6 y 30 caracteres",
            )
            .check(
                "password",
                password.trim() == password,
                "La contraseña no puede empezar ni terminar con un espacio en blanco",
            );
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthenticationRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Validate for AuthenticationRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors
            .check("email", present(self.email.as_deref()), "El correo es obligatorio")
            .check(
                "password",
                present(self.password.as_deref()),
                "La contraseña es obligatoria",
            );
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user_id: i64,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub role: String,
}

impl AuthResponse {
    pub fn new(user: &User, token: String) -> Self {
        Self {
            token,
            user_id: user.id,
            email: user.email.clone(),
            firstname: user.firstname.clone(),
            lastname: user.lastname.clone(),
            role: user.role.as_str().to_string(),
        }
    }
}
