//! Account registration and login.
//!
//! Password hashing is deliberately slow; callers on the async runtime
//! should run these functions on a blocking thread.

use rusqlite::Connection;

use super::{ensure_unique, require_text, ServiceError, ServiceResult};
use crate::crypto::{hash_password, verify_password, JwtService};
use crate::db;
use crate::dto::{AuthResponse, AuthenticationRequest, RegisterRequest};
use crate::models::{Role, User};
use crate::validation::check_password;

pub const EMAIL_ALREADY_REGISTERED: &str =
    "El correo electrónico ya está registrado. Intenta con otro correo o inicia sesión.";
pub const UNKNOWN_USER: &str =
    "El usuario no existe en el sistema. Verifica tu correo electrónico o crea una cuenta.";
pub const BAD_CREDENTIALS: &str = "Credenciales no válidas. Verifica tu contraseña.";

/// Create an account and sign it in. New accounts get `ROLE_ADMIN`.
pub fn register(
    conn: &Connection,
    jwt: &JwtService,
    req: &RegisterRequest,
) -> ServiceResult<AuthResponse> {
    let password = require_text(&req.password, "password", "La contraseña es obligatoria")?;
    check_password(password)?;

    let email = require_text(&req.email, "email", "El correo es obligatorio")?;
    ensure_unique(db::user_email_exists(conn, email)?, EMAIL_ALREADY_REGISTERED)?;

    let mut user = User {
        id: 0,
        firstname: require_text(&req.firstname, "firstname", "El nombre es obligatorio")?
            .to_string(),
        lastname: req.lastname.clone().unwrap_or_default(),
        email: email.to_string(),
        password_hash: hash_password(password),
        role: Role::Admin,
    };
    user.id = db::insert_user(conn, &user)?;
    tracing::info!(user_id = user.id, "User registered");

    let token = jwt.issue(&user)?;
    Ok(AuthResponse::new(&user, token))
}

pub fn authenticate(
    conn: &Connection,
    jwt: &JwtService,
    req: &AuthenticationRequest,
) -> ServiceResult<AuthResponse> {
    let email = require_text(&req.email, "email", "El correo es obligatorio")?;
    let password = require_text(&req.password, "password", "La contraseña es obligatoria")?;

    let user = db::get_user_by_email(conn, email)?
        .ok_or_else(|| ServiceError::UnknownUser(UNKNOWN_USER.to_string()))?;
    if !verify_password(password, &user.password_hash)? {
        tracing::warn!(user_id = user.id, "Login rejected: wrong password");
        return Err(ServiceError::BadCredentials(BAD_CREDENTIALS.to_string()));
    }

    let token = jwt.issue(&user)?;
    Ok(AuthResponse::new(&user, token))
}
