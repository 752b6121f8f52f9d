use super::enums::Role;

/// A registered API user. `password_hash` is the encoded PBKDF2 string.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}
