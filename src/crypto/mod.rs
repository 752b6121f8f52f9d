pub mod jwt;
pub mod password;

pub use jwt::*;
pub use password::*;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Malformed password hash")]
    MalformedHash,

    #[error("Token is malformed")]
    MalformedToken,

    #[error("Token signature mismatch")]
    BadSignature,

    #[error("Token expired")]
    TokenExpired,

    #[error("Signing key rejected: {0}")]
    InvalidKey(String),

    #[error("Token encoding failed: {0}")]
    Encoding(String),
}
