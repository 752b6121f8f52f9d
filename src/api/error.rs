//! Central error translator: every failure leaves the API as the JSON
//! envelope with the matching status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use crate::api::types::ApiResponse;
use crate::core_state::CoreError;
use crate::db::{Constraint, DatabaseError};
use crate::services::auth::{BAD_CREDENTIALS, EMAIL_ALREADY_REGISTERED, UNKNOWN_USER};
use crate::services::ServiceError;
use crate::validation::FieldErrors;

const DUPLICATE_RECORD: &str =
    "Ya existe un registro con estos datos. Verifica la información e intenta nuevamente.";
const CONSTRAINT_BROKEN: &str =
    "Los datos ingresados violan una restricción de la base de datos. Verifica la información.";

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(FieldErrors),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Business rule: {0}")]
    Conflict(String),
    #[error("Constraint violated: {0}")]
    Constraint(Constraint),
    #[error("Bad credentials")]
    BadCredentials,
    #[error("Unknown user: {0}")]
    UnknownUser(String),
    #[error("Authentication required")]
    Unauthorized,
    #[error("Token expired")]
    TokenExpired,
    #[error("Token invalid")]
    InvalidToken,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, data): (StatusCode, String, Option<Value>) = match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "Error de validación en uno o más campos".to_string(),
                serde_json::to_value(errors).ok(),
            ),
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail, None),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, detail, None),
            ApiError::Conflict(detail) => (StatusCode::CONFLICT, detail, None),
            ApiError::Constraint(constraint) => {
                tracing::debug!(%constraint, "Constraint violation");
                let message = if constraint.is_duplicate_email() {
                    EMAIL_ALREADY_REGISTERED
                } else if constraint.is_duplicate() {
                    DUPLICATE_RECORD
                } else {
                    CONSTRAINT_BROKEN
                };
                (StatusCode::CONFLICT, message.to_string(), None)
            }
            ApiError::BadCredentials => {
                (StatusCode::UNAUTHORIZED, BAD_CREDENTIALS.to_string(), None)
            }
            ApiError::UnknownUser(detail) => {
                let message = if detail.contains("no existe en el sistema") {
                    detail
                } else {
                    UNKNOWN_USER.to_string()
                };
                (StatusCode::UNAUTHORIZED, message, None)
            }
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Autenticación requerida".to_string(),
                None,
            ),
            ApiError::TokenExpired => {
                (StatusCode::UNAUTHORIZED, "Token expirado".to_string(), None)
            }
            ApiError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, "Token inválido".to_string(), None)
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error interno del servidor".to_string(),
                    Some(Value::String(detail)),
                )
            }
        };

        (status, Json(ApiResponse::fail(message, data))).into_response()
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::ConstraintViolation(constraint) => ApiError::Constraint(constraint),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(errors) => ApiError::Validation(errors),
            ServiceError::NotFound(message) => ApiError::NotFound(message),
            ServiceError::BusinessRule(message) => ApiError::Conflict(message),
            ServiceError::BadCredentials(_) => ApiError::BadCredentials,
            ServiceError::UnknownUser(message) => ApiError::UnknownUser(message),
            ServiceError::Database(e) => e.into(),
            ServiceError::Crypto(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Database(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use rusqlite::ffi;

    async fn body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), 8192).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn unique_on(column: &str) -> ApiError {
        ApiError::Constraint(Constraint::classify(
            ffi::SQLITE_CONSTRAINT_UNIQUE,
            Some(&format!("UNIQUE constraint failed: t.{column}")),
        ))
    }

    #[tokio::test]
    async fn validation_returns_400_with_field_map() {
        let response =
            ApiError::Validation(FieldErrors::single("phone", "El teléfono es obligatorio"))
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Error de validación en uno o más campos");
        assert_eq!(json["data"]["phone"], "El teléfono es obligatorio");
    }

    #[tokio::test]
    async fn not_found_and_conflict_keep_message() {
        let response = ApiError::NotFound("Paciente no encontrado con ID: 3".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body(response).await["message"], "Paciente no encontrado con ID: 3");

        let response = ApiError::Conflict("ya existe".into()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn constraints_are_worded_by_kind() {
        let json = body(unique_on("email").into_response()).await;
        assert_eq!(json["message"], EMAIL_ALREADY_REGISTERED);

        let response = unique_on("appointment_id").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body(response).await["message"], DUPLICATE_RECORD);

        let fk = ApiError::Constraint(Constraint::classify(ffi::SQLITE_CONSTRAINT_FOREIGNKEY, None));
        assert_eq!(body(fk.into_response()).await["message"], CONSTRAINT_BROKEN);
    }

    #[tokio::test]
    async fn auth_failures_return_401() {
        for (err, message) in [
            (ApiError::TokenExpired, "Token expirado"),
            (ApiError::InvalidToken, "Token inválido"),
            (ApiError::Unauthorized, "Autenticación requerida"),
            (ApiError::BadCredentials, BAD_CREDENTIALS),
            (ApiError::UnknownUser("Usuario no encontrado".into()), UNKNOWN_USER),
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(body(response).await["message"], message);
        }
    }

    #[tokio::test]
    async fn internal_returns_500_with_detail() {
        let response = ApiError::Internal("disk I/O error".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body(response).await;
        assert_eq!(json["message"], "Error interno del servidor");
        assert_eq!(json["data"], "disk I/O error");
    }

    #[test]
    fn service_errors_map_to_categories() {
        assert!(matches!(
            ApiError::from(ServiceError::BusinessRule("x".into())),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from(ServiceError::BadCredentials("x".into())),
            ApiError::BadCredentials
        ));
        assert!(matches!(
            ApiError::from(ServiceError::Database(DatabaseError::NotFound {
                entity_type: "patient".into(),
                id: 1
            })),
            ApiError::Internal(_)
        ));
    }
}
