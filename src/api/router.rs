//! REST API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.
//!
//! Middleware stack (outermost → innermost):
//! CORS → Extension → access log → JWT filter → auth guard (protected only)

use std::sync::Arc;

use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api::endpoints;
use crate::api::error::ApiError;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the API router over shared core state.
pub fn api_router(core: Arc<CoreState>) -> Router {
    build_router(ApiContext::new(core))
}

pub(crate) fn build_router(ctx: ApiContext) -> Router {
    // Protected routes: a principal must be attached by the JWT filter.
    //
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let protected = Router::new()
        .route(
            "/patients",
            get(endpoints::patients::list).post(endpoints::patients::create),
        )
        .route(
            "/patients/:id",
            get(endpoints::patients::detail)
                .put(endpoints::patients::update)
                .delete(endpoints::patients::remove),
        )
        .route(
            "/doctors",
            get(endpoints::doctors::list).post(endpoints::doctors::create),
        )
        .route(
            "/doctors/:id",
            get(endpoints::doctors::detail)
                .put(endpoints::doctors::update)
                .delete(endpoints::doctors::remove),
        )
        .route(
            "/specialties",
            get(endpoints::specialties::list).post(endpoints::specialties::create),
        )
        .route(
            "/specialties/:id",
            get(endpoints::specialties::detail)
                .put(endpoints::specialties::update)
                .delete(endpoints::specialties::remove),
        )
        .route(
            "/appointments",
            get(endpoints::appointments::list).post(endpoints::appointments::create),
        )
        .route(
            "/appointments/:id",
            get(endpoints::appointments::detail)
                .put(endpoints::appointments::update)
                .delete(endpoints::appointments::remove),
        )
        .route(
            "/medical-records",
            get(endpoints::medical_records::list).post(endpoints::medical_records::create),
        )
        .route(
            "/medical-records/:id",
            get(endpoints::medical_records::detail)
                .put(endpoints::medical_records::update)
                .delete(endpoints::medical_records::remove),
        )
        .route(
            "/consultations",
            get(endpoints::consultations::list).post(endpoints::consultations::create),
        )
        .route(
            "/consultations/:id",
            get(endpoints::consultations::detail)
                .put(endpoints::consultations::update)
                .delete(endpoints::consultations::remove),
        )
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::auth::require_auth));

    let public = Router::new()
        .route("/auth/register", post(endpoints::auth::register))
        .route("/auth/login", post(endpoints::auth::login))
        .route("/health", get(endpoints::health::check))
        .with_state(ctx.clone());

    Router::new()
        .nest("/api", protected)
        .nest("/api", public)
        .fallback(unknown_route)
        // Innermost first, outermost last. Extension must sit outside the
        // middleware that reads ApiContext from request extensions.
        .layer(axum::middleware::from_fn(middleware::auth::jwt_filter))
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(axum::Extension(ctx))
        .layer(cors_layer())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}

async fn unknown_route() -> ApiError {
    ApiError::NotFound("Recurso no encontrado".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::crypto::JwtService;
    use crate::models::{Role, User};

    const SECRET: &str = "router-test-secret";

    /// Router over a fresh database. The tempdir guard must outlive the test.
    fn test_app() -> (Router, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let core = CoreState::with_database(
            &tmp.path().join("clinic.db"),
            JwtService::new(SECRET, 3600),
        )
        .unwrap();
        (api_router(Arc::new(core)), tmp)
    }

    fn make_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            builder = builder.header("Authorization", format!("Bearer {t}"));
        }
        match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 65536)
            .await
            .unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }

    async fn register(app: &Router) -> String {
        let (status, json) = send(
            app,
            make_request(
                "POST",
                "/api/auth/register",
                None,
                Some(json!({
                    "firstname": "Admin",
                    "lastname": "Root",
                    "email": "admin.root@clinic.com",
                    "password": "secret1"
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{json}");
        json["data"]["token"].as_str().unwrap().to_string()
    }

    async fn post(app: &Router, token: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        send(app, make_request("POST", uri, Some(token), Some(body))).await
    }

    async fn get_json(app: &Router, token: &str, uri: &str) -> (StatusCode, Value) {
        send(app, make_request("GET", uri, Some(token), None)).await
    }

    fn future_date(days: i64) -> String {
        (chrono::Local::now().date_naive() + chrono::Duration::days(days)).to_string()
    }

    #[tokio::test]
    async fn health_is_public() {
        let (app, _tmp) = test_app();
        let (status, json) = send(&app, make_request("GET", "/api/health", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["data"]["database"], true);
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn protected_routes_require_auth() {
        let (app, _tmp) = test_app();
        for uri in [
            "/api/patients",
            "/api/doctors",
            "/api/specialties",
            "/api/appointments",
            "/api/medical-records",
            "/api/consultations",
            "/api/patients/1",
        ] {
            let (status, json) = send(&app, make_request("GET", uri, None, None)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(json["message"], "Autenticación requerida");
            assert_eq!(json["success"], false);
        }
    }

    #[tokio::test]
    async fn invalid_token_returns_401() {
        let (app, _tmp) = test_app();
        let (status, json) =
            send(&app, make_request("GET", "/api/patients", Some("garbage"), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["message"], "Token inválido");
    }

    #[tokio::test]
    async fn expired_token_returns_401() {
        let (app, _tmp) = test_app();
        let user = User {
            id: 1,
            firstname: "Admin".into(),
            lastname: "Root".into(),
            email: "admin.root@clinic.com".into(),
            password_hash: String::new(),
            role: Role::Admin,
        };
        let expired = JwtService::new(SECRET, -60).issue(&user).unwrap();
        let (status, json) =
            send(&app, make_request("GET", "/api/patients", Some(&expired), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["message"], "Token expirado");
    }

    #[tokio::test]
    async fn register_rejects_short_password() {
        let (app, _tmp) = test_app();
        let (status, json) = send(
            &app,
            make_request(
                "POST",
                "/api/auth/register",
                None,
                Some(json!({
                    "firstname": "Admin",
                    "lastname": "Root",
                    "email": "admin.root@clinic.com",
                    "password": "12345"
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Error de validación en uno o más campos");
        assert_eq!(
            json["data"]["password"],
            "La contraseña debe tener entre 6 y 30 caracteres"
        );
    }

    #[tokio::test]
    async fn login_flow() {
        let (app, _tmp) = test_app();
        register(&app).await;

        let login = |password: &str| {
            make_request(
                "POST",
                "/api/auth/login",
                None,
                Some(json!({"email": "admin.root@clinic.com", "password": password})),
            )
        };

        let (status, json) = send(&app, login("secret1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["role"], "ROLE_ADMIN");
        let token = json["data"]["token"].as_str().unwrap().to_string();
        let (status, _) = get_json(&app, &token, "/api/patients").await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) = send(&app, login("wrong-pass")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["message"], "Credenciales no válidas. Verifica tu contraseña.");
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let (app, _tmp) = test_app();
        register(&app).await;
        let (status, json) = send(
            &app,
            make_request(
                "POST",
                "/api/auth/register",
                None,
                Some(json!({
                    "firstname": "Otro",
                    "lastname": "Admin",
                    "email": "admin.root@clinic.com",
                    "password": "secret2"
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            json["message"],
            "El correo electrónico ya está registrado. Intenta con otro correo o inicia sesión."
        );
    }

    #[tokio::test]
    async fn specialty_create_then_duplicate() {
        let (app, _tmp) = test_app();
        let token = register(&app).await;
        let body = json!({"name": "Cardiology", "description": "Heart"});

        let (status, json) = post(&app, &token, "/api/specialties", body.clone()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Especialidad creada correctamente");
        assert!(json["data"]["id"].as_i64().unwrap() > 0);

        let (status, json) = post(&app, &token, "/api/specialties", body).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["message"], "Ya existe una especialidad con ese nombre");
    }

    #[tokio::test]
    async fn malformed_body_is_400() {
        let (app, _tmp) = test_app();
        let token = register(&app).await;
        let request = Request::builder()
            .method("POST")
            .uri("/api/specialties")
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", "application/json")
            .body(Body::from("{\"name\": "))
            .unwrap();
        let (status, json) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert!(!json["message"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_fields_are_reported_per_field() {
        let (app, _tmp) = test_app();
        let token = register(&app).await;
        let (status, json) = post(&app, &token, "/api/patients", json!({"firstName": "Ana"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["data"]["lastName"], "El apellido es obligatorio");
        assert_eq!(json["data"]["phone"], "El teléfono es obligatorio");
        assert!(json["data"].get("firstName").is_none());
    }

    #[tokio::test]
    async fn unknown_ids_and_bad_paths() {
        let (app, _tmp) = test_app();
        let token = register(&app).await;

        let (status, json) = get_json(&app, &token, "/api/patients/42").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "Paciente no encontrado con ID: 42");

        let (status, json) = get_json(&app, &token, "/api/patients/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);

        let (status, _) = get_json(&app, &token, "/api/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn clinical_flow_end_to_end() {
        let (app, _tmp) = test_app();
        let token = register(&app).await;

        let (_, specialty) = post(
            &app,
            &token,
            "/api/specialties",
            json!({"name": "Cardiology", "description": "Heart"}),
        )
        .await;
        let specialty_id = specialty["data"]["id"].as_i64().unwrap();

        let (status, doctor) = post(
            &app,
            &token,
            "/api/doctors",
            json!({
                "firstName": "Luis",
                "lastName": "Perez",
                "email": "luis.perez@clinic.com",
                "phone": "77712345",
                "specialtyId": specialty_id
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{doctor}");
        assert_eq!(doctor["data"]["specialtyName"], "Cardiology");
        let doctor_id = doctor["data"]["id"].as_i64().unwrap();

        let (status, patient) = post(
            &app,
            &token,
            "/api/patients",
            json!({
                "firstName": "Ana",
                "lastName": "Lopez",
                "email": "ana.lopez@mail.com",
                "phone": "71234567",
                "dateOfBirth": "1990-05-17"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{patient}");
        assert_eq!(patient["data"]["dateOfBirth"], "1990-05-17");
        let patient_id = patient["data"]["id"].as_i64().unwrap();

        let (status, appointment) = post(
            &app,
            &token,
            "/api/appointments",
            json!({
                "patientId": patient_id,
                "doctorId": doctor_id,
                "date": future_date(3),
                "time": "10:15"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{appointment}");
        assert_eq!(appointment["data"]["status"], "SCHEDULED");
        assert_eq!(appointment["data"]["patientName"], "Ana Lopez");
        assert_eq!(appointment["data"]["doctorName"], "Dr. Luis Perez");
        assert_eq!(appointment["data"]["time"], "10:15");
        let appointment_id = appointment["data"]["id"].as_i64().unwrap();

        let (status, record) = post(
            &app,
            &token,
            "/api/medical-records",
            json!({"patientId": patient_id, "diagnosis": "Hypertension"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{record}");
        let record_id = record["data"]["id"].as_i64().unwrap();

        let consultation = json!({
            "appointmentId": appointment_id,
            "medicalRecordId": record_id,
            "notes": "Stable"
        });
        let (status, _) = post(&app, &token, "/api/consultations", consultation.clone()).await;
        assert_eq!(status, StatusCode::OK);
        let (status, json) = post(&app, &token, "/api/consultations", consultation).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            json["message"],
            "Ya existe un registro con estos datos. Verifica la información e intenta nuevamente."
        );

        let (status, json) = send(
            &app,
            make_request("DELETE", &format!("/api/patients/{patient_id}"), Some(&token), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Paciente eliminado correctamente");
        assert!(json["data"].is_null());

        let (status, _) = get_json(&app, &token, &format!("/api/appointments/{appointment_id}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (_, json) = get_json(&app, &token, "/api/medical-records").await;
        assert_eq!(json["data"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn past_appointment_conflicts() {
        let (app, _tmp) = test_app();
        let token = register(&app).await;
        let (status, json) = post(
            &app,
            &token,
            "/api/appointments",
            json!({"patientId": 1, "doctorId": 1, "date": future_date(-1), "time": "10:00"}),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["message"], "La fecha de la cita no puede ser en el pasado");
    }

    #[tokio::test]
    async fn update_keeps_absent_optional_fields() {
        let (app, _tmp) = test_app();
        let token = register(&app).await;
        let (_, created) = post(
            &app,
            &token,
            "/api/specialties",
            json!({"name": "Cardiology", "description": "Heart"}),
        )
        .await;
        let id = created["data"]["id"].as_i64().unwrap();

        let (status, json) = send(
            &app,
            make_request(
                "PUT",
                &format!("/api/specialties/{id}"),
                Some(&token),
                Some(json!({"name": "Cardiología"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Especialidad actualizada correctamente");
        assert_eq!(json["data"]["name"], "Cardiología");
        assert_eq!(json["data"]["description"], "Heart");
    }

    #[tokio::test]
    async fn cors_preflight_allows_any_origin() {
        let (app, _tmp) = test_app();
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/patients")
            .header("Origin", "http://localhost:3000")
            .header("Access-Control-Request-Method", "POST")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }
}
