//! # API REST
//!
//! REST API implementation for Pronto.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, API key check, acting practitioner)
//!
//! Uses `api-shared` for request/response types and authentication helpers.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod extract;
pub mod handlers;

use axum::routing::{get, post, put};
use axum::Router;
use pronto_core::{CoreConfig, RecordServices};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::dto;
use handlers::*;

pub use error::ApiError;

/// Application state for the REST API server
///
/// Shared by every handler: the record services over one store, the configuration they were
/// built with, and the API key resolved at startup.
#[derive(Clone)]
pub struct AppState {
    pub services: RecordServices,
    pub cfg: Arc<CoreConfig>,
    pub api_key: Arc<str>,
}

impl AppState {
    /// Builds the state with fresh services over an empty record store.
    pub fn new(cfg: Arc<CoreConfig>, api_key: impl Into<Arc<str>>) -> Self {
        Self {
            services: RecordServices::new(cfg.clone()),
            cfg,
            api_key: api_key.into(),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        search_patients,
        register_patient,
        patient_record,
        list_practitioners,
        register_practitioner,
        dashboard,
        admit,
        attendance_detail,
        update_status,
        add_note,
        record_vitals,
        create_prescription,
        set_prescription_status,
        request_exam,
        collect_exam,
        attach_exam_result,
        cancel_exam,
        timeline,
    ),
    components(schemas(
        dto::HealthRes,
        dto::ErrorRes,
        dto::ErrorDetail,
        dto::PatientReq,
        dto::ListPatientsRes,
        dto::PractitionerReq,
        dto::AdmissionReq,
        dto::AdmissionRes,
        dto::DashboardRes,
        dto::ActionsRes,
        dto::AttendanceDetailRes,
        dto::StatusReq,
        dto::NoteReq,
        dto::VitalsReq,
        dto::VitalsRes,
        dto::PrescriptionItemReq,
        dto::PrescriptionReq,
        dto::PrescriptionStatusReq,
        dto::ExamReq,
        dto::ExamResultReq,
        dto::TimelineEventRes,
        dto::TimelineRes,
    ))
)]
pub struct ApiDoc;

/// Builds the application router.
///
/// `/health`, the Swagger UI and the OpenAPI document are public; every other route requires
/// the `x-api-key` header.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/patients", get(search_patients).post(register_patient))
        .route("/patients/:id", get(patient_record))
        .route(
            "/practitioners",
            get(list_practitioners).post(register_practitioner),
        )
        .route("/attendances", get(dashboard).post(admit))
        .route("/attendances/:id", get(attendance_detail))
        .route("/attendances/:id/status", put(update_status))
        .route("/attendances/:id/notes", post(add_note))
        .route("/attendances/:id/vitals", post(record_vitals))
        .route("/attendances/:id/prescriptions", post(create_prescription))
        .route("/attendances/:id/exams", post(request_exam))
        .route("/attendances/:id/timeline", get(timeline))
        .route("/prescriptions/:id/status", put(set_prescription_status))
        .route("/exams/:id/collect", post(collect_exam))
        .route("/exams/:id/result", post(attach_exam_result))
        .route("/exams/:id/cancel", post(cancel_exam))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            extract::require_api_key,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(protected)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves the router on `addr` until the server fails.
///
/// # Errors
/// Returns an error if the address cannot be bound or the HTTP server fails while running.
pub async fn serve(addr: &str, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("-- Pronto REST API listening on {}", listener.local_addr()?);
    axum::serve(listener, build_router(state)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{Days, Utc};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const KEY: &str = "test-key";

    fn app() -> Router {
        build_router(AppState::new(Arc::new(CoreConfig::default()), KEY))
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        practitioner: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-api-key", KEY);
        if let Some(id) = practitioner {
            builder = builder.header("x-practitioner-id", id);
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn register(app: &Router, account: &str, role: &str) -> String {
        let (status, body) = send(
            app,
            "POST",
            "/practitioners",
            None,
            Some(json!({ "account": account, "role": role })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].to_string()
    }

    async fn admit_patient(app: &Router, practitioner: Option<&str>) -> u64 {
        let (status, body) = send(
            app,
            "POST",
            "/attendances",
            practitioner,
            Some(json!({
                "patient": {
                    "name": "Maria Santos",
                    "national_id": "123.456.789-01",
                    "birth_date": "1985-03-14"
                },
                "chief_complaint": "chest pain"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["attendance"]["id"].as_u64().unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn protected_routes_require_the_api_key() {
        let app = app();
        let request = Request::builder()
            .uri("/attendances")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let request = Request::builder()
            .uri("/attendances")
            .header("x-api-key", "wrong")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "unauthorized");
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let request = Request::builder()
            .uri("/api-docs/openapi.json")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let doc: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(doc["paths"]["/attendances/{id}/timeline"].is_object());
    }

    #[tokio::test]
    async fn acting_practitioner_header_is_resolved() {
        let app = app();
        let (status, body) = send(&app, "GET", "/attendances", Some("abc"), None).await;
        assert_eq!(status, StatusCode::OK, "dashboard ignores the acting user");
        assert_eq!(body["total"], 0);

        let attendance = admit_patient(&app, None).await;
        let uri = format!("/attendances/{attendance}");

        let (status, body) = send(&app, "GET", &uri, Some("abc"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "bad_request");

        let (status, _) = send(&app, "GET", &uri, Some("42"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn detail_lists_actions_per_role() {
        let app = app();
        let nurse = register(&app, "joana", "nurse").await;
        let attendance = admit_patient(&app, Some(&nurse)).await;
        let uri = format!("/attendances/{attendance}");

        let (status, body) = send(&app, "GET", &uri, Some(&nurse), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["patient_name"], "Maria Santos");
        assert_eq!(body["practitioner"], "joana - nurse");
        assert_eq!(
            body["actions"],
            json!({
                "add_note": true,
                "record_vitals": true,
                "new_prescription": false,
                "new_exam_request": false,
                "update_status": true
            })
        );

        let (_, body) = send(&app, "GET", &uri, None, None).await;
        assert_eq!(body["actions"]["add_note"], false);
        assert_eq!(body["actions"]["update_status"], false);
    }

    #[tokio::test]
    async fn admission_needs_exactly_one_patient_reference() {
        let app = app();
        let (status, body) = send(
            &app,
            "POST",
            "/attendances",
            None,
            Some(json!({ "chief_complaint": "fever" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "bad_request");

        let (status, body) = send(
            &app,
            "POST",
            "/attendances",
            None,
            Some(json!({ "patient_id": 9, "chief_complaint": "fever" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn malformed_body_uses_error_shape() {
        let app = app();
        let (status, body) = send(
            &app,
            "POST",
            "/practitioners",
            None,
            Some(json!({ "account": "x", "role": "surgeon" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn patients_register_search_and_record() {
        let app = app();
        let patient = json!({
            "name": "Maria Santos",
            "national_id": "123.456.789-01",
            "birth_date": "1985-03-14",
            "city": "Recife",
            "state": "pe"
        });
        let (status, created) =
            send(&app, "POST", "/patients", None, Some(patient.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["national_id"], "12345678901");

        let (status, body) = send(&app, "POST", "/patients", None, Some(patient)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "duplicate");

        let (status, body) = send(&app, "GET", "/patients?name=maria", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);

        let id = created["id"].as_u64().unwrap();
        let (status, body) = send(
            &app,
            "GET",
            &format!("/patients/{id}?history=true"),
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["full_address"], "Recife/PE");
        assert_eq!(body["history"], json!([]));

        let (status, _) = send(&app, "GET", "/patients/999", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn clinical_workflow_builds_the_timeline() {
        let app = app();
        let physician = register(&app, "rui", "physician").await;
        let nurse = register(&app, "joana", "nurse").await;
        let attendance = admit_patient(&app, Some(&physician)).await;
        let base = format!("/attendances/{attendance}");

        let (status, body) = send(
            &app,
            "POST",
            &format!("{base}/vitals"),
            Some(&nurse),
            Some(json!({
                "systolic": 150, "diastolic": 95, "heart_rate": 105,
                "temperature": 38.2, "saturation": 92
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body["alerts"],
            json!([
                "elevated systolic pressure",
                "elevated diastolic pressure",
                "tachycardia",
                "fever",
                "low saturation"
            ])
        );

        let valid_until = Utc::now()
            .date_naive()
            .checked_add_days(Days::new(7))
            .unwrap()
            .to_string();
        let prescription = json!({
            "valid_until": valid_until,
            "items": [{
                "medication": "Dipyrone",
                "dose": "1 g",
                "route": "intravenous",
                "frequency": "every 6 hours",
                "duration_days": 3
            }]
        });
        let (status, body) = send(
            &app,
            "POST",
            &format!("{base}/prescriptions"),
            Some(&nurse),
            Some(prescription.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "forbidden");

        let (status, body) = send(
            &app,
            "POST",
            &format!("{base}/prescriptions"),
            Some(&physician),
            Some(prescription),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["items"].as_array().map(Vec::len), Some(1));

        let (status, exam) = send(
            &app,
            "POST",
            &format!("{base}/exams"),
            Some(&physician),
            Some(json!({
                "category": "laboratory",
                "exam_name": "Troponin",
                "justification": "chest pain"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let exam_id = exam["id"].as_u64().unwrap();

        let (status, _) = send(
            &app,
            "POST",
            &format!("/exams/{exam_id}/collect"),
            Some(&nurse),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let result = json!({ "text": "troponin negative" });
        let (status, body) = send(
            &app,
            "POST",
            &format!("/exams/{exam_id}/result"),
            Some(&nurse),
            Some(result.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "result_available");

        let (status, _) = send(
            &app,
            "POST",
            &format!("/exams/{exam_id}/result"),
            Some(&nurse),
            Some(result),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = send(
            &app,
            "POST",
            &format!("/exams/{exam_id}/cancel"),
            Some(&physician),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "conflict");

        let (status, body) =
            send(&app, "GET", &format!("{base}/timeline"), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["attendance_id"], attendance);
        let events = body["events"].as_array().unwrap();
        assert_eq!(events.len(), 3);

        let mut kinds: Vec<&str> = events.iter().filter_map(|e| e["kind"].as_str()).collect();
        kinds.sort_unstable();
        assert_eq!(kinds, vec!["exam", "prescription", "vitals"]);

        let vitals = events.iter().find(|e| e["kind"] == "vitals").unwrap();
        assert_eq!(vitals["alerts"].as_array().map(Vec::len), Some(5));
        let exam_event = events.iter().find(|e| e["kind"] == "exam").unwrap();
        assert_eq!(exam_event["at"], exam_event["record"]["result"]["resulted_at"]);
    }

    #[tokio::test]
    async fn status_update_requires_a_profile() {
        let app = app();
        let nurse = register(&app, "joana", "nurse").await;
        let attendance = admit_patient(&app, None).await;
        let uri = format!("/attendances/{attendance}/status");
        let body = json!({ "status": "in_progress" });

        let (status, _) = send(&app, "PUT", &uri, None, Some(body.clone())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, updated) = send(&app, "PUT", &uri, Some(&nurse), Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "in_progress");
    }
}
