//! HTTP handlers.
//!
//! Handlers translate between the wire types of `api_shared::dto` and the record services.
//! The acting practitioner is resolved by the `Acting` extractor and passed to the services
//! explicitly.

use crate::error::ApiError;
use crate::extract::{Acting, ApiJson, ApiPath, ApiQuery};
use crate::AppState;
use api_shared::dto::{
    ActionsRes, AdmissionReq, AdmissionRes, AttendanceDetailRes, DashboardRes, ErrorRes,
    ExamReq, ExamResultReq, HealthRes, ListPatientsRes, NoteReq, PatientRecordParams, PatientReq,
    PatientSearchParams, PractitionerReq, PrescriptionReq, PrescriptionStatusReq, StatusReq,
    TimelineRes, VitalsReq, VitalsRes,
};
use api_shared::HealthService;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use pronto_core::{
    AttendanceActions, AttendanceId, ExamRequestId, PatientId, PatientQuery, PrescriptionId,
};
use serde::Serialize;
use serde_json::Value;

type ApiResult<T> = Result<T, ApiError>;
type Created<T> = (StatusCode, Json<T>);

fn to_json<T: Serialize>(value: &T) -> ApiResult<Json<Value>> {
    Ok(Json(serde_json::to_value(value)?))
}

fn created<T: Serialize>(value: &T) -> ApiResult<Created<Value>> {
    Ok((StatusCode::CREATED, to_json(value)?))
}

// ============================================================================
// HEALTH
// ============================================================================

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used by monitoring and load balancer health checks. Requires no API key.
#[axum::debug_handler]
pub async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

// ============================================================================
// PATIENTS
// ============================================================================

#[utoipa::path(
    get,
    path = "/patients",
    params(PatientSearchParams),
    responses(
        (status = 200, description = "Matching patients, ordered by name", body = ListPatientsRes),
        (status = 401, description = "Missing or invalid API key", body = ErrorRes)
    )
)]
/// Search the patient registry
///
/// Every filter given must match. The result count never exceeds the configured maximum.
#[axum::debug_handler]
pub async fn search_patients(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PatientSearchParams>,
) -> ApiResult<Json<ListPatientsRes>> {
    let found = state.services.patients.search(&PatientQuery::from(params))?;
    let patients = found
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(ListPatientsRes {
        total: patients.len(),
        patients,
    }))
}

#[utoipa::path(
    post,
    path = "/patients",
    request_body = PatientReq,
    responses(
        (status = 201, description = "Patient registered", body = Object),
        (status = 400, description = "Invalid patient data", body = ErrorRes),
        (status = 409, description = "National id already registered", body = ErrorRes)
    )
)]
/// Register a new patient
///
/// # Errors
/// Returns `400 Bad Request` for malformed fields and `409 Conflict` if the national id is
/// already registered.
#[axum::debug_handler]
pub async fn register_patient(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<PatientReq>,
) -> ApiResult<Created<Value>> {
    let patient = state.services.patients.register(req.into())?;
    created(&patient)
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(
        ("id" = u64, Path, description = "Patient id"),
        PatientRecordParams
    ),
    responses(
        (status = 200, description = "Patient record", body = Object),
        (status = 404, description = "Patient not found", body = ErrorRes)
    )
)]
/// Read a patient record, optionally with the attendance history
#[axum::debug_handler]
pub async fn patient_record(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
    ApiQuery(params): ApiQuery<PatientRecordParams>,
) -> ApiResult<Json<Value>> {
    let record = state
        .services
        .patients
        .record(PatientId::new(id), params.history.unwrap_or(false))?;
    to_json(&record)
}

// ============================================================================
// PRACTITIONERS
// ============================================================================

#[utoipa::path(
    get,
    path = "/practitioners",
    responses(
        (status = 200, description = "Registered practitioners", body = Vec<Object>)
    )
)]
#[axum::debug_handler]
pub async fn list_practitioners(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let practitioners = state.services.practitioners.list()?;
    to_json(&practitioners)
}

#[utoipa::path(
    post,
    path = "/practitioners",
    request_body = PractitionerReq,
    responses(
        (status = 201, description = "Practitioner registered", body = Object),
        (status = 409, description = "Account already registered", body = ErrorRes)
    )
)]
/// Register a practitioner profile
#[axum::debug_handler]
pub async fn register_practitioner(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<PractitionerReq>,
) -> ApiResult<Created<Value>> {
    let practitioner = state.services.practitioners.register(req.into())?;
    created(&practitioner)
}

// ============================================================================
// ATTENDANCES
// ============================================================================

#[utoipa::path(
    get,
    path = "/attendances",
    responses(
        (status = 200, description = "Every attendance, newest first", body = DashboardRes)
    )
)]
/// Department dashboard
#[axum::debug_handler]
pub async fn dashboard(State(state): State<AppState>) -> ApiResult<Json<DashboardRes>> {
    let rows = state.services.attendances.dashboard()?;
    let attendances = rows
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(DashboardRes {
        total: attendances.len(),
        attendances,
    }))
}

#[utoipa::path(
    post,
    path = "/attendances",
    request_body = AdmissionReq,
    responses(
        (status = 201, description = "Attendance opened", body = AdmissionRes),
        (status = 400, description = "Invalid admission data", body = ErrorRes),
        (status = 404, description = "Patient not found", body = ErrorRes)
    )
)]
/// Open an attendance
///
/// Either for a registered patient (`patient_id`) or for a patient found by national id and
/// registered on the spot when unknown (`patient`). The acting practitioner, if any, becomes
/// responsible for the attendance.
///
/// # Errors
/// Returns `400 Bad Request` unless exactly one of `patient_id` and `patient` is given.
#[axum::debug_handler]
pub async fn admit(
    State(state): State<AppState>,
    acting: Acting,
    ApiJson(req): ApiJson<AdmissionReq>,
) -> ApiResult<Created<AdmissionRes>> {
    let attendances = &state.services.attendances;
    let (attendance, patient, patient_created) = match (req.patient_id, req.patient) {
        (Some(id), None) => {
            let patient = state.services.patients.get(PatientId::new(id))?;
            let attendance =
                attendances.open(patient.id, &req.chief_complaint, acting.profile())?;
            (attendance, patient, false)
        }
        (None, Some(patient)) => {
            let registered = attendances.register_with_patient(
                patient.into(),
                &req.chief_complaint,
                acting.profile(),
            )?;
            (
                registered.attendance,
                registered.patient,
                registered.patient_created,
            )
        }
        _ => {
            return Err(ApiError::BadRequest(
                "give exactly one of patient_id or patient".into(),
            ))
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(AdmissionRes {
            attendance: serde_json::to_value(&attendance)?,
            patient: serde_json::to_value(&patient)?,
            patient_created,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/attendances/{id}",
    params(("id" = u64, Path, description = "Attendance id")),
    responses(
        (status = 200, description = "Attendance with the actions open to the caller", body = AttendanceDetailRes),
        (status = 404, description = "Attendance not found", body = ErrorRes)
    )
)]
/// Attendance detail
///
/// `actions` lists what the acting practitioner may do on this attendance; a caller without a
/// practitioner profile is offered nothing.
#[axum::debug_handler]
pub async fn attendance_detail(
    State(state): State<AppState>,
    acting: Acting,
    ApiPath(id): ApiPath<u64>,
) -> ApiResult<Json<AttendanceDetailRes>> {
    let summary = state.services.attendances.summary(AttendanceId::new(id))?;
    let actions = AttendanceActions::for_practitioner(acting.profile());

    Ok(Json(AttendanceDetailRes {
        attendance: serde_json::to_value(&summary.attendance)?,
        patient_name: summary.patient_name,
        practitioner: summary.practitioner,
        actions: ActionsRes::from(actions),
    }))
}

#[utoipa::path(
    put,
    path = "/attendances/{id}/status",
    params(("id" = u64, Path, description = "Attendance id")),
    request_body = StatusReq,
    responses(
        (status = 200, description = "Status updated", body = Object),
        (status = 403, description = "Caller has no practitioner profile", body = ErrorRes),
        (status = 404, description = "Attendance not found", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn update_status(
    State(state): State<AppState>,
    acting: Acting,
    ApiPath(id): ApiPath<u64>,
    ApiJson(req): ApiJson<StatusReq>,
) -> ApiResult<Json<Value>> {
    let attendance = state.services.attendances.update_status(
        AttendanceId::new(id),
        req.status,
        acting.profile(),
    )?;
    to_json(&attendance)
}

// ============================================================================
// CLINICAL RECORDS
// ============================================================================

#[utoipa::path(
    post,
    path = "/attendances/{id}/notes",
    params(("id" = u64, Path, description = "Attendance id")),
    request_body = NoteReq,
    responses(
        (status = 201, description = "Note added", body = Object),
        (status = 403, description = "Caller has no practitioner profile", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn add_note(
    State(state): State<AppState>,
    acting: Acting,
    ApiPath(id): ApiPath<u64>,
    ApiJson(req): ApiJson<NoteReq>,
) -> ApiResult<Created<Value>> {
    let note =
        state
            .services
            .clinical
            .add_note(AttendanceId::new(id), req.into(), acting.profile())?;
    created(&note)
}

#[utoipa::path(
    post,
    path = "/attendances/{id}/vitals",
    params(("id" = u64, Path, description = "Attendance id")),
    request_body = VitalsReq,
    responses(
        (status = 201, description = "Vital signs recorded, with the alerts they raise", body = VitalsRes),
        (status = 400, description = "Measurement out of range", body = ErrorRes),
        (status = 403, description = "Caller is not a physician or nurse", body = ErrorRes)
    )
)]
/// Record vital signs
///
/// The response carries the alerts the measurements raise under the configured thresholds.
#[axum::debug_handler]
pub async fn record_vitals(
    State(state): State<AppState>,
    acting: Acting,
    ApiPath(id): ApiPath<u64>,
    ApiJson(req): ApiJson<VitalsReq>,
) -> ApiResult<Created<VitalsRes>> {
    let recorded =
        state
            .services
            .clinical
            .record_vitals(AttendanceId::new(id), req.into(), acting.profile())?;

    Ok((
        StatusCode::CREATED,
        Json(VitalsRes::new(
            serde_json::to_value(&recorded.record)?,
            &recorded.alerts,
        )),
    ))
}

#[utoipa::path(
    post,
    path = "/attendances/{id}/prescriptions",
    params(("id" = u64, Path, description = "Attendance id")),
    request_body = PrescriptionReq,
    responses(
        (status = 201, description = "Prescription created with its items", body = Object),
        (status = 400, description = "Invalid prescription", body = ErrorRes),
        (status = 403, description = "Caller is not a physician", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn create_prescription(
    State(state): State<AppState>,
    acting: Acting,
    ApiPath(id): ApiPath<u64>,
    ApiJson(req): ApiJson<PrescriptionReq>,
) -> ApiResult<Created<Value>> {
    let prescription = state.services.clinical.create_prescription(
        AttendanceId::new(id),
        req.into(),
        acting.profile(),
    )?;
    created(&prescription)
}

#[utoipa::path(
    put,
    path = "/prescriptions/{id}/status",
    params(("id" = u64, Path, description = "Prescription id")),
    request_body = PrescriptionStatusReq,
    responses(
        (status = 200, description = "Prescription status changed", body = Object),
        (status = 403, description = "Caller is not a physician", body = ErrorRes),
        (status = 404, description = "Prescription not found", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn set_prescription_status(
    State(state): State<AppState>,
    acting: Acting,
    ApiPath(id): ApiPath<u64>,
    ApiJson(req): ApiJson<PrescriptionStatusReq>,
) -> ApiResult<Json<Value>> {
    let prescription = state.services.clinical.set_prescription_status(
        PrescriptionId::new(id),
        req.status,
        acting.profile(),
    )?;
    to_json(&prescription)
}

#[utoipa::path(
    post,
    path = "/attendances/{id}/exams",
    params(("id" = u64, Path, description = "Attendance id")),
    request_body = ExamReq,
    responses(
        (status = 201, description = "Exam requested", body = Object),
        (status = 403, description = "Caller is not a physician", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn request_exam(
    State(state): State<AppState>,
    acting: Acting,
    ApiPath(id): ApiPath<u64>,
    ApiJson(req): ApiJson<ExamReq>,
) -> ApiResult<Created<Value>> {
    let exam =
        state
            .services
            .clinical
            .request_exam(AttendanceId::new(id), req.into(), acting.profile())?;
    created(&exam)
}

#[utoipa::path(
    post,
    path = "/exams/{id}/collect",
    params(("id" = u64, Path, description = "Exam request id")),
    responses(
        (status = 200, description = "Exam marked collected", body = Object),
        (status = 409, description = "Exam is not awaiting collection", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn collect_exam(
    State(state): State<AppState>,
    acting: Acting,
    ApiPath(id): ApiPath<u64>,
) -> ApiResult<Json<Value>> {
    let exam = state
        .services
        .clinical
        .mark_exam_collected(ExamRequestId::new(id), acting.profile())?;
    to_json(&exam)
}

#[utoipa::path(
    post,
    path = "/exams/{id}/result",
    params(("id" = u64, Path, description = "Exam request id")),
    request_body = ExamResultReq,
    responses(
        (status = 200, description = "Result attached", body = Object),
        (status = 409, description = "Exam already has a result or is cancelled", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn attach_exam_result(
    State(state): State<AppState>,
    acting: Acting,
    ApiPath(id): ApiPath<u64>,
    ApiJson(req): ApiJson<ExamResultReq>,
) -> ApiResult<Json<Value>> {
    let exam = state.services.clinical.attach_exam_result(
        ExamRequestId::new(id),
        req.into(),
        acting.profile(),
    )?;
    to_json(&exam)
}

#[utoipa::path(
    post,
    path = "/exams/{id}/cancel",
    params(("id" = u64, Path, description = "Exam request id")),
    responses(
        (status = 200, description = "Exam cancelled", body = Object),
        (status = 409, description = "Exam already has a result or is cancelled", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn cancel_exam(
    State(state): State<AppState>,
    acting: Acting,
    ApiPath(id): ApiPath<u64>,
) -> ApiResult<Json<Value>> {
    let exam = state
        .services
        .clinical
        .cancel_exam(ExamRequestId::new(id), acting.profile())?;
    to_json(&exam)
}

#[utoipa::path(
    get,
    path = "/attendances/{id}/timeline",
    params(("id" = u64, Path, description = "Attendance id")),
    responses(
        (status = 200, description = "Clinical events, newest first", body = TimelineRes),
        (status = 404, description = "Attendance not found", body = ErrorRes)
    )
)]
/// Attendance timeline
///
/// Notes, vital signs, prescriptions and exam requests in one sequence, newest first. Each
/// vital-signs event carries the alerts it raises.
#[axum::debug_handler]
pub async fn timeline(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
) -> ApiResult<Json<TimelineRes>> {
    let attendance = AttendanceId::new(id);
    let clinical = &state.services.clinical;
    let timeline = clinical.timeline(attendance)?;

    let res = TimelineRes::build(attendance, &timeline.events(), |vitals| {
        clinical.alerts_for(vitals)
    })?;
    Ok(Json(res))
}
