//! Request and response bodies of the HTTP API.
//!
//! Requests mirror the core input types and convert into them with `From`. Responses that
//! carry whole domain records embed them as JSON objects (`serde_json::Value`) produced by the
//! records' own `Serialize` impls, so the wire shape follows the core types.

use chrono::{DateTime, NaiveDate, Utc};
use pronto_core::clinical::{
    ExamCategory, ExamRequestInput, ExamResultInput, NoteCategory, NoteInput, PrescriptionInput,
    PrescriptionItemInput, PrescriptionStatus, Route, VitalSigns, VitalSignsInput,
};
use pronto_core::patient::{BloodType, Sex};
use pronto_core::{
    AttendanceActions, AttendanceId, AttendanceStatus, PatientInput, PatientQuery,
    PractitionerInput, Role, TimelineEntry, TimelineEvent, VitalAlert,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

// ============================================================================
// SHARED
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// Body of every error response: `{ "error": { "code", "message" } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: ErrorDetail,
}

impl ErrorRes {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

fn alert_labels(alerts: &[VitalAlert]) -> Vec<String> {
    alerts.iter().map(|a| a.label().to_string()).collect()
}

// ============================================================================
// PATIENTS
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PatientReq {
    #[schema(example = "Maria Santos")]
    pub name: String,
    #[schema(example = "123.456.789-01")]
    pub national_id: String,
    #[schema(value_type = Option<String>, format = Date, example = "1985-03-14")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "female")]
    pub sex: Option<Sex>,
    #[serde(default)]
    pub mother_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub health_card: Option<String>,
    #[serde(default)]
    pub rg: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "O+")]
    pub blood_type: Option<BloodType>,
    #[serde(default)]
    pub allergies: Option<String>,
    #[serde(default)]
    pub clinical_notes: Option<String>,
}

impl From<PatientReq> for PatientInput {
    fn from(req: PatientReq) -> Self {
        PatientInput {
            name: req.name,
            national_id: req.national_id,
            birth_date: req.birth_date,
            sex: req.sex,
            mother_name: req.mother_name,
            phone: req.phone,
            email: req.email,
            health_card: req.health_card,
            rg: req.rg,
            postal_code: req.postal_code,
            street: req.street,
            number: req.number,
            district: req.district,
            city: req.city,
            state: req.state,
            blood_type: req.blood_type,
            allergies: req.allergies,
            clinical_notes: req.clinical_notes,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PatientSearchParams {
    /// Partial national id (digits are compared)
    pub national_id: Option<String>,
    /// Case-insensitive part of the name
    pub name: Option<String>,
    /// Exact birth date (YYYY-MM-DD)
    #[param(value_type = Option<String>, format = Date)]
    pub birth_date: Option<NaiveDate>,
    /// Maximum number of results
    pub limit: Option<usize>,
}

impl From<PatientSearchParams> for PatientQuery {
    fn from(params: PatientSearchParams) -> Self {
        PatientQuery {
            national_id: params.national_id,
            name: params.name,
            birth_date: params.birth_date,
            limit: params.limit,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PatientRecordParams {
    /// Include the attendance history
    pub history: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListPatientsRes {
    #[schema(value_type = Vec<Object>)]
    pub patients: Vec<Value>,
    pub total: usize,
}

// ============================================================================
// PRACTITIONERS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PractitionerReq {
    #[schema(example = "joana")]
    pub account: String,
    #[serde(default)]
    pub full_name: String,
    #[schema(value_type = String, example = "nurse")]
    pub role: Role,
    #[serde(default)]
    pub registration: Option<String>,
}

impl From<PractitionerReq> for PractitionerInput {
    fn from(req: PractitionerReq) -> Self {
        PractitionerInput {
            account: req.account,
            full_name: req.full_name,
            role: req.role,
            registration: req.registration,
        }
    }
}

// ============================================================================
// ATTENDANCES
// ============================================================================

/// Opens an attendance. Give `patient_id` for a registered patient, or `patient` to find the
/// patient by national id and register them if unknown.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdmissionReq {
    #[serde(default)]
    pub patient_id: Option<u64>,
    #[serde(default)]
    pub patient: Option<PatientReq>,
    #[schema(example = "chest pain for two hours")]
    pub chief_complaint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdmissionRes {
    #[schema(value_type = Object)]
    pub attendance: Value,
    #[schema(value_type = Object)]
    pub patient: Value,
    pub patient_created: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardRes {
    #[schema(value_type = Vec<Object>)]
    pub attendances: Vec<Value>,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ActionsRes {
    pub add_note: bool,
    pub record_vitals: bool,
    pub new_prescription: bool,
    pub new_exam_request: bool,
    pub update_status: bool,
}

impl From<AttendanceActions> for ActionsRes {
    fn from(actions: AttendanceActions) -> Self {
        Self {
            add_note: actions.add_note,
            record_vitals: actions.record_vitals,
            new_prescription: actions.new_prescription,
            new_exam_request: actions.new_exam_request,
            update_status: actions.update_status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceDetailRes {
    #[schema(value_type = Object)]
    pub attendance: Value,
    pub patient_name: String,
    pub practitioner: String,
    pub actions: ActionsRes,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusReq {
    #[schema(value_type = String, example = "in_progress")]
    pub status: AttendanceStatus,
}

// ============================================================================
// CLINICAL RECORDS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NoteReq {
    #[schema(value_type = String, example = "physician_note")]
    pub category: NoteCategory,
    pub text: String,
}

impl From<NoteReq> for NoteInput {
    fn from(req: NoteReq) -> Self {
        NoteInput {
            category: req.category,
            text: req.text,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct VitalsReq {
    #[serde(default)]
    pub systolic: Option<u16>,
    #[serde(default)]
    pub diastolic: Option<u16>,
    #[serde(default)]
    pub heart_rate: Option<u16>,
    #[serde(default)]
    pub respiratory_rate: Option<u16>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub saturation: Option<u8>,
    #[serde(default)]
    pub glucose: Option<u16>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<VitalsReq> for VitalSignsInput {
    fn from(req: VitalsReq) -> Self {
        VitalSignsInput {
            measurements: VitalSigns {
                systolic: req.systolic,
                diastolic: req.diastolic,
                heart_rate: req.heart_rate,
                respiratory_rate: req.respiratory_rate,
                temperature: req.temperature,
                saturation: req.saturation,
                glucose: req.glucose,
            },
            notes: req.notes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VitalsRes {
    #[schema(value_type = Object)]
    pub record: Value,
    #[schema(example = json!(["elevated systolic pressure"]))]
    pub alerts: Vec<String>,
}

impl VitalsRes {
    pub fn new(record: Value, alerts: &[VitalAlert]) -> Self {
        Self {
            record,
            alerts: alert_labels(alerts),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PrescriptionItemReq {
    pub medication: String,
    pub dose: String,
    #[schema(value_type = String, example = "oral")]
    pub route: Route,
    pub frequency: String,
    pub duration_days: u16,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PrescriptionReq {
    #[schema(value_type = String, format = Date)]
    pub valid_until: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
    pub items: Vec<PrescriptionItemReq>,
}

impl From<PrescriptionReq> for PrescriptionInput {
    fn from(req: PrescriptionReq) -> Self {
        PrescriptionInput {
            valid_until: req.valid_until,
            notes: req.notes,
            items: req
                .items
                .into_iter()
                .map(|item| PrescriptionItemInput {
                    medication: item.medication,
                    dose: item.dose,
                    route: item.route,
                    frequency: item.frequency,
                    duration_days: item.duration_days,
                    notes: item.notes,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PrescriptionStatusReq {
    #[schema(value_type = String, example = "suspended")]
    pub status: PrescriptionStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExamReq {
    #[schema(value_type = String, example = "laboratory")]
    pub category: ExamCategory,
    pub exam_name: String,
    pub justification: String,
}

impl From<ExamReq> for ExamRequestInput {
    fn from(req: ExamReq) -> Self {
        ExamRequestInput {
            category: req.category,
            exam_name: req.exam_name,
            justification: req.justification,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExamResultReq {
    pub text: String,
    /// Opaque reference to an attachment stored elsewhere
    #[serde(default)]
    pub attachment: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<ExamResultReq> for ExamResultInput {
    fn from(req: ExamResultReq) -> Self {
        ExamResultInput {
            text: req.text,
            attachment: req.attachment,
            notes: req.notes,
        }
    }
}

// ============================================================================
// TIMELINE
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TimelineEventRes {
    #[schema(example = "vitals")]
    pub kind: String,
    #[schema(value_type = String, format = DateTime)]
    pub at: DateTime<Utc>,
    #[schema(value_type = Object)]
    pub record: Value,
    /// Alerts raised by a vital-signs event; empty for other kinds
    pub alerts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TimelineRes {
    pub attendance_id: u64,
    pub events: Vec<TimelineEventRes>,
}

impl TimelineRes {
    /// Converts timeline events, evaluating each vital-signs event with `alerts_for`.
    ///
    /// # Errors
    ///
    /// Returns the serialisation error of a record that cannot be represented as JSON.
    pub fn build(
        attendance: AttendanceId,
        events: &[TimelineEvent<'_>],
        alerts_for: impl Fn(&VitalSigns) -> Vec<VitalAlert>,
    ) -> Result<Self, serde_json::Error> {
        let events = events
            .iter()
            .map(|event| {
                let (record, alerts) = match event.entry {
                    TimelineEntry::Note(note) => (serde_json::to_value(note)?, Vec::new()),
                    TimelineEntry::Vitals(vitals) => (
                        serde_json::to_value(vitals)?,
                        alert_labels(&alerts_for(&vitals.measurements)),
                    ),
                    TimelineEntry::Prescription(prescription) => {
                        (serde_json::to_value(prescription)?, Vec::new())
                    }
                    TimelineEntry::Exam(exam) => (serde_json::to_value(exam)?, Vec::new()),
                };
                Ok(TimelineEventRes {
                    kind: event.kind().as_str().to_string(),
                    at: event.at,
                    record,
                    alerts,
                })
            })
            .collect::<Result<Vec<_>, serde_json::Error>>()?;

        Ok(Self {
            attendance_id: attendance.get(),
            events,
        })
    }
}
