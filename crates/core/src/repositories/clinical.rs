//! Clinical record service.
//!
//! Writes notes, vital signs, prescriptions and exam requests against an attendance and reads
//! them back as the attendance's timeline. Every write takes the acting practitioner explicitly
//! and checks the role before touching the store:
//!
//! - notes: any practitioner profile
//! - vital signs: physician or nurse
//! - prescriptions and exam requests/cancellations: physician only
//! - exam collection: physician or nurse
//! - exam results: any practitioner profile

use crate::alerts::{evaluate_vitals_with, VitalAlert};
use crate::clinical::{
    AttendanceRecords, ClinicalNote, ExamRequest, ExamRequestInput, ExamResult,
    ExamResultInput, ExamStatus, NoteInput, Prescription, PrescriptionInput, PrescriptionItem,
    PrescriptionStatus, VitalSigns, VitalSignsInput, VitalSignsRecord,
};
use crate::config::CoreConfig;
use crate::ids::{AttendanceId, ExamRequestId, PrescriptionId};
use crate::practitioner::{Practitioner, Role};
use crate::store::RecordStore;
use crate::timeline::AttendanceTimeline;
use crate::validation::{
    require_profile, require_role, validate_prescription_header, validate_prescription_item,
    validate_vital_signs,
};
use crate::{RecordError, RecordResult};
use chrono::Utc;
use pronto_types::NonEmptyText;
use serde::Serialize;
use std::sync::Arc;

const CLINICAL_ROLES: &[Role] = &[Role::Physician, Role::Nurse];
const PHYSICIAN_ONLY: &[Role] = &[Role::Physician];

fn optional_text(value: Option<String>) -> Option<NonEmptyText> {
    value.and_then(|raw| NonEmptyText::new(raw).ok())
}

/// A stored vital-signs record together with the alerts it raised.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecordedVitals {
    pub record: VitalSignsRecord,
    pub alerts: Vec<VitalAlert>,
}

#[derive(Clone, Debug)]
pub struct ClinicalService {
    cfg: Arc<CoreConfig>,
    store: Arc<RecordStore>,
}

impl ClinicalService {
    pub fn new(cfg: Arc<CoreConfig>, store: Arc<RecordStore>) -> Self {
        Self { cfg, store }
    }

    // ========================================================================
    // NOTES
    // ========================================================================

    /// Adds a clinical note authored by the acting practitioner.
    ///
    /// # Errors
    ///
    /// `RecordError::MissingPractitionerProfile`, `RecordError::AttendanceNotFound`, or
    /// `RecordError::Text` for blank text.
    pub fn add_note(
        &self,
        attendance: AttendanceId,
        input: NoteInput,
        acting: Option<&Practitioner>,
    ) -> RecordResult<ClinicalNote> {
        let author = require_profile(acting)?;
        let text = NonEmptyText::new(&input.text)?;

        let mut tables = self.store.write()?;
        tables.attendance(attendance)?;

        let note = ClinicalNote {
            id: tables.seq.note.next(),
            attendance,
            author: author.id,
            category: input.category,
            text,
            created_at: Utc::now(),
        };
        tables.notes.insert(note.id, note.clone());

        tracing::info!(
            attendance = %attendance,
            note = %note.id,
            category = note.category.label(),
            "added clinical note"
        );
        Ok(note)
    }

    // ========================================================================
    // VITAL SIGNS
    // ========================================================================

    /// Alerts for a set of measurements under the configured thresholds.
    pub fn alerts_for(&self, vitals: &VitalSigns) -> Vec<VitalAlert> {
        evaluate_vitals_with(vitals, self.cfg.vital_thresholds())
    }

    /// Records a set of vital signs and evaluates them.
    ///
    /// # Errors
    ///
    /// `RecordError::RoleNotPermitted` for administrative staff, `RecordError::InvalidInput`
    /// for measurements outside their sanity range, `RecordError::AttendanceNotFound`.
    pub fn record_vitals(
        &self,
        attendance: AttendanceId,
        input: VitalSignsInput,
        acting: Option<&Practitioner>,
    ) -> RecordResult<RecordedVitals> {
        let recorder = require_role(acting, CLINICAL_ROLES, "record vital signs")?;
        validate_vital_signs(&input.measurements)?;

        let mut tables = self.store.write()?;
        tables.attendance(attendance)?;

        let record = VitalSignsRecord {
            id: tables.seq.vitals.next(),
            attendance,
            recorded_by: recorder.id,
            measurements: input.measurements,
            notes: optional_text(input.notes),
            created_at: Utc::now(),
        };
        tables.vitals.insert(record.id, record.clone());
        drop(tables);

        let alerts = self.alerts_for(&record.measurements);
        if alerts.is_empty() {
            tracing::info!(attendance = %attendance, vitals = %record.id, "recorded vital signs");
        } else {
            let labels: Vec<&str> = alerts.iter().map(|a| a.label()).collect();
            tracing::info!(
                attendance = %attendance,
                vitals = %record.id,
                alerts = ?labels,
                "recorded vital signs with alerts"
            );
        }

        Ok(RecordedVitals { record, alerts })
    }

    // ========================================================================
    // PRESCRIPTIONS
    // ========================================================================

    /// Creates a prescription and all its items in one write.
    ///
    /// # Errors
    ///
    /// `RecordError::RoleNotPermitted` unless the acting practitioner is a physician;
    /// `RecordError::InvalidInput` for a past validity date, no items, or an item duration
    /// outside 1..=365 days; `RecordError::Text` for a blank item field.
    pub fn create_prescription(
        &self,
        attendance: AttendanceId,
        input: PrescriptionInput,
        acting: Option<&Practitioner>,
    ) -> RecordResult<Prescription> {
        let prescriber = require_role(acting, PHYSICIAN_ONLY, "create prescriptions")?;
        let today = Utc::now().date_naive();
        validate_prescription_header(input.valid_until, input.items.len(), today)?;

        // Validate every item before taking the lock so nothing is half-written.
        let mut items = Vec::with_capacity(input.items.len());
        for item in input.items {
            validate_prescription_item(&item)?;
            items.push((
                NonEmptyText::new(&item.medication)?,
                NonEmptyText::new(&item.dose)?,
                item.route,
                NonEmptyText::new(&item.frequency)?,
                item.duration_days,
                optional_text(item.notes),
            ));
        }

        let mut tables = self.store.write()?;
        tables.attendance(attendance)?;

        let id: PrescriptionId = tables.seq.prescription.next();
        let items = items
            .into_iter()
            .map(
                |(medication, dose, route, frequency, duration_days, notes)| PrescriptionItem {
                    id: tables.seq.prescription_item.next(),
                    medication,
                    dose,
                    route,
                    frequency,
                    duration_days,
                    notes,
                },
            )
            .collect();

        let prescription = Prescription {
            id,
            attendance,
            prescriber: prescriber.id,
            created_at: Utc::now(),
            valid_until: input.valid_until,
            status: PrescriptionStatus::Active,
            notes: optional_text(input.notes),
            items,
        };
        tables.prescriptions.insert(id, prescription.clone());

        tracing::info!(
            attendance = %attendance,
            prescription = %id,
            items = prescription.items.len(),
            "created prescription"
        );
        Ok(prescription)
    }

    /// Suspends, completes or reactivates a prescription. Physician only.
    pub fn set_prescription_status(
        &self,
        id: PrescriptionId,
        status: PrescriptionStatus,
        acting: Option<&Practitioner>,
    ) -> RecordResult<Prescription> {
        require_role(acting, PHYSICIAN_ONLY, "change prescriptions")?;

        let mut tables = self.store.write()?;
        let prescription = tables
            .prescriptions
            .get_mut(&id)
            .ok_or(RecordError::PrescriptionNotFound(id))?;
        prescription.status = status;

        tracing::info!(prescription = %id, status = status.label(), "prescription status changed");
        Ok(prescription.clone())
    }

    // ========================================================================
    // EXAMS
    // ========================================================================

    /// Requests an exam. Physician only.
    pub fn request_exam(
        &self,
        attendance: AttendanceId,
        input: ExamRequestInput,
        acting: Option<&Practitioner>,
    ) -> RecordResult<ExamRequest> {
        let requester = require_role(acting, PHYSICIAN_ONLY, "request exams")?;
        let exam_name = NonEmptyText::new(&input.exam_name)?;
        let justification = NonEmptyText::new(&input.justification)?;

        let mut tables = self.store.write()?;
        tables.attendance(attendance)?;

        let now = Utc::now();
        let exam = ExamRequest {
            id: tables.seq.exam_request.next(),
            attendance,
            requester: requester.id,
            category: input.category,
            exam_name,
            justification,
            status: ExamStatus::Requested,
            requested_at: now,
            updated_at: now,
            result: None,
        };
        tables.exams.insert(exam.id, exam.clone());

        tracing::info!(
            attendance = %attendance,
            exam_request = %exam.id,
            category = exam.category.label(),
            "requested exam"
        );
        Ok(exam)
    }

    /// Marks a requested exam as collected.
    ///
    /// # Errors
    ///
    /// `RecordError::ExamNotCollectable` unless the exam is still `requested`.
    pub fn mark_exam_collected(
        &self,
        id: ExamRequestId,
        acting: Option<&Practitioner>,
    ) -> RecordResult<ExamRequest> {
        require_role(acting, CLINICAL_ROLES, "collect exams")?;

        let mut tables = self.store.write()?;
        let exam = tables.exam_mut(id)?;
        if exam.status != ExamStatus::Requested {
            return Err(RecordError::ExamNotCollectable {
                id,
                status: exam.status.label(),
            });
        }
        exam.status = ExamStatus::Collected;
        exam.updated_at = Utc::now();

        tracing::info!(exam_request = %id, "exam collected");
        Ok(exam.clone())
    }

    /// Attaches the result of an exam and marks it `result-available`.
    ///
    /// # Errors
    ///
    /// `RecordError::ExamAlreadyResulted` if a result exists, `RecordError::ExamCancelled` if
    /// the request was cancelled.
    pub fn attach_exam_result(
        &self,
        id: ExamRequestId,
        input: ExamResultInput,
        acting: Option<&Practitioner>,
    ) -> RecordResult<ExamRequest> {
        require_profile(acting)?;
        let text = NonEmptyText::new(&input.text)?;

        let mut tables = self.store.write()?;
        let result_id = {
            let exam = tables.exam_mut(id)?;
            if exam.result.is_some() {
                return Err(RecordError::ExamAlreadyResulted(id));
            }
            if exam.status == ExamStatus::Cancelled {
                return Err(RecordError::ExamCancelled(id));
            }
            tables.seq.exam_result.next()
        };

        let now = Utc::now();
        let exam = tables.exam_mut(id)?;
        exam.result = Some(ExamResult {
            id: result_id,
            text,
            attachment: optional_text(input.attachment),
            notes: optional_text(input.notes),
            resulted_at: now,
        });
        exam.status = ExamStatus::ResultAvailable;
        exam.updated_at = now;

        tracing::info!(exam_request = %id, "exam result attached");
        Ok(exam.clone())
    }

    /// Cancels an exam request. Physician only.
    ///
    /// # Errors
    ///
    /// `RecordError::ExamCancelled` if already cancelled, `RecordError::ExamAlreadyResulted`
    /// once a result exists.
    pub fn cancel_exam(
        &self,
        id: ExamRequestId,
        acting: Option<&Practitioner>,
    ) -> RecordResult<ExamRequest> {
        require_role(acting, PHYSICIAN_ONLY, "cancel exams")?;

        let mut tables = self.store.write()?;
        let exam = tables.exam_mut(id)?;
        if exam.status == ExamStatus::Cancelled {
            return Err(RecordError::ExamCancelled(id));
        }
        if exam.result.is_some() {
            return Err(RecordError::ExamAlreadyResulted(id));
        }
        exam.status = ExamStatus::Cancelled;
        exam.updated_at = Utc::now();

        tracing::info!(exam_request = %id, "exam cancelled");
        Ok(exam.clone())
    }

    // ========================================================================
    // READS
    // ========================================================================

    /// All clinical records of an attendance.
    pub fn attendance_records(&self, attendance: AttendanceId) -> RecordResult<AttendanceRecords> {
        let tables = self.store.read()?;
        tables.attendance(attendance)?;
        Ok(tables.attendance_records(attendance))
    }

    /// The attendance's records, ready to be laid out as a timeline.
    pub fn timeline(&self, attendance: AttendanceId) -> RecordResult<AttendanceTimeline> {
        self.attendance_records(attendance)
            .map(AttendanceTimeline::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clinical::{
        ExamCategory, NoteCategory, PrescriptionItemInput, Route,
    };
    use crate::ids::PatientId;
    use crate::repositories::attendances::AttendanceService;
    use crate::repositories::patients::fixtures::patient_input;
    use crate::repositories::patients::PatientService;
    use crate::repositories::practitioners::{fixtures::input, PractitionerService};
    use crate::timeline::{TimelineEntry, TimelineKind};
    use chrono::Duration;

    struct Fixture {
        practitioners: PractitionerService,
        attendances: AttendanceService,
        clinical: ClinicalService,
        physician: Practitioner,
        nurse: Practitioner,
        clerk: Practitioner,
        attendance: AttendanceId,
        patient: PatientId,
    }

    fn fixture() -> Fixture {
        let cfg = Arc::new(CoreConfig::default());
        let store = Arc::new(RecordStore::new());
        let patients = PatientService::new(cfg.clone(), store.clone());
        let practitioners = PractitionerService::new(store.clone());
        let attendances = AttendanceService::new(store.clone());
        let clinical = ClinicalService::new(cfg, store);

        let physician = practitioners
            .register(input("rui", Role::Physician))
            .expect("physician");
        let nurse = practitioners
            .register(input("joana", Role::Nurse))
            .expect("nurse");
        let clerk = practitioners
            .register(input("clerk", Role::Administrative))
            .expect("clerk");
        let patient = patients
            .register(patient_input("Ana Lima", "11122233344"))
            .expect("patient");
        let attendance = attendances
            .open(patient.id, "abdominal pain", Some(&physician))
            .expect("attendance")
            .id;

        Fixture {
            practitioners,
            attendances,
            clinical,
            physician,
            nurse,
            clerk,
            attendance,
            patient: patient.id,
        }
    }

    fn note_input(text: &str) -> NoteInput {
        NoteInput {
            category: NoteCategory::PhysicianNote,
            text: text.into(),
        }
    }

    fn item(medication: &str, duration_days: u16) -> PrescriptionItemInput {
        PrescriptionItemInput {
            medication: medication.into(),
            dose: "1 g".into(),
            route: Route::Intravenous,
            frequency: "every 6 h".into(),
            duration_days,
            notes: None,
        }
    }

    fn prescription_input(items: Vec<PrescriptionItemInput>) -> PrescriptionInput {
        PrescriptionInput {
            valid_until: Utc::now().date_naive() + Duration::days(2),
            notes: None,
            items,
        }
    }

    fn exam_input() -> ExamRequestInput {
        ExamRequestInput {
            category: ExamCategory::Laboratory,
            exam_name: "Complete blood count".into(),
            justification: "suspected infection".into(),
        }
    }

    fn result_input() -> ExamResultInput {
        ExamResultInput {
            text: "leukocytosis".into(),
            attachment: None,
            notes: None,
        }
    }

    fn pause() {
        std::thread::sleep(std::time::Duration::from_millis(5));
    }

    #[test]
    fn notes_need_a_profile_and_text() {
        let f = fixture();
        let note = f
            .clinical
            .add_note(f.attendance, note_input("patient stable"), Some(&f.clerk))
            .expect("any profile may add notes");
        assert_eq!(note.author, f.clerk.id);

        let err = f
            .clinical
            .add_note(f.attendance, note_input("x"), None)
            .expect_err("no profile");
        assert!(matches!(err, RecordError::MissingPractitionerProfile));

        let err = f
            .clinical
            .add_note(f.attendance, note_input("   "), Some(&f.nurse))
            .expect_err("blank");
        assert!(matches!(err, RecordError::Text(_)));

        let err = f
            .clinical
            .add_note(AttendanceId::new(99), note_input("x"), Some(&f.nurse))
            .expect_err("unknown attendance");
        assert!(matches!(err, RecordError::AttendanceNotFound(_)));
    }

    #[test]
    fn vitals_return_alerts_and_enforce_roles() {
        let f = fixture();
        let recorded = f
            .clinical
            .record_vitals(
                f.attendance,
                VitalSignsInput {
                    measurements: VitalSigns {
                        systolic: Some(150),
                        diastolic: Some(95),
                        heart_rate: Some(105),
                        temperature: Some(38.2),
                        saturation: Some(97),
                        ..Default::default()
                    },
                    notes: Some("after analgesia".into()),
                },
                Some(&f.nurse),
            )
            .expect("nurse records vitals");
        assert_eq!(
            recorded.alerts,
            vec![
                VitalAlert::ElevatedSystolic,
                VitalAlert::ElevatedDiastolic,
                VitalAlert::Tachycardia,
                VitalAlert::Fever
            ]
        );
        assert_eq!(recorded.record.recorded_by, f.nurse.id);

        let err = f
            .clinical
            .record_vitals(
                f.attendance,
                VitalSignsInput {
                    measurements: VitalSigns {
                        heart_rate: Some(80),
                        ..Default::default()
                    },
                    notes: None,
                },
                Some(&f.clerk),
            )
            .expect_err("administrative staff");
        assert!(matches!(err, RecordError::RoleNotPermitted { .. }));

        let err = f
            .clinical
            .record_vitals(f.attendance, VitalSignsInput::default(), Some(&f.nurse))
            .expect_err("nothing measured");
        assert!(matches!(err, RecordError::InvalidInput(_)));
    }

    #[test]
    fn configured_thresholds_apply_to_recorded_vitals() {
        let thresholds = crate::alerts::VitalThresholds {
            saturation_low: 92,
            ..Default::default()
        };
        let cfg = Arc::new(CoreConfig::new(thresholds, 50).expect("config"));
        let clinical = ClinicalService::new(cfg, Arc::new(RecordStore::new()));

        let vitals = VitalSigns {
            saturation: Some(93),
            ..Default::default()
        };
        assert!(clinical.alerts_for(&vitals).is_empty());
        assert_eq!(
            crate::alerts::evaluate_vitals(&vitals),
            vec![VitalAlert::LowSaturation]
        );
    }

    #[test]
    fn prescriptions_are_physician_only_and_validated() {
        let f = fixture();
        let prescription = f
            .clinical
            .create_prescription(
                f.attendance,
                prescription_input(vec![item("Dipyrone", 3), item("Ondansetron", 2)]),
                Some(&f.physician),
            )
            .expect("physician prescribes");
        assert_eq!(prescription.items.len(), 2);
        assert_eq!(prescription.items[0].medication.as_str(), "Dipyrone");
        assert_eq!(prescription.items[1].id.get(), 2);
        assert_eq!(prescription.status, PrescriptionStatus::Active);

        let err = f
            .clinical
            .create_prescription(
                f.attendance,
                prescription_input(vec![item("Dipyrone", 3)]),
                Some(&f.nurse),
            )
            .expect_err("nurse cannot prescribe");
        assert!(matches!(err, RecordError::RoleNotPermitted { role: "nurse", .. }));

        let err = f
            .clinical
            .create_prescription(f.attendance, prescription_input(vec![]), Some(&f.physician))
            .expect_err("no items");
        assert!(matches!(err, RecordError::InvalidInput(_)));

        let mut past = prescription_input(vec![item("Dipyrone", 3)]);
        past.valid_until = Utc::now().date_naive() - Duration::days(1);
        assert!(f
            .clinical
            .create_prescription(f.attendance, past, Some(&f.physician))
            .is_err());
    }

    #[test]
    fn invalid_item_writes_nothing() {
        let f = fixture();
        let err = f
            .clinical
            .create_prescription(
                f.attendance,
                prescription_input(vec![item("Dipyrone", 3), item("Ceftriaxone", 400)]),
                Some(&f.physician),
            )
            .expect_err("duration out of range");
        assert!(matches!(err, RecordError::InvalidInput(_)));

        let records = f.clinical.attendance_records(f.attendance).expect("records");
        assert!(records.prescriptions.is_empty());
    }

    #[test]
    fn prescription_status_changes() {
        let f = fixture();
        let prescription = f
            .clinical
            .create_prescription(
                f.attendance,
                prescription_input(vec![item("Dipyrone", 3)]),
                Some(&f.physician),
            )
            .expect("prescribe");
        let suspended = f
            .clinical
            .set_prescription_status(
                prescription.id,
                PrescriptionStatus::Suspended,
                Some(&f.physician),
            )
            .expect("suspend");
        assert_eq!(suspended.status, PrescriptionStatus::Suspended);

        let err = f
            .clinical
            .set_prescription_status(
                PrescriptionId::new(50),
                PrescriptionStatus::Completed,
                Some(&f.physician),
            )
            .expect_err("unknown");
        assert!(matches!(err, RecordError::PrescriptionNotFound(_)));
    }

    #[test]
    fn exam_lifecycle_rules() {
        let f = fixture();
        let err = f
            .clinical
            .request_exam(f.attendance, exam_input(), Some(&f.nurse))
            .expect_err("nurse cannot request");
        assert!(matches!(err, RecordError::RoleNotPermitted { .. }));

        let exam = f
            .clinical
            .request_exam(f.attendance, exam_input(), Some(&f.physician))
            .expect("request");
        assert_eq!(exam.status, ExamStatus::Requested);

        let collected = f
            .clinical
            .mark_exam_collected(exam.id, Some(&f.nurse))
            .expect("collect");
        assert_eq!(collected.status, ExamStatus::Collected);
        let err = f
            .clinical
            .mark_exam_collected(exam.id, Some(&f.nurse))
            .expect_err("already collected");
        assert!(matches!(
            err,
            RecordError::ExamNotCollectable {
                status: "collected",
                ..
            }
        ));

        let resulted = f
            .clinical
            .attach_exam_result(exam.id, result_input(), Some(&f.clerk))
            .expect("attach result");
        assert_eq!(resulted.status, ExamStatus::ResultAvailable);
        assert!(resulted.result.is_some());

        let err = f
            .clinical
            .attach_exam_result(exam.id, result_input(), Some(&f.clerk))
            .expect_err("second result");
        assert!(matches!(err, RecordError::ExamAlreadyResulted(_)));

        let err = f
            .clinical
            .cancel_exam(exam.id, Some(&f.physician))
            .expect_err("cancel after result");
        assert!(matches!(err, RecordError::ExamAlreadyResulted(_)));
    }

    #[test]
    fn cancelled_exam_rejects_result_and_second_cancel() {
        let f = fixture();
        let exam = f
            .clinical
            .request_exam(f.attendance, exam_input(), Some(&f.physician))
            .expect("request");
        f.clinical
            .cancel_exam(exam.id, Some(&f.physician))
            .expect("cancel");

        let err = f
            .clinical
            .cancel_exam(exam.id, Some(&f.physician))
            .expect_err("cancel twice");
        assert!(matches!(err, RecordError::ExamCancelled(_)));

        let err = f
            .clinical
            .attach_exam_result(exam.id, result_input(), Some(&f.physician))
            .expect_err("result after cancel");
        assert!(matches!(err, RecordError::ExamCancelled(_)));

        let err = f
            .clinical
            .mark_exam_collected(exam.id, Some(&f.nurse))
            .expect_err("collect after cancel");
        assert!(matches!(err, RecordError::ExamNotCollectable { .. }));
    }

    #[test]
    fn result_moves_exam_to_top_of_timeline() {
        let f = fixture();
        let exam = f
            .clinical
            .request_exam(f.attendance, exam_input(), Some(&f.physician))
            .expect("request");
        pause();
        f.clinical
            .add_note(f.attendance, note_input("awaiting labs"), Some(&f.physician))
            .expect("note");
        pause();
        f.clinical
            .record_vitals(
                f.attendance,
                VitalSignsInput {
                    measurements: VitalSigns {
                        saturation: Some(90),
                        ..Default::default()
                    },
                    notes: None,
                },
                Some(&f.nurse),
            )
            .expect("vitals");

        let before = f.clinical.timeline(f.attendance).expect("timeline");
        let kinds: Vec<TimelineKind> = before.events().iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![TimelineKind::Vitals, TimelineKind::Note, TimelineKind::Exam]
        );

        pause();
        f.clinical
            .attach_exam_result(exam.id, result_input(), Some(&f.physician))
            .expect("result");

        let after = f.clinical.timeline(f.attendance).expect("timeline");
        let events = after.events();
        assert_eq!(events.len(), 3);
        match events[0].entry {
            TimelineEntry::Exam(e) => {
                let result = e.result.as_ref().expect("result attached");
                assert_eq!(events[0].at, result.resulted_at);
                assert!(events[0].at > e.requested_at);
            }
            other => panic!("expected exam first, got {other:?}"),
        }
    }

    #[test]
    fn timeline_of_empty_attendance_is_empty() {
        let f = fixture();
        let timeline = f.clinical.timeline(f.attendance).expect("timeline");
        assert!(timeline.events().is_empty());

        let err = f
            .clinical
            .timeline(AttendanceId::new(404))
            .expect_err("unknown attendance");
        assert!(matches!(err, RecordError::AttendanceNotFound(_)));
    }

    #[test]
    fn clinical_records_protect_attendance_and_author() {
        let f = fixture();
        f.clinical
            .add_note(f.attendance, note_input("seen"), Some(&f.nurse))
            .expect("note");

        let err = f.attendances.delete(f.attendance).expect_err("protected");
        assert!(matches!(
            err,
            RecordError::ProtectedDelete {
                entity: "attendance",
                dependants: 1,
                ..
            }
        ));

        let err = f.practitioners.delete(f.nurse.id).expect_err("author");
        assert!(matches!(err, RecordError::ProtectedDelete { .. }));

        assert!(f.attendances.get(f.attendance).is_ok());
        assert_eq!(f.attendances.dashboard().expect("dashboard")[0].attendance.patient, f.patient);
    }
}
