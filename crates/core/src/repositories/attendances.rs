//! Attendance lifecycle service.
//!
//! Opens visits (optionally registering the patient in the same step), lists them for the
//! department dashboard and moves them through their statuses.

use crate::attendance::{Attendance, AttendanceStatus};
use crate::constants::PRACTITIONER_NOT_ASSIGNED;
use crate::ids::{AttendanceId, PatientId};
use crate::patient::{Patient, PatientInput};
use crate::practitioner::Practitioner;
use crate::store::{RecordStore, Tables};
use crate::validation::require_profile;
use crate::{RecordError, RecordResult};
use chrono::Utc;
use pronto_types::NonEmptyText;
use serde::Serialize;
use std::sync::Arc;

/// Outcome of registering a patient and opening their attendance in one step.
#[derive(Clone, Debug, Serialize)]
pub struct RegisteredAttendance {
    pub attendance: Attendance,
    pub patient: Patient,
    /// `false` when a patient with the same national id was already registered.
    pub patient_created: bool,
}

/// One row of the department dashboard.
#[derive(Clone, Debug, Serialize)]
pub struct DashboardEntry {
    #[serde(flatten)]
    pub attendance: Attendance,
    pub patient_name: String,
    pub practitioner: String,
}

#[derive(Clone, Debug)]
pub struct AttendanceService {
    store: Arc<RecordStore>,
}

fn insert_attendance(
    tables: &mut Tables,
    patient: PatientId,
    chief_complaint: NonEmptyText,
    acting: Option<&Practitioner>,
) -> Attendance {
    if acting.is_none() {
        tracing::warn!(patient = %patient, "opening attendance without a responsible practitioner");
    }

    let now = Utc::now();
    let attendance = Attendance {
        id: tables.seq.attendance.next(),
        patient,
        practitioner: acting.map(|p| p.id),
        entered_at: now,
        chief_complaint,
        status: AttendanceStatus::default(),
        updated_at: now,
    };
    tables
        .attendances
        .insert(attendance.id, attendance.clone());

    tracing::info!(attendance = %attendance.id, patient = %patient, "opened attendance");
    attendance
}

/// Display of the practitioner responsible for an attendance.
pub(crate) fn responsible_display(tables: &Tables, attendance: &Attendance) -> String {
    attendance
        .practitioner
        .and_then(|id| tables.practitioners.get(&id))
        .map_or_else(|| PRACTITIONER_NOT_ASSIGNED.to_string(), |p| p.to_string())
}

fn dashboard_entry(tables: &Tables, attendance: &Attendance) -> RecordResult<DashboardEntry> {
    Ok(DashboardEntry {
        patient_name: tables.patient(attendance.patient)?.name().to_string(),
        practitioner: responsible_display(tables, attendance),
        attendance: attendance.clone(),
    })
}

impl AttendanceService {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    /// Opens an attendance for an already registered patient.
    ///
    /// The acting practitioner becomes the responsible one; without a profile the attendance
    /// is left unassigned.
    ///
    /// # Errors
    ///
    /// `RecordError::PatientNotFound` or `RecordError::Text` for a blank complaint.
    pub fn open(
        &self,
        patient: PatientId,
        chief_complaint: &str,
        acting: Option<&Practitioner>,
    ) -> RecordResult<Attendance> {
        let chief_complaint = NonEmptyText::new(chief_complaint)?;
        let mut tables = self.store.write()?;
        tables.patient(patient)?;
        Ok(insert_attendance(
            &mut tables,
            patient,
            chief_complaint,
            acting,
        ))
    }

    /// Finds the patient by national id, registering them if unknown, and opens an
    /// attendance. An existing patient's data is left unchanged.
    pub fn register_with_patient(
        &self,
        patient: PatientInput,
        chief_complaint: &str,
        acting: Option<&Practitioner>,
    ) -> RecordResult<RegisteredAttendance> {
        let profile = patient.validate()?;
        let chief_complaint = NonEmptyText::new(chief_complaint)?;
        let mut tables = self.store.write()?;

        let existing = tables
            .find_patient_by_national_id(profile.national_id.as_str())
            .cloned();
        let (patient, patient_created) = match existing {
            Some(patient) => (patient, false),
            None => {
                let now = Utc::now();
                let patient = Patient {
                    id: tables.seq.patient.next(),
                    profile,
                    created_at: now,
                    updated_at: now,
                };
                tables.patients.insert(patient.id, patient.clone());
                tracing::info!(patient = %patient.id, "registered patient at intake");
                (patient, true)
            }
        };

        let attendance = insert_attendance(&mut tables, patient.id, chief_complaint, acting);
        Ok(RegisteredAttendance {
            attendance,
            patient,
            patient_created,
        })
    }

    pub fn get(&self, id: AttendanceId) -> RecordResult<Attendance> {
        self.store.read()?.attendance(id).cloned()
    }

    /// One attendance with its patient's name and the responsible practitioner display.
    pub fn summary(&self, id: AttendanceId) -> RecordResult<DashboardEntry> {
        let tables = self.store.read()?;
        dashboard_entry(&tables, tables.attendance(id)?)
    }

    /// Every attendance, most recent entry first.
    pub fn dashboard(&self) -> RecordResult<Vec<DashboardEntry>> {
        let tables = self.store.read()?;
        let mut rows = tables
            .attendances
            .values()
            .map(|attendance| dashboard_entry(&tables, attendance))
            .collect::<RecordResult<Vec<_>>>()?;

        rows.sort_by(|a, b| {
            b.attendance
                .entered_at
                .cmp(&a.attendance.entered_at)
                .then(b.attendance.id.cmp(&a.attendance.id))
        });
        Ok(rows)
    }

    /// Sets the status of an attendance. Any status may follow any other.
    pub fn update_status(
        &self,
        id: AttendanceId,
        status: AttendanceStatus,
        acting: Option<&Practitioner>,
    ) -> RecordResult<Attendance> {
        let practitioner = require_profile(acting)?;
        let mut tables = self.store.write()?;
        let attendance = tables.attendance_mut(id)?;

        let previous = attendance.status;
        attendance.status = status;
        attendance.updated_at = Utc::now();

        tracing::info!(
            attendance = %id,
            from = previous.label(),
            to = status.label(),
            by = %practitioner.id,
            "attendance status changed"
        );
        Ok(attendance.clone())
    }

    /// Deletes an attendance that has no clinical records.
    pub fn delete(&self, id: AttendanceId) -> RecordResult<()> {
        let mut tables = self.store.write()?;
        tables.attendance(id)?;

        let dependants = tables.clinical_record_count(id);
        if dependants > 0 {
            return Err(RecordError::ProtectedDelete {
                entity: "attendance",
                id: id.get(),
                dependants,
            });
        }

        tables.attendances.remove(&id);
        tracing::info!(attendance = %id, "deleted attendance");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoreConfig;
    use crate::practitioner::{PractitionerInput, Role};
    use crate::repositories::patients::fixtures::patient_input;
    use crate::repositories::patients::PatientService;
    use crate::repositories::practitioners::{fixtures::input, PractitionerService};

    struct Fixture {
        patients: PatientService,
        practitioners: PractitionerService,
        attendances: AttendanceService,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(RecordStore::new());
        Fixture {
            patients: PatientService::new(Arc::new(CoreConfig::default()), store.clone()),
            practitioners: PractitionerService::new(store.clone()),
            attendances: AttendanceService::new(store),
        }
    }

    #[test]
    fn register_with_patient_creates_then_reuses() {
        let f = fixture();
        let nurse = f
            .practitioners
            .register(input("joana", Role::Nurse))
            .expect("register nurse");

        let first = f
            .attendances
            .register_with_patient(
                patient_input("Ana Lima", "111.222.333-44"),
                "chest pain",
                Some(&nurse),
            )
            .expect("first visit");
        assert!(first.patient_created);
        assert_eq!(first.attendance.status, AttendanceStatus::IntakeTriage);
        assert_eq!(first.attendance.practitioner, Some(nurse.id));

        let second = f
            .attendances
            .register_with_patient(
                patient_input("Other Name", "11122233344"),
                "headache",
                None,
            )
            .expect("second visit");
        assert!(!second.patient_created);
        assert_eq!(second.patient.id, first.patient.id);
        assert_eq!(second.patient.name(), "Ana Lima");
        assert_eq!(second.attendance.practitioner, None);
    }

    #[test]
    fn open_requires_existing_patient_and_complaint() {
        let f = fixture();
        let err = f
            .attendances
            .open(PatientId::new(42), "fever", None)
            .expect_err("unknown patient");
        assert!(matches!(err, RecordError::PatientNotFound(_)));

        let ana = f
            .patients
            .register(patient_input("Ana Lima", "11122233344"))
            .expect("register");
        let err = f.attendances.open(ana.id, "  ", None).expect_err("blank");
        assert!(matches!(err, RecordError::Text(_)));
    }

    #[test]
    fn dashboard_is_newest_first_with_names() {
        let f = fixture();
        let doc = f
            .practitioners
            .register(PractitionerInput {
                full_name: "Dr. Rui".into(),
                ..input("rui", Role::Physician)
            })
            .expect("register");
        let ana = f
            .patients
            .register(patient_input("Ana Lima", "11122233344"))
            .expect("register");

        let older = f.attendances.open(ana.id, "fever", None).expect("open");
        let newer = f
            .attendances
            .open(ana.id, "cough", Some(&doc))
            .expect("open");

        let rows = f.attendances.dashboard().expect("dashboard");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].attendance.id, newer.id);
        assert_eq!(rows[0].practitioner, "Dr. Rui - physician");
        assert_eq!(rows[1].attendance.id, older.id);
        assert_eq!(rows[1].practitioner, PRACTITIONER_NOT_ASSIGNED);
        assert_eq!(rows[1].patient_name, "Ana Lima");

        let summary = f.attendances.summary(newer.id).expect("summary");
        assert_eq!(summary.practitioner, "Dr. Rui - physician");
        assert!(matches!(
            f.attendances.summary(AttendanceId::new(99)),
            Err(RecordError::AttendanceNotFound(_))
        ));
    }

    #[test]
    fn status_can_move_freely_with_a_profile() {
        let f = fixture();
        let clerk = f
            .practitioners
            .register(input("clerk", Role::Administrative))
            .expect("register");
        let ana = f
            .patients
            .register(patient_input("Ana Lima", "11122233344"))
            .expect("register");
        let visit = f.attendances.open(ana.id, "fever", None).expect("open");

        let discharged = f
            .attendances
            .update_status(visit.id, AttendanceStatus::Discharged, Some(&clerk))
            .expect("discharge");
        assert_eq!(discharged.status, AttendanceStatus::Discharged);
        assert!(discharged.updated_at >= visit.updated_at);

        let reopened = f
            .attendances
            .update_status(visit.id, AttendanceStatus::InProgress, Some(&clerk))
            .expect("back to in progress");
        assert_eq!(reopened.status, AttendanceStatus::InProgress);

        let err = f
            .attendances
            .update_status(visit.id, AttendanceStatus::Admitted, None)
            .expect_err("no profile");
        assert!(matches!(err, RecordError::MissingPractitionerProfile));
    }

    #[test]
    fn patient_with_attendance_cannot_be_deleted() {
        let f = fixture();
        let ana = f
            .patients
            .register(patient_input("Ana Lima", "11122233344"))
            .expect("register");
        let visit = f.attendances.open(ana.id, "fever", None).expect("open");

        let err = f.patients.delete(ana.id).expect_err("protected");
        assert!(matches!(
            err,
            RecordError::ProtectedDelete {
                entity: "patient",
                dependants: 1,
                ..
            }
        ));

        f.attendances.delete(visit.id).expect("empty attendance");
        f.patients.delete(ana.id).expect("now deletable");
    }

    #[test]
    fn practitioner_responsible_for_attendance_cannot_be_deleted() {
        let f = fixture();
        let doc = f
            .practitioners
            .register(input("rui", Role::Physician))
            .expect("register");
        let ana = f
            .patients
            .register(patient_input("Ana Lima", "11122233344"))
            .expect("register");
        f.attendances
            .open(ana.id, "fever", Some(&doc))
            .expect("open");

        let err = f.practitioners.delete(doc.id).expect_err("protected");
        assert!(matches!(
            err,
            RecordError::ProtectedDelete {
                entity: "practitioner",
                ..
            }
        ));
    }
}
