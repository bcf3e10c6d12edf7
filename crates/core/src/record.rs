//! Patient record read model (prontuário).
//!
//! Combines a patient's registry data with their formatted address and, on request, the
//! history of their attendances: most recent visit first, each with its notes in the order
//! they were written.

use crate::attendance::Attendance;
use crate::clinical::ClinicalNote;
use crate::ids::PatientId;
use crate::patient::Patient;
use crate::repositories::attendances::responsible_display;
use crate::store::Tables;
use crate::RecordResult;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AttendanceHistoryEntry {
    pub attendance: Attendance,
    /// Responsible practitioner display, or "Not assigned".
    pub practitioner: String,
    pub notes: Vec<ClinicalNote>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PatientRecord {
    pub patient: Patient,
    pub full_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<AttendanceHistoryEntry>>,
}

impl PatientRecord {
    pub(crate) fn build(
        tables: &Tables,
        id: PatientId,
        include_history: bool,
    ) -> RecordResult<Self> {
        let patient = tables.patient(id)?.clone();
        let full_address = patient.profile.full_address();

        let history = include_history.then(|| {
            let mut visits: Vec<&Attendance> = tables
                .attendances
                .values()
                .filter(|a| a.patient == id)
                .collect();
            visits.sort_by(|a, b| b.entered_at.cmp(&a.entered_at).then(b.id.cmp(&a.id)));

            visits
                .into_iter()
                .map(|attendance| {
                    let mut notes: Vec<ClinicalNote> = tables
                        .notes
                        .values()
                        .filter(|n| n.attendance == attendance.id)
                        .cloned()
                        .collect();
                    notes.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

                    AttendanceHistoryEntry {
                        practitioner: responsible_display(tables, attendance),
                        attendance: attendance.clone(),
                        notes,
                    }
                })
                .collect()
        });

        Ok(Self {
            patient,
            full_address,
            history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clinical::{NoteCategory, NoteInput};
    use crate::config::CoreConfig;
    use crate::constants::{ADDRESS_NOT_INFORMED, PRACTITIONER_NOT_ASSIGNED};
    use crate::patient::PatientInput;
    use crate::practitioner::Role;
    use crate::repositories::attendances::AttendanceService;
    use crate::repositories::clinical::ClinicalService;
    use crate::repositories::patients::fixtures::patient_input;
    use crate::repositories::patients::PatientService;
    use crate::repositories::practitioners::{fixtures::input, PractitionerService};
    use crate::store::RecordStore;
    use crate::RecordError;
    use std::sync::Arc;

    #[test]
    fn record_with_history() {
        let cfg = Arc::new(CoreConfig::default());
        let store = Arc::new(RecordStore::new());
        let patients = PatientService::new(cfg.clone(), store.clone());
        let practitioners = PractitionerService::new(store.clone());
        let attendances = AttendanceService::new(store.clone());
        let clinical = ClinicalService::new(cfg, store);

        let nurse = practitioners
            .register(input("joana", Role::Nurse))
            .expect("nurse");
        let ana = patients
            .register(PatientInput {
                city: Some("Belo Horizonte".into()),
                state: Some("MG".into()),
                ..patient_input("Ana Lima", "11122233344")
            })
            .expect("patient");

        let first = attendances.open(ana.id, "fever", None).expect("open");
        let second = attendances
            .open(ana.id, "cough", Some(&nurse))
            .expect("open");
        for text in ["first note", "second note"] {
            clinical
                .add_note(
                    second.id,
                    NoteInput {
                        category: NoteCategory::NursingNote,
                        text: text.into(),
                    },
                    Some(&nurse),
                )
                .expect("note");
        }

        let record = patients.record(ana.id, true).expect("record");
        assert_eq!(record.full_address, "Belo Horizonte/MG");

        let history = record.history.expect("history requested");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].attendance.id, second.id);
        assert_eq!(history[0].practitioner, "joana - nurse");
        let notes: Vec<&str> = history[0].notes.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(notes, vec!["first note", "second note"]);
        assert_eq!(history[1].attendance.id, first.id);
        assert_eq!(history[1].practitioner, PRACTITIONER_NOT_ASSIGNED);
        assert!(history[1].notes.is_empty());
    }

    #[test]
    fn record_without_history() {
        let cfg = Arc::new(CoreConfig::default());
        let patients = PatientService::new(cfg, Arc::new(RecordStore::new()));
        let ana = patients
            .register(patient_input("Ana Lima", "11122233344"))
            .expect("patient");

        let record = patients.record(ana.id, false).expect("record");
        assert!(record.history.is_none());
        assert_eq!(record.full_address, ADDRESS_NOT_INFORMED);

        let err = patients.record(PatientId::new(77), false).expect_err("absent");
        assert!(matches!(err, RecordError::PatientNotFound(_)));
    }
}
