//! In-memory record store.
//!
//! All tables sit behind a single `RwLock`. Each service operation takes the lock once, so an
//! operation that writes several records (a prescription and its items, a patient and their
//! first attendance) is never observed half-done. A poisoned lock is reported as
//! `RecordError::StorePoisoned`.

use crate::attendance::Attendance;
use crate::clinical::{
    AttendanceRecords, ClinicalNote, ExamRequest, Prescription, VitalSignsRecord,
};
use crate::ids::{
    AttendanceId, ExamRequestId, NoteId, PatientId, PractitionerId, PrescriptionId,
    VitalSignsId,
};
use crate::patient::Patient;
use crate::practitioner::Practitioner;
use crate::{RecordError, RecordResult};
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Monotonic id source. The first id handed out is 1 and ids are never reused.
#[derive(Debug, Default)]
pub struct Sequence(u64);

impl Sequence {
    pub fn next<T: From<u64>>(&mut self) -> T {
        self.0 += 1;
        T::from(self.0)
    }
}

#[derive(Debug, Default)]
pub struct Sequences {
    pub patient: Sequence,
    pub practitioner: Sequence,
    pub attendance: Sequence,
    pub note: Sequence,
    pub vitals: Sequence,
    pub prescription: Sequence,
    pub prescription_item: Sequence,
    pub exam_request: Sequence,
    pub exam_result: Sequence,
}

/// Every table of the record store.
#[derive(Debug, Default)]
pub struct Tables {
    pub patients: BTreeMap<PatientId, Patient>,
    pub practitioners: BTreeMap<PractitionerId, Practitioner>,
    pub attendances: BTreeMap<AttendanceId, Attendance>,
    pub notes: BTreeMap<NoteId, ClinicalNote>,
    pub vitals: BTreeMap<VitalSignsId, VitalSignsRecord>,
    pub prescriptions: BTreeMap<PrescriptionId, Prescription>,
    pub exams: BTreeMap<ExamRequestId, ExamRequest>,
    pub seq: Sequences,
}

impl Tables {
    pub fn patient(&self, id: PatientId) -> RecordResult<&Patient> {
        self.patients.get(&id).ok_or(RecordError::PatientNotFound(id))
    }

    pub fn practitioner(&self, id: PractitionerId) -> RecordResult<&Practitioner> {
        self.practitioners
            .get(&id)
            .ok_or(RecordError::PractitionerNotFound(id))
    }

    pub fn attendance(&self, id: AttendanceId) -> RecordResult<&Attendance> {
        self.attendances
            .get(&id)
            .ok_or(RecordError::AttendanceNotFound(id))
    }

    pub fn attendance_mut(&mut self, id: AttendanceId) -> RecordResult<&mut Attendance> {
        self.attendances
            .get_mut(&id)
            .ok_or(RecordError::AttendanceNotFound(id))
    }

    pub fn exam_mut(&mut self, id: ExamRequestId) -> RecordResult<&mut ExamRequest> {
        self.exams
            .get_mut(&id)
            .ok_or(RecordError::ExamRequestNotFound(id))
    }

    pub fn find_patient_by_national_id(&self, national_id: &str) -> Option<&Patient> {
        self.patients
            .values()
            .find(|p| p.profile.national_id.as_str() == national_id)
    }

    /// Copies out the clinical records of one attendance, each collection in id order.
    pub fn attendance_records(&self, id: AttendanceId) -> AttendanceRecords {
        AttendanceRecords {
            notes: self
                .notes
                .values()
                .filter(|n| n.attendance == id)
                .cloned()
                .collect(),
            vitals: self
                .vitals
                .values()
                .filter(|v| v.attendance == id)
                .cloned()
                .collect(),
            prescriptions: self
                .prescriptions
                .values()
                .filter(|p| p.attendance == id)
                .cloned()
                .collect(),
            exams: self
                .exams
                .values()
                .filter(|e| e.attendance == id)
                .cloned()
                .collect(),
        }
    }

    pub fn clinical_record_count(&self, id: AttendanceId) -> usize {
        self.notes.values().filter(|n| n.attendance == id).count()
            + self.vitals.values().filter(|v| v.attendance == id).count()
            + self
                .prescriptions
                .values()
                .filter(|p| p.attendance == id)
                .count()
            + self.exams.values().filter(|e| e.attendance == id).count()
    }

    /// Number of attendances and clinical records that name `id` as their practitioner.
    pub fn practitioner_reference_count(&self, id: PractitionerId) -> usize {
        self.attendances
            .values()
            .filter(|a| a.practitioner == Some(id))
            .count()
            + self.notes.values().filter(|n| n.author == id).count()
            + self.vitals.values().filter(|v| v.recorded_by == id).count()
            + self
                .prescriptions
                .values()
                .filter(|p| p.prescriber == id)
                .count()
            + self.exams.values().filter(|e| e.requester == id).count()
    }
}

/// Shared handle to the record tables.
#[derive(Debug, Default)]
pub struct RecordStore {
    tables: RwLock<Tables>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self) -> RecordResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| RecordError::StorePoisoned)
    }

    pub fn write(&self) -> RecordResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| RecordError::StorePoisoned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequences_start_at_one_and_are_independent() {
        let mut seq = Sequences::default();
        let a: PatientId = seq.patient.next();
        let b: PatientId = seq.patient.next();
        let n: NoteId = seq.note.next();
        assert_eq!(a.get(), 1);
        assert_eq!(b.get(), 2);
        assert_eq!(n.get(), 1);
    }

    #[test]
    fn missing_rows_map_to_not_found() {
        let store = RecordStore::new();
        let tables = store.read().expect("read lock");
        assert!(matches!(
            tables.patient(PatientId::new(9)),
            Err(RecordError::PatientNotFound(id)) if id.get() == 9
        ));
        assert!(tables.attendance_records(AttendanceId::new(1)).is_empty());
    }

    #[test]
    fn poisoned_lock_is_reported() {
        let store = std::sync::Arc::new(RecordStore::new());
        let clone = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = clone.write().expect("write lock");
            panic!("poison the lock");
        })
        .join();

        assert!(matches!(store.read(), Err(RecordError::StorePoisoned)));
    }
}
