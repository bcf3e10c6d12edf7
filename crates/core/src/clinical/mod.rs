//! Clinical event records attached to an attendance.
//!
//! Four kinds of record are kept per visit: free-text notes, vital-sign measurements,
//! prescriptions (with their items) and exam requests (with an optional result). Each is
//! timestamped at creation; exam requests additionally move through their own status flow.

pub mod exam;
pub mod note;
pub mod prescription;
pub mod vitals;

pub use exam::{
    ExamCategory, ExamRequest, ExamRequestInput, ExamResult, ExamResultInput, ExamStatus,
};
pub use note::{ClinicalNote, NoteCategory, NoteInput};
pub use prescription::{
    Prescription, PrescriptionInput, PrescriptionItem, PrescriptionItemInput, PrescriptionStatus,
    Route,
};
pub use vitals::{VitalSigns, VitalSignsInput, VitalSignsRecord};

/// All clinical records of one attendance, as handed to the timeline aggregator.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttendanceRecords {
    pub notes: Vec<ClinicalNote>,
    pub vitals: Vec<VitalSignsRecord>,
    pub prescriptions: Vec<Prescription>,
    pub exams: Vec<ExamRequest>,
}

impl AttendanceRecords {
    pub fn len(&self) -> usize {
        self.notes.len() + self.vitals.len() + self.prescriptions.len() + self.exams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
