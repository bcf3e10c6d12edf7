use crate::ids::{AttendanceId, NoteId, PractitionerId};
use chrono::{DateTime, Utc};
use pronto_types::NonEmptyText;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteCategory {
    Anamnesis,
    PhysicianNote,
    NursingNote,
    PhysicalExam,
}

impl NoteCategory {
    pub fn label(self) -> &'static str {
        match self {
            NoteCategory::Anamnesis => "anamnesis",
            NoteCategory::PhysicianNote => "physician note",
            NoteCategory::NursingNote => "nursing note",
            NoteCategory::PhysicalExam => "physical exam",
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NoteInput {
    pub category: NoteCategory,
    pub text: String,
}

/// A timestamped free-text clinical entry (evolution note).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClinicalNote {
    pub id: NoteId,
    pub attendance: AttendanceId,
    pub author: PractitionerId,
    pub category: NoteCategory,
    pub text: NonEmptyText,
    pub created_at: DateTime<Utc>,
}
