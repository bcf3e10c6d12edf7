//! Timeline aggregation.
//!
//! Merges the four kinds of clinical record of one attendance into a single sequence ordered
//! newest first. Each event borrows the record it came from; nothing is copied or mutated.
//!
//! The display timestamp of a note, a vital-signs record or a prescription is its creation
//! time. An exam request is shown at the time of its result once one is attached, so a result
//! arriving later moves the request up the timeline; until then it sits at its request time.
//!
//! Events with the same display timestamp are ordered by kind (note, vitals, prescription,
//! exam) and then by record id, newest record first, which makes the output fully
//! deterministic.

use crate::clinical::{
    AttendanceRecords, ClinicalNote, ExamRequest, ExamStatus, Prescription, VitalSignsRecord,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineKind {
    Note,
    Vitals,
    Prescription,
    Exam,
}

impl TimelineKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TimelineKind::Note => "note",
            TimelineKind::Vitals => "vitals",
            TimelineKind::Prescription => "prescription",
            TimelineKind::Exam => "exam",
        }
    }
}

/// The record behind a timeline event.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
pub enum TimelineEntry<'a> {
    Note(&'a ClinicalNote),
    Vitals(&'a VitalSignsRecord),
    Prescription(&'a Prescription),
    Exam(&'a ExamRequest),
}

impl TimelineEntry<'_> {
    pub fn kind(&self) -> TimelineKind {
        match self {
            TimelineEntry::Note(_) => TimelineKind::Note,
            TimelineEntry::Vitals(_) => TimelineKind::Vitals,
            TimelineEntry::Prescription(_) => TimelineKind::Prescription,
            TimelineEntry::Exam(_) => TimelineKind::Exam,
        }
    }

    fn record_id(&self) -> u64 {
        match self {
            TimelineEntry::Note(n) => n.id.get(),
            TimelineEntry::Vitals(v) => v.id.get(),
            TimelineEntry::Prescription(p) => p.id.get(),
            TimelineEntry::Exam(e) => e.id.get(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TimelineEvent<'a> {
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub entry: TimelineEntry<'a>,
}

impl TimelineEvent<'_> {
    pub fn kind(&self) -> TimelineKind {
        self.entry.kind()
    }
}

/// Display timestamp of an exam request: the result time when a result is attached, the
/// request time otherwise.
///
/// A request whose status says a result is available but which carries none falls back to the
/// request time and logs a warning.
pub fn exam_display_time(exam: &ExamRequest) -> DateTime<Utc> {
    match &exam.result {
        Some(result) => result.resulted_at,
        None => {
            if exam.status == ExamStatus::ResultAvailable {
                tracing::warn!(
                    exam_request = %exam.id,
                    attendance = %exam.attendance,
                    "exam request marked result-available without a result; using request time"
                );
            }
            exam.requested_at
        }
    }
}

/// Builds the timeline of one attendance.
///
/// # Arguments
///
/// * `records` - Every clinical record of the attendance.
///
/// # Returns
///
/// One event per input record, newest first. Empty input gives an empty timeline.
pub fn build_timeline(records: &AttendanceRecords) -> Vec<TimelineEvent<'_>> {
    let mut events = Vec::with_capacity(records.len());

    events.extend(records.notes.iter().map(|note| TimelineEvent {
        at: note.created_at,
        entry: TimelineEntry::Note(note),
    }));
    events.extend(records.vitals.iter().map(|vitals| TimelineEvent {
        at: vitals.created_at,
        entry: TimelineEntry::Vitals(vitals),
    }));
    events.extend(
        records
            .prescriptions
            .iter()
            .map(|prescription| TimelineEvent {
                at: prescription.created_at,
                entry: TimelineEntry::Prescription(prescription),
            }),
    );
    events.extend(records.exams.iter().map(|exam| TimelineEvent {
        at: exam_display_time(exam),
        entry: TimelineEntry::Exam(exam),
    }));

    events.sort_by(|a, b| {
        b.at.cmp(&a.at)
            .then_with(|| a.kind().cmp(&b.kind()))
            .then_with(|| b.entry.record_id().cmp(&a.entry.record_id()))
    });

    events
}

/// Owned clinical records of one attendance, from which its timeline is built on demand.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttendanceTimeline {
    pub records: AttendanceRecords,
}

impl AttendanceTimeline {
    pub fn new(records: AttendanceRecords) -> Self {
        Self { records }
    }

    pub fn events(&self) -> Vec<TimelineEvent<'_>> {
        build_timeline(&self.records)
    }
}
