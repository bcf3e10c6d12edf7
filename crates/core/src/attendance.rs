//! Attendance (emergency-department visit) records.

use crate::ids::{AttendanceId, PatientId, PractitionerId};
use chrono::{DateTime, Utc};
use pronto_types::NonEmptyText;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle position of an attendance.
///
/// The variants are declared in lifecycle order, so `Ord` follows the flow from triage to
/// discharge or admission. Any status may be set from any other.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    #[default]
    IntakeTriage,
    InProgress,
    AwaitingExam,
    InExam,
    AwaitingResult,
    Discharged,
    Admitted,
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 7] = [
        AttendanceStatus::IntakeTriage,
        AttendanceStatus::InProgress,
        AttendanceStatus::AwaitingExam,
        AttendanceStatus::InExam,
        AttendanceStatus::AwaitingResult,
        AttendanceStatus::Discharged,
        AttendanceStatus::Admitted,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AttendanceStatus::IntakeTriage => "intake / triage",
            AttendanceStatus::InProgress => "in progress",
            AttendanceStatus::AwaitingExam => "awaiting exam",
            AttendanceStatus::InExam => "in exam",
            AttendanceStatus::AwaitingResult => "awaiting result",
            AttendanceStatus::Discharged => "discharged",
            AttendanceStatus::Admitted => "admitted",
        }
    }

    /// Discharged and admitted visits have left the emergency department.
    pub fn is_closed(self) -> bool {
        matches!(self, AttendanceStatus::Discharged | AttendanceStatus::Admitted)
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Attendance {
    pub id: AttendanceId,
    pub patient: PatientId,
    pub practitioner: Option<PractitionerId>,
    pub entered_at: DateTime<Utc>,
    pub chief_complaint: NonEmptyText,
    pub status: AttendanceStatus,
    pub updated_at: DateTime<Utc>,
}
