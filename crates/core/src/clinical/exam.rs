use crate::ids::{AttendanceId, ExamRequestId, ExamResultId, PractitionerId};
use chrono::{DateTime, Utc};
use pronto_types::NonEmptyText;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamCategory {
    Laboratory,
    Imaging,
    Other,
}

impl ExamCategory {
    pub fn label(self) -> &'static str {
        match self {
            ExamCategory::Laboratory => "laboratory",
            ExamCategory::Imaging => "imaging",
            ExamCategory::Other => "other",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamStatus {
    #[default]
    Requested,
    Collected,
    ResultAvailable,
    Cancelled,
}

impl ExamStatus {
    pub fn label(self) -> &'static str {
        match self {
            ExamStatus::Requested => "requested",
            ExamStatus::Collected => "collected",
            ExamStatus::ResultAvailable => "result available",
            ExamStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ExamRequestInput {
    pub category: ExamCategory,
    pub exam_name: String,
    pub justification: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ExamResultInput {
    pub text: String,
    /// Opaque reference to an attachment stored elsewhere.
    #[serde(default)]
    pub attachment: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExamResult {
    pub id: ExamResultId,
    pub text: NonEmptyText,
    pub attachment: Option<NonEmptyText>,
    pub notes: Option<NonEmptyText>,
    pub resulted_at: DateTime<Utc>,
}

/// A diagnostic order with at most one result attached.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExamRequest {
    pub id: ExamRequestId,
    pub attendance: AttendanceId,
    pub requester: PractitionerId,
    pub category: ExamCategory,
    pub exam_name: NonEmptyText,
    pub justification: NonEmptyText,
    pub status: ExamStatus,
    pub requested_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub result: Option<ExamResult>,
}
