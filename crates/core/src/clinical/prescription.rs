use crate::ids::{AttendanceId, PractitionerId, PrescriptionId, PrescriptionItemId};
use chrono::{DateTime, NaiveDate, Utc};
use pronto_types::NonEmptyText;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrescriptionStatus {
    #[default]
    Active,
    Suspended,
    Completed,
}

impl PrescriptionStatus {
    pub fn label(self) -> &'static str {
        match self {
            PrescriptionStatus::Active => "active",
            PrescriptionStatus::Suspended => "suspended",
            PrescriptionStatus::Completed => "completed",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Oral,
    Intravenous,
    Intramuscular,
    Subcutaneous,
    Topical,
    Inhalation,
    Sublingual,
    Rectal,
}

impl Route {
    pub fn label(self) -> &'static str {
        match self {
            Route::Oral => "oral",
            Route::Intravenous => "intravenous",
            Route::Intramuscular => "intramuscular",
            Route::Subcutaneous => "subcutaneous",
            Route::Topical => "topical",
            Route::Inhalation => "inhalation",
            Route::Sublingual => "sublingual",
            Route::Rectal => "rectal",
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct PrescriptionItemInput {
    pub medication: String,
    pub dose: String,
    pub route: Route,
    pub frequency: String,
    pub duration_days: u16,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PrescriptionInput {
    pub valid_until: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
    pub items: Vec<PrescriptionItemInput>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PrescriptionItem {
    pub id: PrescriptionItemId,
    pub medication: NonEmptyText,
    pub dose: NonEmptyText,
    pub route: Route,
    pub frequency: NonEmptyText,
    pub duration_days: u16,
    pub notes: Option<NonEmptyText>,
}

impl PrescriptionItem {
    /// One-line summary such as `"Dipyrone 1 g (intravenous) every 6 h for 3 day(s)"`.
    pub fn summary(&self) -> String {
        format!(
            "{} {} ({}) {} for {} day(s)",
            self.medication,
            self.dose,
            self.route.label(),
            self.frequency,
            self.duration_days
        )
    }
}

/// A physician-authored medication order. Items are kept in the order they were submitted.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Prescription {
    pub id: PrescriptionId,
    pub attendance: AttendanceId,
    pub prescriber: PractitionerId,
    pub created_at: DateTime<Utc>,
    pub valid_until: NaiveDate,
    pub status: PrescriptionStatus,
    pub notes: Option<NonEmptyText>,
    pub items: Vec<PrescriptionItem>,
}
