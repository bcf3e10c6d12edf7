use crate::ids::{AttendanceId, PractitionerId, VitalSignsId};
use chrono::{DateTime, Utc};
use pronto_types::NonEmptyText;
use serde::{Deserialize, Serialize};

/// One set of physiological measurements. Every field is optional; absent values are simply
/// not measured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VitalSigns {
    /// mmHg
    #[serde(default)]
    pub systolic: Option<u16>,
    /// mmHg
    #[serde(default)]
    pub diastolic: Option<u16>,
    /// bpm
    #[serde(default)]
    pub heart_rate: Option<u16>,
    /// rpm
    #[serde(default)]
    pub respiratory_rate: Option<u16>,
    /// °C
    #[serde(default)]
    pub temperature: Option<f64>,
    /// %
    #[serde(default)]
    pub saturation: Option<u8>,
    /// mg/dL
    #[serde(default)]
    pub glucose: Option<u16>,
}

impl VitalSigns {
    pub fn is_empty(&self) -> bool {
        self.systolic.is_none()
            && self.diastolic.is_none()
            && self.heart_rate.is_none()
            && self.respiratory_rate.is_none()
            && self.temperature.is_none()
            && self.saturation.is_none()
            && self.glucose.is_none()
    }

    /// Formats blood pressure as `"120/80"` when both values are present.
    pub fn blood_pressure(&self) -> Option<String> {
        match (self.systolic, self.diastolic) {
            (Some(s), Some(d)) => Some(format!("{s}/{d}")),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct VitalSignsInput {
    #[serde(flatten)]
    pub measurements: VitalSigns,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VitalSignsRecord {
    pub id: VitalSignsId,
    pub attendance: AttendanceId,
    pub recorded_by: PractitionerId,
    #[serde(flatten)]
    pub measurements: VitalSigns,
    pub notes: Option<NonEmptyText>,
    pub created_at: DateTime<Utc>,
}
