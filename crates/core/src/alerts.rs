//! Vital-sign alert evaluation.
//!
//! A set of measurements is checked against fixed clinical ranges and each out-of-range value
//! produces one [`VitalAlert`]. Rules are evaluated in a fixed order (systolic, diastolic,
//! heart rate low/high, temperature low/high, saturation) and a measurement that was not taken
//! never fires. All comparisons are strict: a value exactly on a threshold is normal.
//!
//! [`evaluate_vitals`] always uses the built-in clinical defaults. Deployments that load a
//! thresholds file at startup call [`evaluate_vitals_with`] with the values from
//! [`crate::CoreConfig`].

use crate::clinical::VitalSigns;
use crate::constants::{
    DIASTOLIC_HIGH, HEART_RATE_HIGH, HEART_RATE_LOW, SATURATION_LOW, SYSTOLIC_HIGH,
    TEMPERATURE_HIGH, TEMPERATURE_LOW,
};
use crate::{RecordError, RecordResult};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalAlert {
    ElevatedSystolic,
    ElevatedDiastolic,
    Bradycardia,
    Tachycardia,
    Hypothermia,
    Fever,
    LowSaturation,
}

impl VitalAlert {
    pub fn label(self) -> &'static str {
        match self {
            VitalAlert::ElevatedSystolic => "elevated systolic pressure",
            VitalAlert::ElevatedDiastolic => "elevated diastolic pressure",
            VitalAlert::Bradycardia => "bradycardia",
            VitalAlert::Tachycardia => "tachycardia",
            VitalAlert::Hypothermia => "hypothermia",
            VitalAlert::Fever => "fever",
            VitalAlert::LowSaturation => "low saturation",
        }
    }
}

impl fmt::Display for VitalAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Alert boundaries. A value strictly beyond a boundary raises the matching alert.
///
/// Every field may be omitted from a thresholds file, in which case the clinical default is
/// kept.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VitalThresholds {
    pub systolic_high: u16,
    pub diastolic_high: u16,
    pub heart_rate_low: u16,
    pub heart_rate_high: u16,
    pub temperature_low: f64,
    pub temperature_high: f64,
    pub saturation_low: u8,
}

impl Default for VitalThresholds {
    fn default() -> Self {
        Self {
            systolic_high: SYSTOLIC_HIGH,
            diastolic_high: DIASTOLIC_HIGH,
            heart_rate_low: HEART_RATE_LOW,
            heart_rate_high: HEART_RATE_HIGH,
            temperature_low: TEMPERATURE_LOW,
            temperature_high: TEMPERATURE_HIGH,
            saturation_low: SATURATION_LOW,
        }
    }
}

impl VitalThresholds {
    /// Check that the table can be evaluated.
    ///
    /// A low boundary above its high boundary would let one reading fire both alerts of a
    /// field, and a non-finite temperature boundary would switch its rule off.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::InvalidInput` naming the first offending boundary.
    pub fn validate(&self) -> RecordResult<()> {
        if !self.temperature_low.is_finite() || !self.temperature_high.is_finite() {
            return Err(RecordError::InvalidInput(
                "temperature thresholds must be finite numbers".into(),
            ));
        }
        if self.heart_rate_low > self.heart_rate_high {
            return Err(RecordError::InvalidInput(
                "heart_rate_low cannot exceed heart_rate_high".into(),
            ));
        }
        if self.temperature_low > self.temperature_high {
            return Err(RecordError::InvalidInput(
                "temperature_low cannot exceed temperature_high".into(),
            ));
        }
        Ok(())
    }
}

/// Evaluates `vitals` against the built-in clinical thresholds.
///
/// # Returns
///
/// Alerts in rule order; empty when every present value is in range.
pub fn evaluate_vitals(vitals: &VitalSigns) -> Vec<VitalAlert> {
    evaluate_vitals_with(vitals, &VitalThresholds::default())
}

/// Evaluates `vitals` against explicit `thresholds`. Rule order and strict comparison are the
/// same as [`evaluate_vitals`].
pub fn evaluate_vitals_with(vitals: &VitalSigns, thresholds: &VitalThresholds) -> Vec<VitalAlert> {
    let mut alerts = Vec::new();

    if vitals.systolic.is_some_and(|v| v > thresholds.systolic_high) {
        alerts.push(VitalAlert::ElevatedSystolic);
    }
    if vitals.diastolic.is_some_and(|v| v > thresholds.diastolic_high) {
        alerts.push(VitalAlert::ElevatedDiastolic);
    }
    if let Some(hr) = vitals.heart_rate {
        if hr < thresholds.heart_rate_low {
            alerts.push(VitalAlert::Bradycardia);
        }
        if hr > thresholds.heart_rate_high {
            alerts.push(VitalAlert::Tachycardia);
        }
    }
    if let Some(temp) = vitals.temperature {
        if temp < thresholds.temperature_low {
            alerts.push(VitalAlert::Hypothermia);
        }
        if temp > thresholds.temperature_high {
            alerts.push(VitalAlert::Fever);
        }
    }
    if vitals.saturation.is_some_and(|v| v < thresholds.saturation_low) {
        alerts.push(VitalAlert::LowSaturation);
    }

    alerts
}
