//! Constants used throughout the pronto core crate.
//!
//! Clinical thresholds, sanity bounds and fixed display strings live here so the evaluator,
//! the workflow services and the read models agree on them.

/// Default cap on the number of patients returned by a limited registry search.
pub const DEFAULT_SEARCH_LIMIT_MAX: usize = 50;

/// Display text for a patient with no address parts recorded.
pub const ADDRESS_NOT_INFORMED: &str = "Not informed";

/// Display text for an attendance with no responsible practitioner.
pub const PRACTITIONER_NOT_ASSIGNED: &str = "Not assigned";

// ============================================================================
// VITAL-SIGN ALERT THRESHOLDS (defaults)
// ============================================================================

/// Systolic pressure above this value (mmHg) is flagged.
pub const SYSTOLIC_HIGH: u16 = 140;

/// Diastolic pressure above this value (mmHg) is flagged.
pub const DIASTOLIC_HIGH: u16 = 90;

/// Heart rate below this value (bpm) is bradycardic.
pub const HEART_RATE_LOW: u16 = 60;

/// Heart rate above this value (bpm) is tachycardic.
pub const HEART_RATE_HIGH: u16 = 100;

/// Temperature below this value (°C) is hypothermic.
pub const TEMPERATURE_LOW: f64 = 36.0;

/// Temperature above this value (°C) is febrile.
pub const TEMPERATURE_HIGH: f64 = 37.5;

/// Oxygen saturation below this value (%) is flagged.
pub const SATURATION_LOW: u8 = 95;

// ============================================================================
// VITAL-SIGN SANITY BOUNDS (inclusive, enforced before storage)
// ============================================================================

pub const SYSTOLIC_RANGE: (u16, u16) = (50, 300);
pub const DIASTOLIC_RANGE: (u16, u16) = (30, 200);
pub const HEART_RATE_RANGE: (u16, u16) = (20, 250);
pub const RESPIRATORY_RATE_RANGE: (u16, u16) = (5, 60);
pub const TEMPERATURE_RANGE: (f64, f64) = (30.0, 45.0);
pub const SATURATION_RANGE: (u8, u8) = (50, 100);
pub const GLUCOSE_RANGE: (u16, u16) = (20, 800);

/// Allowed prescription item duration in days (inclusive).
pub const PRESCRIPTION_DURATION_DAYS: (u16, u16) = (1, 365);
