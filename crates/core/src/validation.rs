//! Input validation for clinical records.
//!
//! These checks run before anything is written to the store. Values outside the sanity bounds
//! are treated as typing errors and rejected, which is separate from alert evaluation: a
//! systolic pressure of 180 is stored and flagged, one of 1800 is refused.

use crate::clinical::{PrescriptionItemInput, VitalSigns};
use crate::constants::{
    DIASTOLIC_RANGE, GLUCOSE_RANGE, HEART_RATE_RANGE, PRESCRIPTION_DURATION_DAYS,
    RESPIRATORY_RATE_RANGE, SATURATION_RANGE, SYSTOLIC_RANGE, TEMPERATURE_RANGE,
};
use crate::practitioner::{Practitioner, Role};
use crate::{RecordError, RecordResult};
use chrono::NaiveDate;
use std::fmt::Display;

fn check_range<T>(field: &str, value: Option<T>, (min, max): (T, T)) -> RecordResult<()>
where
    T: PartialOrd + Display + Copy,
{
    match value {
        Some(v) if v < min || v > max => Err(RecordError::InvalidInput(format!(
            "{field} must be between {min} and {max}, got {v}"
        ))),
        _ => Ok(()),
    }
}

/// Validates a set of vital-sign measurements.
///
/// # Errors
///
/// Returns `RecordError::InvalidInput` if nothing was measured, if only one of the two blood
/// pressure values is present, or if any value is outside its sanity range.
pub fn validate_vital_signs(vitals: &VitalSigns) -> RecordResult<()> {
    if vitals.is_empty() {
        return Err(RecordError::InvalidInput(
            "at least one measurement is required".into(),
        ));
    }
    if vitals.systolic.is_some() != vitals.diastolic.is_some() {
        return Err(RecordError::InvalidInput(
            "systolic and diastolic pressure must be given together".into(),
        ));
    }

    check_range("systolic", vitals.systolic, SYSTOLIC_RANGE)?;
    check_range("diastolic", vitals.diastolic, DIASTOLIC_RANGE)?;
    check_range("heart_rate", vitals.heart_rate, HEART_RATE_RANGE)?;
    check_range("respiratory_rate", vitals.respiratory_rate, RESPIRATORY_RATE_RANGE)?;
    if vitals.temperature.is_some_and(|t| !t.is_finite()) {
        return Err(RecordError::InvalidInput(
            "temperature must be a finite number".into(),
        ));
    }
    check_range("temperature", vitals.temperature, TEMPERATURE_RANGE)?;
    check_range("saturation", vitals.saturation, SATURATION_RANGE)?;
    check_range("glucose", vitals.glucose, GLUCOSE_RANGE)?;

    Ok(())
}

/// Validates the header fields of a new prescription.
///
/// # Errors
///
/// Returns `RecordError::InvalidInput` if the validity date is before `today` or there are no
/// items.
pub fn validate_prescription_header(
    valid_until: NaiveDate,
    item_count: usize,
    today: NaiveDate,
) -> RecordResult<()> {
    if valid_until < today {
        return Err(RecordError::InvalidInput(format!(
            "prescription validity date {valid_until} is in the past"
        )));
    }
    if item_count == 0 {
        return Err(RecordError::InvalidInput(
            "a prescription needs at least one item".into(),
        ));
    }
    Ok(())
}

/// Validates the duration of a prescription item. Text fields are checked when converted to
/// `NonEmptyText`.
pub fn validate_prescription_item(item: &PrescriptionItemInput) -> RecordResult<()> {
    check_range(
        "duration_days",
        Some(item.duration_days),
        PRESCRIPTION_DURATION_DAYS,
    )
}

/// Returns the acting practitioner, or an error when the user has no profile.
pub fn require_profile(acting: Option<&Practitioner>) -> RecordResult<&Practitioner> {
    acting.ok_or(RecordError::MissingPractitionerProfile)
}

/// Returns the acting practitioner if their role is one of `allowed`.
///
/// # Errors
///
/// `RecordError::MissingPractitionerProfile` without a profile and
/// `RecordError::RoleNotPermitted` for any other role.
pub fn require_role<'a>(
    acting: Option<&'a Practitioner>,
    allowed: &[Role],
    action: &'static str,
) -> RecordResult<&'a Practitioner> {
    let practitioner = require_profile(acting)?;
    if allowed.contains(&practitioner.role) {
        Ok(practitioner)
    } else {
        Err(RecordError::RoleNotPermitted {
            role: practitioner.role.label(),
            action,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clinical::Route;
    use crate::practitioner::fixtures::practitioner;

    #[test]
    fn vitals_require_a_measurement() {
        let err = validate_vital_signs(&VitalSigns::default()).expect_err("empty");
        assert!(matches!(err, RecordError::InvalidInput(_)));
    }

    #[test]
    fn vitals_require_both_pressures() {
        let vitals = VitalSigns {
            systolic: Some(120),
            ..Default::default()
        };
        assert!(validate_vital_signs(&vitals).is_err());
    }

    #[test]
    fn vitals_bounds_are_inclusive() {
        let vitals = VitalSigns {
            systolic: Some(300),
            diastolic: Some(30),
            heart_rate: Some(20),
            respiratory_rate: Some(60),
            temperature: Some(45.0),
            saturation: Some(100),
            glucose: Some(20),
        };
        assert!(validate_vital_signs(&vitals).is_ok());
    }

    #[test]
    fn vitals_out_of_bounds() {
        let cases = [
            VitalSigns {
                heart_rate: Some(251),
                ..Default::default()
            },
            VitalSigns {
                temperature: Some(29.9),
                ..Default::default()
            },
            VitalSigns {
                saturation: Some(49),
                ..Default::default()
            },
            VitalSigns {
                glucose: Some(801),
                ..Default::default()
            },
            VitalSigns {
                temperature: Some(f64::NAN),
                ..Default::default()
            },
        ];
        for vitals in cases {
            assert!(validate_vital_signs(&vitals).is_err(), "{vitals:?}");
        }
    }

    #[test]
    fn prescription_header_rules() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2024, 5, 9).unwrap();
        assert!(validate_prescription_header(today, 1, today).is_ok());
        assert!(validate_prescription_header(yesterday, 1, today).is_err());
        assert!(validate_prescription_header(today, 0, today).is_err());
    }

    #[test]
    fn prescription_item_duration() {
        let mut item = PrescriptionItemInput {
            medication: "Amoxicillin".into(),
            dose: "500 mg".into(),
            route: Route::Oral,
            frequency: "every 8 h".into(),
            duration_days: 7,
            notes: None,
        };
        assert!(validate_prescription_item(&item).is_ok());
        item.duration_days = 0;
        assert!(validate_prescription_item(&item).is_err());
        item.duration_days = 366;
        assert!(validate_prescription_item(&item).is_err());
    }

    #[test]
    fn role_gate() {
        let nurse = practitioner(1, Role::Nurse);
        assert!(require_role(Some(&nurse), &[Role::Physician, Role::Nurse], "x").is_ok());

        let err = require_role(Some(&nurse), &[Role::Physician], "prescribe").unwrap_err();
        assert!(matches!(
            err,
            RecordError::RoleNotPermitted {
                role: "nurse",
                action: "prescribe"
            }
        ));

        let err = require_role(None, &[Role::Physician], "prescribe").unwrap_err();
        assert!(matches!(err, RecordError::MissingPractitionerProfile));
    }
}
