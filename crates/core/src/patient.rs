//! Patient registry records.
//!
//! A patient is keyed by a unique national id (CPF). Everything other than name, national id
//! and birth date is optional, mirroring the intake desk where only the basics are known at
//! first contact and the rest of the record is filled in later.
//!
//! Raw input arrives as [`PatientInput`] (plain strings, as typed at a desk or posted to the
//! API) and is validated into a [`PatientProfile`]. Blank optional strings are treated as
//! absent.

use crate::constants::ADDRESS_NOT_INFORMED;
use crate::error::RecordResult;
use crate::ids::PatientId;
use chrono::{DateTime, NaiveDate, Utc};
use pronto_types::{
    EmailAddress, HealthCardNumber, NationalId, NonEmptyText, PhoneNumber, PostalCode, StateCode,
    TextError,
};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodType {
    pub fn label(self) -> &'static str {
        match self {
            BloodType::APositive => "A+",
            BloodType::ANegative => "A-",
            BloodType::BPositive => "B+",
            BloodType::BNegative => "B-",
            BloodType::AbPositive => "AB+",
            BloodType::AbNegative => "AB-",
            BloodType::OPositive => "O+",
            BloodType::ONegative => "O-",
        }
    }
}

/// Unvalidated patient data as submitted by a caller.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PatientInput {
    pub name: String,
    pub national_id: String,
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub sex: Option<Sex>,
    #[serde(default)]
    pub mother_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub health_card: Option<String>,
    #[serde(default)]
    pub rg: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub blood_type: Option<BloodType>,
    #[serde(default)]
    pub allergies: Option<String>,
    #[serde(default)]
    pub clinical_notes: Option<String>,
}

/// Validated demographic and clinical data of a patient.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PatientProfile {
    pub name: NonEmptyText,
    pub national_id: NationalId,
    pub birth_date: NaiveDate,
    pub sex: Option<Sex>,
    pub mother_name: Option<NonEmptyText>,
    pub phone: Option<PhoneNumber>,
    pub email: Option<EmailAddress>,
    pub health_card: Option<HealthCardNumber>,
    pub rg: Option<NonEmptyText>,
    pub postal_code: Option<PostalCode>,
    pub street: Option<NonEmptyText>,
    pub number: Option<NonEmptyText>,
    pub district: Option<NonEmptyText>,
    pub city: Option<NonEmptyText>,
    pub state: Option<StateCode>,
    pub blood_type: Option<BloodType>,
    pub allergies: Option<NonEmptyText>,
    pub clinical_notes: Option<NonEmptyText>,
}

fn optional<T>(
    value: Option<String>,
    parse: impl FnOnce(&str) -> Result<T, TextError>,
) -> Result<Option<T>, TextError> {
    match value {
        Some(raw) if !raw.trim().is_empty() => parse(&raw).map(Some),
        _ => Ok(None),
    }
}

fn optional_text(value: Option<String>) -> Option<NonEmptyText> {
    value.and_then(|raw| NonEmptyText::new(raw).ok())
}

impl PatientInput {
    /// Validates and normalises every field.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::InvalidInput` when the birth date is missing and
    /// `RecordError::Text` when a field fails its format check.
    pub fn validate(self) -> RecordResult<PatientProfile> {
        let birth_date = self.birth_date.ok_or_else(|| {
            crate::RecordError::InvalidInput("birth_date is required".into())
        })?;

        Ok(PatientProfile {
            name: NonEmptyText::new(&self.name)?,
            national_id: NationalId::parse(&self.national_id)?,
            birth_date,
            sex: self.sex,
            mother_name: optional_text(self.mother_name),
            phone: optional(self.phone, |s| PhoneNumber::parse(s))?,
            email: optional(self.email, |s| EmailAddress::parse(s))?,
            health_card: optional(self.health_card, |s| HealthCardNumber::parse(s))?,
            rg: optional_text(self.rg),
            postal_code: optional(self.postal_code, |s| PostalCode::parse(s))?,
            street: optional_text(self.street),
            number: optional_text(self.number),
            district: optional_text(self.district),
            city: optional_text(self.city),
            state: optional(self.state, |s| StateCode::parse(s))?,
            blood_type: self.blood_type,
            allergies: optional_text(self.allergies),
            clinical_notes: optional_text(self.clinical_notes),
        })
    }
}

impl PatientProfile {
    /// Formats the address parts that are present, for example
    /// `"Rua A, nº 12, Centro, Belo Horizonte/MG"`.
    pub fn full_address(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(street) = &self.street {
            parts.push(street.to_string());
        }
        if let Some(number) = &self.number {
            parts.push(format!("nº {number}"));
        }
        if let Some(district) = &self.district {
            parts.push(district.to_string());
        }
        match (&self.city, &self.state) {
            (Some(city), Some(state)) => parts.push(format!("{city}/{state}")),
            (Some(city), None) => parts.push(city.to_string()),
            _ => {}
        }

        if parts.is_empty() {
            ADDRESS_NOT_INFORMED.to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// A registered patient.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Patient {
    pub id: PatientId,
    #[serde(flatten)]
    pub profile: PatientProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    pub fn name(&self) -> &str {
        self.profile.name.as_str()
    }

    pub fn national_id(&self) -> &NationalId {
        &self.profile.national_id
    }
}

impl std::fmt::Display for Patient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - national id: {}",
            self.profile.name, self.profile.national_id
        )
    }
}
