//! Practitioner directory records.
//!
//! A practitioner profile links an authenticated account to a professional role. Actions on an
//! attendance are gated on the role, so the profile is resolved once per request and passed
//! explicitly to every operation as `Option<&Practitioner>`.

use crate::ids::PractitionerId;
use chrono::{DateTime, Utc};
use pronto_types::NonEmptyText;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Physician,
    Nurse,
    Administrative,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Physician => "physician",
            Role::Nurse => "nurse",
            Role::Administrative => "administrative",
        }
    }

    /// Physicians and nurses may record measurements on a patient.
    pub fn is_clinical(self) -> bool {
        matches!(self, Role::Physician | Role::Nurse)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Data needed to register a practitioner.
#[derive(Clone, Debug, Deserialize)]
pub struct PractitionerInput {
    pub account: String,
    #[serde(default)]
    pub full_name: String,
    pub role: Role,
    #[serde(default)]
    pub registration: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Practitioner {
    pub id: PractitionerId,
    pub account: NonEmptyText,
    /// May be empty, in which case the account name is displayed instead.
    pub full_name: String,
    pub role: Role,
    pub registration: Option<NonEmptyText>,
    pub created_at: DateTime<Utc>,
}

impl Practitioner {
    pub fn display_name(&self) -> &str {
        let full_name = self.full_name.trim();
        if full_name.is_empty() {
            self.account.as_str()
        } else {
            full_name
        }
    }
}

impl fmt::Display for Practitioner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.display_name(), self.role)
    }
}
