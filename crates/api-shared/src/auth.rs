//! Request authentication shared by the HTTP surfaces.
//!
//! Every protected request carries the deployment API key in `x-api-key`. The acting
//! practitioner, when there is one, is named by id in `x-practitioner-id`; resolving that id to
//! a profile happens once at the boundary and the result is passed down explicitly.

use pronto_core::PractitionerId;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const PRACTITIONER_HEADER: &str = "x-practitioner-id";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("missing API key")]
    MissingApiKey,
    #[error("invalid API key")]
    InvalidApiKey,
    #[error("invalid practitioner id header: {0}")]
    InvalidPractitionerId(String),
    #[error("practitioner {0} is not registered")]
    UnknownPractitioner(PractitionerId),
}

/// Validates the provided API key against the key resolved at startup.
///
/// Returns `Ok(())` if the key matches, or an error if it is invalid or missing.
pub fn validate_api_key(provided_key: Option<&str>, expected_key: &str) -> Result<(), AuthError> {
    let provided_key = provided_key.ok_or(AuthError::MissingApiKey)?;

    if provided_key == expected_key {
        Ok(())
    } else {
        Err(AuthError::InvalidApiKey)
    }
}

/// Parses the acting practitioner header. An absent or blank header means no profile.
pub fn parse_practitioner_id(value: Option<&str>) -> Result<Option<PractitionerId>, AuthError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<u64>()
            .map(|id| Some(PractitionerId::new(id)))
            .map_err(|_| AuthError::InvalidPractitionerId(raw.to_string())),
    }
}
