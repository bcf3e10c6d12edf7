//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services as
//! `Arc<CoreConfig>`. Nothing in the core reads environment variables while handling a
//! request.

use crate::alerts::VitalThresholds;
use crate::constants::DEFAULT_SEARCH_LIMIT_MAX;
use crate::{RecordError, RecordResult};
use std::path::Path;

/// Core configuration resolved at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct CoreConfig {
    vital_thresholds: VitalThresholds,
    search_limit_max: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            vital_thresholds: VitalThresholds::default(),
            search_limit_max: DEFAULT_SEARCH_LIMIT_MAX,
        }
    }
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::InvalidInput` if `search_limit_max` is zero or the thresholds fail
    /// [`VitalThresholds::validate`].
    pub fn new(vital_thresholds: VitalThresholds, search_limit_max: usize) -> RecordResult<Self> {
        if search_limit_max == 0 {
            return Err(RecordError::InvalidInput(
                "search_limit_max must be at least 1".into(),
            ));
        }
        vital_thresholds.validate()?;

        Ok(Self {
            vital_thresholds,
            search_limit_max,
        })
    }

    pub fn vital_thresholds(&self) -> &VitalThresholds {
        &self.vital_thresholds
    }

    pub fn search_limit_max(&self) -> usize {
        self.search_limit_max
    }
}

/// Load alert thresholds from a YAML file.
///
/// Keys that are left out keep their clinical default; unknown keys are rejected.
///
/// # Errors
///
/// Returns `RecordError::ConfigRead` if the file cannot be read,
/// `RecordError::ConfigParse` (carrying the path of the offending key) if it does not match
/// the thresholds schema, and `RecordError::InvalidInput` if the values fail
/// [`VitalThresholds::validate`].
pub fn load_vital_thresholds(path: &Path) -> RecordResult<VitalThresholds> {
    let contents = std::fs::read_to_string(path).map_err(RecordError::ConfigRead)?;
    parse_vital_thresholds(&contents)
}

/// Parse alert thresholds from YAML text. See [`load_vital_thresholds`].
pub fn parse_vital_thresholds(yaml: &str) -> RecordResult<VitalThresholds> {
    let deserializer = serde_yaml::Deserializer::from_str(yaml);
    let thresholds: VitalThresholds =
        serde_path_to_error::deserialize(deserializer).map_err(|err| RecordError::ConfigParse {
            path: err.path().to_string(),
            message: err.inner().to_string(),
        })?;
    thresholds.validate()?;
    Ok(thresholds)
}

/// Parse the search limit cap from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default cap.
pub fn search_limit_from_env_value(value: Option<String>) -> RecordResult<usize> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        None => Ok(DEFAULT_SEARCH_LIMIT_MAX),
        Some(v) => v.parse::<usize>().map_err(|_| {
            RecordError::InvalidInput(format!("search limit must be a positive integer: {v}"))
        }),
    }
}
