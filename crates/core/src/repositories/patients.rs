//! Patient registry service.
//!
//! Registration, lookup, update, deletion and search over the patient table. The national id is
//! the natural key: it is normalised to digits on the way in and must be unique.

use crate::config::CoreConfig;
use crate::ids::PatientId;
use crate::patient::{Patient, PatientInput};
use crate::record::PatientRecord;
use crate::store::RecordStore;
use crate::{RecordError, RecordResult};
use chrono::{NaiveDate, Utc};
use pronto_types::{digits_only, NationalId};
use serde::Deserialize;
use std::sync::Arc;

/// Registry search filters. Every filter that is set must match.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PatientQuery {
    /// Partial national id; only its digits are compared.
    #[serde(default)]
    pub national_id: Option<String>,
    /// Case-insensitive substring of the name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    /// Maximum number of results, capped by configuration.
    #[serde(default)]
    pub limit: Option<usize>,
}

impl PatientQuery {
    fn matches(&self, patient: &Patient) -> bool {
        let national_id_ok = match self.national_id.as_deref().map(digits_only) {
            Some(digits) if !digits.is_empty() => {
                patient.profile.national_id.as_str().contains(&digits)
            }
            _ => true,
        };
        let name_ok = match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => patient.profile.name.contains_ignore_case(name),
            _ => true,
        };
        let birth_ok = self
            .birth_date
            .is_none_or(|date| patient.profile.birth_date == date);

        national_id_ok && name_ok && birth_ok
    }
}

#[derive(Clone, Debug)]
pub struct PatientService {
    cfg: Arc<CoreConfig>,
    store: Arc<RecordStore>,
}

impl PatientService {
    pub fn new(cfg: Arc<CoreConfig>, store: Arc<RecordStore>) -> Self {
        Self { cfg, store }
    }

    /// Registers a new patient.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed input and
    /// `RecordError::DuplicateNationalId` if the national id is already registered.
    pub fn register(&self, input: PatientInput) -> RecordResult<Patient> {
        let profile = input.validate()?;
        let mut tables = self.store.write()?;

        if tables
            .find_patient_by_national_id(profile.national_id.as_str())
            .is_some()
        {
            return Err(RecordError::DuplicateNationalId(
                profile.national_id.to_string(),
            ));
        }

        let now = Utc::now();
        let patient = Patient {
            id: tables.seq.patient.next(),
            profile,
            created_at: now,
            updated_at: now,
        };
        tables.patients.insert(patient.id, patient.clone());

        tracing::info!(patient = %patient.id, "registered patient");
        Ok(patient)
    }

    pub fn get(&self, id: PatientId) -> RecordResult<Patient> {
        self.store.read()?.patient(id).cloned()
    }

    /// Looks a patient up by national id, formatted or not.
    pub fn get_by_national_id(&self, national_id: &str) -> RecordResult<Patient> {
        let national_id = NationalId::parse(national_id)?;
        self.store
            .read()?
            .find_patient_by_national_id(national_id.as_str())
            .cloned()
            .ok_or_else(|| RecordError::NationalIdNotFound(national_id.to_string()))
    }

    /// Replaces the patient's data. `created_at` is kept and `updated_at` refreshed.
    ///
    /// # Errors
    ///
    /// `RecordError::PatientNotFound`, a validation error, or
    /// `RecordError::DuplicateNationalId` if the new national id belongs to another patient.
    pub fn update(&self, id: PatientId, input: PatientInput) -> RecordResult<Patient> {
        let profile = input.validate()?;
        let mut tables = self.store.write()?;

        if let Some(other) = tables.find_patient_by_national_id(profile.national_id.as_str()) {
            if other.id != id {
                return Err(RecordError::DuplicateNationalId(
                    profile.national_id.to_string(),
                ));
            }
        }

        let patient = tables
            .patients
            .get_mut(&id)
            .ok_or(RecordError::PatientNotFound(id))?;
        patient.profile = profile;
        patient.updated_at = Utc::now();

        tracing::info!(patient = %id, "updated patient");
        Ok(patient.clone())
    }

    /// Deletes a patient with no attendances.
    ///
    /// # Errors
    ///
    /// `RecordError::ProtectedDelete` while any attendance references the patient.
    pub fn delete(&self, id: PatientId) -> RecordResult<()> {
        let mut tables = self.store.write()?;
        tables.patient(id)?;

        let dependants = tables
            .attendances
            .values()
            .filter(|a| a.patient == id)
            .count();
        if dependants > 0 {
            return Err(RecordError::ProtectedDelete {
                entity: "patient",
                id: id.get(),
                dependants,
            });
        }

        tables.patients.remove(&id);
        tracing::info!(patient = %id, "deleted patient");
        Ok(())
    }

    /// Builds the patient record read model, with attendance history when requested.
    pub fn record(&self, id: PatientId, include_history: bool) -> RecordResult<PatientRecord> {
        let tables = self.store.read()?;
        PatientRecord::build(&tables, id, include_history)
    }

    /// Searches the registry, ordered by name.
    ///
    /// The result count is `query.limit` when given, never more than the configured maximum.
    pub fn search(&self, query: &PatientQuery) -> RecordResult<Vec<Patient>> {
        let cap = self.cfg.search_limit_max();
        let limit = query.limit.map_or(cap, |l| l.min(cap));

        let tables = self.store.read()?;
        let mut found: Vec<Patient> = tables
            .patients
            .values()
            .filter(|p| query.matches(p))
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            a.name()
                .to_lowercase()
                .cmp(&b.name().to_lowercase())
                .then(a.id.cmp(&b.id))
        });
        found.truncate(limit);

        Ok(found)
    }
}
