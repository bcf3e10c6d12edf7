//! Practitioner directory service.

use crate::ids::PractitionerId;
use crate::practitioner::{Practitioner, PractitionerInput};
use crate::store::RecordStore;
use crate::{RecordError, RecordResult};
use chrono::Utc;
use pronto_types::NonEmptyText;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct PractitionerService {
    store: Arc<RecordStore>,
}

impl PractitionerService {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    /// Registers a practitioner profile for an account.
    ///
    /// # Errors
    ///
    /// `RecordError::Text` for a blank account and `RecordError::DuplicateAccount` when the
    /// account already has a profile.
    pub fn register(&self, input: PractitionerInput) -> RecordResult<Practitioner> {
        let account = NonEmptyText::new(&input.account)?;
        let registration = input
            .registration
            .and_then(|r| NonEmptyText::new(r).ok());

        let mut tables = self.store.write()?;
        if tables
            .practitioners
            .values()
            .any(|p| p.account == account)
        {
            return Err(RecordError::DuplicateAccount(account.to_string()));
        }

        let practitioner = Practitioner {
            id: tables.seq.practitioner.next(),
            account,
            full_name: input.full_name.trim().to_string(),
            role: input.role,
            registration,
            created_at: Utc::now(),
        };
        tables
            .practitioners
            .insert(practitioner.id, practitioner.clone());

        tracing::info!(
            practitioner = %practitioner.id,
            role = practitioner.role.label(),
            "registered practitioner"
        );
        Ok(practitioner)
    }

    pub fn get(&self, id: PractitionerId) -> RecordResult<Practitioner> {
        self.store.read()?.practitioner(id).cloned()
    }

    /// Resolves the profile of an authenticated account, if it has one.
    pub fn get_by_account(&self, account: &str) -> RecordResult<Option<Practitioner>> {
        let account = account.trim();
        Ok(self
            .store
            .read()?
            .practitioners
            .values()
            .find(|p| p.account.as_str() == account)
            .cloned())
    }

    pub fn list(&self) -> RecordResult<Vec<Practitioner>> {
        Ok(self.store.read()?.practitioners.values().cloned().collect())
    }

    /// Deletes a practitioner no record refers to.
    ///
    /// # Errors
    ///
    /// `RecordError::ProtectedDelete` while an attendance or clinical record references them.
    pub fn delete(&self, id: PractitionerId) -> RecordResult<()> {
        let mut tables = self.store.write()?;
        tables.practitioner(id)?;

        let dependants = tables.practitioner_reference_count(id);
        if dependants > 0 {
            return Err(RecordError::ProtectedDelete {
                entity: "practitioner",
                id: id.get(),
                dependants,
            });
        }

        tables.practitioners.remove(&id);
        tracing::info!(practitioner = %id, "deleted practitioner");
        Ok(())
    }
}
