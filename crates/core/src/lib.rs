//! # Pronto Core
//!
//! Core business logic for the emergency-department record tracker.
//!
//! This crate contains the domain records and the operations over them:
//! - Patient registry, practitioner directory and the attendance (visit) lifecycle
//! - Clinical records per attendance: notes, vital signs, prescriptions, exam requests
//! - The timeline aggregator and the vital-sign alert evaluator
//! - Role-based action visibility and the patient record read model
//!
//! **No API concerns**: authentication, HTTP servers and request parsing belong in
//! `api-rest` or `api-shared`.

pub mod actions;
pub mod alerts;
pub mod attendance;
pub mod clinical;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod patient;
pub mod practitioner;
pub mod record;
pub mod repositories;
pub mod store;
pub mod timeline;
pub mod validation;

pub use actions::AttendanceActions;
pub use alerts::{evaluate_vitals, evaluate_vitals_with, VitalAlert, VitalThresholds};
pub use attendance::{Attendance, AttendanceStatus};
pub use config::CoreConfig;
pub use error::{RecordError, RecordResult};
pub use ids::*;
pub use patient::{Patient, PatientInput};
pub use practitioner::{Practitioner, PractitionerInput, Role};
pub use record::PatientRecord;
pub use repositories::attendances::AttendanceService;
pub use repositories::clinical::ClinicalService;
pub use repositories::patients::{PatientQuery, PatientService};
pub use repositories::practitioners::PractitionerService;
pub use store::RecordStore;
pub use timeline::{build_timeline, AttendanceTimeline, TimelineEntry, TimelineEvent, TimelineKind};

use std::sync::Arc;

/// Every record service, sharing one configuration and one store.
#[derive(Clone, Debug)]
pub struct RecordServices {
    pub patients: PatientService,
    pub practitioners: PractitionerService,
    pub attendances: AttendanceService,
    pub clinical: ClinicalService,
}

impl RecordServices {
    /// Builds the services over a fresh, empty record store.
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self::with_store(cfg, Arc::new(RecordStore::new()))
    }

    pub fn with_store(cfg: Arc<CoreConfig>, store: Arc<RecordStore>) -> Self {
        Self {
            patients: PatientService::new(cfg.clone(), store.clone()),
            practitioners: PractitionerService::new(store.clone()),
            attendances: AttendanceService::new(store.clone()),
            clinical: ClinicalService::new(cfg, store),
        }
    }
}
