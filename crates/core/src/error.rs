use crate::ids::{AttendanceId, ExamRequestId, PatientId, PractitionerId, PrescriptionId};

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid text: {0}")]
    Text(#[from] pronto_types::TextError),

    #[error("patient {0} not found")]
    PatientNotFound(PatientId),
    #[error("no patient with national id {0}")]
    NationalIdNotFound(String),
    #[error("practitioner {0} not found")]
    PractitionerNotFound(PractitionerId),
    #[error("attendance {0} not found")]
    AttendanceNotFound(AttendanceId),
    #[error("prescription {0} not found")]
    PrescriptionNotFound(PrescriptionId),
    #[error("exam request {0} not found")]
    ExamRequestNotFound(ExamRequestId),

    #[error("a patient with national id {0} already exists")]
    DuplicateNationalId(String),
    #[error("a practitioner with account {0} already exists")]
    DuplicateAccount(String),

    #[error("acting user has no practitioner profile")]
    MissingPractitionerProfile,
    #[error("{role} is not permitted to {action}")]
    RoleNotPermitted {
        role: &'static str,
        action: &'static str,
    },

    #[error("cannot delete {entity} {id}: {dependants} dependent record(s) exist")]
    ProtectedDelete {
        entity: &'static str,
        id: u64,
        dependants: usize,
    },

    #[error("exam request {0} already has a result")]
    ExamAlreadyResulted(ExamRequestId),
    #[error("exam request {0} is cancelled")]
    ExamCancelled(ExamRequestId),
    #[error("exam request {id} cannot be marked collected from status {status}")]
    ExamNotCollectable {
        id: ExamRequestId,
        status: &'static str,
    },

    #[error("record store lock poisoned")]
    StorePoisoned,

    #[error("failed to read config file: {0}")]
    ConfigRead(std::io::Error),
    #[error("config schema mismatch at {path}: {message}")]
    ConfigParse { path: String, message: String },
}

pub type RecordResult<T> = std::result::Result<T, RecordError>;
