//! Typed record identifiers.
//!
//! Each entity kind has its own numeric sequence, assigned by the record store in insertion
//! order starting at 1. Keeping the kinds as distinct types stops an attendance id from being
//! passed where an exam request id is expected.

use std::fmt;

macro_rules! record_id {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(
                Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
                serde::Serialize, serde::Deserialize,
            )]
            #[serde(transparent)]
            pub struct $name(u64);

            impl $name {
                pub const fn new(value: u64) -> Self {
                    Self(value)
                }

                pub const fn get(self) -> u64 {
                    self.0
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl From<u64> for $name {
                fn from(value: u64) -> Self {
                    Self(value)
                }
            }
        )*
    };
}

record_id! {
    /// Identifier of a registered patient.
    PatientId,
    /// Identifier of a practitioner profile.
    PractitionerId,
    /// Identifier of one emergency-department visit.
    AttendanceId,
    NoteId,
    VitalSignsId,
    PrescriptionId,
    PrescriptionItemId,
    ExamRequestId,
    ExamResultId,
}
