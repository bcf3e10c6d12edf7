//! Which attendance actions an acting user may see.
//!
//! The acting practitioner is always passed in explicitly. A user without a practitioner
//! profile (`None`) is offered nothing.

use crate::practitioner::{Practitioner, Role};
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceActions {
    pub add_note: bool,
    pub record_vitals: bool,
    pub new_prescription: bool,
    pub new_exam_request: bool,
    pub update_status: bool,
}

impl AttendanceActions {
    pub fn for_practitioner(practitioner: Option<&Practitioner>) -> Self {
        practitioner.map_or_else(Self::default, |p| Self::for_role(p.role))
    }

    pub fn for_role(role: Role) -> Self {
        let physician = role == Role::Physician;
        Self {
            add_note: true,
            record_vitals: role.is_clinical(),
            new_prescription: physician,
            new_exam_request: physician,
            update_status: true,
        }
    }
}
