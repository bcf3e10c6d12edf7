//! Record services.
//!
//! Each service is a cheap `Clone` handle over the shared record store (and configuration
//! where it needs it). Services validate input, check the acting practitioner's role and take
//! the store lock once per operation.

pub mod attendances;
pub mod clinical;
pub mod patients;
pub mod practitioners;
