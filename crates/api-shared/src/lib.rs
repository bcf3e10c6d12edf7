//! # API Shared
//!
//! Shared definitions for the Pronto HTTP API.
//!
//! Contains:
//! - Request and response bodies (`dto` module) with their OpenAPI schemas
//! - Shared services like `HealthService`
//! - Authentication helpers for the API key and the acting practitioner header
//!
//! Used by `api-rest`; holds nothing that depends on the HTTP framework.

pub mod auth;
pub mod dto;
pub mod health;

pub use health::HealthService;
