//! Core use-case services.
//!
//! # Responsibility
//! - Bind every collection and value slot on one explicit `Store`.
//! - Orchestrate record mutations into use-case level APIs.
//! - Move whole-workspace snapshots in and out.
//!
//! # Invariants
//! - Services never bypass `Collection`/`Persisted` write-through.
//! - Missing record ids are reported as `false`/`None`, never as errors.

use thiserror::Error;

pub mod content_service;
pub mod finance_service;
pub mod planning_service;
pub mod snapshot;
pub mod workspace;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Input rejected before any mutation happened.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("`{0}` must not be empty")]
    EmptyField(&'static str),
    #[error("`{0}` must be a positive amount")]
    NonPositiveAmount(&'static str),
}

pub(crate) fn require_text(field: &'static str, value: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::EmptyField(field));
    }
    Ok(())
}

pub(crate) fn require_positive(field: &'static str, value: f64) -> ServiceResult<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(ServiceError::NonPositiveAmount(field));
    }
    Ok(())
}
