//! Error types for the tenant engine.
//!
//! Mutation operations report rejections through [`CampusError`]; nothing
//! here is fatal to the process.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::models::user::Role;

/// A single field-level input problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    /// Machine-readable reason, e.g. `INVALID_EMAIL`.
    pub code: &'static str,
    pub message: String,
}

/// Field errors collected while validating one input form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, code: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            code,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// First error recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }

    /// Whether `field` was rejected with `code`.
    pub fn has(&self, field: &str, code: &str) -> bool {
        self.0.iter().any(|e| e.field == field && e.code == code)
    }

    pub fn extend(&mut self, other: FieldErrors) {
        self.0.extend(other.0);
    }

    /// `Ok(())` when nothing was recorded, otherwise a validation error.
    pub fn into_result(self) -> CampusResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CampusError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", err.field, err.message)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum CampusError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Capacity exceeded: plan allows {limit} {role} users, tenant has {current}")]
    CapacityExceeded {
        role: Role,
        limit: u32,
        current: usize,
    },

    #[error("A destination department is required")]
    DepartmentRequired,

    #[error("No tenant is loaded")]
    NoTenantLoaded,

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl CampusError {
    /// Stable code the presentation layer switches on.
    pub fn code(&self) -> &'static str {
        match self {
            CampusError::Validation(_) => "VALIDATION_FAILED",
            CampusError::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            CampusError::DepartmentRequired => "DEPARTMENT_REQUIRED",
            CampusError::NoTenantLoaded => "NO_TENANT",
            CampusError::AuthenticationFailed { .. } => "AUTHENTICATION_FAILED",
            CampusError::Persistence(_) => "PERSISTENCE",
        }
    }

    /// Field errors carried by a validation failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            CampusError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

pub type CampusResult<T> = Result<T, CampusError>;
