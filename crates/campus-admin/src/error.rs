//! Integrity-rule rejection types.

use campus_core::error::{CampusError, FieldErrors};
use campus_core::models::user::Role;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleViolation {
    #[error("plan allows {limit} {role} users, tenant has {current}")]
    CapacityExceeded {
        role: Role,
        limit: u32,
        current: usize,
    },

    #[error("card number is not valid")]
    InvalidCardNumber,

    #[error("card type is not supported")]
    UnsupportedCardType,

    #[error("expiry month must be between 1 and 12")]
    InvalidExpiryMonth,

    #[error("card has expired")]
    CardExpired,

    #[error("security code must be {expected} digits")]
    InvalidCvv { expected: usize },
}

impl RuleViolation {
    pub fn code(&self) -> &'static str {
        match self {
            RuleViolation::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            RuleViolation::InvalidCardNumber => "INVALID_CARD_NUMBER",
            RuleViolation::UnsupportedCardType => "UNSUPPORTED_CARD_TYPE",
            RuleViolation::InvalidExpiryMonth => "INVALID_EXPIRY_MONTH",
            RuleViolation::CardExpired => "CARD_EXPIRED",
            RuleViolation::InvalidCvv { .. } => "INVALID_CVV",
        }
    }

    /// Form field the violation belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            RuleViolation::CapacityExceeded { .. } => "role",
            RuleViolation::InvalidCardNumber | RuleViolation::UnsupportedCardType => {
                "card_number"
            }
            RuleViolation::InvalidExpiryMonth => "expiry_month",
            RuleViolation::CardExpired => "expiry",
            RuleViolation::InvalidCvv { .. } => "cvv",
        }
    }
}

/// Fold card-style violations into per-field errors.
pub fn to_field_errors(violations: &[RuleViolation]) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for v in violations {
        errors.push(v.field(), v.code(), v.to_string());
    }
    errors
}

impl From<RuleViolation> for CampusError {
    fn from(v: RuleViolation) -> Self {
        match v {
            RuleViolation::CapacityExceeded {
                role,
                limit,
                current,
            } => CampusError::CapacityExceeded {
                role,
                limit,
                current,
            },
            other => CampusError::Validation(to_field_errors(&[other])),
        }
    }
}
