mod affiliate;
mod application;
mod risk;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use affiliate::{Affiliate, AffiliateStatus};
pub use application::{CreditApplication, CreditApplicationStatus};
pub use risk::RiskEvaluation;

/// Identity assigned to an affiliate when it is first persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AffiliateId(pub u64);

impl fmt::Display for AffiliateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity assigned to a credit application when it is first persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreditApplicationId(pub u64);

impl fmt::Display for CreditApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Invariant violations raised by entity constructors and transition methods.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("invalid {field}: {reason}")]
    Validation {
        field: &'static str,
        reason: &'static str,
    },
    #[error("{entity} cannot {attempted} while {current}")]
    IllegalTransition {
        entity: &'static str,
        current: &'static str,
        attempted: &'static str,
    },
}

impl DomainError {
    pub(crate) fn validation(field: &'static str, reason: &'static str) -> Self {
        DomainError::Validation { field, reason }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => "VALIDATION_ERROR",
            DomainError::IllegalTransition { .. } => "INVALID_STATE",
        }
    }
}

pub(crate) fn require_text(
    value: &str,
    field: &'static str,
    reason: &'static str,
) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(field, reason));
    }
    Ok(())
}
