//! Outbound port to the external risk-scoring service.
//!
//! Callers never talk to a [`RiskEvaluator`] directly; they go through one of two wrappers:
//! [`RequiredRiskCheck`] for credit decisions, where a failure aborts the request, and
//! [`AdvisoryRiskCheck`] for affiliate registration, where a failure is only logged.

mod check;
mod client;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::domain::RiskEvaluation;

pub use check::{AdvisoryRiskCheck, RequiredRiskCheck, REGISTRATION_SCREENING_TERM_MONTHS};
pub use client::RiskCentralClient;

/// Contract of the external scoring service.
#[async_trait]
pub trait RiskEvaluator: Send + Sync {
    async fn evaluate_risk(
        &self,
        document: &str,
        amount: Decimal,
        term_months: u32,
    ) -> Result<RiskEvaluation, RiskCentralError>;
}

#[async_trait]
impl<T> RiskEvaluator for Arc<T>
where
    T: RiskEvaluator + ?Sized,
{
    async fn evaluate_risk(
        &self,
        document: &str,
        amount: Decimal,
        term_months: u32,
    ) -> Result<RiskEvaluation, RiskCentralError> {
        (**self).evaluate_risk(document, amount, term_months).await
    }
}

/// Failure talking to the risk service. All variants share one external-service code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RiskCentralError {
    #[error("risk central unreachable: {0}")]
    Transport(String),
    #[error("risk central did not answer within {0:?}")]
    Timeout(Duration),
    #[error("risk central answered with HTTP {0}")]
    UnexpectedStatus(u16),
    #[error("risk central returned an unusable payload: {0}")]
    MalformedPayload(String),
}

impl RiskCentralError {
    pub const fn code(&self) -> &'static str {
        "EXTERNAL_SERVICE_ERROR"
    }

    pub const fn is_timeout(&self) -> bool {
        matches!(self, RiskCentralError::Timeout(_))
    }
}
