use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tracing::{error, info, warn};

use super::{RiskCentralError, RiskEvaluator};
use crate::workflows::credit::domain::RiskEvaluation;

/// Term sent with the screening call made when an affiliate registers.
pub const REGISTRATION_SCREENING_TERM_MONTHS: u32 = 12;

/// Risk call whose failure aborts the caller.
pub struct RequiredRiskCheck<E: ?Sized> {
    evaluator: Arc<E>,
    timeout: Duration,
}

impl<E> RequiredRiskCheck<E>
where
    E: RiskEvaluator + ?Sized,
{
    pub fn new(evaluator: Arc<E>, timeout: Duration) -> Self {
        Self { evaluator, timeout }
    }

    pub async fn evaluate(
        &self,
        document: &str,
        amount: Decimal,
        term_months: u32,
    ) -> Result<RiskEvaluation, RiskCentralError> {
        bounded(&*self.evaluator, self.timeout, document, amount, term_months)
            .await
            .map_err(|err| {
                error!(
                    document,
                    %amount,
                    term_months,
                    code = err.code(),
                    error = %err,
                    "risk evaluation failed"
                );
                err
            })
    }
}

/// Risk call whose failure is logged and swallowed.
pub struct AdvisoryRiskCheck<E: ?Sized> {
    evaluator: Arc<E>,
    timeout: Duration,
}

impl<E> AdvisoryRiskCheck<E>
where
    E: RiskEvaluator + ?Sized,
{
    pub fn new(evaluator: Arc<E>, timeout: Duration) -> Self {
        Self { evaluator, timeout }
    }

    /// Screen a newly registered affiliate using the salary as the reference amount.
    pub async fn screen(&self, document: &str, salary: Decimal) -> Option<RiskEvaluation> {
        match bounded(
            &*self.evaluator,
            self.timeout,
            document,
            salary,
            REGISTRATION_SCREENING_TERM_MONTHS,
        )
        .await
        {
            Ok(evaluation) => {
                info!(
                    document,
                    score = evaluation.score(),
                    risk_level = evaluation.risk_level(),
                    "affiliate screened by risk central"
                );
                Some(evaluation)
            }
            Err(err) => {
                warn!(
                    document,
                    error = %err,
                    "risk screening unavailable, continuing registration"
                );
                None
            }
        }
    }
}

async fn bounded<E>(
    evaluator: &E,
    limit: Duration,
    document: &str,
    amount: Decimal,
    term_months: u32,
) -> Result<RiskEvaluation, RiskCentralError>
where
    E: RiskEvaluator + ?Sized,
{
    match tokio::time::timeout(limit, evaluator.evaluate_risk(document, amount, term_months))
        .await
    {
        Ok(outcome) => outcome,
        Err(_) => Err(RiskCentralError::Timeout(limit)),
    }
}
