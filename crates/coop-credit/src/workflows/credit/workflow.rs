use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};

use super::domain::{
    AffiliateId, AffiliateStatus, CreditApplication, CreditApplicationId, DomainError,
};
use super::evaluation::ApprovalPolicy;
use super::repository::{AffiliateReader, CreditApplicationWriter, RepositoryError};
use super::risk::{RequiredRiskCheck, RiskCentralError, RiskEvaluator};

/// Request to open a credit application for an affiliate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditRequest {
    pub affiliate_id: AffiliateId,
    pub amount: Decimal,
    #[serde(alias = "term")]
    pub term_months: u32,
}

/// Stages a submission moves through. `Failed` absorbs every error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStage {
    ValidatingAffiliate,
    EvaluatingRisk,
    Deciding,
    Persisting,
    Done,
    Failed,
}

/// Runs a credit request from affiliate lookup to a persisted, decided application.
///
/// A pending application only ever exists in memory here: the single write happens after
/// the decision, and any failure before it leaves storage untouched.
pub struct CreditApplicationWorkflow<A: ?Sized, W: ?Sized, E: ?Sized> {
    affiliates: Arc<A>,
    applications: Arc<W>,
    risk: RequiredRiskCheck<E>,
    policy: ApprovalPolicy,
}

impl<A, W, E> CreditApplicationWorkflow<A, W, E>
where
    A: AffiliateReader + ?Sized,
    W: CreditApplicationWriter + ?Sized,
    E: RiskEvaluator + ?Sized,
{
    pub fn new(affiliates: Arc<A>, applications: Arc<W>, risk: RequiredRiskCheck<E>) -> Self {
        Self {
            affiliates,
            applications,
            risk,
            policy: ApprovalPolicy::new(),
        }
    }

    pub async fn submit(
        &self,
        request: CreditRequest,
    ) -> Result<CreditApplication, CreditApplicationError> {
        let mut progress = Progress::start(request.affiliate_id);
        match self.run(&mut progress, request).await {
            Ok(application) => {
                progress.advance(WorkflowStage::Done);
                Ok(application)
            }
            Err(err) => Err(progress.fail(err)),
        }
    }

    async fn run(
        &self,
        progress: &mut Progress,
        request: CreditRequest,
    ) -> Result<CreditApplication, CreditApplicationError> {
        let CreditRequest {
            affiliate_id,
            amount,
            term_months,
        } = request;

        let affiliate = self
            .affiliates
            .find_by_id(affiliate_id)?
            .filter(|affiliate| affiliate.status() == AffiliateStatus::Active)
            .ok_or(CreditApplicationError::AffiliateNotFound(affiliate_id))?;
        let mut draft = CreditApplication::create(affiliate_id, amount, term_months)?;

        progress.advance(WorkflowStage::EvaluatingRisk);
        let evaluation = self
            .risk
            .evaluate(affiliate.document(), amount, term_months)
            .await?;

        progress.advance(WorkflowStage::Deciding);
        let decision = self.policy.evaluate(amount, evaluation.risk_level());
        draft.update_risk_evaluation(evaluation.score(), evaluation.risk_level())?;
        if decision.is_approved() {
            draft.approve()?;
        } else {
            draft.reject()?;
        }
        info!(
            affiliate_id = %affiliate_id,
            %amount,
            term_months,
            score = evaluation.score(),
            risk_level = evaluation.risk_level(),
            decision = %decision.summary(),
            "credit application decided"
        );

        progress.advance(WorkflowStage::Persisting);
        let stored = self.applications.save(draft)?;
        Ok(stored)
    }
}

struct Progress {
    affiliate_id: AffiliateId,
    stage: WorkflowStage,
}

impl Progress {
    fn start(affiliate_id: AffiliateId) -> Self {
        debug!(affiliate_id = %affiliate_id, "credit workflow started");
        Self {
            affiliate_id,
            stage: WorkflowStage::ValidatingAffiliate,
        }
    }

    fn advance(&mut self, next: WorkflowStage) {
        debug!(
            affiliate_id = %self.affiliate_id,
            from = ?self.stage,
            to = ?next,
            "credit workflow transition"
        );
        self.stage = next;
    }

    fn fail(&mut self, err: CreditApplicationError) -> CreditApplicationError {
        debug!(
            affiliate_id = %self.affiliate_id,
            stage = ?self.stage,
            code = err.code(),
            "credit workflow aborted"
        );
        self.stage = WorkflowStage::Failed;
        err
    }
}

/// Error raised while submitting or reading credit applications.
#[derive(Debug, thiserror::Error)]
pub enum CreditApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("affiliate {0} not found or not active")]
    AffiliateNotFound(AffiliateId),
    #[error("no affiliate registered with document '{0}'")]
    UnknownDocument(String),
    #[error("credit application {0} not found")]
    NotFound(CreditApplicationId),
    #[error(transparent)]
    RiskCentral(#[from] RiskCentralError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl CreditApplicationError {
    pub fn code(&self) -> &'static str {
        match self {
            CreditApplicationError::Domain(err) => err.code(),
            CreditApplicationError::AffiliateNotFound(_)
            | CreditApplicationError::UnknownDocument(_) => "AFFILIATE_NOT_FOUND",
            CreditApplicationError::NotFound(_) => "CREDIT_APPLICATION_NOT_FOUND",
            CreditApplicationError::RiskCentral(err) => err.code(),
            CreditApplicationError::Repository(_) => "REPOSITORY_ERROR",
        }
    }
}
