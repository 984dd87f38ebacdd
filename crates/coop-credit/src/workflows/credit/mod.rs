//! Affiliate registration and credit application decisions.
//!
//! A credit request is checked against the affiliate's status, scored by the external risk
//! central, decided by [`ApprovalPolicy`], and stored once already decided. Storage and the
//! risk service sit behind traits so the workflow runs unchanged against in-memory doubles.

pub mod domain;
pub mod evaluation;
pub mod repository;
pub mod risk;
pub mod router;
pub mod service;
pub mod views;
pub mod workflow;

#[cfg(test)]
mod tests;

pub use domain::{
    Affiliate, AffiliateId, AffiliateStatus, CreditApplication, CreditApplicationId,
    CreditApplicationStatus, DomainError, RiskEvaluation,
};
pub use evaluation::{
    ApprovalPolicy, CreditDecision, RejectionReason, RiskTier, MEDIUM_RISK_AMOUNT_CEILING,
};
pub use repository::{
    AffiliateReader, AffiliateStore, CreditApplicationStore, CreditApplicationWriter,
    RepositoryError,
};
pub use risk::{
    AdvisoryRiskCheck, RequiredRiskCheck, RiskCentralClient, RiskCentralError, RiskEvaluator,
    REGISTRATION_SCREENING_TERM_MONTHS,
};
pub use router::{credit_router, CreditApi};
pub use service::{
    AffiliateRegistration, AffiliateService, AffiliateServiceError, CreditApplicationService,
};
pub use views::{AffiliateView, CreditApplicationView};
pub use workflow::{CreditApplicationError, CreditApplicationWorkflow, CreditRequest, WorkflowStage};
