use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use super::domain::{Affiliate, AffiliateId, CreditApplication, CreditApplicationId, DomainError};
use super::repository::{AffiliateStore, CreditApplicationStore, RepositoryError};
use super::risk::{AdvisoryRiskCheck, RequiredRiskCheck, RiskEvaluator};
use super::workflow::{CreditApplicationError, CreditApplicationWorkflow, CreditRequest};

/// Payload accepted when registering an affiliate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateRegistration {
    pub document: String,
    pub name: String,
    pub salary: Decimal,
    #[serde(default)]
    pub registration_date: Option<NaiveDate>,
}

/// Affiliate registration, lookup, and lifecycle changes.
pub struct AffiliateService<S: ?Sized, E: ?Sized> {
    store: Arc<S>,
    screening: AdvisoryRiskCheck<E>,
}

impl<S, E> AffiliateService<S, E>
where
    S: AffiliateStore + ?Sized,
    E: RiskEvaluator + ?Sized,
{
    pub fn new(store: Arc<S>, evaluator: Arc<E>, risk_timeout: Duration) -> Self {
        Self {
            store,
            screening: AdvisoryRiskCheck::new(evaluator, risk_timeout),
        }
    }

    /// Register a new affiliate, then screen it with risk central.
    ///
    /// The screening never affects the outcome: the affiliate is already stored when it runs.
    pub async fn register(
        &self,
        registration: AffiliateRegistration,
    ) -> Result<Affiliate, AffiliateServiceError> {
        let registration_date = registration
            .registration_date
            .ok_or_else(|| DomainError::validation("registration date", "is required"))?;
        let affiliate = Affiliate::create(
            registration.name,
            registration.salary,
            registration_date,
            registration.document,
        )?;

        let document = affiliate.document().to_string();
        if self.store.find_by_document(&document)?.is_some() {
            return Err(AffiliateServiceError::Duplicate(document));
        }

        let stored = self.store.insert(affiliate).map_err(|err| match err {
            RepositoryError::Conflict => AffiliateServiceError::Duplicate(document),
            other => other.into(),
        })?;
        info!(
            affiliate_id = ?stored.id(),
            document = stored.document(),
            "affiliate registered"
        );

        self.screening
            .screen(stored.document(), stored.salary())
            .await;

        Ok(stored)
    }

    pub fn get(&self, id: AffiliateId) -> Result<Affiliate, AffiliateServiceError> {
        self.store
            .find_by_id(id)?
            .ok_or(AffiliateServiceError::NotFound(id))
    }

    pub fn find_by_document(&self, document: &str) -> Result<Affiliate, AffiliateServiceError> {
        self.store
            .find_by_document(document)?
            .ok_or_else(|| AffiliateServiceError::UnknownDocument(document.to_string()))
    }

    pub fn deactivate(&self, id: AffiliateId) -> Result<Affiliate, AffiliateServiceError> {
        self.modify(id, Affiliate::deactivate)
    }

    pub fn reactivate(&self, id: AffiliateId) -> Result<Affiliate, AffiliateServiceError> {
        self.modify(id, Affiliate::reactivate)
    }

    pub fn update_salary(
        &self,
        id: AffiliateId,
        salary: Decimal,
    ) -> Result<Affiliate, AffiliateServiceError> {
        self.modify(id, |affiliate| affiliate.update_salary(salary))
    }

    fn modify<F>(&self, id: AffiliateId, change: F) -> Result<Affiliate, AffiliateServiceError>
    where
        F: FnOnce(&mut Affiliate) -> Result<(), DomainError>,
    {
        let mut affiliate = self.get(id)?;
        change(&mut affiliate)?;
        self.store.update(affiliate.clone())?;
        info!(
            affiliate_id = %id,
            status = affiliate.status().code(),
            "affiliate updated"
        );
        Ok(affiliate)
    }
}

/// Error raised by the affiliate service.
#[derive(Debug, thiserror::Error)]
pub enum AffiliateServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("an affiliate with document '{0}' is already registered")]
    Duplicate(String),
    #[error("affiliate {0} not found")]
    NotFound(AffiliateId),
    #[error("no affiliate registered with document '{0}'")]
    UnknownDocument(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AffiliateServiceError {
    pub fn code(&self) -> &'static str {
        match self {
            AffiliateServiceError::Domain(err) => err.code(),
            AffiliateServiceError::Duplicate(_) => "AFFILIATE_DUPLICATE",
            AffiliateServiceError::NotFound(_) | AffiliateServiceError::UnknownDocument(_) => {
                "AFFILIATE_NOT_FOUND"
            }
            AffiliateServiceError::Repository(_) => "REPOSITORY_ERROR",
        }
    }
}

/// Credit application intake and queries.
pub struct CreditApplicationService<A: ?Sized, S: ?Sized, E: ?Sized> {
    affiliates: Arc<A>,
    applications: Arc<S>,
    workflow: CreditApplicationWorkflow<A, S, E>,
}

impl<A, S, E> CreditApplicationService<A, S, E>
where
    A: AffiliateStore + ?Sized,
    S: CreditApplicationStore + ?Sized,
    E: RiskEvaluator + ?Sized,
{
    pub fn new(
        affiliates: Arc<A>,
        applications: Arc<S>,
        evaluator: Arc<E>,
        risk_timeout: Duration,
    ) -> Self {
        let workflow = CreditApplicationWorkflow::new(
            Arc::clone(&affiliates),
            Arc::clone(&applications),
            RequiredRiskCheck::new(evaluator, risk_timeout),
        );
        Self {
            affiliates,
            applications,
            workflow,
        }
    }

    pub async fn submit(
        &self,
        request: CreditRequest,
    ) -> Result<CreditApplication, CreditApplicationError> {
        self.workflow.submit(request).await
    }

    pub fn get(
        &self,
        id: CreditApplicationId,
    ) -> Result<CreditApplication, CreditApplicationError> {
        self.applications
            .fetch(id)?
            .ok_or(CreditApplicationError::NotFound(id))
    }

    /// Every application filed by the affiliate holding `document`, oldest first.
    pub fn list_for_affiliate_document(
        &self,
        document: &str,
    ) -> Result<Vec<CreditApplication>, CreditApplicationError> {
        let affiliate_id = self
            .affiliates
            .find_by_document(document)?
            .and_then(|affiliate| affiliate.id())
            .ok_or_else(|| CreditApplicationError::UnknownDocument(document.to_string()))?;

        let mut applications = self.applications.for_affiliate(affiliate_id)?;
        applications.sort_by_key(|application| application.id());
        Ok(applications)
    }
}
