use async_trait::async_trait;
use coop_credit::workflows::credit::{
    Affiliate, AffiliateId, AffiliateReader, AffiliateStore, CreditApplication,
    CreditApplicationId, CreditApplicationStore, CreditApplicationWriter, RepositoryError,
    RiskCentralError, RiskEvaluation, RiskEvaluator,
};
use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("in-memory store poisoned".to_string()))
}

#[derive(Default)]
pub(crate) struct InMemoryAffiliateRepository {
    records: Mutex<BTreeMap<AffiliateId, Affiliate>>,
    sequence: AtomicU64,
}

impl AffiliateReader for InMemoryAffiliateRepository {
    fn find_by_id(&self, id: AffiliateId) -> Result<Option<Affiliate>, RepositoryError> {
        Ok(lock(&self.records)?.get(&id).cloned())
    }
}

impl AffiliateStore for InMemoryAffiliateRepository {
    fn insert(&self, mut affiliate: Affiliate) -> Result<Affiliate, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard
            .values()
            .any(|stored| stored.document() == affiliate.document())
        {
            return Err(RepositoryError::Conflict);
        }
        let id = AffiliateId(self.sequence.fetch_add(1, Ordering::Relaxed) + 1);
        affiliate
            .assign_id(id)
            .map_err(|err| RepositoryError::Unavailable(err.to_string()))?;
        guard.insert(id, affiliate.clone());
        Ok(affiliate)
    }

    fn update(&self, affiliate: Affiliate) -> Result<(), RepositoryError> {
        let id = affiliate.id().ok_or(RepositoryError::NotFound)?;
        let mut guard = lock(&self.records)?;
        match guard.get_mut(&id) {
            Some(slot) => {
                *slot = affiliate;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn find_by_document(&self, document: &str) -> Result<Option<Affiliate>, RepositoryError> {
        Ok(lock(&self.records)?
            .values()
            .find(|affiliate| affiliate.document() == document)
            .cloned())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryCreditApplicationRepository {
    records: Mutex<BTreeMap<CreditApplicationId, CreditApplication>>,
    sequence: AtomicU64,
}

impl CreditApplicationWriter for InMemoryCreditApplicationRepository {
    fn save(
        &self,
        mut application: CreditApplication,
    ) -> Result<CreditApplication, RepositoryError> {
        let mut guard = lock(&self.records)?;
        let id = match application.id() {
            Some(id) => id,
            None => {
                let id = CreditApplicationId(self.sequence.fetch_add(1, Ordering::Relaxed) + 1);
                application
                    .assign_id(id)
                    .map_err(|err| RepositoryError::Unavailable(err.to_string()))?;
                id
            }
        };
        guard.insert(id, application.clone());
        Ok(application)
    }
}

impl CreditApplicationStore for InMemoryCreditApplicationRepository {
    fn fetch(
        &self,
        id: CreditApplicationId,
    ) -> Result<Option<CreditApplication>, RepositoryError> {
        Ok(lock(&self.records)?.get(&id).cloned())
    }

    fn for_affiliate(
        &self,
        affiliate_id: AffiliateId,
    ) -> Result<Vec<CreditApplication>, RepositoryError> {
        Ok(lock(&self.records)?
            .values()
            .filter(|application| application.affiliate_id() == affiliate_id)
            .cloned()
            .collect())
    }
}

/// Risk evaluator answering every request with the same score and level.
#[derive(Debug, Clone)]
pub(crate) struct FixedRiskEvaluator {
    score: u32,
    risk_level: &'static str,
}

impl FixedRiskEvaluator {
    pub(crate) const fn new(score: u32, risk_level: &'static str) -> Self {
        Self { score, risk_level }
    }
}

#[async_trait]
impl RiskEvaluator for FixedRiskEvaluator {
    async fn evaluate_risk(
        &self,
        document: &str,
        _amount: Decimal,
        _term_months: u32,
    ) -> Result<RiskEvaluation, RiskCentralError> {
        RiskEvaluation::new(
            self.score,
            self.risk_level,
            Some(format!("fixed evaluation for {document}")),
        )
        .map_err(|err| RiskCentralError::MalformedPayload(err.to_string()))
    }
}
