use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use crate::workflows::credit::domain::{
    Affiliate, AffiliateId, CreditApplication, CreditApplicationId, RiskEvaluation,
};
use crate::workflows::credit::repository::{
    AffiliateReader, AffiliateStore, CreditApplicationStore, CreditApplicationWriter,
    RepositoryError,
};
use crate::workflows::credit::risk::{RiskCentralError, RiskEvaluator};
use crate::workflows::credit::service::{
    AffiliateRegistration, AffiliateService, CreditApplicationService,
};
use crate::workflows::credit::{credit_router, CreditApi};

pub(super) const RISK_TIMEOUT: Duration = Duration::from_millis(200);

pub(super) fn registration_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date")
}

pub(super) fn active_affiliate(document: &str) -> Affiliate {
    Affiliate::create("Ana Restrepo", dec!(50000), registration_date(), document)
        .expect("valid affiliate")
}

pub(super) fn registration(document: &str) -> AffiliateRegistration {
    AffiliateRegistration {
        document: document.to_string(),
        name: "Ana Restrepo".to_string(),
        salary: dec!(50000),
        registration_date: Some(registration_date()),
    }
}

#[derive(Default)]
pub(super) struct MemoryAffiliates {
    records: Mutex<BTreeMap<AffiliateId, Affiliate>>,
    sequence: AtomicU64,
}

impl MemoryAffiliates {
    /// Store an affiliate directly, bypassing the service.
    pub(super) fn seed(&self, affiliate: Affiliate) -> Affiliate {
        self.insert(affiliate).expect("seed affiliate")
    }
}

impl AffiliateReader for MemoryAffiliates {
    fn find_by_id(&self, id: AffiliateId) -> Result<Option<Affiliate>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned())
    }
}

impl AffiliateStore for MemoryAffiliates {
    fn insert(&self, mut affiliate: Affiliate) -> Result<Affiliate, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
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
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.get_mut(&id) {
            Some(slot) => {
                *slot = affiliate;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn find_by_document(&self, document: &str) -> Result<Option<Affiliate>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|affiliate| affiliate.document() == document)
            .cloned())
    }
}

#[derive(Default)]
pub(super) struct MemoryApplications {
    records: Mutex<BTreeMap<CreditApplicationId, CreditApplication>>,
    sequence: AtomicU64,
    saves: AtomicUsize,
}

impl MemoryApplications {
    pub(super) fn save_calls(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub(super) fn stored(&self) -> Vec<CreditApplication> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .values()
            .cloned()
            .collect()
    }
}

impl CreditApplicationWriter for MemoryApplications {
    fn save(
        &self,
        mut application: CreditApplication,
    ) -> Result<CreditApplication, RepositoryError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        let id = CreditApplicationId(self.sequence.fetch_add(1, Ordering::Relaxed) + 1);
        application
            .assign_id(id)
            .map_err(|err| RepositoryError::Unavailable(err.to_string()))?;
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .insert(id, application.clone());
        Ok(application)
    }
}

impl CreditApplicationStore for MemoryApplications {
    fn fetch(
        &self,
        id: CreditApplicationId,
    ) -> Result<Option<CreditApplication>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn for_affiliate(
        &self,
        affiliate_id: AffiliateId,
    ) -> Result<Vec<CreditApplication>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|application| application.affiliate_id() == affiliate_id)
            .cloned()
            .collect())
    }
}

pub(super) struct UnavailableApplications;

impl CreditApplicationWriter for UnavailableApplications {
    fn save(&self, _application: CreditApplication) -> Result<CreditApplication, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl CreditApplicationStore for UnavailableApplications {
    fn fetch(
        &self,
        _id: CreditApplicationId,
    ) -> Result<Option<CreditApplication>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn for_affiliate(
        &self,
        _affiliate_id: AffiliateId,
    ) -> Result<Vec<CreditApplication>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Evaluator answering every call with the same outcome and recording what it was asked.
pub(super) struct ScriptedEvaluator {
    outcome: Result<(u32, &'static str), RiskCentralError>,
    calls: Mutex<Vec<(String, Decimal, u32)>>,
}

impl ScriptedEvaluator {
    pub(super) fn scoring(score: u32, risk_level: &'static str) -> Self {
        Self {
            outcome: Ok((score, risk_level)),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn failing(err: RiskCentralError) -> Self {
        Self {
            outcome: Err(err),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn calls(&self) -> Vec<(String, Decimal, u32)> {
        self.calls.lock().expect("evaluator mutex poisoned").clone()
    }
}

#[async_trait]
impl RiskEvaluator for ScriptedEvaluator {
    async fn evaluate_risk(
        &self,
        document: &str,
        amount: Decimal,
        term_months: u32,
    ) -> Result<RiskEvaluation, RiskCentralError> {
        self.calls
            .lock()
            .expect("evaluator mutex poisoned")
            .push((document.to_string(), amount, term_months));
        match &self.outcome {
            Ok((score, level)) => Ok(RiskEvaluation::new(*score, *level, None)
                .expect("scripted evaluation is valid")),
            Err(err) => Err(err.clone()),
        }
    }
}

/// Evaluator that never answers inside [`RISK_TIMEOUT`].
pub(super) struct StalledEvaluator;

#[async_trait]
impl RiskEvaluator for StalledEvaluator {
    async fn evaluate_risk(
        &self,
        _document: &str,
        _amount: Decimal,
        _term_months: u32,
    ) -> Result<RiskEvaluation, RiskCentralError> {
        tokio::time::sleep(RISK_TIMEOUT * 10).await;
        Ok(RiskEvaluation::new(100, "BAJO", None).expect("valid evaluation"))
    }
}

pub(super) struct Harness<E> {
    pub(super) affiliates: Arc<MemoryAffiliates>,
    pub(super) applications: Arc<MemoryApplications>,
    pub(super) evaluator: Arc<E>,
    pub(super) api: CreditApi<MemoryAffiliates, MemoryApplications, E>,
}

pub(super) fn harness<E>(evaluator: E) -> Harness<E>
where
    E: RiskEvaluator + 'static,
{
    let affiliates = Arc::new(MemoryAffiliates::default());
    let applications = Arc::new(MemoryApplications::default());
    let evaluator = Arc::new(evaluator);

    let api = CreditApi {
        affiliates: Arc::new(AffiliateService::new(
            Arc::clone(&affiliates),
            Arc::clone(&evaluator),
            RISK_TIMEOUT,
        )),
        applications: Arc::new(CreditApplicationService::new(
            Arc::clone(&affiliates),
            Arc::clone(&applications),
            Arc::clone(&evaluator),
            RISK_TIMEOUT,
        )),
    };

    Harness {
        affiliates,
        applications,
        evaluator,
        api,
    }
}

impl<E> Harness<E>
where
    E: RiskEvaluator + 'static,
{
    pub(super) fn router(&self) -> axum::Router {
        credit_router(self.api.clone())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
