use super::common::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use crate::workflows::credit::domain::{AffiliateId, CreditApplicationId, CreditApplicationStatus};
use crate::workflows::credit::repository::AffiliateStore;
use crate::workflows::credit::risk::{RequiredRiskCheck, RiskCentralError, RiskEvaluator};
use crate::workflows::credit::workflow::{
    CreditApplicationError, CreditApplicationWorkflow, CreditRequest,
};

fn request(affiliate_id: AffiliateId, amount: Decimal) -> CreditRequest {
    CreditRequest {
        affiliate_id,
        amount,
        term_months: 12,
    }
}

fn seeded<E>(evaluator: E) -> (Harness<E>, AffiliateId)
where
    E: RiskEvaluator + 'static,
{
    let harness = harness(evaluator);
    let stored = harness.affiliates.seed(active_affiliate("1017"));
    let id = stored.id().expect("seeded affiliate has id");
    (harness, id)
}

#[tokio::test]
async fn low_risk_request_is_approved_and_persisted_once() {
    let (harness, affiliate_id) = seeded(ScriptedEvaluator::scoring(400, "BAJO"));

    let application = harness
        .api
        .applications
        .submit(request(affiliate_id, dec!(5000000)))
        .await
        .expect("submission succeeds");

    assert_eq!(application.status(), CreditApplicationStatus::Approved);
    assert_eq!(application.risk_score(), Some(400));
    assert_eq!(application.risk_level(), Some("BAJO"));
    assert!(application.id().is_some());
    assert_eq!(harness.applications.save_calls(), 1);
    assert_eq!(
        harness.evaluator.calls(),
        vec![("1017".to_string(), dec!(5000000), 12)]
    );
}

#[tokio::test]
async fn high_risk_request_is_rejected() {
    let (harness, affiliate_id) = seeded(ScriptedEvaluator::scoring(900, "ALTO"));

    let application = harness
        .api
        .applications
        .submit(request(affiliate_id, dec!(5000000)))
        .await
        .expect("submission succeeds");

    assert_eq!(application.status(), CreditApplicationStatus::Rejected);
    assert_eq!(application.risk_score(), Some(900));
}

#[tokio::test]
async fn medium_risk_above_ceiling_is_rejected() {
    let (harness, affiliate_id) = seeded(ScriptedEvaluator::scoring(600, "MEDIO"));

    let application = harness
        .api
        .applications
        .submit(request(affiliate_id, dec!(15000000)))
        .await
        .expect("submission succeeds");

    assert_eq!(application.status(), CreditApplicationStatus::Rejected);
    assert_eq!(harness.applications.save_calls(), 1);
}

#[tokio::test]
async fn missing_affiliate_never_reaches_risk_or_storage() {
    let harness = harness(ScriptedEvaluator::scoring(400, "BAJO"));

    let err = harness
        .api
        .applications
        .submit(request(AffiliateId(999), dec!(5000000)))
        .await
        .expect_err("affiliate 999 does not exist");

    assert!(matches!(
        err,
        CreditApplicationError::AffiliateNotFound(AffiliateId(999))
    ));
    assert_eq!(err.code(), "AFFILIATE_NOT_FOUND");
    assert!(harness.evaluator.calls().is_empty());
    assert_eq!(harness.applications.save_calls(), 0);
}

#[tokio::test]
async fn inactive_affiliate_is_reported_like_a_missing_one() {
    let (harness, affiliate_id) = seeded(ScriptedEvaluator::scoring(400, "BAJO"));
    let mut affiliate = harness
        .affiliates
        .find_by_document("1017")
        .expect("lookup succeeds")
        .expect("seeded");
    affiliate.deactivate().expect("deactivates");
    harness.affiliates.update(affiliate).expect("update succeeds");

    let err = harness
        .api
        .applications
        .submit(request(affiliate_id, dec!(5000000)))
        .await
        .expect_err("inactive affiliates cannot apply");

    assert!(matches!(err, CreditApplicationError::AffiliateNotFound(id) if id == affiliate_id));
    assert!(harness.evaluator.calls().is_empty());
    assert_eq!(harness.applications.save_calls(), 0);
}

#[tokio::test]
async fn risk_failure_aborts_without_persisting() {
    let (harness, affiliate_id) = seeded(ScriptedEvaluator::failing(
        RiskCentralError::UnexpectedStatus(503),
    ));

    let err = harness
        .api
        .applications
        .submit(request(affiliate_id, dec!(5000000)))
        .await
        .expect_err("risk central is down");

    assert!(matches!(
        err,
        CreditApplicationError::RiskCentral(RiskCentralError::UnexpectedStatus(503))
    ));
    assert_eq!(err.code(), "EXTERNAL_SERVICE_ERROR");
    assert_eq!(harness.applications.save_calls(), 0);
    assert!(harness.applications.stored().is_empty());
}

#[tokio::test]
async fn stalled_risk_call_times_out() {
    let (harness, affiliate_id) = seeded(StalledEvaluator);

    let err = harness
        .api
        .applications
        .submit(request(affiliate_id, dec!(5000000)))
        .await
        .expect_err("risk central never answers");

    match err {
        CreditApplicationError::RiskCentral(RiskCentralError::Timeout(limit)) => {
            assert_eq!(limit, RISK_TIMEOUT)
        }
        other => panic!("expected a timeout, got {other:?}"),
    }
    assert_eq!(harness.applications.save_calls(), 0);
}

#[tokio::test]
async fn invalid_terms_fail_before_risk_is_consulted() {
    let (harness, affiliate_id) = seeded(ScriptedEvaluator::scoring(400, "BAJO"));

    let err = harness
        .api
        .applications
        .submit(CreditRequest {
            affiliate_id,
            amount: dec!(5000000),
            term_months: 0,
        })
        .await
        .expect_err("term must be positive");

    assert_eq!(err.code(), "VALIDATION_ERROR");
    assert!(harness.evaluator.calls().is_empty());
}

#[tokio::test]
async fn storage_failure_surfaces_as_repository_error() {
    let affiliates = Arc::new(MemoryAffiliates::default());
    let stored = affiliates.seed(active_affiliate("1017"));
    let workflow = CreditApplicationWorkflow::new(
        Arc::clone(&affiliates),
        Arc::new(UnavailableApplications),
        RequiredRiskCheck::new(
            Arc::new(ScriptedEvaluator::scoring(400, "BAJO")),
            RISK_TIMEOUT,
        ),
    );

    let err = workflow
        .submit(request(stored.id().expect("id"), dec!(5000000)))
        .await
        .expect_err("storage is offline");

    assert_eq!(err.code(), "REPOSITORY_ERROR");
}

#[tokio::test]
async fn queries_return_stored_applications() {
    let (harness, affiliate_id) = seeded(ScriptedEvaluator::scoring(400, "BAJO"));
    let service = &harness.api.applications;

    let first = service
        .submit(request(affiliate_id, dec!(1000000)))
        .await
        .expect("first submission");
    let second = service
        .submit(request(affiliate_id, dec!(2000000)))
        .await
        .expect("second submission");

    let fetched = service.get(first.id().expect("id")).expect("stored");
    assert_eq!(fetched, first);

    let listed = service
        .list_for_affiliate_document("1017")
        .expect("affiliate exists");
    assert_eq!(listed, vec![first, second]);
}

#[tokio::test]
async fn queries_report_unknown_records() {
    let harness = harness(ScriptedEvaluator::scoring(400, "BAJO"));
    let service = &harness.api.applications;

    let err = service
        .get(CreditApplicationId(42))
        .expect_err("nothing stored");
    assert_eq!(err.code(), "CREDIT_APPLICATION_NOT_FOUND");

    let err = service
        .list_for_affiliate_document("0000")
        .expect_err("unknown document");
    assert_eq!(err.code(), "AFFILIATE_NOT_FOUND");
}
