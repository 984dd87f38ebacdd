use crate::infra::{
    FixedRiskEvaluator, InMemoryAffiliateRepository, InMemoryCreditApplicationRepository,
};
use chrono::Local;
use coop_credit::error::AppError;
use coop_credit::workflows::credit::views::credit_status_label;
use coop_credit::workflows::credit::{
    AffiliateRegistration, AffiliateService, ApprovalPolicy, CreditApplication,
    CreditApplicationService, CreditRequest,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;

const DEMO_RISK_TIMEOUT: Duration = Duration::from_secs(1);

struct Scenario {
    title: &'static str,
    document: &'static str,
    score: u32,
    risk_level: &'static str,
    amount: Decimal,
    term_months: u32,
}

const SCENARIOS: [Scenario; 3] = [
    Scenario {
        title: "Low risk, moderate amount",
        document: "1017223344",
        score: 320,
        risk_level: "BAJO RIESGO",
        amount: dec!(5000000),
        term_months: 24,
    },
    Scenario {
        title: "High risk",
        document: "1017556677",
        score: 880,
        risk_level: "ALTO RIESGO",
        amount: dec!(5000000),
        term_months: 24,
    },
    Scenario {
        title: "Medium risk above the ceiling",
        document: "1017889900",
        score: 610,
        risk_level: "MEDIO RIESGO",
        amount: dec!(15000000),
        term_months: 36,
    },
];

pub(crate) async fn run_demo() -> Result<(), AppError> {
    println!("Cooperative credit demo");
    println!("Risk central is replaced by a fixed evaluator per scenario.");

    for scenario in &SCENARIOS {
        println!("\n{}", scenario.title);
        match run_scenario(scenario).await {
            Ok(application) => render_application(&application),
            Err(message) => println!("  Scenario failed: {message}"),
        }
    }

    Ok(())
}

async fn run_scenario(scenario: &Scenario) -> Result<CreditApplication, String> {
    let affiliates = Arc::new(InMemoryAffiliateRepository::default());
    let applications = Arc::new(InMemoryCreditApplicationRepository::default());
    let evaluator = Arc::new(FixedRiskEvaluator::new(scenario.score, scenario.risk_level));

    let registration = AffiliateService::new(
        Arc::clone(&affiliates),
        Arc::clone(&evaluator),
        DEMO_RISK_TIMEOUT,
    );
    let credit = CreditApplicationService::new(
        affiliates,
        applications,
        evaluator,
        DEMO_RISK_TIMEOUT,
    );

    let affiliate = registration
        .register(AffiliateRegistration {
            document: scenario.document.to_string(),
            name: "Demo Affiliate".to_string(),
            salary: dec!(4500000),
            registration_date: Some(Local::now().date_naive()),
        })
        .await
        .map_err(|err| err.to_string())?;
    let affiliate_id = affiliate
        .id()
        .ok_or_else(|| "registered affiliate has no id".to_string())?;
    println!(
        "  Registered affiliate {} (document {})",
        affiliate_id,
        affiliate.document()
    );

    let decision = ApprovalPolicy::new().evaluate(scenario.amount, scenario.risk_level);
    println!(
        "  Requesting {} over {} months; risk central says {} ({})",
        scenario.amount, scenario.term_months, scenario.risk_level, scenario.score
    );
    println!("  Expected: {}", decision.summary());

    credit
        .submit(CreditRequest {
            affiliate_id,
            amount: scenario.amount,
            term_months: scenario.term_months,
        })
        .await
        .map_err(|err| err.to_string())
}

fn render_application(application: &CreditApplication) {
    let id = application
        .id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "unsaved".to_string());
    println!(
        "  Application {id}: {}",
        credit_status_label(application.status())
    );
    if let (Some(score), Some(level)) = (application.risk_score(), application.risk_level()) {
        println!("  Recorded risk: {level} ({score})");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coop_credit::workflows::credit::CreditApplicationStatus;

    #[tokio::test]
    async fn scenarios_reach_their_documented_outcomes() {
        let mut statuses = Vec::new();
        for scenario in &SCENARIOS {
            let application = run_scenario(scenario).await.expect("scenario runs");
            statuses.push(application.status());
        }

        assert_eq!(
            statuses,
            vec![
                CreditApplicationStatus::Approved,
                CreditApplicationStatus::Rejected,
                CreditApplicationStatus::Rejected,
            ]
        );
    }
}
