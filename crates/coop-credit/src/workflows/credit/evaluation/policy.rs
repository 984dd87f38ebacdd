use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::debug;

use super::tier::RiskTier;

/// Largest amount a medium-risk affiliate may be granted.
pub const MEDIUM_RISK_AMOUNT_CEILING: Decimal = dec!(10_000_000);

/// Result of applying the approval rules to one evaluated request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CreditDecision {
    Approved,
    Rejected { reason: RejectionReason },
}

impl CreditDecision {
    pub fn is_approved(&self) -> bool {
        matches!(self, CreditDecision::Approved)
    }

    pub fn summary(&self) -> String {
        match self {
            CreditDecision::Approved => "application approved".to_string(),
            CreditDecision::Rejected { reason } => reason.summary(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectionReason {
    HighRisk {
        risk_level: String,
    },
    MediumRiskAmountAboveCeiling {
        amount: Decimal,
        ceiling: Decimal,
    },
}

impl RejectionReason {
    pub fn summary(&self) -> String {
        match self {
            RejectionReason::HighRisk { risk_level } => {
                format!("rejected for high risk level '{risk_level}'")
            }
            RejectionReason::MediumRiskAmountAboveCeiling { amount, ceiling } => format!(
                "rejected for medium risk with amount {amount} above ceiling {ceiling}"
            ),
        }
    }
}

pub(crate) fn decide_outcome(amount: Decimal, risk_level: &str) -> CreditDecision {
    match RiskTier::from_label(risk_level) {
        RiskTier::High => {
            debug!(risk_level, "rejecting application for high risk level");
            CreditDecision::Rejected {
                reason: RejectionReason::HighRisk {
                    risk_level: risk_level.to_string(),
                },
            }
        }
        RiskTier::Medium if amount > MEDIUM_RISK_AMOUNT_CEILING => {
            debug!(
                risk_level,
                %amount,
                "rejecting application for medium risk above amount ceiling"
            );
            CreditDecision::Rejected {
                reason: RejectionReason::MediumRiskAmountAboveCeiling {
                    amount,
                    ceiling: MEDIUM_RISK_AMOUNT_CEILING,
                },
            }
        }
        _ => {
            debug!(risk_level, %amount, "approving application");
            CreditDecision::Approved
        }
    }
}
