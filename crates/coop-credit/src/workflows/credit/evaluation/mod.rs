mod policy;
mod tier;

pub use policy::{CreditDecision, RejectionReason, MEDIUM_RISK_AMOUNT_CEILING};
pub use tier::RiskTier;

use rust_decimal::Decimal;

/// Deterministic approval rules, evaluated in order with the first match winning:
///
/// 1. a high-risk label rejects,
/// 2. a medium-risk label rejects when the amount exceeds [`MEDIUM_RISK_AMOUNT_CEILING`],
/// 3. anything else approves.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApprovalPolicy;

impl ApprovalPolicy {
    pub fn new() -> Self {
        Self
    }

    /// `true` when the application should be approved.
    pub fn decide(&self, amount: Decimal, risk_level: &str) -> bool {
        self.evaluate(amount, risk_level).is_approved()
    }

    /// Same rules as [`ApprovalPolicy::decide`], keeping the rejection reason.
    pub fn evaluate(&self, amount: Decimal, risk_level: &str) -> CreditDecision {
        policy::decide_outcome(amount, risk_level)
    }
}
