use serde::{Deserialize, Serialize};

const HIGH_RISK_KEYWORD: &str = "ALTO";
const MEDIUM_RISK_KEYWORD: &str = "MEDIO";

/// Tier recognised by the approval rules.
///
/// The risk service returns composite labels such as `"ALTO RIESGO"`, so the tier is read
/// from the keyword the label contains rather than from an exact match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    High,
    Medium,
    Low,
}

impl RiskTier {
    /// High wins over medium when a label carries both keywords.
    pub fn from_label(label: &str) -> Self {
        if label.contains(HIGH_RISK_KEYWORD) {
            RiskTier::High
        } else if label.contains(MEDIUM_RISK_KEYWORD) {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }
}
