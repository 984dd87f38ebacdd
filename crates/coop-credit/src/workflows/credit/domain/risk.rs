use serde::Serialize;

use super::{require_text, DomainError};

/// Outcome of one external risk evaluation. Only the score and level outlive the
/// request, copied onto the credit application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskEvaluation {
    score: u32,
    risk_level: String,
    detail: String,
}

impl RiskEvaluation {
    pub fn new(
        score: u32,
        risk_level: impl Into<String>,
        detail: Option<String>,
    ) -> Result<Self, DomainError> {
        let risk_level = risk_level.into();
        require_text(&risk_level, "risk level", "cannot be blank")?;
        Ok(Self {
            score,
            risk_level,
            detail: detail.unwrap_or_default(),
        })
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn risk_level(&self) -> &str {
        &self.risk_level
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}
