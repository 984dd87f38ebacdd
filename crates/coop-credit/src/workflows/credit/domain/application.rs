use chrono::{DateTime, Local, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{require_text, AffiliateId, CreditApplicationId, DomainError};

/// Lifecycle of a credit application. `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreditApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl CreditApplicationStatus {
    pub const fn code(self) -> &'static str {
        match self {
            CreditApplicationStatus::Pending => "PENDING",
            CreditApplicationStatus::Approved => "APPROVED",
            CreditApplicationStatus::Rejected => "REJECTED",
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, CreditApplicationStatus::Pending)
    }
}

/// Request for `amount` over `term_months`, decided once from a risk evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreditApplication {
    id: Option<CreditApplicationId>,
    affiliate_id: AffiliateId,
    amount: Decimal,
    term_months: u32,
    status: CreditApplicationStatus,
    submission_date: NaiveDate,
    risk_score: Option<u32>,
    risk_level: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CreditApplication {
    /// Draft a pending application submitted today.
    pub fn create(
        affiliate_id: AffiliateId,
        amount: Decimal,
        term_months: u32,
    ) -> Result<Self, DomainError> {
        validate_terms(affiliate_id, amount, term_months)?;

        let now = Utc::now();
        Ok(Self {
            id: None,
            affiliate_id,
            amount,
            term_months,
            status: CreditApplicationStatus::Pending,
            submission_date: Local::now().date_naive(),
            risk_score: None,
            risk_level: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rehydrate a stored application.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstruct(
        id: CreditApplicationId,
        affiliate_id: AffiliateId,
        amount: Decimal,
        term_months: u32,
        status: CreditApplicationStatus,
        submission_date: NaiveDate,
        risk: Option<(u32, String)>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if id.0 == 0 {
            return Err(DomainError::validation(
                "credit application id",
                "must be positive",
            ));
        }
        validate_terms(affiliate_id, amount, term_months)?;
        if let Some((_, level)) = &risk {
            require_text(level, "risk level", "cannot be blank")?;
        }

        let (risk_score, risk_level) = match risk {
            Some((score, level)) => (Some(score), Some(level)),
            None => (None, None),
        };

        Ok(Self {
            id: Some(id),
            affiliate_id,
            amount,
            term_months,
            status,
            submission_date,
            risk_score,
            risk_level,
            created_at,
            updated_at,
        })
    }

    /// Attach the identity chosen by storage. Identity is assigned once.
    pub fn assign_id(&mut self, id: CreditApplicationId) -> Result<(), DomainError> {
        if id.0 == 0 {
            return Err(DomainError::validation(
                "credit application id",
                "must be positive",
            ));
        }
        if self.id.is_some() {
            return Err(DomainError::IllegalTransition {
                entity: "credit application",
                current: "persisted",
                attempted: "receive a new identity",
            });
        }
        self.id = Some(id);
        Ok(())
    }

    pub fn approve(&mut self) -> Result<(), DomainError> {
        self.settle(CreditApplicationStatus::Approved, "approve")
    }

    pub fn reject(&mut self) -> Result<(), DomainError> {
        self.settle(CreditApplicationStatus::Rejected, "reject")
    }

    fn settle(
        &mut self,
        outcome: CreditApplicationStatus,
        attempted: &'static str,
    ) -> Result<(), DomainError> {
        if self.status != CreditApplicationStatus::Pending {
            return Err(DomainError::IllegalTransition {
                entity: "credit application",
                current: self.status.code(),
                attempted,
            });
        }
        self.status = outcome;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Record the external score and tier. Status is left untouched.
    pub fn update_risk_evaluation(
        &mut self,
        score: u32,
        risk_level: impl Into<String>,
    ) -> Result<(), DomainError> {
        let risk_level = risk_level.into();
        require_text(&risk_level, "risk level", "cannot be blank")?;
        self.risk_score = Some(score);
        self.risk_level = Some(risk_level);
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn id(&self) -> Option<CreditApplicationId> {
        self.id
    }

    pub fn affiliate_id(&self) -> AffiliateId {
        self.affiliate_id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn term_months(&self) -> u32 {
        self.term_months
    }

    pub fn status(&self) -> CreditApplicationStatus {
        self.status
    }

    pub fn submission_date(&self) -> NaiveDate {
        self.submission_date
    }

    pub fn risk_score(&self) -> Option<u32> {
        self.risk_score
    }

    pub fn risk_level(&self) -> Option<&str> {
        self.risk_level.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

fn validate_terms(
    affiliate_id: AffiliateId,
    amount: Decimal,
    term_months: u32,
) -> Result<(), DomainError> {
    if affiliate_id.0 == 0 {
        return Err(DomainError::validation("affiliate id", "must be positive"));
    }
    if amount <= Decimal::ZERO {
        return Err(DomainError::validation("amount", "must be greater than zero"));
    }
    if term_months == 0 {
        return Err(DomainError::validation(
            "term",
            "must be greater than zero months",
        ));
    }
    Ok(())
}
