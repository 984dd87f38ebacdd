use chrono::{DateTime, Local, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{require_text, AffiliateId, DomainError};

/// Membership status of an affiliate within the cooperative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AffiliateStatus {
    Active,
    Inactive,
    Suspended,
}

impl AffiliateStatus {
    pub const fn code(self) -> &'static str {
        match self {
            AffiliateStatus::Active => "ACTIVE",
            AffiliateStatus::Inactive => "INACTIVE",
            AffiliateStatus::Suspended => "SUSPENDED",
        }
    }
}

/// Cooperative member who may request credit.
///
/// Fields are only reachable through validated constructors and transition methods, so
/// an `Affiliate` value always satisfies its invariants: non-blank document and name,
/// positive salary, and a registration date that is not in the future.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Affiliate {
    id: Option<AffiliateId>,
    document: String,
    name: String,
    salary: Decimal,
    registration_date: NaiveDate,
    status: AffiliateStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Affiliate {
    /// Register a new, not yet persisted, active affiliate.
    pub fn create(
        name: impl Into<String>,
        salary: Decimal,
        registration_date: NaiveDate,
        document: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let now = Utc::now();
        Self::validated(
            None,
            name.into(),
            salary,
            registration_date,
            AffiliateStatus::Active,
            (now, now),
            document.into(),
        )
    }

    /// Rehydrate a stored affiliate. Timestamps are trusted as given.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstruct(
        id: AffiliateId,
        name: impl Into<String>,
        salary: Decimal,
        registration_date: NaiveDate,
        status: AffiliateStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        document: impl Into<String>,
    ) -> Result<Self, DomainError> {
        if id.0 == 0 {
            return Err(DomainError::validation("affiliate id", "must be positive"));
        }
        Self::validated(
            Some(id),
            name.into(),
            salary,
            registration_date,
            status,
            (created_at, updated_at),
            document.into(),
        )
    }

    fn validated(
        id: Option<AffiliateId>,
        name: String,
        salary: Decimal,
        registration_date: NaiveDate,
        status: AffiliateStatus,
        (created_at, updated_at): (DateTime<Utc>, DateTime<Utc>),
        document: String,
    ) -> Result<Self, DomainError> {
        require_text(&document, "document", "cannot be blank")?;
        require_text(&name, "name", "cannot be blank")?;
        ensure_positive_salary(salary)?;
        if registration_date > Local::now().date_naive() {
            return Err(DomainError::validation(
                "registration date",
                "cannot be in the future",
            ));
        }

        Ok(Self {
            id,
            document,
            name,
            salary,
            registration_date,
            status,
            created_at,
            updated_at,
        })
    }

    /// Attach the identity chosen by storage. Identity is assigned once.
    pub fn assign_id(&mut self, id: AffiliateId) -> Result<(), DomainError> {
        if id.0 == 0 {
            return Err(DomainError::validation("affiliate id", "must be positive"));
        }
        if self.id.is_some() {
            return Err(DomainError::IllegalTransition {
                entity: "affiliate",
                current: "persisted",
                attempted: "receive a new identity",
            });
        }
        self.id = Some(id);
        Ok(())
    }

    pub fn deactivate(&mut self) -> Result<(), DomainError> {
        self.transition(AffiliateStatus::Inactive, "deactivate")
    }

    pub fn reactivate(&mut self) -> Result<(), DomainError> {
        self.transition(AffiliateStatus::Active, "reactivate")
    }

    fn transition(
        &mut self,
        target: AffiliateStatus,
        attempted: &'static str,
    ) -> Result<(), DomainError> {
        if self.status == target {
            return Err(DomainError::IllegalTransition {
                entity: "affiliate",
                current: self.status.code(),
                attempted,
            });
        }
        self.status = target;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn update_salary(&mut self, new_salary: Decimal) -> Result<(), DomainError> {
        ensure_positive_salary(new_salary)?;
        self.salary = new_salary;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn is_eligible_for_credit(&self) -> bool {
        self.status == AffiliateStatus::Active && self.salary > Decimal::ZERO
    }

    pub fn id(&self) -> Option<AffiliateId> {
        self.id
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn salary(&self) -> Decimal {
        self.salary
    }

    pub fn registration_date(&self) -> NaiveDate {
        self.registration_date
    }

    pub fn status(&self) -> AffiliateStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

fn ensure_positive_salary(salary: Decimal) -> Result<(), DomainError> {
    if salary <= Decimal::ZERO {
        return Err(DomainError::validation("salary", "must be greater than zero"));
    }
    Ok(())
}
