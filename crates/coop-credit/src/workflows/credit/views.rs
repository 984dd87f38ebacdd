//! Response shapes for the HTTP boundary. Localized labels live here and nowhere else.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::domain::{
    Affiliate, AffiliateId, AffiliateStatus, CreditApplication, CreditApplicationId,
    CreditApplicationStatus,
};

pub const fn affiliate_status_label(status: AffiliateStatus) -> &'static str {
    match status {
        AffiliateStatus::Active => "Active",
        AffiliateStatus::Inactive => "Inactive",
        AffiliateStatus::Suspended => "Suspended",
    }
}

pub const fn credit_status_label(status: CreditApplicationStatus) -> &'static str {
    match status {
        CreditApplicationStatus::Pending => "Pendiente",
        CreditApplicationStatus::Approved => "Aprobado",
        CreditApplicationStatus::Rejected => "Rechazado",
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<AffiliateId>,
    pub document: String,
    pub name: String,
    pub salary: Decimal,
    pub registration_date: NaiveDate,
    pub status: &'static str,
    pub status_label: &'static str,
    pub eligible_for_credit: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Affiliate> for AffiliateView {
    fn from(affiliate: &Affiliate) -> Self {
        Self {
            id: affiliate.id(),
            document: affiliate.document().to_string(),
            name: affiliate.name().to_string(),
            salary: affiliate.salary(),
            registration_date: affiliate.registration_date(),
            status: affiliate.status().code(),
            status_label: affiliate_status_label(affiliate.status()),
            eligible_for_credit: affiliate.is_eligible_for_credit(),
            created_at: affiliate.created_at(),
            updated_at: affiliate.updated_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditApplicationView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<CreditApplicationId>,
    pub affiliate_id: AffiliateId,
    pub amount: Decimal,
    pub term_months: u32,
    pub status: &'static str,
    pub status_label: &'static str,
    pub submission_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&CreditApplication> for CreditApplicationView {
    fn from(application: &CreditApplication) -> Self {
        Self {
            id: application.id(),
            affiliate_id: application.affiliate_id(),
            amount: application.amount(),
            term_months: application.term_months(),
            status: application.status().code(),
            status_label: credit_status_label(application.status()),
            submission_date: application.submission_date(),
            risk_score: application.risk_score(),
            risk_level: application.risk_level().map(str::to_string),
            created_at: application.created_at(),
            updated_at: application.updated_at(),
        }
    }
}
