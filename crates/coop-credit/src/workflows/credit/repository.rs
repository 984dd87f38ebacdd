use super::domain::{Affiliate, AffiliateId, CreditApplication, CreditApplicationId};

/// Read side of affiliate storage; all the credit workflow needs.
pub trait AffiliateReader: Send + Sync {
    fn find_by_id(&self, id: AffiliateId) -> Result<Option<Affiliate>, RepositoryError>;
}

/// Full affiliate storage used by registration and lifecycle operations.
pub trait AffiliateStore: AffiliateReader {
    /// Persist a new affiliate and return it with its assigned identity.
    fn insert(&self, affiliate: Affiliate) -> Result<Affiliate, RepositoryError>;
    fn update(&self, affiliate: Affiliate) -> Result<(), RepositoryError>;
    fn find_by_document(&self, document: &str) -> Result<Option<Affiliate>, RepositoryError>;
}

/// Write side of application storage; all the credit workflow needs.
pub trait CreditApplicationWriter: Send + Sync {
    /// Persist a decided application and return it with its assigned identity.
    fn save(&self, application: CreditApplication) -> Result<CreditApplication, RepositoryError>;
}

pub trait CreditApplicationStore: CreditApplicationWriter {
    fn fetch(&self, id: CreditApplicationId)
        -> Result<Option<CreditApplication>, RepositoryError>;
    fn for_affiliate(
        &self,
        affiliate_id: AffiliateId,
    ) -> Result<Vec<CreditApplication>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
