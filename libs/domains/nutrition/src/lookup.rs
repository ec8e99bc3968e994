use async_trait::async_trait;

use crate::error::LookupError;
use crate::models::{NutrientVector, ProductSummary};

/// Access to a third-party product database.
///
/// Implementations enforce their own timeouts. Nothing here retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductLookup: Send + Sync {
    /// Nutrients per the database's reference amount (100 g for Open Food Facts).
    /// Fields the remote record lacks come back as 0.
    async fn fetch_base_nutrients(&self, external_id: &str)
    -> Result<NutrientVector, LookupError>;

    /// Free-text product search
    async fn search_products(&self, query: &str) -> Result<Vec<ProductSummary>, LookupError>;
}
