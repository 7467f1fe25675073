use async_trait::async_trait;

use crate::errors::Result;

use super::{NewProduct, Product};

/// Repository contract for the product catalog.
#[async_trait]
pub trait ProductRepositoryTrait: Send + Sync {
    /// Look up a product by business code. Soft-deleted products are not
    /// returned.
    fn find_by_code(&self, code: &str) -> Result<Option<Product>>;

    /// All non-deleted products, ordered by name.
    fn list(&self) -> Result<Vec<Product>>;

    /// Insert or update by code.
    async fn upsert(&self, product: NewProduct) -> Result<Product>;
}
