use serde::Deserialize;

use super::domain::{Product, ProductId};

/// Storage abstraction so the service and workflow can be exercised in
/// isolation. Insert must be atomic: a failed insert leaves no record.
pub trait ProductRepository: Send + Sync {
    fn insert(&self, product: Product) -> Result<Product, RepositoryError>;
    fn update(&self, product: Product) -> Result<Product, RepositoryError>;
    fn fetch(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError>;
    fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError>;
}

/// Listing filter; `None` fields match everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    pub category: Option<String>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        self.category
            .as_deref()
            .map(|category| product.submission.category.eq_ignore_ascii_case(category))
            .unwrap_or(true)
    }
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("product already exists")]
    Conflict,
    #[error("product not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
