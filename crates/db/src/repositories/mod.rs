use async_trait::async_trait;
use thiserror::Error;

use storefront_core::domain::category::{Category, CategoryId};
use storefront_core::domain::product::{Product, ProductDraft, ProductId};
use storefront_core::errors::{ApplicationError, DomainError};

pub mod category;
mod mapper;
pub mod memory;
pub mod product;

pub use category::SqlCategoryRepository;
pub use memory::InMemoryProductRepository;
pub use product::SqlProductRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error(transparent)]
    Invalid(#[from] DomainError),
}

impl From<RepositoryError> for ApplicationError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Invalid(error) => Self::Domain(error),
            error @ RepositoryError::Decode(_) => Self::Integrity(error.to_string()),
            error @ RepositoryError::Database(_) => Self::Persistence(error.to_string()),
        }
    }
}

/// Source of truth for products.
///
/// `save` assigns an id when the draft has none. With an id, the stored
/// product keeps its `created_at` and every other field is replaced. Drafts
/// with negative prices are rejected before anything is written. The
/// substring finders match case-insensitively and return nothing for an
/// empty keyword.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn save(&self, draft: ProductDraft) -> Result<Product, RepositoryError>;

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError>;

    /// No-op when the id is absent.
    async fn delete_by_id(&self, id: ProductId) -> Result<(), RepositoryError>;

    async fn find_by_category_id(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, RepositoryError>;

    async fn find_by_name_containing(&self, keyword: &str)
        -> Result<Vec<Product>, RepositoryError>;

    async fn find_by_description_containing(
        &self,
        keyword: &str,
    ) -> Result<Vec<Product>, RepositoryError>;

    async fn find_by_name_or_description_containing(
        &self,
        keyword: &str,
    ) -> Result<Vec<Product>, RepositoryError>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn save(&self, category: Category) -> Result<Category, RepositoryError>;

    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError>;

    async fn find_all(&self) -> Result<Vec<Category>, RepositoryError>;

    async fn find_children(&self, parent_id: CategoryId) -> Result<Vec<Category>, RepositoryError>;

    async fn find_product_ids(&self, id: CategoryId) -> Result<Vec<ProductId>, RepositoryError>;
}
