use std::collections::BTreeMap;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use storefront_core::catalog::{description_contains, matches_keyword, name_contains};
use storefront_core::domain::category::CategoryId;
use storefront_core::domain::product::{Product, ProductDraft, ProductId};

use super::{ProductRepository, RepositoryError};
use crate::fixtures;

/// Process-local product store.
///
/// Reads and writes each take the lock once, so a caller's find-then-save
/// sequence is not atomic and concurrent updates to one id can overwrite
/// each other.
pub struct InMemoryProductRepository {
    store: RwLock<ProductStore>,
}

struct ProductStore {
    products: BTreeMap<i64, Product>,
    next_id: i64,
}

impl ProductStore {
    fn insert(&mut self, draft: ProductDraft) -> Product {
        let now = Utc::now();
        let product = match draft.id.and_then(|id| self.products.get(&id.0)) {
            Some(existing) => existing.apply_update(draft.fields, now),
            None => {
                let id = draft.id.unwrap_or(ProductId(self.next_id));
                Product::create(id, draft.fields, now)
            }
        };

        self.next_id = self.next_id.max(product.id.0 + 1);
        self.products.insert(product.id.0, product.clone());
        product
    }

    fn filter(&self, predicate: impl Fn(&Product) -> bool) -> Vec<Product> {
        self.products.values().filter(|product| predicate(product)).cloned().collect()
    }
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self { store: RwLock::new(ProductStore { products: BTreeMap::new(), next_id: 1 }) }
    }
}

impl InMemoryProductRepository {
    /// Repository preloaded with the demo catalog.
    pub fn seeded() -> Self {
        let mut store = ProductStore { products: BTreeMap::new(), next_id: 1 };
        for draft in fixtures::product_drafts() {
            store.insert(draft);
        }
        Self { store: RwLock::new(store) }
    }
}

#[async_trait::async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn save(&self, draft: ProductDraft) -> Result<Product, RepositoryError> {
        draft.fields.validate()?;
        let mut store = self.store.write().await;
        let product = store.insert(draft);
        debug!(event_name = "memory.product.saved", product_id = product.id.0, "product saved");
        Ok(product)
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let store = self.store.read().await;
        Ok(store.products.get(&id.0).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let store = self.store.read().await;
        Ok(store.products.values().cloned().collect())
    }

    async fn delete_by_id(&self, id: ProductId) -> Result<(), RepositoryError> {
        let mut store = self.store.write().await;
        store.products.remove(&id.0);
        Ok(())
    }

    async fn find_by_category_id(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let store = self.store.read().await;
        Ok(store.filter(|product| product.in_category(category_id)))
    }

    async fn find_by_name_containing(
        &self,
        keyword: &str,
    ) -> Result<Vec<Product>, RepositoryError> {
        if keyword.is_empty() {
            return Ok(Vec::new());
        }
        let store = self.store.read().await;
        Ok(store.filter(|product| name_contains(product, keyword)))
    }

    async fn find_by_description_containing(
        &self,
        keyword: &str,
    ) -> Result<Vec<Product>, RepositoryError> {
        if keyword.is_empty() {
            return Ok(Vec::new());
        }
        let store = self.store.read().await;
        Ok(store.filter(|product| description_contains(product, keyword)))
    }

    async fn find_by_name_or_description_containing(
        &self,
        keyword: &str,
    ) -> Result<Vec<Product>, RepositoryError> {
        if keyword.is_empty() {
            return Ok(Vec::new());
        }
        let store = self.store.read().await;
        Ok(store.filter(|product| matches_keyword(product, keyword)))
    }
}
