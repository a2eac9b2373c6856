use std::sync::Arc;

use storefront_core::domain::category::CategoryId;
use storefront_core::domain::product::{Product, ProductDraft, ProductFields, ProductId};
use storefront_core::errors::{ApplicationError, DomainError};
use storefront_db::ProductRepository;
use tracing::{info, warn};

/// Admin-side product operations.
///
/// Updates read the current product and then save it; the two steps are not
/// atomic, so two concurrent updates of one product can lose one of them.
#[derive(Clone)]
pub struct ProductManagementService {
    products: Arc<dyn ProductRepository>,
}

impl ProductManagementService {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }

    pub async fn create_product(&self, fields: ProductFields) -> Result<Product, ApplicationError> {
        let product = self.products.save(ProductDraft::new(fields)).await?;
        info!(
            event_name = "catalog.product.created",
            product_id = product.id.0,
            status = product.status.as_str(),
            "product created"
        );
        Ok(product)
    }

    /// Full replace. Fails without touching the repository when `id` is unknown.
    pub async fn update_product(
        &self,
        id: ProductId,
        fields: ProductFields,
    ) -> Result<Product, ApplicationError> {
        if self.products.find_by_id(id).await?.is_none() {
            warn!(
                event_name = "catalog.product.update_missing",
                product_id = id.0,
                "product not found"
            );
            return Err(DomainError::ProductNotFound { id }.into());
        }

        let product = self.products.save(ProductDraft::with_id(id, fields)).await?;
        info!(event_name = "catalog.product.updated", product_id = id.0, "product updated");
        Ok(product)
    }

    pub async fn update_stock(
        &self,
        id: ProductId,
        quantity: u32,
    ) -> Result<Product, ApplicationError> {
        let current = self
            .products
            .find_by_id(id)
            .await?
            .ok_or(DomainError::ProductNotFound { id })?;

        let mut fields = current.fields();
        fields.stock_quantity = quantity;
        let product = self.products.save(ProductDraft::with_id(id, fields)).await?;
        info!(
            event_name = "catalog.product.stock_updated",
            product_id = id.0,
            stock_quantity = quantity,
            "product stock updated"
        );
        Ok(product)
    }

    /// Idempotent.
    pub async fn delete_product(&self, id: ProductId) -> Result<(), ApplicationError> {
        self.products.delete_by_id(id).await?;
        info!(event_name = "catalog.product.deleted", product_id = id.0, "product deleted");
        Ok(())
    }

    pub async fn all_products(&self) -> Result<Vec<Product>, ApplicationError> {
        Ok(self.products.find_all().await?)
    }

    pub async fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, ApplicationError> {
        Ok(self.products.find_by_id(id).await?)
    }

    pub async fn products_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, ApplicationError> {
        Ok(self.products.find_by_category_id(category_id).await?)
    }

    /// Name substring match over every status.
    pub async fn search_products(&self, keyword: &str) -> Result<Vec<Product>, ApplicationError> {
        Ok(self.products.find_by_name_containing(keyword).await?)
    }
}
