//! Read-only catalog views. Every list served from here is limited to
//! ACTIVE products.

use std::sync::Arc;

use storefront_core::catalog::{
    active_only, apply_browse_filters, filter_by_price_range, sort_by_price, BrowseQuery,
    PriceRange, SortDirection,
};
use storefront_core::domain::category::CategoryId;
use storefront_core::domain::product::Product;
use storefront_core::errors::ApplicationError;
use storefront_db::ProductRepository;
use tracing::debug;

#[derive(Clone)]
pub struct CatalogBrowsingService {
    products: Arc<dyn ProductRepository>,
}

impl CatalogBrowsingService {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }

    pub async fn all_active_products(&self) -> Result<Vec<Product>, ApplicationError> {
        Ok(active_only(self.products.find_all().await?))
    }

    pub async fn products_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, ApplicationError> {
        Ok(active_only(self.products.find_by_category_id(category_id).await?))
    }

    pub async fn search_products(&self, keyword: &str) -> Result<Vec<Product>, ApplicationError> {
        Ok(active_only(self.products.find_by_name_or_description_containing(keyword).await?))
    }

    pub async fn search_products_by_name(
        &self,
        keyword: &str,
    ) -> Result<Vec<Product>, ApplicationError> {
        Ok(active_only(self.products.find_by_name_containing(keyword).await?))
    }

    pub async fn search_products_by_description(
        &self,
        keyword: &str,
    ) -> Result<Vec<Product>, ApplicationError> {
        Ok(active_only(self.products.find_by_description_containing(keyword).await?))
    }

    pub fn sort_products_by_price_asc(&self, products: Vec<Product>) -> Vec<Product> {
        sort_by_price(products, SortDirection::Ascending)
    }

    pub fn sort_products_by_price_desc(&self, products: Vec<Product>) -> Vec<Product> {
        sort_by_price(products, SortDirection::Descending)
    }

    pub fn filter_by_price_range(
        &self,
        products: Vec<Product>,
        range: &PriceRange,
    ) -> Vec<Product> {
        filter_by_price_range(products, range)
    }

    /// Category (or all active) selection, then keyword, price range and sort.
    pub async fn browse(&self, query: &BrowseQuery) -> Result<Vec<Product>, ApplicationError> {
        let selected = match query.category_id {
            Some(category_id) => self.products_by_category(category_id).await?,
            None => self.all_active_products().await?,
        };
        let selected_count = selected.len();
        let products = apply_browse_filters(selected, query);

        debug!(
            event_name = "catalog.browse.completed",
            category_id = query.category_id.map(|id| id.0),
            sort = ?query.sort,
            selected = selected_count,
            returned = products.len(),
            "catalog browse completed"
        );
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use storefront_core::catalog::{BrowseQuery, PriceRange, SortMode};
    use storefront_core::domain::category::CategoryId;
    use storefront_core::domain::product::{Product, ProductDraft, ProductFields, ProductStatus};
    use storefront_db::{InMemoryProductRepository, ProductRepository};

    use super::CatalogBrowsingService;

    fn names(products: &[Product]) -> Vec<&str> {
        products.iter().map(|product| product.name.as_str()).collect()
    }

    fn seeded() -> CatalogBrowsingService {
        CatalogBrowsingService::new(Arc::new(InMemoryProductRepository::seeded()))
    }

    #[tokio::test]
    async fn active_listing_hides_unavailable_products() {
        let active = seeded().all_active_products().await.expect("active products");

        assert_eq!(active.len(), 9);
        assert!(active.iter().all(Product::is_active));
        assert!(!names(&active).contains(&"Smart Watch"));
    }

    #[tokio::test]
    async fn active_listing_matches_small_catalog_example() {
        let repo = Arc::new(InMemoryProductRepository::default());
        for (name, cents, status) in [
            ("A", 3999, ProductStatus::Active),
            ("B", 64999, ProductStatus::Active),
            ("C", 19999, ProductStatus::Discontinued),
        ] {
            let price = Decimal::new(cents, 2);
            repo.save(ProductDraft::new(ProductFields::new(name, price, price).with_status(status)))
                .await
                .expect("save product");
        }
        let service = CatalogBrowsingService::new(repo);

        let active = service.all_active_products().await.expect("active");
        assert_eq!(names(&active), vec!["A", "B"]);
        assert_eq!(names(&service.sort_products_by_price_asc(active.clone())), vec!["A", "B"]);

        let range = PriceRange::new(Some(Decimal::new(40, 0)), Some(Decimal::new(700, 0)));
        assert_eq!(names(&service.filter_by_price_range(active, &range)), vec!["B"]);
    }

    #[tokio::test]
    async fn category_listing_is_active_only() {
        let electronics =
            seeded().products_by_category(CategoryId(1)).await.expect("electronics");

        assert_eq!(names(&electronics), vec!["Smartphone X", "Laptop Pro", "Wireless Headphones"]);
    }

    #[tokio::test]
    async fn search_matches_name_or_description_of_active_products() {
        let service = seeded();

        let smart = service.search_products("SMART").await.expect("search");
        assert_eq!(names(&smart), vec!["Smartphone X"]);

        let by_description = service.search_products("denim").await.expect("search");
        assert_eq!(names(&by_description), vec!["Designer Jeans"]);

        assert!(service.search_products("tablet").await.expect("search").is_empty());
        assert!(service.search_products("").await.expect("search").is_empty());
    }

    #[tokio::test]
    async fn name_and_description_searches_are_separate() {
        let service = seeded();

        let by_name = service.search_products_by_name("vase").await.expect("by name");
        assert_eq!(names(&by_name), vec!["Decorative Vase"]);

        let by_description =
            service.search_products_by_description("vase").await.expect("by description");
        assert_eq!(names(&by_description), vec!["Decorative Vase"]);

        assert!(service.search_products_by_name("ceramic").await.expect("by name").is_empty());
        assert!(service
            .search_products_by_description("smartwatch")
            .await
            .expect("inactive")
            .is_empty());
    }

    #[tokio::test]
    async fn price_sorts_mirror_each_other() {
        let service = seeded();
        let active = service.all_active_products().await.expect("active");

        let asc = service.sort_products_by_price_asc(active.clone());
        let mut desc = service.sort_products_by_price_desc(active);
        desc.reverse();

        assert_eq!(asc, desc);
        assert_eq!(asc.first().map(|p| p.name.as_str()), Some("Classic T-Shirt"));
        assert_eq!(asc.last().map(|p| p.name.as_str()), Some("Laptop Pro"));
    }

    #[tokio::test]
    async fn browse_runs_the_full_pipeline() {
        let query = BrowseQuery {
            keyword: None,
            category_id: Some(CategoryId(1)),
            price: PriceRange::new(Some(Decimal::new(150, 0)), None),
            sort: SortMode::PriceAsc,
        };

        let products = seeded().browse(&query).await.expect("browse");

        assert_eq!(names(&products), vec!["Wireless Headphones", "Smartphone X", "Laptop Pro"]);
    }

    #[tokio::test]
    async fn browse_with_keyword_and_default_sort_keeps_storage_order() {
        let query = BrowseQuery {
            keyword: Some("o".to_string()),
            category_id: None,
            price: PriceRange::new(None, Some(Decimal::new(60, 0))),
            sort: SortMode::from_param("default"),
        };

        let products = seeded().browse(&query).await.expect("browse");

        assert_eq!(
            names(&products),
            vec!["Classic T-Shirt", "Programming Guide", "Novel Collection", "Decorative Vase"]
        );
    }
}
