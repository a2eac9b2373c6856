use rust_decimal::Decimal;

use storefront_core::domain::category::{Category, CategoryId};
use storefront_core::domain::product::{ProductDraft, ProductFields, ProductId, ProductStatus};

use crate::repositories::{CategoryRepository, ProductRepository, RepositoryError};

const CATEGORIES: &[CategoryFixture] = &[
    CategoryFixture { id: 1, name: "Electronics", description: "Electronic devices and gadgets" },
    CategoryFixture { id: 2, name: "Clothing", description: "Apparel and fashion items" },
    CategoryFixture { id: 3, name: "Books", description: "Books and publications" },
    CategoryFixture { id: 4, name: "Home Decor", description: "Items for home decoration" },
];

/// Prices are in cents.
const PRODUCTS: &[ProductFixture] = &[
    ProductFixture {
        id: 1,
        name: "Smartphone X",
        description: "Latest smartphone with advanced features",
        base_price: 69999,
        current_price: 64999,
        category_id: 1,
        stock_quantity: 50,
        status: ProductStatus::Active,
    },
    ProductFixture {
        id: 2,
        name: "Laptop Pro",
        description: "High-performance laptop for professionals",
        base_price: 129999,
        current_price: 119999,
        category_id: 1,
        stock_quantity: 25,
        status: ProductStatus::Active,
    },
    ProductFixture {
        id: 3,
        name: "Wireless Headphones",
        description: "Noise-cancelling wireless headphones",
        base_price: 19999,
        current_price: 17999,
        category_id: 1,
        stock_quantity: 100,
        status: ProductStatus::Active,
    },
    ProductFixture {
        id: 4,
        name: "Classic T-Shirt",
        description: "Comfortable cotton t-shirt",
        base_price: 2999,
        current_price: 2499,
        category_id: 2,
        stock_quantity: 200,
        status: ProductStatus::Active,
    },
    ProductFixture {
        id: 5,
        name: "Designer Jeans",
        description: "Premium denim jeans",
        base_price: 8999,
        current_price: 7999,
        category_id: 2,
        stock_quantity: 75,
        status: ProductStatus::Active,
    },
    ProductFixture {
        id: 6,
        name: "Programming Guide",
        description: "Comprehensive programming reference",
        base_price: 4999,
        current_price: 3999,
        category_id: 3,
        stock_quantity: 30,
        status: ProductStatus::Active,
    },
    ProductFixture {
        id: 7,
        name: "Novel Collection",
        description: "Bestselling novels collection",
        base_price: 5999,
        current_price: 4999,
        category_id: 3,
        stock_quantity: 20,
        status: ProductStatus::Active,
    },
    ProductFixture {
        id: 8,
        name: "Decorative Vase",
        description: "Elegant ceramic vase",
        base_price: 3999,
        current_price: 3499,
        category_id: 4,
        stock_quantity: 40,
        status: ProductStatus::Active,
    },
    ProductFixture {
        id: 9,
        name: "Wall Art",
        description: "Modern wall painting",
        base_price: 14999,
        current_price: 12999,
        category_id: 4,
        stock_quantity: 15,
        status: ProductStatus::Active,
    },
    ProductFixture {
        id: 10,
        name: "Smart Watch",
        description: "Fitness tracking smartwatch",
        base_price: 24999,
        current_price: 22999,
        category_id: 1,
        stock_quantity: 0,
        status: ProductStatus::OutOfStock,
    },
];

#[derive(Debug, Clone, Copy)]
struct CategoryFixture {
    id: i64,
    name: &'static str,
    description: &'static str,
}

impl CategoryFixture {
    fn to_category(self) -> Category {
        Category::new(self.id, self.name, self.description)
    }
}

#[derive(Debug, Clone, Copy)]
struct ProductFixture {
    id: i64,
    name: &'static str,
    description: &'static str,
    base_price: i64,
    current_price: i64,
    category_id: i64,
    stock_quantity: u32,
    status: ProductStatus,
}

impl ProductFixture {
    fn to_draft(self) -> ProductDraft {
        let category = CATEGORIES
            .iter()
            .find(|category| category.id == self.category_id)
            .map(|category| category.to_category());

        let mut fields = ProductFields::new(
            self.name,
            Decimal::new(self.base_price, 2),
            Decimal::new(self.current_price, 2),
        )
        .with_description(self.description)
        .with_stock(self.stock_quantity)
        .with_status(self.status);
        if let Some(category) = category {
            fields = fields.with_category(category);
        }

        ProductDraft::with_id(ProductId(self.id), fields)
    }
}

pub fn categories() -> Vec<Category> {
    CATEGORIES.iter().map(|fixture| fixture.to_category()).collect()
}

/// Demo products with fixed ids, so saving them twice updates in place.
pub fn product_drafts() -> Vec<ProductDraft> {
    PRODUCTS.iter().map(|fixture| fixture.to_draft()).collect()
}

/// Demo catalog: four categories and ten products, one of them out of stock.
pub struct CatalogSeed;

impl CatalogSeed {
    pub async fn load(
        categories: &dyn CategoryRepository,
        products: &dyn ProductRepository,
    ) -> Result<SeedResult, RepositoryError> {
        for category in self::categories() {
            categories.save(category).await?;
        }
        for draft in product_drafts() {
            products.save(draft).await?;
        }

        Ok(SeedResult { categories_seeded: CATEGORIES.len(), products_seeded: PRODUCTS.len() })
    }

    /// Checks every fixture row by id, name, status and category link.
    pub async fn verify(
        categories: &dyn CategoryRepository,
        products: &dyn ProductRepository,
    ) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        for fixture in CATEGORIES {
            let found = categories.find_by_id(CategoryId(fixture.id)).await?;
            let matches = found.is_some_and(|category| category.name == fixture.name);
            checks.push((fixture.name, matches));
        }

        for fixture in PRODUCTS {
            let found = products.find_by_id(ProductId(fixture.id)).await?;
            let matches = found.is_some_and(|product| {
                product.name == fixture.name
                    && product.status == fixture.status
                    && product.in_category(CategoryId(fixture.category_id))
            });
            checks.push((fixture.name, matches));
        }

        let all_present = checks.iter().all(|(_, ok)| *ok);
        Ok(VerificationResult { all_present, checks })
    }
}

#[derive(Debug)]
pub struct SeedResult {
    pub categories_seeded: usize,
    pub products_seeded: usize,
}

#[derive(Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}
