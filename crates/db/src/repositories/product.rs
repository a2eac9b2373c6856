use std::collections::HashMap;

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};
use tracing::debug;

use storefront_core::catalog::{description_contains, matches_keyword, name_contains};
use storefront_core::domain::category::{Category, CategoryId};
use storefront_core::domain::product::{Product, ProductDraft, ProductId};

use super::mapper::{parse_timestamp, row_to_category, row_to_product, PRODUCT_COLUMNS};
use super::{ProductRepository, RepositoryError};
use crate::DbPool;

pub struct SqlProductRepository {
    pool: DbPool,
}

impl SqlProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Keyword finders filter here instead of in SQL: SQLite's `lower()` only folds ASCII.
    async fn fetch_matching<F>(&self, predicate: F) -> Result<Vec<Product>, RepositoryError>
    where
        F: Fn(&Product) -> bool + Send,
    {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM product ORDER BY id");
        let rows: Vec<SqliteRow> = sqlx::query(&sql).fetch_all(&self.pool).await?;
        let mut products = Vec::with_capacity(rows.len());
        for row in &rows {
            let product = row_to_product(row)?;
            if predicate(&product) {
                products.push(product);
            }
        }
        self.hydrate_categories(products).await
    }

    /// Fills `categories` for every product with one query over the join table.
    async fn hydrate_categories(
        &self,
        mut products: Vec<Product>,
    ) -> Result<Vec<Product>, RepositoryError> {
        if products.is_empty() {
            return Ok(products);
        }

        let mut builder: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
            "SELECT pc.product_id, c.id, c.name, c.description, c.parent_id
             FROM product_category pc
             JOIN category c ON c.id = pc.category_id
             WHERE pc.product_id IN (",
        );
        let mut separated = builder.separated(", ");
        for product in &products {
            separated.push_bind(product.id.0);
        }
        separated.push_unseparated(") ORDER BY pc.product_id, c.id");

        let rows = builder.build().fetch_all(&self.pool).await?;
        let mut by_product: HashMap<i64, Vec<Category>> = HashMap::new();
        for row in &rows {
            let product_id: i64 =
                row.try_get("product_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
            by_product.entry(product_id).or_default().push(row_to_category(row)?);
        }

        for product in &mut products {
            if let Some(categories) = by_product.remove(&product.id.0) {
                product.categories = categories;
            }
        }
        Ok(products)
    }
}

#[async_trait::async_trait]
impl ProductRepository for SqlProductRepository {
    async fn save(&self, draft: ProductDraft) -> Result<Product, RepositoryError> {
        draft.fields.validate()?;
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let existing_created_at: Option<String> = match draft.id {
            Some(id) => {
                sqlx::query_scalar("SELECT created_at FROM product WHERE id = ?")
                    .bind(id.0)
                    .fetch_optional(&mut *tx)
                    .await?
            }
            None => None,
        };

        let product_id = match (draft.id, existing_created_at) {
            (Some(id), Some(created_at)) => {
                let mut product = Product::create(id, draft.fields, now);
                product.created_at = parse_timestamp("created_at", &created_at)?;

                sqlx::query(
                    "UPDATE product
                     SET name = ?, description = ?, base_price = ?, current_price = ?,
                         stock_quantity = ?, status = ?, image_url = ?, weight = ?,
                         dimensions = ?, updated_at = ?
                     WHERE id = ?",
                )
                .bind(&product.name)
                .bind(&product.description)
                .bind(product.base_price.to_string())
                .bind(product.current_price.to_string())
                .bind(i64::from(product.stock_quantity))
                .bind(product.status.as_str())
                .bind(&product.image_url)
                .bind(product.weight.map(|value| value.to_string()))
                .bind(product.dimensions.map(|value| value.to_string()))
                .bind(product.updated_at.to_rfc3339())
                .bind(id.0)
                .execute(&mut *tx)
                .await?;

                replace_categories(&mut tx, id, &product.categories).await?;
                id
            }
            (requested_id, _) => {
                // The id is a placeholder until SQLite assigns one.
                let staged = Product::create(ProductId(0), draft.fields, now);

                let result = sqlx::query(
                    "INSERT INTO product (id, name, description, base_price, current_price,
                                          stock_quantity, status, image_url, weight, dimensions,
                                          created_at, updated_at)
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                )
                .bind(requested_id.map(|id| id.0))
                .bind(&staged.name)
                .bind(&staged.description)
                .bind(staged.base_price.to_string())
                .bind(staged.current_price.to_string())
                .bind(i64::from(staged.stock_quantity))
                .bind(staged.status.as_str())
                .bind(&staged.image_url)
                .bind(staged.weight.map(|value| value.to_string()))
                .bind(staged.dimensions.map(|value| value.to_string()))
                .bind(staged.created_at.to_rfc3339())
                .bind(staged.updated_at.to_rfc3339())
                .execute(&mut *tx)
                .await?;

                let id = ProductId(result.last_insert_rowid());
                replace_categories(&mut tx, id, &staged.categories).await?;
                id
            }
        };

        tx.commit().await?;
        debug!(event_name = "db.product.saved", product_id = product_id.0, "product saved");

        self.find_by_id(product_id).await?.ok_or_else(|| {
            RepositoryError::Decode(format!("product {product_id} missing after save"))
        })
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM product WHERE id = ?");
        let row = sqlx::query(&sql).bind(id.0).fetch_optional(&self.pool).await?;

        match row {
            Some(ref r) => {
                let product = row_to_product(r)?;
                Ok(self.hydrate_categories(vec![product]).await?.pop())
            }
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        self.fetch_matching(|_| true).await
    }

    async fn delete_by_id(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM product WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await?;
        debug!(
            event_name = "db.product.deleted",
            product_id = id.0,
            rows_affected = result.rows_affected(),
            "product delete executed"
        );
        Ok(())
    }

    async fn find_by_category_id(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM product
             WHERE id IN (SELECT product_id FROM product_category WHERE category_id = ?)
             ORDER BY id"
        );
        let rows: Vec<SqliteRow> =
            sqlx::query(&sql).bind(category_id.0).fetch_all(&self.pool).await?;
        let products = rows.iter().map(row_to_product).collect::<Result<Vec<_>, _>>()?;
        self.hydrate_categories(products).await
    }

    async fn find_by_name_containing(
        &self,
        keyword: &str,
    ) -> Result<Vec<Product>, RepositoryError> {
        if keyword.is_empty() {
            return Ok(Vec::new());
        }
        self.fetch_matching(|product| name_contains(product, keyword)).await
    }

    async fn find_by_description_containing(
        &self,
        keyword: &str,
    ) -> Result<Vec<Product>, RepositoryError> {
        if keyword.is_empty() {
            return Ok(Vec::new());
        }
        self.fetch_matching(|product| description_contains(product, keyword)).await
    }

    async fn find_by_name_or_description_containing(
        &self,
        keyword: &str,
    ) -> Result<Vec<Product>, RepositoryError> {
        if keyword.is_empty() {
            return Ok(Vec::new());
        }
        self.fetch_matching(|product| matches_keyword(product, keyword)).await
    }
}

/// Rewrites the join rows for one product. Unknown categories are registered
/// first; a parent that does not exist yet is stored as NULL.
async fn replace_categories(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    product_id: ProductId,
    categories: &[Category],
) -> Result<(), RepositoryError> {
    sqlx::query("DELETE FROM product_category WHERE product_id = ?")
        .bind(product_id.0)
        .execute(&mut **tx)
        .await?;

    for category in categories {
        sqlx::query(
            "INSERT INTO category (id, name, description, parent_id)
             VALUES (?, ?, ?, (SELECT id FROM category WHERE id = ?))
             ON CONFLICT(id) DO NOTHING",
        )
        .bind(category.id.0)
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.parent_id.map(|parent| parent.0))
        .execute(&mut **tx)
        .await?;

        sqlx::query("INSERT INTO product_category (product_id, category_id) VALUES (?, ?)")
            .bind(product_id.0)
            .bind(category.id.0)
            .execute(&mut **tx)
            .await?;
    }

    Ok(())
}
