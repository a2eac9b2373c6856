use sqlx::sqlite::SqliteRow;

use storefront_core::domain::category::{Category, CategoryId};
use storefront_core::domain::product::ProductId;

use super::mapper::{row_to_category, CATEGORY_COLUMNS};
use super::{CategoryRepository, RepositoryError};
use crate::DbPool;

pub struct SqlCategoryRepository {
    pool: DbPool,
}

impl SqlCategoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CategoryRepository for SqlCategoryRepository {
    async fn save(&self, category: Category) -> Result<Category, RepositoryError> {
        sqlx::query(
            "INSERT INTO category (id, name, description, parent_id)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 name = excluded.name,
                 description = excluded.description,
                 parent_id = excluded.parent_id",
        )
        .bind(category.id.0)
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.parent_id.map(|parent| parent.0))
        .execute(&self.pool)
        .await?;

        Ok(category)
    }

    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM category WHERE id = ?");
        let row = sqlx::query(&sql).bind(id.0).fetch_optional(&self.pool).await?;

        match row {
            Some(ref r) => Ok(Some(row_to_category(r)?)),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> Result<Vec<Category>, RepositoryError> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM category ORDER BY id");
        let rows: Vec<SqliteRow> = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter().map(row_to_category).collect::<Result<Vec<_>, _>>()
    }

    async fn find_children(&self, parent_id: CategoryId) -> Result<Vec<Category>, RepositoryError> {
        let sql =
            format!("SELECT {CATEGORY_COLUMNS} FROM category WHERE parent_id = ? ORDER BY id");
        let rows: Vec<SqliteRow> =
            sqlx::query(&sql).bind(parent_id.0).fetch_all(&self.pool).await?;

        rows.iter().map(row_to_category).collect::<Result<Vec<_>, _>>()
    }

    async fn find_product_ids(&self, id: CategoryId) -> Result<Vec<ProductId>, RepositoryError> {
        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT product_id FROM product_category WHERE category_id = ? ORDER BY product_id",
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().map(ProductId).collect())
    }
}
