use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use storefront_core::domain::category::{Category, CategoryId};
use storefront_core::domain::product::{Product, ProductId, ProductStatus};

use super::RepositoryError;

pub(super) const PRODUCT_COLUMNS: &str = "id, name, description, base_price, current_price, \
     stock_quantity, status, image_url, weight, dimensions, created_at, updated_at";

pub(super) const CATEGORY_COLUMNS: &str = "id, name, description, parent_id";

fn column<'r, T>(row: &'r SqliteRow, name: &str) -> Result<T, RepositoryError>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(name).map_err(|e| RepositoryError::Decode(e.to_string()))
}

pub(super) fn parse_decimal(field: &str, raw: &str) -> Result<Decimal, RepositoryError> {
    Decimal::from_str(raw)
        .map_err(|e| RepositoryError::Decode(format!("{field} is not a decimal ({raw}): {e}")))
}

pub(super) fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Decode(format!("{field} is not RFC 3339 ({raw}): {e}")))
}

/// Maps a `product` row. Categories are hydrated separately.
pub(super) fn row_to_product(row: &SqliteRow) -> Result<Product, RepositoryError> {
    let base_price: String = column(row, "base_price")?;
    let current_price: String = column(row, "current_price")?;
    let stock_quantity: i64 = column(row, "stock_quantity")?;
    let status: String = column(row, "status")?;
    let weight: Option<String> = column(row, "weight")?;
    let dimensions: Option<String> = column(row, "dimensions")?;
    let created_at: String = column(row, "created_at")?;
    let updated_at: String = column(row, "updated_at")?;

    Ok(Product {
        id: ProductId(column(row, "id")?),
        name: column(row, "name")?,
        description: column(row, "description")?,
        base_price: parse_decimal("base_price", &base_price)?,
        current_price: parse_decimal("current_price", &current_price)?,
        categories: Vec::new(),
        image_url: column(row, "image_url")?,
        stock_quantity: u32::try_from(stock_quantity).map_err(|_| {
            RepositoryError::Decode(format!("stock_quantity out of range: {stock_quantity}"))
        })?,
        status: ProductStatus::parse(&status)
            .ok_or_else(|| RepositoryError::Decode(format!("unknown product status: {status}")))?,
        weight: weight.as_deref().map(|raw| parse_decimal("weight", raw)).transpose()?,
        dimensions: dimensions.as_deref().map(|raw| parse_decimal("dimensions", raw)).transpose()?,
        created_at: parse_timestamp("created_at", &created_at)?,
        updated_at: parse_timestamp("updated_at", &updated_at)?,
    })
}

pub(super) fn row_to_category(row: &SqliteRow) -> Result<Category, RepositoryError> {
    let parent_id: Option<i64> = column(row, "parent_id")?;
    Ok(Category {
        id: CategoryId(column(row, "id")?),
        name: column(row, "name")?,
        description: column(row, "description")?,
        parent_id: parent_id.map(CategoryId),
    })
}
