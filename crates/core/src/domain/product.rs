use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::{Category, CategoryId};
use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    /// Available for purchase and shown in the catalog.
    #[default]
    Active,
    /// No longer sold.
    Discontinued,
    /// Temporarily unavailable.
    OutOfStock,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Discontinued => "DISCONTINUED",
            Self::OutOfStock => "OUT_OF_STOCK",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Some(Self::Active),
            "DISCONTINUED" => Some(Self::Discontinued),
            "OUT_OF_STOCK" => Some(Self::OutOfStock),
            _ => None,
        }
    }
}

/// Every attribute of a product that an update replaces.
///
/// Prices are independent of each other: `current_price` below `base_price`
/// represents a discount, but nothing requires it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFields {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub base_price: Decimal,
    pub current_price: Decimal,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub stock_quantity: u32,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub weight: Option<Decimal>,
    #[serde(default)]
    pub dimensions: Option<Decimal>,
}

impl ProductFields {
    pub fn new(name: impl Into<String>, base_price: Decimal, current_price: Decimal) -> Self {
        Self {
            name: name.into(),
            description: None,
            base_price,
            current_price,
            categories: Vec::new(),
            image_url: None,
            stock_quantity: 0,
            status: ProductStatus::Active,
            weight: None,
            dimensions: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.push(category);
        self
    }

    pub fn with_stock(mut self, stock_quantity: u32) -> Self {
        self.stock_quantity = stock_quantity;
        self
    }

    pub fn with_status(mut self, status: ProductStatus) -> Self {
        self.status = status;
        self
    }

    /// Prices may be zero but never negative.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.base_price < Decimal::ZERO {
            return Err(DomainError::InvariantViolation(format!(
                "base price must not be negative: {}",
                self.base_price
            )));
        }
        if self.current_price < Decimal::ZERO {
            return Err(DomainError::InvariantViolation(format!(
                "current price must not be negative: {}",
                self.current_price
            )));
        }
        Ok(())
    }

    fn normalized(mut self) -> Self {
        let mut seen = Vec::with_capacity(self.categories.len());
        self.categories.retain(|category| {
            if seen.contains(&category.id) {
                false
            } else {
                seen.push(category.id);
                true
            }
        });
        self
    }
}

/// Input to a repository save: no id means "assign one".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductDraft {
    pub id: Option<ProductId>,
    pub fields: ProductFields,
}

impl ProductDraft {
    pub fn new(fields: ProductFields) -> Self {
        Self { id: None, fields }
    }

    pub fn with_id(id: ProductId, fields: ProductFields) -> Self {
        Self { id: Some(id), fields }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub base_price: Decimal,
    pub current_price: Decimal,
    pub categories: Vec<Category>,
    pub image_url: Option<String>,
    pub stock_quantity: u32,
    pub status: ProductStatus,
    pub weight: Option<Decimal>,
    pub dimensions: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn create(id: ProductId, fields: ProductFields, now: DateTime<Utc>) -> Self {
        let fields = fields.normalized();
        Self {
            id,
            name: fields.name,
            description: fields.description,
            base_price: fields.base_price,
            current_price: fields.current_price,
            categories: fields.categories,
            image_url: fields.image_url,
            stock_quantity: fields.stock_quantity,
            status: fields.status,
            weight: fields.weight,
            dimensions: fields.dimensions,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full replace of the mutable attributes. `id` and `created_at` survive.
    pub fn apply_update(&self, fields: ProductFields, now: DateTime<Utc>) -> Self {
        let mut updated = Self::create(self.id, fields, now);
        updated.created_at = self.created_at;
        updated
    }

    pub fn fields(&self) -> ProductFields {
        ProductFields {
            name: self.name.clone(),
            description: self.description.clone(),
            base_price: self.base_price,
            current_price: self.current_price,
            categories: self.categories.clone(),
            image_url: self.image_url.clone(),
            stock_quantity: self.stock_quantity,
            status: self.status,
            weight: self.weight,
            dimensions: self.dimensions,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }

    pub fn in_category(&self, category_id: CategoryId) -> bool {
        self.categories.iter().any(|category| category.id == category_id)
    }
}
