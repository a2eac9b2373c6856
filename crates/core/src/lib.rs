pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;

pub use catalog::{BrowseQuery, PriceRange, SortDirection, SortMode};
pub use domain::category::{Category, CategoryId};
pub use domain::product::{Product, ProductDraft, ProductFields, ProductId, ProductStatus};
pub use errors::{ApplicationError, DomainError, InterfaceError};
