pub mod connection;
pub mod fixtures;
pub mod migrations;
pub mod repositories;

pub use connection::{connect, connect_with_settings, DbPool};
pub use fixtures::{CatalogSeed, SeedResult, VerificationResult};
pub use repositories::{
    CategoryRepository, InMemoryProductRepository, ProductRepository, RepositoryError,
    SqlCategoryRepository, SqlProductRepository,
};
