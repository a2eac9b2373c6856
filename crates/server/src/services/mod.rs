pub mod catalog;
pub mod management;

pub use catalog::CatalogBrowsingService;
pub use management::ProductManagementService;
