use std::sync::Arc;

use storefront_core::config::{AppConfig, ConfigError, StorageBackend};
use storefront_db::{
    connect_with_settings, migrations, DbPool, InMemoryProductRepository, ProductRepository,
    SqlProductRepository,
};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: Option<DbPool>,
    pub products: Arc<dyn ProductRepository>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        storage_backend = config.storage.backend.as_str(),
        "starting application bootstrap"
    );

    let (db_pool, products): (Option<DbPool>, Arc<dyn ProductRepository>) =
        match config.storage.backend {
            StorageBackend::Sqlite => {
                let pool = connect_with_settings(
                    &config.database.url,
                    config.database.max_connections,
                    config.database.timeout_secs,
                )
                .await
                .map_err(BootstrapError::DatabaseConnect)?;
                info!(
                    event_name = "system.bootstrap.database_connected",
                    correlation_id = "bootstrap",
                    "database connection established"
                );

                migrations::run_pending(&pool).await.map_err(BootstrapError::Migration)?;
                info!(
                    event_name = "system.bootstrap.migrations_applied",
                    correlation_id = "bootstrap",
                    "database migrations applied"
                );

                (Some(pool.clone()), Arc::new(SqlProductRepository::new(pool)))
            }
            StorageBackend::Memory => {
                info!(
                    event_name = "system.bootstrap.memory_storage",
                    correlation_id = "bootstrap",
                    "using in-memory product storage seeded with the demo catalog"
                );
                (None, Arc::new(InMemoryProductRepository::seeded()))
            }
        };

    Ok(Application { config, db_pool, products })
}
