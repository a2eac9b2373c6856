pub mod config;
pub mod migrate;
pub mod seed;

use serde::Serialize;
use storefront_core::config::{AppConfig, LoadOptions, StorageBackend};
use storefront_db::{connect_with_settings, migrations, DbPool};
use tokio::runtime::Runtime;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

/// `(error_class, message, exit_code)` raised inside a command's async block.
pub(crate) type CommandFailure = (&'static str, String, u8);

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

/// Loads config, insists on the sqlite backend, and builds a current-thread runtime.
fn prepare(command: &str) -> Result<(AppConfig, Runtime), CommandResult> {
    let config = AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            2,
        )
    })?;

    if config.storage.backend != StorageBackend::Sqlite {
        return Err(CommandResult::failure(
            command,
            "storage_backend",
            format!(
                "`{command}` needs the sqlite backend; storage.backend is `{}`",
                config.storage.backend.as_str()
            ),
            2,
        ));
    }

    let runtime =
        tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(|error| {
            CommandResult::failure(
                command,
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            )
        })?;

    Ok((config, runtime))
}

async fn open_migrated_pool(config: &AppConfig) -> Result<DbPool, CommandFailure> {
    let pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

    if let Err(error) = migrations::run_pending(&pool).await {
        pool.close().await;
        return Err(("migration", error.to_string(), 5u8));
    }
    Ok(pool)
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        let message = error.to_string().replace('\\', "\\\\").replace('"', "\\\"");
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\
             \"error_class\":\"serialization\",\"message\":\"{message}\"}}"
        )
    })
}
