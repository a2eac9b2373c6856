use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use storefront_core::config::{AppConfig, LoadOptions};
use toml::Value;

/// Key path, rendered value, and primary env override for one effective setting.
struct Field {
    key: &'static str,
    value: String,
    env_key: &'static str,
}

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in effective_fields(&config) {
        let source = field_source(
            field.key,
            field.env_key,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(render_line(field.key, &field.value, source));
    }

    lines.join("\n")
}

fn effective_fields(config: &AppConfig) -> Vec<Field> {
    let field = |key: &'static str, value: String, env_key: &'static str| Field {
        key,
        value,
        env_key,
    };

    vec![
        field(
            "storage.backend",
            config.storage.backend.as_str().to_string(),
            "STOREFRONT_STORAGE_BACKEND",
        ),
        field("database.url", config.database.url.clone(), "STOREFRONT_DATABASE_URL"),
        field(
            "database.max_connections",
            config.database.max_connections.to_string(),
            "STOREFRONT_DATABASE_MAX_CONNECTIONS",
        ),
        field(
            "database.timeout_secs",
            config.database.timeout_secs.to_string(),
            "STOREFRONT_DATABASE_TIMEOUT_SECS",
        ),
        field(
            "server.bind_address",
            config.server.bind_address.clone(),
            "STOREFRONT_SERVER_BIND_ADDRESS",
        ),
        field("server.port", config.server.port.to_string(), "STOREFRONT_SERVER_PORT"),
        field(
            "server.graceful_shutdown_secs",
            config.server.graceful_shutdown_secs.to_string(),
            "STOREFRONT_SERVER_GRACEFUL_SHUTDOWN_SECS",
        ),
        field("logging.level", config.logging.level.clone(), "STOREFRONT_LOGGING_LEVEL"),
        field(
            "logging.format",
            format!("{:?}", config.logging.format).to_ascii_lowercase(),
            "STOREFRONT_LOGGING_FORMAT",
        ),
    ]
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("storefront.toml"), PathBuf::from("config/storefront.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: &str,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if env::var_os(env_key).is_some() {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
