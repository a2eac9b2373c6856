use std::env;
use std::sync::{Mutex, OnceLock};

use serde_json::Value;
use storefront_cli::commands::{config, migrate, seed};
use tempfile::TempDir;

#[test]
fn migrate_returns_success_with_valid_env() {
    with_env(&[("STOREFRONT_DATABASE_URL", "sqlite::memory:")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 0, "expected successful migrate run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["error_class"], Value::Null);
    });
}

#[test]
fn migrate_rejects_non_sqlite_url() {
    with_env(&[("STOREFRONT_DATABASE_URL", "postgres://localhost/catalog")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn migrate_refuses_memory_backend() {
    with_env(&[("STOREFRONT_STORAGE_BACKEND", "memory")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 2);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["error_class"], "storage_backend");
    });
}

#[test]
fn seed_reports_demo_catalog_counts() {
    with_env(&[("STOREFRONT_DATABASE_URL", "sqlite::memory:")], || {
        let result = seed::run();
        assert_eq!(result.exit_code, 0, "expected seed success");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "seed");
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["message"], "demo catalog loaded: 4 categories, 10 products");
    });
}

#[test]
fn seed_is_idempotent_across_runs() {
    let dir = TempDir::new().expect("temp dir");
    let url = format!("sqlite://{}", dir.path().join("catalog.db").display());

    with_env(&[("STOREFRONT_DATABASE_URL", url.as_str())], || {
        let first = seed::run();
        assert_eq!(first.exit_code, 0, "expected first seed invocation success");
        let first_payload = parse_payload(&first.output);

        let second = seed::run();
        assert_eq!(second.exit_code, 0, "expected second seed invocation success");
        let second_payload = parse_payload(&second.output);

        assert_eq!(first_payload["message"], second_payload["message"]);
    });
}

#[test]
fn config_attributes_env_overrides() {
    with_env(&[("STOREFRONT_SERVER_PORT", "9191")], || {
        let output = config::run();

        assert!(output.starts_with("effective config"));
        assert!(output.contains("- server.port = 9191 (source: env (STOREFRONT_SERVER_PORT))"));
        assert!(output.contains("- storage.backend = sqlite (source: default)"));
    });
}

#[test]
fn config_reports_validation_failure() {
    with_env(&[("STOREFRONT_LOGGING_LEVEL", "verbose")], || {
        let output = config::run();
        assert!(output.starts_with("config validation failed"));
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "STOREFRONT_STORAGE_BACKEND",
        "STOREFRONT_DATABASE_URL",
        "STOREFRONT_DATABASE_MAX_CONNECTIONS",
        "STOREFRONT_DATABASE_TIMEOUT_SECS",
        "STOREFRONT_SERVER_BIND_ADDRESS",
        "STOREFRONT_SERVER_PORT",
        "STOREFRONT_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "STOREFRONT_LOGGING_LEVEL",
        "STOREFRONT_LOGGING_FORMAT",
        "STOREFRONT_LOG_LEVEL",
        "STOREFRONT_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
