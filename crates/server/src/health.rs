use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use storefront_core::config::StorageBackend;
use storefront_db::DbPool;

#[derive(Clone)]
pub struct HealthState {
    backend: StorageBackend,
    db_pool: Option<DbPool>,
}

impl HealthState {
    pub fn new(backend: StorageBackend, db_pool: Option<DbPool>) -> Self {
        Self { backend, db_pool }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub storage: HealthCheck,
    pub checked_at: String,
}

pub fn router(state: HealthState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let storage = storage_check(&state).await;
    let ready = storage.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "storefront-server runtime initialized".to_string(),
        },
        storage,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

async fn storage_check(state: &HealthState) -> HealthCheck {
    let Some(pool) = &state.db_pool else {
        return HealthCheck {
            status: "ready",
            detail: format!("{} backend needs no connection", state.backend.as_str()),
        };
    };

    match sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(pool).await {
        Ok(_) => HealthCheck { status: "ready", detail: "database query succeeded".to_string() },
        Err(error) => {
            HealthCheck { status: "degraded", detail: format!("database query failed: {error}") }
        }
    }
}
