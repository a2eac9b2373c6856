//! HTTP surface.
//!
//! - `/api/admin/products/...` product CRUD and stock patch
//! - `/api/catalog/...`        active-product browsing
//!
//! Failures are answered with `{ "error", "correlationId" }`. The
//! correlation id is also attached to the log event for the failure.

use std::sync::Arc;

use axum::{http::StatusCode, Json, Router};
use serde::Serialize;
use storefront_core::errors::{ApplicationError, InterfaceError};
use storefront_db::ProductRepository;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use uuid::Uuid;

use crate::services::{CatalogBrowsingService, ProductManagementService};

pub mod admin;
pub mod catalog;

#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogBrowsingService,
    pub management: ProductManagementService,
}

impl AppState {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self {
            catalog: CatalogBrowsingService::new(products.clone()),
            management: ProductManagementService::new(products),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub error: String,
    pub correlation_id: String,
}

pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/admin/products", admin::router())
        .nest("/api/catalog", catalog::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Maps an application failure to its HTTP answer under a fresh correlation id.
pub fn error_response(
    operation: &'static str,
    error: ApplicationError,
) -> (StatusCode, Json<ApiError>) {
    let interface = error.into_interface(Uuid::new_v4().to_string());
    let status = match interface {
        InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        error!(
            event_name = "http.request.failed",
            operation,
            correlation_id = interface.correlation_id(),
            error = %interface,
            "request failed"
        );
    } else {
        info!(
            event_name = "http.request.rejected",
            operation,
            correlation_id = interface.correlation_id(),
            error = %interface,
            "request rejected"
        );
    }

    let body = ApiError {
        error: interface.user_message().to_string(),
        correlation_id: interface.correlation_id().to_string(),
    };
    (status, Json(body))
}
