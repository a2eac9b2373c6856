use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;
use storefront_core::domain::category::CategoryId;
use storefront_core::domain::product::{Product, ProductFields, ProductId};
use storefront_core::errors::DomainError;

use super::{error_response, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct StockParams {
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct NameSearchParams {
    pub name: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/{id}", get(get_product).put(update_product).delete(delete_product))
        .route("/{id}/stock", patch(update_stock))
        .route("/category/{category_id}", get(products_by_category))
        .route("/search", get(search_by_name))
}

async fn create_product(
    State(state): State<AppState>,
    Json(fields): Json<ProductFields>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let product = state
        .management
        .create_product(fields)
        .await
        .map_err(|e| error_response("admin.create_product", e))?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    let products = state
        .management
        .all_products()
        .await
        .map_err(|e| error_response("admin.list_products", e))?;
    Ok(Json(products))
}

async fn get_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> ApiResult<Json<Product>> {
    let id = ProductId(id);
    let product = state
        .management
        .product_by_id(id)
        .await
        .and_then(|found| found.ok_or_else(|| DomainError::ProductNotFound { id }.into()))
        .map_err(|e| error_response("admin.get_product", e))?;
    Ok(Json(product))
}

async fn update_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(fields): Json<ProductFields>,
) -> ApiResult<Json<Product>> {
    let product = state
        .management
        .update_product(ProductId(id), fields)
        .await
        .map_err(|e| error_response("admin.update_product", e))?;
    Ok(Json(product))
}

async fn delete_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> ApiResult<StatusCode> {
    state
        .management
        .delete_product(ProductId(id))
        .await
        .map_err(|e| error_response("admin.delete_product", e))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_stock(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Query(params): Query<StockParams>,
) -> ApiResult<Json<Product>> {
    let product = state
        .management
        .update_stock(ProductId(id), params.quantity)
        .await
        .map_err(|e| error_response("admin.update_stock", e))?;
    Ok(Json(product))
}

async fn products_by_category(
    Path(category_id): Path<i64>,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Product>>> {
    let products = state
        .management
        .products_by_category(CategoryId(category_id))
        .await
        .map_err(|e| error_response("admin.products_by_category", e))?;
    Ok(Json(products))
}

async fn search_by_name(
    State(state): State<AppState>,
    Query(params): Query<NameSearchParams>,
) -> ApiResult<Json<Vec<Product>>> {
    let products = state
        .management
        .search_products(&params.name)
        .await
        .map_err(|e| error_response("admin.search_products", e))?;
    Ok(Json(products))
}
