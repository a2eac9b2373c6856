use std::fmt::Display;
use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer};
use storefront_core::catalog::{BrowseQuery, PriceRange, SortMode};
use storefront_core::domain::category::CategoryId;
use storefront_core::domain::product::Product;

use super::{error_response, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub keyword: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceParams {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub min_price: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub max_price: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseParams {
    pub keyword: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub category_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub min_price: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub max_price: Option<Decimal>,
    #[serde(default = "default_sort")]
    pub sort_by: String,
}

/// `?minPrice=` from an HTML form means "no bound", not a malformed number.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map(Some).map_err(de::Error::custom)
        }
        _ => Ok(None),
    }
}

fn default_sort() -> String {
    "default".to_string()
}

impl From<BrowseParams> for BrowseQuery {
    fn from(params: BrowseParams) -> Self {
        Self {
            keyword: params.keyword,
            category_id: params.category_id.map(CategoryId),
            price: PriceRange::new(params.min_price, params.max_price),
            sort: SortMode::from_param(&params.sort_by),
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(active_products))
        .route("/category/{category_id}", get(products_by_category))
        .route("/search", get(search_products))
        .route("/search/name", get(search_by_name))
        .route("/search/description", get(search_by_description))
        .route("/sort/price-asc", get(sorted_by_price_asc))
        .route("/sort/price-desc", get(sorted_by_price_desc))
        .route("/filter/price", get(filtered_by_price))
        .route("/browse", get(browse))
}

async fn active_products(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    let products = state
        .catalog
        .all_active_products()
        .await
        .map_err(|e| error_response("catalog.active_products", e))?;
    Ok(Json(products))
}

async fn products_by_category(
    Path(category_id): Path<i64>,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Product>>> {
    let products = state
        .catalog
        .products_by_category(CategoryId(category_id))
        .await
        .map_err(|e| error_response("catalog.products_by_category", e))?;
    Ok(Json(products))
}

async fn search_products(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<Product>>> {
    let products = state
        .catalog
        .search_products(&params.keyword)
        .await
        .map_err(|e| error_response("catalog.search", e))?;
    Ok(Json(products))
}

async fn search_by_name(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<Product>>> {
    let products = state
        .catalog
        .search_products_by_name(&params.keyword)
        .await
        .map_err(|e| error_response("catalog.search_name", e))?;
    Ok(Json(products))
}

async fn search_by_description(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<Product>>> {
    let products = state
        .catalog
        .search_products_by_description(&params.keyword)
        .await
        .map_err(|e| error_response("catalog.search_description", e))?;
    Ok(Json(products))
}

async fn sorted_by_price_asc(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    let products = state
        .catalog
        .all_active_products()
        .await
        .map_err(|e| error_response("catalog.sort_price_asc", e))?;
    Ok(Json(state.catalog.sort_products_by_price_asc(products)))
}

async fn sorted_by_price_desc(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    let products = state
        .catalog
        .all_active_products()
        .await
        .map_err(|e| error_response("catalog.sort_price_desc", e))?;
    Ok(Json(state.catalog.sort_products_by_price_desc(products)))
}

async fn filtered_by_price(
    State(state): State<AppState>,
    Query(params): Query<PriceParams>,
) -> ApiResult<Json<Vec<Product>>> {
    let products = state
        .catalog
        .all_active_products()
        .await
        .map_err(|e| error_response("catalog.filter_price", e))?;
    let range = PriceRange::new(params.min_price, params.max_price);
    Ok(Json(state.catalog.filter_by_price_range(products, &range)))
}

async fn browse(
    State(state): State<AppState>,
    Query(params): Query<BrowseParams>,
) -> ApiResult<Json<Vec<Product>>> {
    let query = BrowseQuery::from(params);
    let products =
        state.catalog.browse(&query).await.map_err(|e| error_response("catalog.browse", e))?;
    Ok(Json(products))
}
