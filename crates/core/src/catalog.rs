//! Catalog browsing primitives.
//!
//! Everything here works on owned product lists and keeps the relative order
//! of the input. The browse pipeline is fixed: select (by category or all
//! active), then keyword, then price range, then sort.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::category::CategoryId;
use crate::domain::product::Product;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Sort requested by a browse call. Unknown values fall back to `Unsorted`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    PriceAsc,
    PriceDesc,
    #[default]
    Unsorted,
}

impl SortMode {
    pub fn from_param(value: &str) -> Self {
        match value {
            "price_asc" => Self::PriceAsc,
            "price_desc" => Self::PriceDesc,
            _ => Self::Unsorted,
        }
    }

    pub fn direction(&self) -> Option<SortDirection> {
        match self {
            Self::PriceAsc => Some(SortDirection::Ascending),
            Self::PriceDesc => Some(SortDirection::Descending),
            Self::Unsorted => None,
        }
    }
}

/// Inclusive bounds on `current_price`. A missing bound is open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PriceRange {
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

impl PriceRange {
    pub fn new(min: Option<Decimal>, max: Option<Decimal>) -> Self {
        Self { min, max }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, price: Decimal) -> bool {
        self.min.map_or(true, |min| price >= min) && self.max.map_or(true, |max| price <= max)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BrowseQuery {
    pub keyword: Option<String>,
    pub category_id: Option<CategoryId>,
    pub price: PriceRange,
    pub sort: SortMode,
}

impl BrowseQuery {
    /// Keyword to filter on, if any. Empty strings do not filter.
    pub fn effective_keyword(&self) -> Option<&str> {
        self.keyword.as_deref().filter(|keyword| !keyword.is_empty())
    }
}

pub fn active_only(products: Vec<Product>) -> Vec<Product> {
    products.into_iter().filter(Product::is_active).collect()
}

/// Case-insensitive (Unicode lowercase) substring match on the name.
pub fn name_contains(product: &Product, keyword: &str) -> bool {
    product.name.to_lowercase().contains(&keyword.to_lowercase())
}

/// Same as [`name_contains`] for the description; a missing description never matches.
pub fn description_contains(product: &Product, keyword: &str) -> bool {
    let needle = keyword.to_lowercase();
    product
        .description
        .as_deref()
        .is_some_and(|description| description.to_lowercase().contains(&needle))
}

/// Case-insensitive substring match on name or description.
pub fn matches_keyword(product: &Product, keyword: &str) -> bool {
    name_contains(product, keyword) || description_contains(product, keyword)
}

pub fn filter_by_keyword(products: Vec<Product>, keyword: &str) -> Vec<Product> {
    products.into_iter().filter(|product| matches_keyword(product, keyword)).collect()
}

/// Stable sort on `current_price`; equal prices keep their input order.
pub fn sort_by_price(mut products: Vec<Product>, direction: SortDirection) -> Vec<Product> {
    match direction {
        SortDirection::Ascending => products.sort_by(|a, b| a.current_price.cmp(&b.current_price)),
        SortDirection::Descending => {
            products.sort_by(|a, b| b.current_price.cmp(&a.current_price))
        }
    }
    products
}

pub fn filter_by_price_range(products: Vec<Product>, range: &PriceRange) -> Vec<Product> {
    if range.is_unbounded() {
        return products;
    }
    products.into_iter().filter(|product| range.contains(product.current_price)).collect()
}

/// Runs the keyword, price and sort stages over an already selected list.
pub fn apply_browse_filters(selected: Vec<Product>, query: &BrowseQuery) -> Vec<Product> {
    let mut products = selected;

    if let Some(keyword) = query.effective_keyword() {
        products = filter_by_keyword(products, keyword);
    }

    products = filter_by_price_range(products, &query.price);

    match query.sort.direction() {
        Some(direction) => sort_by_price(products, direction),
        None => products,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::{
        active_only, apply_browse_filters, description_contains, filter_by_price_range,
        matches_keyword, name_contains, sort_by_price, BrowseQuery, PriceRange, SortDirection,
        SortMode,
    };
    use crate::domain::product::{Product, ProductFields, ProductId, ProductStatus};

    fn product(id: i64, name: &str, price: Decimal, status: ProductStatus) -> Product {
        Product::create(
            ProductId(id),
            ProductFields::new(name, price, price)
                .with_description(format!("{name} description"))
                .with_status(status),
            Utc::now(),
        )
    }

    fn names(products: &[Product]) -> Vec<&str> {
        products.iter().map(|product| product.name.as_str()).collect()
    }

    fn sample() -> Vec<Product> {
        vec![
            product(1, "A", Decimal::new(3999, 2), ProductStatus::Active),
            product(2, "B", Decimal::new(64999, 2), ProductStatus::Active),
            product(3, "C", Decimal::new(19999, 2), ProductStatus::Discontinued),
        ]
    }

    #[test]
    fn active_only_keeps_active_products_in_order() {
        let active = active_only(sample());
        assert_eq!(names(&active), vec!["A", "B"]);
    }

    #[test]
    fn price_range_example_keeps_only_b() {
        let active = active_only(sample());
        let sorted = sort_by_price(active.clone(), SortDirection::Ascending);
        assert_eq!(names(&sorted), vec!["A", "B"]);

        let range = PriceRange::new(Some(Decimal::new(40, 0)), Some(Decimal::new(700, 0)));
        let filtered = filter_by_price_range(active, &range);
        assert_eq!(names(&filtered), vec!["B"]);
    }

    #[test]
    fn open_bounds_filter_one_side_only() {
        let products = sample();
        let max_only = PriceRange::new(None, Some(Decimal::new(200, 0)));
        let min_only = PriceRange::new(Some(Decimal::new(200, 0)), None);

        assert_eq!(names(&filter_by_price_range(products.clone(), &max_only)), vec!["A", "C"]);
        assert_eq!(names(&filter_by_price_range(products.clone(), &min_only)), vec!["B"]);
        assert_eq!(filter_by_price_range(products.clone(), &PriceRange::default()), products);
    }

    #[test]
    fn bounds_are_inclusive() {
        let range = PriceRange::new(Some(Decimal::new(3999, 2)), Some(Decimal::new(3999, 2)));
        assert_eq!(names(&filter_by_price_range(sample(), &range)), vec!["A"]);
    }

    #[test]
    fn sorting_is_stable_and_idempotent() {
        let products = vec![
            product(1, "first", Decimal::new(10, 0), ProductStatus::Active),
            product(2, "cheap", Decimal::new(5, 0), ProductStatus::Active),
            product(3, "second", Decimal::new(10, 0), ProductStatus::Active),
        ];

        let asc = sort_by_price(products.clone(), SortDirection::Ascending);
        assert_eq!(names(&asc), vec!["cheap", "first", "second"]);
        assert_eq!(sort_by_price(asc.clone(), SortDirection::Ascending), asc);

        let desc = sort_by_price(products, SortDirection::Descending);
        assert_eq!(names(&desc), vec!["first", "second", "cheap"]);
        assert_eq!(sort_by_price(desc.clone(), SortDirection::Descending), desc);
    }

    #[test]
    fn distinct_prices_sort_to_mirror_orders() {
        let asc = sort_by_price(sample(), SortDirection::Ascending);
        let mut desc = sort_by_price(asc.clone(), SortDirection::Descending);
        desc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn keyword_match_ignores_case_and_checks_description() {
        let mut phone = product(1, "Smartphone X", Decimal::new(64999, 2), ProductStatus::Active);
        phone.description = Some("Latest smartphone with ADVANCED features".to_string());

        assert!(matches_keyword(&phone, "PHONE"));
        assert!(matches_keyword(&phone, "advanced"));
        assert!(!matches_keyword(&phone, "tablet"));

        phone.description = None;
        assert!(!matches_keyword(&phone, "advanced"));
    }

    #[test]
    fn keyword_match_folds_non_ascii_case() {
        let mut bag = product(1, "Émile Çanta", Decimal::new(5900, 2), ProductStatus::Active);
        bag.description = Some("Sac en CUIR tanné".to_string());

        assert!(name_contains(&bag, "émile"));
        assert!(name_contains(&bag, "ÇANTA"));
        assert!(description_contains(&bag, "TANNÉ"));
        assert!(!description_contains(&bag, "émile"));
    }

    #[test]
    fn sort_mode_parses_known_values_only() {
        assert_eq!(SortMode::from_param("price_asc"), SortMode::PriceAsc);
        assert_eq!(SortMode::from_param("price_desc"), SortMode::PriceDesc);
        assert_eq!(SortMode::from_param("default"), SortMode::Unsorted);
        assert_eq!(SortMode::from_param("PRICE_ASC"), SortMode::Unsorted);
    }

    #[test]
    fn browse_filters_run_keyword_then_price_then_sort() {
        let products = vec![
            product(1, "Laptop Pro", Decimal::new(119999, 2), ProductStatus::Active),
            product(2, "Laptop Sleeve", Decimal::new(2999, 2), ProductStatus::Active),
            product(3, "Laptop Stand", Decimal::new(4999, 2), ProductStatus::Active),
            product(4, "Desk Lamp", Decimal::new(3999, 2), ProductStatus::Active),
        ];
        let query = BrowseQuery {
            keyword: Some("laptop".to_string()),
            category_id: None,
            price: PriceRange::new(None, Some(Decimal::new(1000, 0))),
            sort: SortMode::PriceDesc,
        };

        let result = apply_browse_filters(products, &query);
        assert_eq!(names(&result), vec!["Laptop Stand", "Laptop Sleeve"]);
    }

    #[test]
    fn empty_keyword_does_not_filter_browse() {
        let query = BrowseQuery { keyword: Some(String::new()), ..BrowseQuery::default() };
        assert_eq!(apply_browse_filters(sample(), &query).len(), 3);
    }
}
