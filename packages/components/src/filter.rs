// ABOUTME: Search filters for component listings and their SQL composition
// ABOUTME: Raw query parameters become a typed filter; every value reaches SQL as a bound parameter

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite};

use crate::error::ComponentError;
use crate::pagination::Pagination;

/// Spec keys accepted as search filters
pub const SPEC_FILTER_KEYS: [&str; 7] = [
    "socket",
    "form_factor",
    "memory_type",
    "storage_type",
    "interface",
    "generation",
    "process_size",
];

const MAX_PAGE_PARAM_LEN: usize = 10;
const MAX_PAGE_SIZE_PARAM_LEN: usize = 3;
const MAX_SEARCH_LEN: usize = 250;

/// Joins shared by the page, count and summary queries. The primary brand join yields
/// at most one row per component.
pub(crate) const FROM_JOINS: &str = r#"
    FROM components
    JOIN categories ON categories.id = components.category_id
    LEFT JOIN component_brands pb ON pb.component_id = components.id AND pb.is_primary = 1
    LEFT JOIN brands ON brands.id = pb.brand_id"#;

pub(crate) const ACTIVE_ONLY: &str = " WHERE components.is_active = 1";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Vnd,
    Usd,
}

impl Currency {
    pub fn as_str(self) -> &'static str {
        match self {
            Currency::Vnd => "VND",
            Currency::Usd => "USD",
        }
    }

    /// Currency for an `Accept-Language` header, keyed on the primary language subtag
    pub fn from_language(header: Option<&str>) -> Self {
        let primary = header
            .and_then(|value| value.split(',').next())
            .and_then(|tag| tag.split(';').next())
            .and_then(|tag| tag.split(['-', '_']).next())
            .map(|subtag| subtag.trim().to_ascii_lowercase())
            .unwrap_or_default();

        match primary.as_str() {
            "en" => Currency::Usd,
            _ => Currency::Vnd,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = ComponentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "VND" => Ok(Currency::Vnd),
            "USD" => Ok(Currency::Usd),
            _ => Err(ComponentError::Validation(format!("Unsupported currency: {}", s.trim()))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Name,
    Price,
    #[default]
    CreatedAt,
    UpdatedAt,
    Brand,
    Category,
}

impl SortField {
    /// Unknown or missing values sort by creation time
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("name") => SortField::Name,
            Some("price") => SortField::Price,
            Some("updated_at") => SortField::UpdatedAt,
            Some("brand") => SortField::Brand,
            Some("category") => SortField::Category,
            _ => SortField::CreatedAt,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Unknown or missing values sort descending
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Raw query string of `GET /api/components`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComponentQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub category_id: Option<String>,
    pub brand_id: Option<String>,
    pub primary_brand_only: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub currency: Option<String>,
    pub socket: Option<String>,
    pub form_factor: Option<String>,
    pub memory_type: Option<String>,
    pub storage_type: Option<String>,
    pub interface: Option<String>,
    pub generation: Option<String>,
    pub process_size: Option<String>,
}

/// Typed search filter, echoed back to clients under `filters`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentFilter {
    pub category_ids: Vec<String>,
    pub brand_ids: Vec<String>,
    pub primary_brand_only: bool,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub search: Option<String>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub currency: Currency,
    pub specs: BTreeMap<String, String>,
}

impl ComponentQuery {
    /// Split into a typed filter and pagination.
    ///
    /// Over-long parameters and unknown currencies are rejected; everything else that does
    /// not parse is ignored or defaulted.
    pub fn into_parts(self) -> Result<(ComponentFilter, Pagination), ComponentError> {
        check_len("page", self.page.as_deref(), MAX_PAGE_PARAM_LEN)?;
        check_len("page_size", self.page_size.as_deref(), MAX_PAGE_SIZE_PARAM_LEN)?;
        check_len("search", self.search.as_deref(), MAX_SEARCH_LEN)?;

        let pagination = Pagination::from_params(self.page.as_deref(), self.page_size.as_deref());

        let currency = match non_empty(self.currency.as_deref()) {
            Some(raw) => raw.parse()?,
            None => Currency::default(),
        };

        let spec_values = [
            self.socket,
            self.form_factor,
            self.memory_type,
            self.storage_type,
            self.interface,
            self.generation,
            self.process_size,
        ];
        let specs = SPEC_FILTER_KEYS
            .iter()
            .zip(spec_values)
            .filter_map(|(key, value)| {
                non_empty(value.as_deref()).map(|v| (key.to_string(), v.to_string()))
            })
            .collect();

        let filter = ComponentFilter {
            category_ids: split_ids(self.category_id.as_deref()),
            brand_ids: split_ids(self.brand_id.as_deref()),
            primary_brand_only: self.primary_brand_only.as_deref().map(str::trim) == Some("true"),
            min_price: parse_price(self.min_price.as_deref()),
            max_price: parse_price(self.max_price.as_deref()),
            search: non_empty(self.search.as_deref()).map(str::to_string),
            sort_by: SortField::parse(self.sort_by.as_deref()),
            sort_order: SortOrder::parse(self.sort_order.as_deref()),
            currency,
            specs,
        };

        Ok((filter, pagination))
    }
}

fn check_len(name: &str, value: Option<&str>, max: usize) -> Result<(), ComponentError> {
    match value {
        Some(v) if v.chars().count() > max => Err(ComponentError::Validation(format!(
            "{} must be at most {} characters",
            name, max
        ))),
        _ => Ok(()),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn split_ids(raw: Option<&str>) -> Vec<String> {
    raw.map(|ids| {
        ids.split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Only positive, finite bounds constrain the search
fn parse_price(raw: Option<&str>) -> Option<f64> {
    non_empty(raw)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// Escape LIKE wildcards so user input matches literally (paired with `ESCAPE '\'`)
fn like_pattern(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('%');
    for ch in value.to_lowercase().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// Append the filter predicate as `AND ...` clauses; assumes a preceding WHERE
pub(crate) fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filter: &ComponentFilter) {
    if !filter.category_ids.is_empty() {
        qb.push(" AND components.category_id IN (");
        let mut ids = qb.separated(", ");
        for id in &filter.category_ids {
            ids.push_bind(id.clone());
        }
        ids.push_unseparated(")");
    }

    if !filter.brand_ids.is_empty() {
        qb.push(
            " AND EXISTS (SELECT 1 FROM component_brands cb WHERE cb.component_id = components.id",
        );
        if filter.primary_brand_only {
            qb.push(" AND cb.is_primary = 1");
        }
        qb.push(" AND cb.brand_id IN (");
        let mut ids = qb.separated(", ");
        for id in &filter.brand_ids {
            ids.push_bind(id.clone());
        }
        ids.push_unseparated("))");
    }

    if filter.min_price.is_some() || filter.max_price.is_some() {
        qb.push(
            " AND EXISTS (SELECT 1 FROM json_each(components.price) p WHERE json_extract(p.value, '$.currency') = ",
        );
        qb.push_bind(filter.currency.as_str());
        if let Some(min) = filter.min_price {
            qb.push(" AND CAST(json_extract(p.value, '$.amount') AS REAL) >= ");
            qb.push_bind(min);
        }
        if let Some(max) = filter.max_price {
            qb.push(" AND CAST(json_extract(p.value, '$.amount') AS REAL) <= ");
            qb.push_bind(max);
        }
        qb.push(")");
    }

    if let Some(search) = &filter.search {
        let pattern = like_pattern(search);
        qb.push(" AND (LOWER(components.name) LIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" ESCAPE '\\' OR LOWER(categories.display_name) LIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" ESCAPE '\\' OR LOWER(components.models) LIKE ");
        qb.push_bind(pattern.clone());
        qb.push(
            " ESCAPE '\\' OR EXISTS (SELECT 1 FROM component_brands sb JOIN brands sbr ON sbr.id = sb.brand_id \
             WHERE sb.component_id = components.id AND LOWER(sbr.display_name) LIKE ",
        );
        qb.push_bind(pattern);
        qb.push(" ESCAPE '\\'))");
    }

    for (key, value) in &filter.specs {
        qb.push(
            " AND EXISTS (SELECT 1 FROM component_specs cs WHERE cs.component_id = components.id AND cs.spec_key = ",
        );
        qb.push_bind(key.clone());
        qb.push(" AND LOWER(cs.spec_value) LIKE ");
        qb.push_bind(like_pattern(value));
        qb.push(" ESCAPE '\\')");
    }
}

/// Append ORDER BY with a stable `components.id` tiebreaker
pub(crate) fn push_order(qb: &mut QueryBuilder<'_, Sqlite>, filter: &ComponentFilter) {
    let direction = filter.sort_order.as_sql();
    qb.push(" ORDER BY ");

    match filter.sort_by {
        SortField::Name => {
            qb.push("components.name ");
        }
        SortField::Price => {
            qb.push(
                "(SELECT CAST(json_extract(p.value, '$.amount') AS REAL) FROM json_each(components.price) p \
                 WHERE json_extract(p.value, '$.currency') = ",
            );
            qb.push_bind(filter.currency.as_str());
            qb.push(" LIMIT 1) ");
        }
        SortField::CreatedAt => {
            qb.push("components.created_at ");
        }
        SortField::UpdatedAt => {
            qb.push("components.updated_at ");
        }
        SortField::Brand => {
            qb.push("brands.display_name ");
        }
        SortField::Category => {
            qb.push("categories.display_name ");
        }
    }

    qb.push(direction);
    qb.push(", components.id ASC");
}
