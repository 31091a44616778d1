// ABOUTME: Component type definitions
// ABOUTME: Stored rows, the denormalized read projection, write inputs and bulk reports

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ComponentError;
use crate::filter::{ComponentFilter, Currency};
use crate::pagination::PaginationMeta;

/// Upper bound on components accepted by one bulk request
pub const MAX_BULK_COMPONENTS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceItem {
    pub currency: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    pub name: String,
    pub category_id: String,
    pub models: String,
    pub price: Vec<PriceItem>,
    pub image_url: Vec<String>,
    pub is_active: bool,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub spec_key: String,
    pub spec_value: String,
    pub spec_type: String,
    pub is_filterable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentBrandLink {
    pub brand_id: String,
    pub name: String,
    pub display_name: String,
    pub is_primary: bool,
}

/// Read projection: component plus resolved category, brands and specs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentWithRelations {
    #[serde(flatten)]
    pub component: Component,
    pub category_name: String,
    pub category_display: String,
    pub brand_id: Option<String>,
    pub brand_name: Option<String>,
    pub brand_display: Option<String>,
    pub brands: Vec<ComponentBrandLink>,
    pub specs: Vec<ComponentSpec>,
    pub specs_map: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandAssociation {
    pub brand_id: String,
    #[serde(default)]
    pub is_primary: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentCreateInput {
    pub id: String,
    pub name: String,
    pub category_id: String,
    pub brand_ids: Vec<BrandAssociation>,
    #[serde(default)]
    pub models: String,
    pub price: Vec<PriceItem>,
    pub image_url: Vec<String>,
    #[serde(default)]
    pub specs: Map<String, Value>,
}

/// Sparse update: `None` leaves a field untouched, `Some` replaces it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentUpdateInput {
    pub name: Option<String>,
    pub category_id: Option<String>,
    pub brand_ids: Option<Vec<BrandAssociation>>,
    pub models: Option<String>,
    pub price: Option<Vec<PriceItem>>,
    pub image_url: Option<Vec<String>>,
    pub specs: Option<Map<String, Value>>,
    pub is_active: Option<bool>,
    pub in_stock: Option<bool>,
}

impl ComponentCreateInput {
    pub fn validate(&self) -> Result<(), ComponentError> {
        require("id", &self.id)?;
        require("name", &self.name)?;
        require("category_id", &self.category_id)?;
        validate_brand_ids(&self.brand_ids)?;
        validate_prices(&self.price)
    }
}

impl ComponentUpdateInput {
    pub fn validate(&self) -> Result<(), ComponentError> {
        if let Some(name) = &self.name {
            require("name", name)?;
        }
        if let Some(category_id) = &self.category_id {
            require("category_id", category_id)?;
        }
        if let Some(brand_ids) = &self.brand_ids {
            validate_brand_ids(brand_ids)?;
        }
        if let Some(price) = &self.price {
            validate_prices(price)?;
        }
        Ok(())
    }
}

fn require(field: &str, value: &str) -> Result<(), ComponentError> {
    if value.trim().is_empty() {
        return Err(ComponentError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn validate_brand_ids(brand_ids: &[BrandAssociation]) -> Result<(), ComponentError> {
    if brand_ids.is_empty() {
        return Err(ComponentError::Validation(
            "brand_ids must contain at least one brand".to_string(),
        ));
    }
    for link in brand_ids {
        require("brand_id", &link.brand_id)?;
    }
    Ok(())
}

fn validate_prices(prices: &[PriceItem]) -> Result<(), ComponentError> {
    for item in prices {
        if item.currency.trim().is_empty() {
            return Err(ComponentError::Validation("price currency is required".to_string()));
        }
        if !item.amount.is_finite() || item.amount < 0.0 {
            return Err(ComponentError::Validation(format!(
                "price amount for {} must be a non-negative number",
                item.currency
            )));
        }
    }
    Ok(())
}

/// Currency codes are stored trimmed and upper-cased so lookups by `USD`/`VND` match
pub fn normalize_prices(prices: &[PriceItem]) -> Vec<PriceItem> {
    prices
        .iter()
        .map(|item| PriceItem {
            currency: item.currency.trim().to_ascii_uppercase(),
            ..item.clone()
        })
        .collect()
}

/// Collapse repeated brand ids and pick exactly one primary association
pub(crate) fn normalize_brands(links: &[BrandAssociation]) -> Vec<BrandAssociation> {
    let mut normalized: Vec<BrandAssociation> = Vec::with_capacity(links.len());
    for link in links {
        let brand_id = link.brand_id.trim();
        if normalized.iter().all(|existing| existing.brand_id != brand_id) {
            normalized.push(BrandAssociation {
                brand_id: brand_id.to_string(),
                is_primary: link.is_primary,
            });
        }
    }

    let primary = normalized.iter().position(|link| link.is_primary).unwrap_or(0);
    for (index, link) in normalized.iter_mut().enumerate() {
        link.is_primary = index == primary;
    }
    normalized
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMode {
    /// Remove the row; specs and brand links cascade
    Hard,
    /// Flip `is_active` off; still readable by id
    Soft,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRange {
    pub min_price: f64,
    pub max_price: f64,
    pub currency: Currency,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentSummary {
    pub total_components: i64,
    pub by_category: BTreeMap<String, i64>,
    pub by_brand: BTreeMap<String, i64>,
    pub price_range: PriceRange,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentPage {
    pub components: Vec<ComponentWithRelations>,
    pub pagination: PaginationMeta,
    pub filters: ComponentFilter,
    pub summary: ComponentSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkItemResult {
    pub id: String,
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkCreateReport {
    pub total_requested: usize,
    pub total_created: usize,
    pub total_failed: usize,
    pub results: Vec<BulkItemResult>,
}

impl BulkCreateReport {
    pub(crate) fn record(&mut self, result: BulkItemResult) {
        if result.success {
            self.total_created += 1;
        } else {
            self.total_failed += 1;
        }
        self.results.push(result);
    }

    pub fn all_succeeded(&self) -> bool {
        self.total_failed == 0
    }

    pub fn none_succeeded(&self) -> bool {
        self.total_created == 0
    }
}
