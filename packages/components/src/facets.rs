// ABOUTME: Filter facets for the search UI
// ABOUTME: Categories, brands and filterable spec values present in active inventory, plus price bounds

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::Row;
use tracing::debug;

use crate::error::ComponentError;
use crate::filter::Currency;
use crate::storage::ComponentStorage;
use crate::types::PriceRange;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFacet {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandFacet {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub key: String,
    pub value: String,
    pub display_name: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableFilters {
    pub categories: Vec<CategoryFacet>,
    pub brands: Vec<BrandFacet>,
    pub specs: BTreeMap<String, Vec<FilterOption>>,
    pub price_range: PriceRange,
}

impl ComponentStorage {
    /// Facets over active components; prices are read in `currency`
    pub async fn available_filters(&self, currency: Currency) -> Result<AvailableFilters, ComponentError> {
        debug!("Fetching available filters (currency: {})", currency);

        let category_rows = sqlx::query(
            r#"
            SELECT categories.id, categories.name, categories.display_name, COUNT(components.id) AS count
            FROM categories
            JOIN components ON components.category_id = categories.id AND components.is_active = 1
            WHERE categories.is_active = 1
            GROUP BY categories.id
            ORDER BY categories.sort_order, categories.display_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let categories = category_rows
            .iter()
            .map(|row| {
                Ok(CategoryFacet {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    display_name: row.try_get("display_name")?,
                    count: row.try_get("count")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        let brand_rows = sqlx::query(
            r#"
            SELECT brands.id, brands.name, brands.display_name, COUNT(DISTINCT components.id) AS count
            FROM brands
            JOIN component_brands cb ON cb.brand_id = brands.id
            JOIN components ON components.id = cb.component_id AND components.is_active = 1
            WHERE brands.is_active = 1
            GROUP BY brands.id
            ORDER BY brands.display_name, brands.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let brands = brand_rows
            .iter()
            .map(|row| {
                Ok(BrandFacet {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    display_name: row.try_get("display_name")?,
                    count: row.try_get("count")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        let spec_rows = sqlx::query(
            r#"
            SELECT cs.spec_key, cs.spec_value, COUNT(*) AS count
            FROM component_specs cs
            JOIN components ON components.id = cs.component_id
            WHERE cs.is_filterable = 1 AND components.is_active = 1
            GROUP BY cs.spec_key, cs.spec_value
            ORDER BY cs.spec_key, count DESC, cs.spec_value
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut specs: BTreeMap<String, Vec<FilterOption>> = BTreeMap::new();
        for row in spec_rows {
            let key: String = row.try_get("spec_key")?;
            let value: String = row.try_get("spec_value")?;
            specs.entry(key.clone()).or_default().push(FilterOption {
                key,
                display_name: value.clone(),
                value,
                count: row.try_get("count")?,
            });
        }

        let price_row = sqlx::query(
            r#"
            SELECT MIN(CAST(json_extract(p.value, '$.amount') AS REAL)) AS min_price,
                   MAX(CAST(json_extract(p.value, '$.amount') AS REAL)) AS max_price
            FROM components
            JOIN json_each(components.price) p
            WHERE components.is_active = 1 AND json_extract(p.value, '$.currency') = ?
            "#,
        )
        .bind(currency.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(AvailableFilters {
            categories,
            brands,
            specs,
            price_range: PriceRange {
                min_price: price_row.try_get::<Option<f64>, _>("min_price")?.unwrap_or(0.0),
                max_price: price_row.try_get::<Option<f64>, _>("max_price")?.unwrap_or(0.0),
                currency,
            },
        })
    }
}
