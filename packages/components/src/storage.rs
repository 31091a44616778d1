// ABOUTME: Component read side using SQLite
// ABOUTME: Paginated search with summary aggregates, lookups by id, and relation loading

use std::collections::{BTreeMap, HashMap};

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::ComponentError;
use crate::filter::{push_filters, push_order, ComponentFilter, ACTIVE_ONLY, FROM_JOINS};
use crate::pagination::{Pagination, PaginationMeta};
use crate::types::{
    Component, ComponentBrandLink, ComponentPage, ComponentSpec, ComponentSummary,
    ComponentWithRelations, PriceItem, PriceRange,
};

const SELECT_PROJECTION: &str = r#"
    SELECT components.*,
           categories.name AS category_name,
           categories.display_name AS category_display,
           brands.id AS brand_id,
           brands.name AS brand_name,
           brands.display_name AS brand_display"#;

pub struct ComponentStorage {
    pub(crate) pool: SqlitePool,
}

impl ComponentStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// One page of active components matching `filter`, with totals and summary
    pub async fn list_components(
        &self,
        filter: ComponentFilter,
        pagination: Pagination,
    ) -> Result<ComponentPage, ComponentError> {
        debug!(
            "Fetching components (page: {}, page_size: {}, filter: {:?})",
            pagination.page, pagination.page_size, filter
        );

        let mut count_query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*)");
        count_query.push(FROM_JOINS).push(ACTIVE_ONLY);
        push_filters(&mut count_query, &filter);
        let total_records: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut page_query: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_PROJECTION);
        page_query.push(FROM_JOINS).push(ACTIVE_ONLY);
        push_filters(&mut page_query, &filter);
        push_order(&mut page_query, &filter);
        page_query.push(" LIMIT ");
        page_query.push_bind(pagination.page_size);
        page_query.push(" OFFSET ");
        page_query.push_bind(pagination.offset());

        let rows = page_query.build().fetch_all(&self.pool).await?;
        let components = self.with_relations(&rows).await?;
        let summary = self.summarize(&filter).await?;

        Ok(ComponentPage {
            components,
            pagination: PaginationMeta::new(&pagination, total_records),
            filters: filter,
            summary,
        })
    }

    /// Every active component, ordered by name
    pub async fn all_components(&self) -> Result<Vec<ComponentWithRelations>, ComponentError> {
        debug!("Fetching all active components");

        let query = format!(
            "{}{}{} ORDER BY components.name ASC, components.id ASC",
            SELECT_PROJECTION, FROM_JOINS, ACTIVE_ONLY
        );
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        self.with_relations(&rows).await
    }

    /// Look up a component by id, active or not
    pub async fn find_component(
        &self,
        component_id: &str,
    ) -> Result<Option<ComponentWithRelations>, ComponentError> {
        let query = format!("{}{} WHERE components.id = ?", SELECT_PROJECTION, FROM_JOINS);
        let row = sqlx::query(&query)
            .bind(component_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.with_relations(&[row]).await?.pop()),
            None => Ok(None),
        }
    }

    pub async fn get_component(&self, component_id: &str) -> Result<ComponentWithRelations, ComponentError> {
        debug!("Fetching component: {}", component_id);

        self.find_component(component_id)
            .await?
            .ok_or_else(|| ComponentError::NotFound(component_id.to_string()))
    }

    /// Aggregates over the same predicate as the page query
    async fn summarize(&self, filter: &ComponentFilter) -> Result<ComponentSummary, ComponentError> {
        let mut by_category_query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT categories.display_name AS label, COUNT(*) AS count");
        by_category_query.push(FROM_JOINS).push(ACTIVE_ONLY);
        push_filters(&mut by_category_query, filter);
        by_category_query.push(" GROUP BY categories.display_name");
        let by_category = grouped_counts(by_category_query.build().fetch_all(&self.pool).await?)?;

        let mut by_brand_query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT brands.display_name AS label, COUNT(*) AS count");
        by_brand_query.push(FROM_JOINS).push(ACTIVE_ONLY);
        by_brand_query.push(" AND brands.id IS NOT NULL");
        push_filters(&mut by_brand_query, filter);
        by_brand_query.push(" GROUP BY brands.display_name");
        let by_brand = grouped_counts(by_brand_query.build().fetch_all(&self.pool).await?)?;

        let mut price_query: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT MIN(CAST(json_extract(pr.value, '$.amount') AS REAL)) AS min_price, \
             MAX(CAST(json_extract(pr.value, '$.amount') AS REAL)) AS max_price",
        );
        price_query.push(FROM_JOINS);
        price_query.push(" JOIN json_each(components.price) pr");
        price_query.push(ACTIVE_ONLY);
        price_query.push(" AND json_extract(pr.value, '$.currency') = ");
        price_query.push_bind(filter.currency.as_str());
        push_filters(&mut price_query, filter);
        let price_row = price_query.build().fetch_one(&self.pool).await?;

        Ok(ComponentSummary {
            total_components: by_category.values().sum(),
            by_category,
            by_brand,
            price_range: PriceRange {
                min_price: price_row.try_get::<Option<f64>, _>("min_price")?.unwrap_or(0.0),
                max_price: price_row.try_get::<Option<f64>, _>("max_price")?.unwrap_or(0.0),
                currency: filter.currency,
            },
        })
    }

    /// Decode projection rows and attach specs and brand links in two batched queries
    async fn with_relations(&self, rows: &[SqliteRow]) -> Result<Vec<ComponentWithRelations>, ComponentError> {
        let mut components = rows
            .iter()
            .map(row_to_projection)
            .collect::<Result<Vec<_>, _>>()?;

        if components.is_empty() {
            return Ok(components);
        }

        let ids: Vec<String> = components.iter().map(|c| c.component.id.clone()).collect();
        let mut specs = self.load_specs(&ids).await?;
        let mut brands = self.load_brands(&ids).await?;

        for projection in &mut components {
            let id = &projection.component.id;
            projection.specs = specs.remove(id).unwrap_or_default();
            projection.specs_map = projection
                .specs
                .iter()
                .map(|s| (s.spec_key.clone(), s.spec_value.clone()))
                .collect();
            projection.brands = brands.remove(id).unwrap_or_default();
        }

        Ok(components)
    }

    async fn load_specs(&self, ids: &[String]) -> Result<HashMap<String, Vec<ComponentSpec>>, ComponentError> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT component_id, spec_key, spec_value, spec_type, is_filterable FROM component_specs WHERE component_id IN (",
        );
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(id.clone());
        }
        separated.push_unseparated(") ORDER BY component_id, spec_key");

        let mut grouped: HashMap<String, Vec<ComponentSpec>> = HashMap::new();
        for row in query.build().fetch_all(&self.pool).await? {
            grouped
                .entry(row.try_get("component_id")?)
                .or_default()
                .push(ComponentSpec {
                    spec_key: row.try_get("spec_key")?,
                    spec_value: row.try_get("spec_value")?,
                    spec_type: row.try_get("spec_type")?,
                    is_filterable: row.try_get("is_filterable")?,
                });
        }
        Ok(grouped)
    }

    async fn load_brands(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, Vec<ComponentBrandLink>>, ComponentError> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT cb.component_id, cb.brand_id, cb.is_primary, b.name, b.display_name \
             FROM component_brands cb JOIN brands b ON b.id = cb.brand_id WHERE cb.component_id IN (",
        );
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(id.clone());
        }
        separated.push_unseparated(") ORDER BY cb.is_primary DESC, b.display_name, cb.brand_id");

        let mut grouped: HashMap<String, Vec<ComponentBrandLink>> = HashMap::new();
        for row in query.build().fetch_all(&self.pool).await? {
            grouped
                .entry(row.try_get("component_id")?)
                .or_default()
                .push(ComponentBrandLink {
                    brand_id: row.try_get("brand_id")?,
                    name: row.try_get("name")?,
                    display_name: row.try_get("display_name")?,
                    is_primary: row.try_get("is_primary")?,
                });
        }
        Ok(grouped)
    }
}

fn grouped_counts(rows: Vec<SqliteRow>) -> Result<BTreeMap<String, i64>, ComponentError> {
    let mut counts = BTreeMap::new();
    for row in rows {
        let label: String = row.try_get("label")?;
        let count: i64 = row.try_get("count")?;
        counts.insert(label, count);
    }
    Ok(counts)
}

pub(crate) fn row_to_component(row: &SqliteRow) -> Result<Component, ComponentError> {
    let price: String = row.try_get("price")?;
    let image_url: String = row.try_get("image_url")?;

    Ok(Component {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        category_id: row.try_get("category_id")?,
        models: row.try_get("models")?,
        price: serde_json::from_str::<Vec<PriceItem>>(&price)?,
        image_url: serde_json::from_str::<Vec<String>>(&image_url)?,
        is_active: row.try_get("is_active")?,
        in_stock: row.try_get("in_stock")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_projection(row: &SqliteRow) -> Result<ComponentWithRelations, ComponentError> {
    Ok(ComponentWithRelations {
        component: row_to_component(row)?,
        category_name: row.try_get("category_name")?,
        category_display: row.try_get("category_display")?,
        brand_id: row.try_get("brand_id")?,
        brand_name: row.try_get("brand_name")?,
        brand_display: row.try_get("brand_display")?,
        brands: Vec::new(),
        specs: Vec::new(),
        specs_map: BTreeMap::new(),
    })
}
