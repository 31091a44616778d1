// ABOUTME: Component write side: transactional create, bulk create, update and delete
// ABOUTME: A component, its spec rows and brand links are written as one unit

use chrono::{DateTime, Utc};
use pcbuilder_specs::{flatten_specs, validate_specs, ComponentCategory, SpecEntry};
use pcbuilder_storage::{is_unique_violation, StorageError};
use serde_json::{Map, Value};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::{debug, info, warn};

use crate::error::ComponentError;
use crate::storage::ComponentStorage;
use crate::types::{
    normalize_brands, normalize_prices, BrandAssociation, BulkCreateReport, BulkItemResult,
    ComponentCreateInput, ComponentUpdateInput, ComponentWithRelations, DeleteMode,
    MAX_BULK_COMPONENTS,
};

impl ComponentStorage {
    /// Create a component with its specs and brand links in a single transaction
    pub async fn create_component(
        &self,
        input: ComponentCreateInput,
    ) -> Result<ComponentWithRelations, ComponentError> {
        input.validate()?;
        let component_id = input.id.trim().to_string();
        let brands = normalize_brands(&input.brand_ids);

        debug!("Creating component: {} (category: {})", component_id, input.category_id);

        let mut tx = self.pool.begin().await?;

        let category_name = category_tag(&mut tx, input.category_id.trim()).await?;
        ensure_brands_exist(&mut tx, &brands).await?;
        let entries = checked_specs(&category_name, input.category_id.trim(), &input.specs)?;

        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO components (id, name, category_id, models, price, image_url, is_active, in_stock, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, 1, 1, ?, ?)
            "#,
        )
        .bind(&component_id)
        .bind(input.name.trim())
        .bind(input.category_id.trim())
        .bind(&input.models)
        .bind(serde_json::to_string(&normalize_prices(&input.price))?)
        .bind(serde_json::to_string(&input.image_url)?)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ComponentError::Duplicate(component_id.clone())
            } else {
                ComponentError::Storage(StorageError::Sqlx(e))
            }
        })?;

        insert_specs(&mut tx, &component_id, &entries, now).await?;
        insert_brands(&mut tx, &component_id, &brands, now).await?;

        tx.commit().await?;

        info!(
            component_id = %component_id,
            specs = entries.len(),
            brands = brands.len(),
            "Component created"
        );
        self.get_component(&component_id).await
    }

    /// Create each item independently; one failure never rolls back another item
    pub async fn bulk_create_components(
        &self,
        items: Vec<Value>,
    ) -> Result<BulkCreateReport, ComponentError> {
        if items.is_empty() || items.len() > MAX_BULK_COMPONENTS {
            return Err(ComponentError::Validation(format!(
                "components must contain between 1 and {} items",
                MAX_BULK_COMPONENTS
            )));
        }

        let mut report = BulkCreateReport {
            total_requested: items.len(),
            ..Default::default()
        };

        for item in items {
            let id = item
                .get("id")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();

            let input: ComponentCreateInput = match serde_json::from_value(item) {
                Ok(input) => input,
                Err(e) => {
                    report.record(failure(id, "Invalid component data", e.to_string()));
                    continue;
                }
            };

            let result = match self.create_component(input).await {
                Ok(_) => BulkItemResult {
                    id,
                    success: true,
                    message: "Created successfully".to_string(),
                    error: None,
                },
                Err(ComponentError::Duplicate(_)) => failure(
                    id,
                    "Duplicate ID",
                    "Component with this ID already exists".to_string(),
                ),
                Err(e) if e.is_client_error() => failure(id, "Validation error", e.to_string()),
                Err(e) => {
                    warn!("Bulk create failed for component {}: {}", id, e);
                    failure(id, "Database error", e.to_string())
                }
            };
            report.record(result);
        }

        info!(
            requested = report.total_requested,
            created = report.total_created,
            failed = report.total_failed,
            "Bulk component creation finished"
        );
        Ok(report)
    }

    /// Sparse update. Supplied specs or brand links replace the existing set entirely.
    pub async fn update_component(
        &self,
        component_id: &str,
        input: ComponentUpdateInput,
    ) -> Result<ComponentWithRelations, ComponentError> {
        input.validate()?;
        debug!("Updating component: {}", component_id);

        let mut tx = self.pool.begin().await?;

        let current_category: Option<String> =
            sqlx::query_scalar("SELECT category_id FROM components WHERE id = ?")
                .bind(component_id)
                .fetch_optional(&mut *tx)
                .await?;
        let current_category =
            current_category.ok_or_else(|| ComponentError::NotFound(component_id.to_string()))?;

        let category_id = input
            .category_id
            .as_deref()
            .map(str::trim)
            .unwrap_or(current_category.as_str())
            .to_string();
        let category_name = category_tag(&mut tx, &category_id).await?;

        let entries = match &input.specs {
            Some(specs) => Some(checked_specs(&category_name, &category_id, specs)?),
            None => None,
        };

        let brands = match &input.brand_ids {
            Some(links) => {
                let brands = normalize_brands(links);
                ensure_brands_exist(&mut tx, &brands).await?;
                Some(brands)
            }
            None => None,
        };

        let now = Utc::now();
        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE components SET updated_at = ");
        query_builder.push_bind(now);

        if let Some(name) = &input.name {
            query_builder.push(", name = ").push_bind(name.trim().to_string());
        }
        if input.category_id.is_some() {
            query_builder.push(", category_id = ").push_bind(category_id.clone());
        }
        if let Some(models) = &input.models {
            query_builder.push(", models = ").push_bind(models.clone());
        }
        if let Some(price) = &input.price {
            query_builder
                .push(", price = ")
                .push_bind(serde_json::to_string(&normalize_prices(price))?);
        }
        if let Some(image_url) = &input.image_url {
            query_builder.push(", image_url = ").push_bind(serde_json::to_string(image_url)?);
        }
        if let Some(is_active) = input.is_active {
            query_builder.push(", is_active = ").push_bind(is_active);
        }
        if let Some(in_stock) = input.in_stock {
            query_builder.push(", in_stock = ").push_bind(in_stock);
        }
        query_builder.push(" WHERE id = ").push_bind(component_id);
        query_builder.build().execute(&mut *tx).await?;

        if let Some(entries) = &entries {
            sqlx::query("DELETE FROM component_specs WHERE component_id = ?")
                .bind(component_id)
                .execute(&mut *tx)
                .await?;
            insert_specs(&mut tx, component_id, entries, now).await?;
        }

        if let Some(brands) = &brands {
            sqlx::query("DELETE FROM component_brands WHERE component_id = ?")
                .bind(component_id)
                .execute(&mut *tx)
                .await?;
            insert_brands(&mut tx, component_id, brands, now).await?;
        }

        tx.commit().await?;

        info!(component_id = %component_id, "Component updated");
        self.get_component(component_id).await
    }

    /// Hard delete removes the row (specs and links cascade); soft delete deactivates it
    pub async fn delete_component(&self, component_id: &str, mode: DeleteMode) -> Result<(), ComponentError> {
        debug!("Deleting component: {} ({:?})", component_id, mode);

        let result = match mode {
            DeleteMode::Hard => {
                sqlx::query("DELETE FROM components WHERE id = ?")
                    .bind(component_id)
                    .execute(&self.pool)
                    .await?
            }
            DeleteMode::Soft => {
                sqlx::query("UPDATE components SET is_active = 0, updated_at = ? WHERE id = ?")
                    .bind(Utc::now())
                    .bind(component_id)
                    .execute(&self.pool)
                    .await?
            }
        };

        if result.rows_affected() == 0 {
            return Err(ComponentError::NotFound(component_id.to_string()));
        }

        info!(component_id = %component_id, mode = ?mode, "Component deleted");
        Ok(())
    }
}

fn failure(id: String, message: &str, error: String) -> BulkItemResult {
    BulkItemResult {
        id,
        success: false,
        message: message.to_string(),
        error: Some(error),
    }
}

/// Name of the category, used as the schema tag for spec validation
async fn category_tag(conn: &mut SqliteConnection, category_id: &str) -> Result<String, ComponentError> {
    let name: Option<String> = sqlx::query_scalar("SELECT name FROM categories WHERE id = ?")
        .bind(category_id)
        .fetch_optional(&mut *conn)
        .await?;

    name.ok_or_else(|| ComponentError::InvalidCategory(category_id.to_string()))
}

async fn ensure_brands_exist(
    conn: &mut SqliteConnection,
    brands: &[BrandAssociation],
) -> Result<(), ComponentError> {
    for link in brands {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM brands WHERE id = ?)")
            .bind(&link.brand_id)
            .fetch_one(&mut *conn)
            .await?;
        if !exists {
            return Err(ComponentError::InvalidBrand(link.brand_id.clone()));
        }
    }
    Ok(())
}

/// Validate against the category schema, then flatten the original map.
///
/// The schema tag is the category name, or the category id when the name is not a known tag.
fn checked_specs(
    category_name: &str,
    category_id: &str,
    specs: &Map<String, Value>,
) -> Result<Vec<SpecEntry>, ComponentError> {
    // Categories without a schema still accept components that carry no specs
    if specs.is_empty() {
        return Ok(Vec::new());
    }
    let tag = if category_name.parse::<ComponentCategory>().is_ok() {
        category_name
    } else {
        category_id
    };
    validate_specs(tag, specs)?;
    Ok(flatten_specs(specs)?)
}

async fn insert_specs(
    conn: &mut SqliteConnection,
    component_id: &str,
    entries: &[SpecEntry],
    now: DateTime<Utc>,
) -> Result<(), ComponentError> {
    for entry in entries {
        sqlx::query(
            r#"
            INSERT INTO component_specs (component_id, spec_key, spec_value, spec_type, is_filterable, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(component_id)
        .bind(&entry.key)
        .bind(&entry.value)
        .bind(&entry.spec_type)
        .bind(entry.is_filterable)
        .bind(now)
        .bind(now)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn insert_brands(
    conn: &mut SqliteConnection,
    component_id: &str,
    brands: &[BrandAssociation],
    now: DateTime<Utc>,
) -> Result<(), ComponentError> {
    for link in brands {
        sqlx::query(
            "INSERT INTO component_brands (component_id, brand_id, is_primary, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(component_id)
        .bind(&link.brand_id)
        .bind(link.is_primary)
        .bind(now)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}
