// ABOUTME: Category and brand storage layer using SQLite
// ABOUTME: Listing, lookup, creation and sparse updates; rows are deactivated, never deleted

use chrono::Utc;
use pcbuilder_storage::{is_unique_violation, StorageError};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::{debug, info};

use crate::error::CatalogError;
use crate::types::{
    Brand, BrandCreateInput, BrandUpdateInput, Category, CategoryCreateInput, CategoryUpdateInput,
};

pub struct CategoryStorage {
    pool: SqlitePool,
}

impl CategoryStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List categories ordered by `sort_order`, then display name
    pub async fn list_categories(&self, include_inactive: bool) -> Result<Vec<Category>, CatalogError> {
        debug!("Fetching categories (include_inactive: {})", include_inactive);

        let query = if include_inactive {
            "SELECT * FROM categories ORDER BY sort_order, display_name"
        } else {
            "SELECT * FROM categories WHERE is_active = 1 ORDER BY sort_order, display_name"
        };

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_category).collect()
    }

    pub async fn find_category(&self, category_id: &str) -> Result<Option<Category>, CatalogError> {
        let row = sqlx::query("SELECT * FROM categories WHERE id = ?")
            .bind(category_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_category).transpose()
    }

    pub async fn get_category(&self, category_id: &str) -> Result<Category, CatalogError> {
        debug!("Fetching category: {}", category_id);

        self.find_category(category_id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("Category '{}'", category_id)))
    }

    pub async fn create_category(&self, input: CategoryCreateInput) -> Result<Category, CatalogError> {
        input.validate()?;
        let now = Utc::now();
        let id = input.id.trim().to_string();

        sqlx::query(
            r#"
            INSERT INTO categories (id, name, display_name, description, icon_url, sort_order, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(input.name.trim())
        .bind(input.display_name.trim())
        .bind(&input.description)
        .bind(&input.icon_url)
        .bind(input.sort_order)
        .bind(input.is_active)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_or_storage(e, format!("Category '{}'", id)))?;

        info!(category_id = %id, "Category created");
        self.get_category(&id).await
    }

    pub async fn update_category(
        &self,
        category_id: &str,
        input: CategoryUpdateInput,
    ) -> Result<Category, CatalogError> {
        input.validate()?;
        debug!("Updating category: {}", category_id);

        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE categories SET updated_at = ");
        query_builder.push_bind(Utc::now());

        if let Some(name) = &input.name {
            query_builder.push(", name = ").push_bind(name.trim().to_string());
        }
        if let Some(display_name) = &input.display_name {
            query_builder.push(", display_name = ").push_bind(display_name.trim().to_string());
        }
        if let Some(description) = &input.description {
            query_builder.push(", description = ").push_bind(description);
        }
        if let Some(icon_url) = &input.icon_url {
            query_builder.push(", icon_url = ").push_bind(icon_url);
        }
        if let Some(sort_order) = input.sort_order {
            query_builder.push(", sort_order = ").push_bind(sort_order);
        }
        if let Some(is_active) = input.is_active {
            query_builder.push(", is_active = ").push_bind(is_active);
        }

        query_builder.push(" WHERE id = ").push_bind(category_id);

        let result = query_builder.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound(format!("Category '{}'", category_id)));
        }

        info!(category_id = %category_id, "Category updated");
        self.get_category(category_id).await
    }
}

pub struct BrandStorage {
    pool: SqlitePool,
}

impl BrandStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List brands ordered by display name
    pub async fn list_brands(&self, include_inactive: bool) -> Result<Vec<Brand>, CatalogError> {
        debug!("Fetching brands (include_inactive: {})", include_inactive);

        let query = if include_inactive {
            "SELECT * FROM brands ORDER BY display_name, id"
        } else {
            "SELECT * FROM brands WHERE is_active = 1 ORDER BY display_name, id"
        };

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_brand).collect()
    }

    pub async fn find_brand(&self, brand_id: &str) -> Result<Option<Brand>, CatalogError> {
        let row = sqlx::query("SELECT * FROM brands WHERE id = ?")
            .bind(brand_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_brand).transpose()
    }

    pub async fn get_brand(&self, brand_id: &str) -> Result<Brand, CatalogError> {
        debug!("Fetching brand: {}", brand_id);

        self.find_brand(brand_id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("Brand '{}'", brand_id)))
    }

    pub async fn create_brand(&self, input: BrandCreateInput) -> Result<Brand, CatalogError> {
        input.validate()?;
        let now = Utc::now();
        let id = input.id.trim().to_string();

        sqlx::query(
            r#"
            INSERT INTO brands (id, name, display_name, description, logo_url, website, country, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(input.name.trim())
        .bind(input.display_name.trim())
        .bind(&input.description)
        .bind(&input.logo_url)
        .bind(&input.website)
        .bind(&input.country)
        .bind(input.is_active)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_or_storage(e, format!("Brand '{}'", id)))?;

        info!(brand_id = %id, "Brand created");
        self.get_brand(&id).await
    }

    pub async fn update_brand(&self, brand_id: &str, input: BrandUpdateInput) -> Result<Brand, CatalogError> {
        input.validate()?;
        debug!("Updating brand: {}", brand_id);

        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE brands SET updated_at = ");
        query_builder.push_bind(Utc::now());

        if let Some(name) = &input.name {
            query_builder.push(", name = ").push_bind(name.trim().to_string());
        }
        if let Some(display_name) = &input.display_name {
            query_builder.push(", display_name = ").push_bind(display_name.trim().to_string());
        }
        if let Some(description) = &input.description {
            query_builder.push(", description = ").push_bind(description);
        }
        if let Some(logo_url) = &input.logo_url {
            query_builder.push(", logo_url = ").push_bind(logo_url);
        }
        if let Some(website) = &input.website {
            query_builder.push(", website = ").push_bind(website);
        }
        if let Some(country) = &input.country {
            query_builder.push(", country = ").push_bind(country);
        }
        if let Some(is_active) = input.is_active {
            query_builder.push(", is_active = ").push_bind(is_active);
        }

        query_builder.push(" WHERE id = ").push_bind(brand_id);

        let result = query_builder.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound(format!("Brand '{}'", brand_id)));
        }

        info!(brand_id = %brand_id, "Brand updated");
        self.get_brand(brand_id).await
    }
}

fn duplicate_or_storage(err: sqlx::Error, what: String) -> CatalogError {
    if is_unique_violation(&err) {
        CatalogError::Duplicate(what)
    } else {
        CatalogError::Storage(StorageError::Sqlx(err))
    }
}

fn row_to_category(row: &SqliteRow) -> Result<Category, CatalogError> {
    Ok(Category {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        display_name: row.try_get("display_name")?,
        description: row.try_get("description")?,
        icon_url: row.try_get("icon_url")?,
        sort_order: row.try_get("sort_order")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_brand(row: &SqliteRow) -> Result<Brand, CatalogError> {
    Ok(Brand {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        display_name: row.try_get("display_name")?,
        description: row.try_get("description")?,
        logo_url: row.try_get("logo_url")?,
        website: row.try_get("website")?,
        country: row.try_get("country")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
