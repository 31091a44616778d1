// ABOUTME: Category and brand type definitions
// ABOUTME: Stored rows plus create and sparse update inputs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    /// Category tag, e.g. `CPU`; selects the specification schema
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub sort_order: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreateInput {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryUpdateInput {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub sort_order: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub website: Option<String>,
    pub country: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandCreateInput {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub website: Option<String>,
    pub country: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandUpdateInput {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub website: Option<String>,
    pub country: Option<String>,
    pub is_active: Option<bool>,
}

fn default_active() -> bool {
    true
}

fn require(field: &str, value: &str) -> Result<(), CatalogError> {
    if value.trim().is_empty() {
        return Err(CatalogError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn require_if_present(field: &str, value: Option<&String>) -> Result<(), CatalogError> {
    match value {
        Some(v) => require(field, v),
        None => Ok(()),
    }
}

impl CategoryCreateInput {
    pub fn validate(&self) -> Result<(), CatalogError> {
        require("id", &self.id)?;
        require("name", &self.name)?;
        require("display_name", &self.display_name)
    }
}

impl CategoryUpdateInput {
    pub fn validate(&self) -> Result<(), CatalogError> {
        require_if_present("name", self.name.as_ref())?;
        require_if_present("display_name", self.display_name.as_ref())
    }
}

impl BrandCreateInput {
    pub fn validate(&self) -> Result<(), CatalogError> {
        require("id", &self.id)?;
        require("name", &self.name)?;
        require("display_name", &self.display_name)
    }
}

impl BrandUpdateInput {
    pub fn validate(&self) -> Result<(), CatalogError> {
        require_if_present("name", self.name.as_ref())?;
        require_if_present("display_name", self.display_name.as_ref())
    }
}
