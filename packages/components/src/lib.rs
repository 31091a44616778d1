// ABOUTME: Component catalog core
// ABOUTME: Filtered and paginated search, facets, and transactional create/update/delete

pub mod error;
pub mod facets;
pub mod filter;
pub mod pagination;
pub mod storage;
pub mod types;
mod writer;

// Re-export main types
pub use error::ComponentError;
pub use facets::{AvailableFilters, BrandFacet, CategoryFacet, FilterOption};
pub use filter::{ComponentFilter, ComponentQuery, Currency, SortField, SortOrder, SPEC_FILTER_KEYS};
pub use pagination::{Pagination, PaginationMeta, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use storage::ComponentStorage;
pub use types::{
    BrandAssociation, BulkCreateReport, BulkItemResult, Component, ComponentBrandLink,
    ComponentCreateInput, ComponentPage, ComponentSpec, ComponentSummary, ComponentUpdateInput,
    ComponentWithRelations, DeleteMode, PriceItem, PriceRange, MAX_BULK_COMPONENTS,
};
