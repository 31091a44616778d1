// ABOUTME: Category-specific component specifications
// ABOUTME: Decodes spec maps into typed schemas and flattens them into filterable key/value rows

pub mod category;
pub mod flatten;
mod lenient;
pub mod schema;
pub mod validator;

pub use category::ComponentCategory;
pub use flatten::{flatten_specs, is_filterable_spec, SpecEntry, FILTERABLE_SPEC_KEYS, SPEC_TYPE_STRING};
pub use schema::CategorySpecs;
pub use validator::{validate_specs, SpecError};
