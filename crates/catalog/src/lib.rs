//! Product repository for the storefront query engine.
//!
//! This crate owns everything the engine treats as a supplied collaborator:
//! the in-memory [`ProductCatalog`] loaded from a manifest file, store-scope
//! and category resolution, attribute metadata, the filterable-field alias
//! map, and the [`ProductQuery`] builder that executes exactly once into a
//! lazy row iterator.

pub mod config;
pub mod fields;
pub mod manifest;
pub mod models;
pub mod query;

pub use config::{CatalogConfig, default_config_path};
pub use fields::FilterFieldMap;
pub use manifest::{ManifestError, load_manifest};
pub use models::{CatalogError, ProductCatalog};
pub use query::{ProductQuery, ProductRows};
