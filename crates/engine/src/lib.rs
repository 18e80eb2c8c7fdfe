//! # Storefront Engine
//!
//! The catalog query façade. Two operations make up the public contract:
//!
//! - [`CatalogApi::items`] — paginated, attribute-projected product list
//!   driven by a loosely-typed filter bag.
//! - [`CatalogApi::info`] — detailed attribute data for one product.
//!
//! The list pipeline runs in a fixed order: reserved-control extraction
//! (`count`, `category`, `ids`), query assembly against the store scope, the
//! ordered collection-listener hook, generic filter translation, a single
//! query execution, and per-row projection with best-effort enrichment.
//!
//! ## Architecture
//!
//! - **`filters`**: reserved-control split and generic filter translation
//! - **`hook`**: ordered collection listeners widening the attribute set
//! - **`enrich`**: best-effort URL/image resolution seam
//! - **`error`**: the caller-facing failure taxonomy
//!
//! All state is invocation-local; a `CatalogApi` can serve concurrent calls
//! without interior mutability. The listener list is fixed at construction
//! time and read-only during dispatch.

use std::sync::Arc;

use storefront_catalog::ProductCatalog;
use storefront_types::{DetailRecord, FilterBag, ResultRecord};
use tracing::debug;

mod assemble;
mod detail;
pub mod enrich;
pub mod error;
pub mod filters;
pub mod hook;
mod project;

pub use enrich::{Enrichment, EnrichmentError, LinkEnricher, ProductEnricher};
pub use error::{ApiError, ListenerError};
pub use filters::{FilterError, ReservedControls, split_reserved, translate_filters};
pub use hook::{CollectionDelta, CollectionListener, FnListener};

/// The product query façade over one catalog.
pub struct CatalogApi {
    catalog: ProductCatalog,
    enricher: Arc<dyn ProductEnricher>,
    listeners: Vec<Arc<dyn CollectionListener>>,
}

impl CatalogApi {
    /// Creates a façade with the default link enricher and no listeners.
    pub fn new(catalog: ProductCatalog) -> Self {
        Self {
            catalog,
            enricher: Arc::new(LinkEnricher),
            listeners: Vec::new(),
        }
    }

    /// Replaces the enrichment backend.
    pub fn with_enricher(mut self, enricher: Arc<dyn ProductEnricher>) -> Self {
        self.enricher = enricher;
        self
    }

    /// Appends a collection listener. Registration order is dispatch order.
    pub fn with_listener(mut self, listener: Arc<dyn CollectionListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    /// Retrieves the list of products matching the filter bag.
    ///
    /// Reserved controls (`count`, `category`, `ids`) are consumed first;
    /// the rest of the bag is translated into generic field filters. Any
    /// translation failure, unknown store/category, or listener failure
    /// aborts the call with no partial results. Per-product enrichment
    /// failures are logged and yield empty `url`/`image` values instead.
    pub fn items(&self, filters: Option<&FilterBag>, store: Option<&str>) -> Result<Vec<ResultRecord>, ApiError> {
        let assembled = assemble::assemble(&self.catalog, store, filters, &self.listeners)?;
        let records = project::project_rows(
            assembled.rows,
            &assembled.attributes,
            &assembled.store,
            self.enricher.as_ref(),
        );
        debug!(record_count = records.len(), store = %assembled.store.code, "list operation complete");
        Ok(records)
    }

    /// Retrieves detailed attribute data for a single product.
    ///
    /// `identifier_type` selects SKU or id lookup (case-insensitive flag);
    /// without it, numeric identifiers resolve as ids and anything else as
    /// a SKU. `attributes` allow-lists the editable attributes included in
    /// the record; an empty or absent list admits all of them.
    pub fn info(
        &self,
        product_id: &str,
        store: Option<&str>,
        attributes: Option<&[String]>,
        identifier_type: Option<&str>,
    ) -> Result<DetailRecord, ApiError> {
        // Validate the store scope even though detail output is unscoped.
        self.catalog
            .resolve_store(store)
            .ok_or_else(|| ApiError::UnknownStore(store.unwrap_or_default().to_string()))?;
        detail::resolve_detail(&self.catalog, product_id, attributes, identifier_type)
    }
}
