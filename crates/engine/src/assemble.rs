//! Query assembly for the list operation.
//!
//! Applies scope and reserved controls in a fixed order, runs the extension
//! hook, translates the remaining generic filters, and executes the query
//! exactly once.

use std::sync::Arc;

use indexmap::IndexSet;
use storefront_catalog::{ProductCatalog, ProductQuery, ProductRows};
use storefront_types::{FilterBag, StoreScope};
use tracing::debug;

use crate::error::ApiError;
use crate::filters::{split_reserved, translate_filters};
use crate::hook::{CollectionDelta, CollectionListener, run_listeners};

/// Output of query assembly: the resolved scope, the attribute request set
/// the hook produced, and the executed row iterator.
#[derive(Debug)]
pub(crate) struct AssembledQuery<'catalog> {
    pub store: StoreScope,
    pub attributes: IndexSet<String>,
    pub rows: ProductRows<'catalog>,
}

pub(crate) fn assemble<'catalog>(
    catalog: &'catalog ProductCatalog,
    store: Option<&str>,
    filters: Option<&FilterBag>,
    listeners: &[Arc<dyn CollectionListener>],
) -> Result<AssembledQuery<'catalog>, ApiError> {
    let store = catalog
        .resolve_store(store)
        .ok_or_else(|| ApiError::UnknownStore(store.unwrap_or_default().to_string()))?
        .clone();

    let bag = filters.cloned().unwrap_or_default();
    let (controls, remaining) = split_reserved(&bag);

    let mut query = ProductQuery::new()
        .for_store(&store)
        .select_attribute("name")
        .select_attribute("image")
        .select_attribute("status");

    if let Some(page_size) = controls.page_size {
        query = query.page_size(page_size);
    }
    if let Some(category_id) = controls.category_id {
        let category = catalog.category(category_id).ok_or(ApiError::UnknownCategory(category_id))?;
        query = query.in_category(category);
    }
    if let Some(id_set) = controls.id_set {
        query = query.with_ids(id_set);
    }

    // The hook sees the reserved controls already folded in and the
    // attribute request set still empty.
    let CollectionDelta { attributes, mut query } = run_listeners(listeners, CollectionDelta::new(query))?;

    for field_filter in translate_filters(&remaining, &catalog.filter_field_map())? {
        query = query.add_filter(field_filter);
    }

    debug!(
        store = %store.code,
        attribute_count = attributes.len(),
        "product query assembled"
    );
    Ok(AssembledQuery {
        store,
        attributes,
        rows: catalog.run(query),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::FnListener;
    use crate::testutil::{bag, sample_catalog};
    use serde_json::json;

    #[test]
    fn count_control_caps_the_executed_rows() {
        let catalog = sample_catalog();
        let assembled = assemble(&catalog, None, Some(&bag(&[("count", json!(2))])), &[]).expect("assemble");
        assert_eq!(assembled.rows.count(), 2);
    }

    #[test]
    fn unknown_category_is_fatal() {
        let catalog = sample_catalog();
        let error = assemble(&catalog, None, Some(&bag(&[("category", json!(404))])), &[]).expect_err("expected failure");
        assert!(matches!(error, ApiError::UnknownCategory(404)));
    }

    #[test]
    fn unknown_store_is_fatal() {
        let catalog = sample_catalog();
        let error = assemble(&catalog, Some("outlet"), None, &[]).expect_err("expected failure");
        assert!(matches!(error, ApiError::UnknownStore(identifier) if identifier == "outlet"));
    }

    #[test]
    fn translation_failure_aborts_before_execution() {
        let catalog = sample_catalog();
        let error = assemble(&catalog, None, Some(&bag(&[("warehouse_zone", json!("a"))])), &[]).expect_err("expected failure");
        assert!(matches!(error, ApiError::InvalidFilter(_)));
    }

    #[test]
    fn hook_attributes_surface_in_the_assembled_query() {
        let catalog = sample_catalog();
        let listener: Arc<dyn CollectionListener> = Arc::new(FnListener::new("extra", |mut delta: CollectionDelta| {
            delta.attributes.insert("color".to_string());
            Ok(delta)
        }));

        let assembled = assemble(&catalog, None, None, &[listener]).expect("assemble");
        assert!(assembled.attributes.contains("color"));
    }

    #[test]
    fn listener_failure_aborts_the_assembly() {
        let catalog = sample_catalog();
        let listener: Arc<dyn CollectionListener> = Arc::new(FnListener::new("broken", |_delta| {
            Err(crate::error::ListenerError::new("broken", "unavailable"))
        }));

        let error = assemble(&catalog, None, None, &[listener]).expect_err("expected failure");
        assert!(matches!(error, ApiError::Listener(_)));
    }

    #[test]
    fn base_query_selects_the_seed_attributes() {
        let catalog = sample_catalog();
        let seen: Arc<std::sync::Mutex<Vec<String>>> = Arc::default();
        let seen_in_listener = Arc::clone(&seen);
        let listener: Arc<dyn CollectionListener> = Arc::new(FnListener::new("probe", move |delta: CollectionDelta| {
            let mut guard = seen_in_listener.lock().expect("probe lock");
            *guard = delta.query.selected_attributes().iter().cloned().collect();
            Ok(delta)
        }));

        assemble(&catalog, None, None, &[listener]).expect("assemble");
        assert_eq!(*seen.lock().expect("probe lock"), vec!["name", "image", "status"]);
    }
}
