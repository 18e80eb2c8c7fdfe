//! Result projection for the list operation.
//!
//! Every matched row becomes one result record: the fixed core fields in
//! their documented order, then one entry per extension-requested attribute
//! code. Enrichment failures are logged and replaced with empty defaults;
//! the record is emitted either way.

use indexmap::IndexSet;
use serde_json::Value;
use storefront_types::{ProductRecord, ResultRecord, StoreScope};
use tracing::warn;

use crate::enrich::{Enrichment, ProductEnricher};

pub(crate) fn project_rows<'catalog>(
    rows: impl Iterator<Item = &'catalog ProductRecord>,
    attributes: &IndexSet<String>,
    store: &StoreScope,
    enricher: &dyn ProductEnricher,
) -> Vec<ResultRecord> {
    rows.map(|product| project_product(product, attributes, store, enricher)).collect()
}

fn project_product(
    product: &ProductRecord,
    attributes: &IndexSet<String>,
    store: &StoreScope,
    enricher: &dyn ProductEnricher,
) -> ResultRecord {
    let enrichment = match enricher.enrich(product, store) {
        Ok(enrichment) => enrichment,
        Err(error) => {
            warn!(sku = %product.sku, %error, "enrichment failed; emitting record with empty url and image");
            Enrichment::default()
        }
    };

    let mut record = ResultRecord::new();
    record.insert("product_id".to_string(), Value::from(product.id));
    record.insert("sku".to_string(), Value::from(product.sku.clone()));
    record.insert("name".to_string(), Value::from(product.name.clone()));
    record.insert("set".to_string(), Value::from(product.attribute_set_id));
    record.insert("type".to_string(), Value::from(product.type_id.as_str()));
    record.insert("price".to_string(), Value::from(product.price));
    record.insert("url".to_string(), Value::from(enrichment.url));
    record.insert(
        "special_price".to_string(),
        product.special_price.map(Value::from).unwrap_or(Value::Null),
    );
    record.insert("category_ids".to_string(), Value::from(product.category_ids.clone()));
    record.insert("website_ids".to_string(), Value::from(product.website_ids.clone()));
    record.insert("image".to_string(), Value::from(enrichment.image));

    // Extension fields merge after the core set and win on collision.
    for code in attributes {
        record.insert(code.clone(), product.attribute(code));
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::EnrichmentError;
    use crate::testutil::sample_catalog;

    const CORE_FIELDS: [&str; 11] = [
        "product_id",
        "sku",
        "name",
        "set",
        "type",
        "price",
        "url",
        "special_price",
        "category_ids",
        "website_ids",
        "image",
    ];

    struct FailingEnricher;

    impl ProductEnricher for FailingEnricher {
        fn enrich(&self, product: &ProductRecord, _store: &StoreScope) -> Result<Enrichment, EnrichmentError> {
            Err(EnrichmentError::MissingUrlKey {
                sku: product.sku.clone(),
            })
        }
    }

    struct FixedEnricher;

    impl ProductEnricher for FixedEnricher {
        fn enrich(&self, _product: &ProductRecord, _store: &StoreScope) -> Result<Enrichment, EnrichmentError> {
            Ok(Enrichment {
                url: "https://shop.example.com/p.html".to_string(),
                image: "https://shop.example.com/media/p.jpg".to_string(),
            })
        }
    }

    #[test]
    fn record_holds_core_fields_in_documented_order() {
        let catalog = sample_catalog();
        let store = catalog.resolve_store(None).expect("default store").clone();

        let records = project_rows(catalog.products().iter().take(1), &IndexSet::new(), &store, &FixedEnricher);
        let keys: Vec<&str> = records[0].keys().map(String::as_str).collect();
        assert_eq!(keys, CORE_FIELDS);
    }

    #[test]
    fn enrichment_failure_keeps_the_record_with_empty_defaults() {
        let catalog = sample_catalog();
        let store = catalog.resolve_store(None).expect("default store").clone();

        let records = project_rows(catalog.products().iter(), &IndexSet::new(), &store, &FailingEnricher);
        assert_eq!(records.len(), catalog.products().len());
        for record in &records {
            assert_eq!(record.get("url"), Some(&Value::from("")));
            assert_eq!(record.get("image"), Some(&Value::from("")));
            assert!(record.get("sku").is_some_and(|sku| sku.is_string()));
        }
    }

    #[test]
    fn extension_attributes_are_always_present_with_null_default() {
        let catalog = sample_catalog();
        let store = catalog.resolve_store(None).expect("default store").clone();
        let attributes = IndexSet::from(["color".to_string(), "nonexistent".to_string()]);

        let records = project_rows(catalog.products().iter(), &attributes, &store, &FixedEnricher);
        for record in &records {
            assert!(record.contains_key("color"));
            assert_eq!(record.get("nonexistent"), Some(&Value::Null));
        }
    }

    #[test]
    fn extension_field_wins_over_core_field_on_collision() {
        let catalog = sample_catalog();
        let store = catalog.resolve_store(None).expect("default store").clone();
        // Requesting "image" as an extension attribute overrides the
        // enriched image URL with the raw attribute value.
        let attributes = IndexSet::from(["image".to_string()]);

        let records = project_rows(catalog.products().iter().take(1), &attributes, &store, &FixedEnricher);
        let image = records[0].get("image").expect("image field");
        assert_ne!(image, &Value::from("https://shop.example.com/media/p.jpg"));
    }
}
