//! Single-product detail resolution.
//!
//! Resolves an identifier (numeric id or SKU, with an optional
//! case-insensitive type flag), builds the fixed core fields, then appends
//! the product's editable attributes filtered through the caller's
//! allow-list. No enrichment and no extension hook on this path.

use serde_json::Value;
use storefront_catalog::ProductCatalog;
use storefront_types::{DetailRecord, ProductRecord};

use crate::error::ApiError;

pub(crate) fn resolve_detail(
    catalog: &ProductCatalog,
    product_id: &str,
    allowed: Option<&[String]>,
    identifier_type: Option<&str>,
) -> Result<DetailRecord, ApiError> {
    // The sku-vs-id flag is case-insensitive.
    let normalized_type = identifier_type.map(str::to_ascii_lowercase);
    let product = find_product(catalog, product_id, normalized_type.as_deref())
        .ok_or_else(|| ApiError::ProductNotFound(product_id.to_string()))?;

    let mut record = DetailRecord::new();
    record.insert("product_id".to_string(), Value::from(product.id));
    record.insert("sku".to_string(), Value::from(product.sku.clone()));
    record.insert("set".to_string(), Value::from(product.attribute_set_id));
    record.insert("type".to_string(), Value::from(product.type_id.as_str()));
    record.insert("categories".to_string(), Value::from(product.category_ids.clone()));
    record.insert("websites".to_string(), Value::from(product.website_ids.clone()));

    for attribute in catalog.editable_attributes(product) {
        if attribute_allowed(&attribute.code, allowed) {
            record.insert(attribute.code.clone(), product.attribute(&attribute.code));
        }
    }

    Ok(record)
}

fn find_product<'catalog>(
    catalog: &'catalog ProductCatalog,
    identifier: &str,
    identifier_type: Option<&str>,
) -> Option<&'catalog ProductRecord> {
    match identifier_type {
        Some("sku") => catalog.find_by_sku(identifier),
        Some("id") => identifier.parse().ok().and_then(|id| catalog.find_by_id(id)),
        // No explicit flag: numeric identifiers are ids, everything else
        // is treated as a SKU.
        _ => match identifier.parse::<u64>() {
            Ok(id) => catalog.find_by_id(id),
            Err(_) => catalog.find_by_sku(identifier),
        },
    }
}

/// An empty or absent allow-list admits every editable attribute.
fn attribute_allowed(code: &str, allowed: Option<&[String]>) -> bool {
    match allowed {
        None => true,
        Some(list) if list.is_empty() => true,
        Some(list) => list.iter().any(|entry| entry == code),
    }
}
