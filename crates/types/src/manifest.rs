//! Catalog manifest document types.
//!
//! A manifest is the on-disk description of one catalog: store views,
//! categories, attribute sets, and product rows. Loading and validation live
//! in the catalog crate; these types only define the document shape.

use serde::{Deserialize, Serialize};

use crate::{AttributeSet, Category, ProductRecord, StoreScope};

/// Top-level catalog manifest document (YAML or JSON).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogManifest {
    /// Store views this catalog serves. At least one is required; the one
    /// flagged `default` (or the first) answers unscoped requests.
    #[serde(default)]
    pub stores: Vec<StoreScope>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub attribute_sets: Vec<AttributeSet>,
    #[serde(default)]
    pub products: Vec<ProductRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_parses_from_yaml() {
        let yaml = r#"
stores:
  - id: 1
    code: default
    website_id: 1
    base_url: https://shop.example.com
    media_base_url: https://shop.example.com/media
    default: true
categories:
  - { id: 5, name: Shirts }
attribute_sets:
  - id: 4
    name: Default
    attributes:
      - { code: color, editable: true }
      - { code: cost }
products:
  - id: 10
    sku: SHIRT-S
    name: Small Shirt
    attribute_set_id: 4
    price: 50.0
    category_ids: [5]
    website_ids: [1]
"#;
        let manifest: CatalogManifest = serde_yaml::from_str(yaml).expect("parse manifest");
        assert_eq!(manifest.stores.len(), 1);
        assert!(manifest.stores[0].is_default);
        assert_eq!(manifest.attribute_sets[0].attributes.len(), 2);
        assert!(!manifest.attribute_sets[0].attributes[1].editable);
        assert_eq!(manifest.products[0].category_ids, vec![5]);
    }

    #[test]
    fn manifest_sections_default_to_empty() {
        let manifest: CatalogManifest = serde_json::from_str("{}").expect("parse empty manifest");
        assert!(manifest.stores.is_empty());
        assert!(manifest.products.is_empty());
    }
}
