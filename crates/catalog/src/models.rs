//! The in-memory product catalog and its lookup surfaces.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use storefront_types::{AttributeMetadata, AttributeSet, CatalogManifest, Category, ProductRecord, StoreScope};
use thiserror::Error;
use tracing::info;

use crate::fields::FilterFieldMap;
use crate::manifest::{ManifestError, load_manifest};

/// Errors raised while building a catalog from a manifest.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error("catalog manifest declares no stores")]
    NoStores,
    #[error("duplicate store identifier '{0}'")]
    DuplicateStore(String),
    #[error("duplicate category id {0}")]
    DuplicateCategory(u64),
    #[error("duplicate attribute set id {0}")]
    DuplicateAttributeSet(u64),
    #[error("duplicate product identifier '{0}'")]
    DuplicateProduct(String),
    #[error("product '{sku}' references unknown attribute set {attribute_set_id}")]
    UnknownAttributeSet { sku: String, attribute_set_id: u64 },
}

/// The product repository: store views, categories, attribute metadata, and
/// product rows in stable manifest order.
#[derive(Debug, Clone)]
pub struct ProductCatalog {
    stores: Vec<StoreScope>,
    categories: IndexMap<u64, Category>,
    attribute_sets: IndexMap<u64, AttributeSet>,
    products: Vec<ProductRecord>,
    id_index: HashMap<u64, usize>,
    sku_index: HashMap<String, usize>,
}

impl ProductCatalog {
    /// Builds a catalog from a parsed manifest, validating referential
    /// integrity up front so query paths can stay infallible.
    pub fn from_manifest(manifest: CatalogManifest) -> Result<Self, CatalogError> {
        if manifest.stores.is_empty() {
            return Err(CatalogError::NoStores);
        }

        let mut seen_store_ids = IndexSet::new();
        let mut seen_store_codes = IndexSet::new();
        for store in &manifest.stores {
            if !seen_store_ids.insert(store.id) || !seen_store_codes.insert(store.code.clone()) {
                return Err(CatalogError::DuplicateStore(store.code.clone()));
            }
        }

        let mut categories = IndexMap::new();
        for category in manifest.categories {
            if categories.insert(category.id, category.clone()).is_some() {
                return Err(CatalogError::DuplicateCategory(category.id));
            }
        }

        let mut attribute_sets = IndexMap::new();
        for attribute_set in manifest.attribute_sets {
            if attribute_sets.insert(attribute_set.id, attribute_set.clone()).is_some() {
                return Err(CatalogError::DuplicateAttributeSet(attribute_set.id));
            }
        }

        let mut id_index = HashMap::new();
        let mut sku_index = HashMap::new();
        for (position, product) in manifest.products.iter().enumerate() {
            if !attribute_sets.contains_key(&product.attribute_set_id) {
                return Err(CatalogError::UnknownAttributeSet {
                    sku: product.sku.clone(),
                    attribute_set_id: product.attribute_set_id,
                });
            }
            if id_index.insert(product.id, position).is_some() {
                return Err(CatalogError::DuplicateProduct(product.id.to_string()));
            }
            if sku_index.insert(product.sku.clone(), position).is_some() {
                return Err(CatalogError::DuplicateProduct(product.sku.clone()));
            }
        }

        info!(
            stores = manifest.stores.len(),
            products = manifest.products.len(),
            categories = categories.len(),
            "product catalog built"
        );
        Ok(Self {
            stores: manifest.stores,
            categories,
            attribute_sets,
            products: manifest.products,
            id_index,
            sku_index,
        })
    }

    /// Loads and validates a catalog straight from a manifest file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, CatalogError> {
        Self::from_manifest(load_manifest(path)?)
    }

    /// Resolves a store identifier (numeric id or store code) to a scope.
    ///
    /// `None` picks the store flagged as default, falling back to the first
    /// declared store. An unknown identifier resolves to `None`.
    pub fn resolve_store(&self, identifier: Option<&str>) -> Option<&StoreScope> {
        let Some(identifier) = identifier else {
            return self
                .stores
                .iter()
                .find(|store| store.is_default)
                .or_else(|| self.stores.first());
        };
        if let Ok(store_id) = identifier.parse::<u64>() {
            return self.stores.iter().find(|store| store.id == store_id);
        }
        self.stores.iter().find(|store| store.code == identifier)
    }

    pub fn category(&self, id: u64) -> Option<&Category> {
        self.categories.get(&id)
    }

    pub fn find_by_id(&self, id: u64) -> Option<&ProductRecord> {
        self.id_index.get(&id).map(|position| &self.products[*position])
    }

    pub fn find_by_sku(&self, sku: &str) -> Option<&ProductRecord> {
        self.sku_index.get(sku).map(|position| &self.products[*position])
    }

    /// Editable attribute metadata for the product's attribute set.
    ///
    /// Referential integrity is validated at build time, so a missing set
    /// only happens for foreign `ProductRecord`s and yields an empty list.
    pub fn editable_attributes(&self, product: &ProductRecord) -> Vec<&AttributeMetadata> {
        self.attribute_sets
            .get(&product.attribute_set_id)
            .map(|attribute_set| {
                attribute_set
                    .attributes
                    .iter()
                    .filter(|attribute| attribute.editable)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Filter-field map covering the fixed fields plus every attribute code
    /// declared by this catalog's attribute sets.
    pub fn filter_field_map(&self) -> FilterFieldMap {
        let attribute_codes = self
            .attribute_sets
            .values()
            .flat_map(|attribute_set| attribute_set.attributes.iter())
            .map(|attribute| attribute.code.clone())
            .collect();
        FilterFieldMap::with_attribute_codes(attribute_codes)
    }

    pub fn products(&self) -> &[ProductRecord] {
        &self.products
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::tests::sample_manifest;

    #[test]
    fn builds_catalog_and_resolves_stores() {
        let catalog = ProductCatalog::from_manifest(sample_manifest()).expect("build catalog");

        assert_eq!(catalog.resolve_store(None).expect("default store").code, "default");
        assert_eq!(catalog.resolve_store(Some("2")).expect("store by id").code, "b2b");
        assert_eq!(catalog.resolve_store(Some("b2b")).expect("store by code").id, 2);
        assert!(catalog.resolve_store(Some("unknown")).is_none());
    }

    #[test]
    fn rejects_manifest_without_stores() {
        let manifest = CatalogManifest::default();
        assert!(matches!(
            ProductCatalog::from_manifest(manifest),
            Err(CatalogError::NoStores)
        ));
    }

    #[test]
    fn rejects_duplicate_product_sku() {
        let mut manifest = sample_manifest();
        let mut duplicate = manifest.products[0].clone();
        duplicate.id = 999;
        manifest.products.push(duplicate);

        assert!(matches!(
            ProductCatalog::from_manifest(manifest),
            Err(CatalogError::DuplicateProduct(_))
        ));
    }

    #[test]
    fn rejects_unknown_attribute_set_reference() {
        let mut manifest = sample_manifest();
        manifest.products[0].attribute_set_id = 77;

        assert!(matches!(
            ProductCatalog::from_manifest(manifest),
            Err(CatalogError::UnknownAttributeSet { attribute_set_id: 77, .. })
        ));
    }

    #[test]
    fn editable_attributes_filter_on_metadata_flag() {
        let catalog = ProductCatalog::from_manifest(sample_manifest()).expect("build catalog");
        let product = catalog.find_by_id(10).expect("product 10");

        let editable: Vec<&str> = catalog
            .editable_attributes(product)
            .into_iter()
            .map(|attribute| attribute.code.as_str())
            .collect();
        assert_eq!(editable, vec!["color", "size"]);
    }

    #[test]
    fn lookup_by_id_and_sku() {
        let catalog = ProductCatalog::from_manifest(sample_manifest()).expect("build catalog");
        assert_eq!(catalog.find_by_id(11).expect("by id").sku, "SHIRT-M");
        assert_eq!(catalog.find_by_sku("SHIRT-M").expect("by sku").id, 11);
        assert!(catalog.find_by_sku("shirt-m").is_none());
    }
}
