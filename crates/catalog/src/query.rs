//! The product query builder and its lazy row iterator.
//!
//! A [`ProductQuery`] accumulates scope and filter clauses and is consumed
//! exactly once by [`ProductCatalog::run`]. Rows come back lazily in stable
//! catalog order; re-iterating requires building a new query.

use indexmap::IndexSet;
use storefront_types::{Category, FieldFilter, ProductRecord, StoreScope};

use crate::models::ProductCatalog;

/// Accumulated clauses for one list invocation.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    website_id: Option<u64>,
    page_size: Option<usize>,
    category_id: Option<u64>,
    id_set: Option<Vec<u64>>,
    selected_attributes: IndexSet<String>,
    field_filters: Vec<FieldFilter>,
}

impl ProductQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts rows to products assigned to the store's website.
    pub fn for_store(mut self, store: &StoreScope) -> Self {
        self.website_id = Some(store.website_id);
        self
    }

    /// Marks an attribute for loading. The in-memory backend materializes
    /// full rows, so this is a directive for the projection layer and for
    /// listeners inspecting the query; it does not narrow matching.
    pub fn select_attribute(mut self, code: impl Into<String>) -> Self {
        self.selected_attributes.insert(code.into());
        self
    }

    /// Caps the number of rows the executed query yields.
    pub fn page_size(mut self, limit: usize) -> Self {
        self.page_size = Some(limit);
        self
    }

    /// Restricts rows to products assigned to the category.
    pub fn in_category(mut self, category: &Category) -> Self {
        self.category_id = Some(category.id);
        self
    }

    /// Restricts rows to an explicit id inclusion set.
    pub fn with_ids(mut self, ids: Vec<u64>) -> Self {
        self.id_set = Some(ids);
        self
    }

    /// Adds a generic field filter.
    pub fn add_filter(mut self, filter: FieldFilter) -> Self {
        self.field_filters.push(filter);
        self
    }

    /// Attribute codes marked for loading so far.
    pub fn selected_attributes(&self) -> &IndexSet<String> {
        &self.selected_attributes
    }

    fn matches(&self, product: &ProductRecord) -> bool {
        if let Some(website_id) = self.website_id
            && !product.website_ids.contains(&website_id)
        {
            return false;
        }
        if let Some(category_id) = self.category_id
            && !product.category_ids.contains(&category_id)
        {
            return false;
        }
        if let Some(id_set) = self.id_set.as_ref()
            && !id_set.contains(&product.id)
        {
            return false;
        }
        self.field_filters
            .iter()
            .all(|filter| filter.constraint.matches(&product.attribute(&filter.field)))
    }
}

impl ProductCatalog {
    /// Executes a query, consuming it, and returns the lazy row iterator.
    pub fn run(&self, query: ProductQuery) -> ProductRows<'_> {
        let remaining = query.page_size.unwrap_or(usize::MAX);
        ProductRows {
            products: self.products().iter(),
            query,
            remaining,
        }
    }
}

/// Single-pass iterator over the products matching an executed query.
#[derive(Debug)]
pub struct ProductRows<'catalog> {
    products: std::slice::Iter<'catalog, ProductRecord>,
    query: ProductQuery,
    remaining: usize,
}

impl<'catalog> Iterator for ProductRows<'catalog> {
    type Item = &'catalog ProductRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        for product in self.products.by_ref() {
            if self.query.matches(product) {
                self.remaining -= 1;
                return Some(product);
            }
        }
        None
    }
}
