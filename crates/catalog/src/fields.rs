//! Filterable-field map: public filter names, their aliases, and the set of
//! canonical fields a catalog accepts in generic filters.

use indexmap::IndexSet;
use once_cell::sync::Lazy;

/// Fixed product fields every catalog accepts in filters.
static FIXED_FILTER_FIELDS: Lazy<IndexSet<&'static str>> = Lazy::new(|| {
    IndexSet::from([
        "id",
        "sku",
        "name",
        "attribute_set_id",
        "type_id",
        "status",
        "price",
        "special_price",
        "url_key",
        "image",
        "created_at",
        "updated_at",
    ])
});

/// Public aliases accepted for canonical field names.
static FIELD_ALIASES: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    vec![
        ("product_id", "id"),
        ("entity_id", "id"),
        ("set", "attribute_set_id"),
        ("type", "type_id"),
    ]
});

/// Maps caller-facing filter keys onto canonical catalog fields and decides
/// which fields may be filtered on at all.
#[derive(Debug, Clone)]
pub struct FilterFieldMap {
    attribute_codes: IndexSet<String>,
}

impl FilterFieldMap {
    /// Builds a map that, besides the fixed fields, accepts the given
    /// attribute codes (typically every code known to the catalog's
    /// attribute sets).
    pub fn with_attribute_codes(attribute_codes: IndexSet<String>) -> Self {
        Self { attribute_codes }
    }

    /// Resolves a caller-supplied filter key to its canonical field name.
    ///
    /// Returns `None` for fields the catalog cannot filter on; the
    /// translator turns that into an unknown-field error.
    pub fn resolve(&self, field: &str) -> Option<&str> {
        if let Some((_, canonical)) = FIELD_ALIASES.iter().find(|(alias, _)| *alias == field) {
            return Some(canonical);
        }
        if let Some(fixed) = FIXED_FILTER_FIELDS.get(field) {
            return Some(fixed);
        }
        self.attribute_codes.get(field).map(String::as_str)
    }
}
