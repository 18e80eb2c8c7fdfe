//! Reserved-control extraction and generic filter translation.
//!
//! The list operation receives one loosely-typed filter bag. Three keys are
//! reserved controls (`count`, `category`, `ids`) and are consumed before
//! anything else; the rest of the bag goes through the translator, which
//! either yields a complete list of field filters or fails atomically.

use serde_json::Value;
use storefront_catalog::FilterFieldMap;
use storefront_types::{FieldFilter, FilterBag, FilterConstraint};
use thiserror::Error;
use tracing::warn;

/// Result-size cap control key.
pub const COUNT_KEY: &str = "count";
/// Category scope control key.
pub const CATEGORY_KEY: &str = "category";
/// Explicit id inclusion-set control key.
pub const IDS_KEY: &str = "ids";

/// Failures raised while translating generic filters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("unknown filter field '{field}'")]
    UnknownField { field: String },
    #[error("malformed constraint for field '{field}': {reason}")]
    MalformedConstraint { field: String, reason: String },
}

/// Controls extracted from the filter bag before generic translation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservedControls {
    /// Caps the number of returned records.
    pub page_size: Option<usize>,
    /// Restricts results to one category scope.
    pub category_id: Option<u64>,
    /// Explicit inclusion set of product ids; absence means no restriction.
    pub id_set: Option<Vec<u64>>,
}

/// Splits the reserved control keys out of a filter bag.
///
/// Pure: returns the extracted controls and the remaining bag instead of
/// deleting keys in place. Extraction never fails; values that cannot be
/// coerced are dropped with a warning, and an absent `ids` key is simply no
/// restriction.
pub fn split_reserved(bag: &FilterBag) -> (ReservedControls, FilterBag) {
    let mut controls = ReservedControls::default();
    let mut remaining = FilterBag::new();

    for (key, value) in bag {
        match key.as_str() {
            COUNT_KEY => {
                controls.page_size = match coerce_u64(value) {
                    Some(count) if count > 0 => Some(count as usize),
                    _ => {
                        warn!(value = %value, "ignoring non-positive or non-numeric 'count' control");
                        None
                    }
                };
            }
            CATEGORY_KEY => {
                controls.category_id = coerce_u64(value);
                if controls.category_id.is_none() {
                    warn!(value = %value, "ignoring non-numeric 'category' control");
                }
            }
            IDS_KEY => {
                controls.id_set = coerce_id_set(value);
                if controls.id_set.is_none() {
                    warn!(value = %value, "ignoring malformed 'ids' control");
                }
            }
            _ => {
                remaining.insert(key.clone(), value.clone());
            }
        }
    }

    (controls, remaining)
}

/// Translates the remaining filter bag into canonical field filters.
///
/// Atomic: the first unknown field or malformed constraint fails the whole
/// translation; no partial filter list is ever returned.
pub fn translate_filters(bag: &FilterBag, field_map: &FilterFieldMap) -> Result<Vec<FieldFilter>, FilterError> {
    let mut field_filters = Vec::with_capacity(bag.len());
    for (field, raw_constraint) in bag {
        let Some(canonical_field) = field_map.resolve(field) else {
            return Err(FilterError::UnknownField { field: field.clone() });
        };
        let constraint = FilterConstraint::from_value(raw_constraint).map_err(|malformed| FilterError::MalformedConstraint {
            field: field.clone(),
            reason: malformed.reason,
        })?;
        field_filters.push(FieldFilter::new(canonical_field, constraint));
    }
    Ok(field_filters)
}

fn coerce_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    }
}

/// Accepts an array of ids or a single scalar id; entries that do not
/// coerce are skipped.
fn coerce_id_set(value: &Value) -> Option<Vec<u64>> {
    match value {
        Value::Array(entries) => Some(entries.iter().filter_map(coerce_u64).collect()),
        Value::Number(_) | Value::String(_) => coerce_u64(value).map(|id| vec![id]),
        _ => None,
    }
}
