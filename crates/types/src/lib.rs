//! Shared type definitions for the storefront catalog.
//!
//! These types are exchanged between the catalog repository, the query
//! engine, and the CLI. They are plain serde-derived data with no behavior
//! beyond uniform attribute access on [`ProductRecord`].

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod filter;
pub mod manifest;

pub use filter::{FieldFilter, FilterBag, FilterConstraint};
pub use manifest::CatalogManifest;

/// Dynamic attribute value as it appears in result records.
pub type AttributeValue = Value;

/// Ordered record returned by the list operation.
///
/// Core fields come first in a fixed order; extension-contributed fields are
/// merged after them and win on key collision.
pub type ResultRecord = IndexMap<String, AttributeValue>;

/// Ordered record returned by the single-product detail operation.
pub type DetailRecord = IndexMap<String, AttributeValue>;

/// Product visibility status.
///
/// Serialized as a lowercase word in manifests; exposed to filters and
/// records as the numeric code (`1` enabled, `2` disabled).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Enabled,
    Disabled,
}

impl ProductStatus {
    /// Numeric status code used in filters and projected records.
    pub fn as_code(self) -> u8 {
        match self {
            Self::Enabled => 1,
            Self::Disabled => 2,
        }
    }
}

/// Product type identifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductTypeId {
    #[default]
    Simple,
    Configurable,
    Grouped,
    Bundle,
    Virtual,
    Downloadable,
}

impl ProductTypeId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Configurable => "configurable",
            Self::Grouped => "grouped",
            Self::Bundle => "bundle",
            Self::Virtual => "virtual",
            Self::Downloadable => "downloadable",
        }
    }
}

/// A resolved store view: the scope every list query runs under.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoreScope {
    /// Numeric store identifier.
    pub id: u64,
    /// Store code, usable as an alternate identifier in requests.
    pub code: String,
    /// Website the store belongs to; list queries filter on this.
    pub website_id: u64,
    /// Base URL for canonical product links.
    pub base_url: String,
    /// Base URL for product image assets.
    pub media_base_url: String,
    /// Whether this store is used when the caller supplies no identifier.
    #[serde(default, rename = "default")]
    pub is_default: bool,
}

/// A catalog category. Existence is what matters to the query path; the
/// membership test runs against each product's own `category_ids`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
}

/// Metadata for a single attribute inside an attribute set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeMetadata {
    /// Attribute code, e.g. `color`.
    pub code: String,
    /// Whether the detail operation may expose this attribute.
    #[serde(default)]
    pub editable: bool,
}

/// A named set of attribute metadata shared by a family of products.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSet {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<AttributeMetadata>,
}

/// A single catalog product row as stored in the repository.
///
/// Fixed fields cover the projection core; everything else lives in the
/// ordered `data` map and is reachable through [`ProductRecord::attribute`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: u64,
    pub sku: String,
    pub name: String,
    pub attribute_set_id: u64,
    #[serde(default)]
    pub type_id: ProductTypeId,
    #[serde(default)]
    pub status: ProductStatus,
    pub price: f64,
    #[serde(default)]
    pub special_price: Option<f64>,
    #[serde(default)]
    pub category_ids: Vec<u64>,
    #[serde(default)]
    pub website_ids: Vec<u64>,
    /// URL slug used for canonical link enrichment.
    #[serde(default)]
    pub url_key: Option<String>,
    /// Image path relative to the store's media base.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Arbitrary named attribute values beyond the fixed fields.
    #[serde(default)]
    pub data: IndexMap<String, AttributeValue>,
}

impl ProductRecord {
    /// Uniform accessor over fixed fields and dynamic data.
    ///
    /// Unknown codes yield `Value::Null`, never an error; callers that
    /// tolerate missing attributes (the projector, the detail resolver)
    /// rely on that.
    pub fn attribute(&self, code: &str) -> AttributeValue {
        match code {
            "id" => Value::from(self.id),
            "sku" => Value::from(self.sku.clone()),
            "name" => Value::from(self.name.clone()),
            "attribute_set_id" => Value::from(self.attribute_set_id),
            "type_id" => Value::from(self.type_id.as_str()),
            "status" => Value::from(self.status.as_code()),
            "price" => Value::from(self.price),
            "special_price" => self.special_price.map(Value::from).unwrap_or(Value::Null),
            "category_ids" => Value::from(self.category_ids.clone()),
            "website_ids" => Value::from(self.website_ids.clone()),
            "url_key" => self.url_key.clone().map(Value::from).unwrap_or(Value::Null),
            "image" => self.image.clone().map(Value::from).unwrap_or(Value::Null),
            "created_at" => timestamp_value(self.created_at),
            "updated_at" => timestamp_value(self.updated_at),
            other => self.data.get(other).cloned().unwrap_or(Value::Null),
        }
    }
}

fn timestamp_value(timestamp: Option<DateTime<Utc>>) -> Value {
    timestamp.map(|at| Value::from(at.to_rfc3339())).unwrap_or(Value::Null)
}
