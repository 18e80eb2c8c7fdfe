//! Best-effort per-product enrichment: canonical URL and display image.
//!
//! Enrichment is the one part of the list pipeline allowed to fail per
//! record. The seam is an explicit `Result`, and the projector substitutes
//! [`Enrichment::default`] on error instead of dropping the record.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use storefront_types::{ProductRecord, StoreScope};
use thiserror::Error;
use url::Url;

/// RFC3986 unreserved bytes stay as-is; everything else is encoded.
const URL_KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Image value the catalog uses for "explicitly no image".
const NO_IMAGE_SELECTED: &str = "no_selection";

/// Per-product enrichment outputs. Defaults are the empty values the
/// projector emits when enrichment fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enrichment {
    pub url: String,
    pub image: String,
}

/// Per-product enrichment failures. Logged and swallowed by the projector,
/// never surfaced to the caller.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("product '{sku}' has no url key")]
    MissingUrlKey { sku: String },
    #[error("product '{sku}' has no image selected")]
    MissingImage { sku: String },
    #[error("store base URL '{base}' is invalid: {message}")]
    InvalidBaseUrl { base: String, message: String },
}

/// Resolves display enrichment for one product under one store scope.
pub trait ProductEnricher: Send + Sync {
    fn enrich(&self, product: &ProductRecord, store: &StoreScope) -> Result<Enrichment, EnrichmentError>;
}

/// Default enricher: canonical link from the store base URL and the
/// product's url key, image link from the store media base.
#[derive(Debug, Clone, Default)]
pub struct LinkEnricher;

impl ProductEnricher for LinkEnricher {
    fn enrich(&self, product: &ProductRecord, store: &StoreScope) -> Result<Enrichment, EnrichmentError> {
        let url = canonical_url(product, store)?;
        let image = image_url(product, store)?;
        Ok(Enrichment { url, image })
    }
}

fn canonical_url(product: &ProductRecord, store: &StoreScope) -> Result<String, EnrichmentError> {
    let Some(url_key) = product.url_key.as_deref() else {
        return Err(EnrichmentError::MissingUrlKey {
            sku: product.sku.clone(),
        });
    };
    let base = Url::parse(&store.base_url).map_err(|error| EnrichmentError::InvalidBaseUrl {
        base: store.base_url.clone(),
        message: error.to_string(),
    })?;
    let encoded_key = utf8_percent_encode(url_key, URL_KEY_ENCODE_SET);
    let link = base
        .join(&format!("{encoded_key}.html"))
        .map_err(|error| EnrichmentError::InvalidBaseUrl {
            base: store.base_url.clone(),
            message: error.to_string(),
        })?;
    Ok(link.to_string())
}

fn image_url(product: &ProductRecord, store: &StoreScope) -> Result<String, EnrichmentError> {
    let image_path = match product.image.as_deref() {
        Some(path) if path != NO_IMAGE_SELECTED && !path.is_empty() => path,
        _ => {
            return Err(EnrichmentError::MissingImage {
                sku: product.sku.clone(),
            });
        }
    };
    Ok(format!(
        "{}/{}",
        store.media_base_url.trim_end_matches('/'),
        image_path.trim_start_matches('/')
    ))
}
