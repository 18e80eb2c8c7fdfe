//! Catalog manifest loading with automatic format detection.
//!
//! Manifests are YAML by default; files with a `.json` extension are parsed
//! as JSON. Parse failures carry the offending path and the underlying
//! parser diagnostic.

use std::path::Path;

use storefront_types::CatalogManifest;
use thiserror::Error;
use tracing::debug;

/// Errors emitted while reading a catalog manifest from disk.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse manifest file '{path}': {message}")]
    Parse { path: String, message: String },
}

/// Loads a catalog manifest from the filesystem.
pub fn load_manifest(file_path: impl AsRef<Path>) -> Result<CatalogManifest, ManifestError> {
    let file_path = file_path.as_ref();
    let file_content = std::fs::read(file_path).map_err(|source| ManifestError::Read {
        path: file_path.display().to_string(),
        source,
    })?;
    let content_string = String::from_utf8_lossy(&file_content);

    let is_json = file_path
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));

    let manifest: CatalogManifest = if is_json {
        serde_json::from_str(&content_string).map_err(|error| ManifestError::Parse {
            path: file_path.display().to_string(),
            message: error.to_string(),
        })?
    } else {
        serde_yaml::from_str(&content_string).map_err(|error| ManifestError::Parse {
            path: file_path.display().to_string(),
            message: error.to_string(),
        })?
    };

    debug!(
        path = %file_path.display(),
        stores = manifest.stores.len(),
        products = manifest.products.len(),
        "catalog manifest loaded"
    );
    Ok(manifest)
}
