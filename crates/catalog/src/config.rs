use std::{env, io::Error, path::PathBuf};

use dirs_next::config_dir;
use serde::{Deserialize, Serialize};

/// Persisted pointer to the catalog manifest the CLI should serve.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub manifest_path: Option<PathBuf>,
}

impl CatalogConfig {
    /// Loads the config file, falling back to defaults when it is missing
    /// or unreadable.
    pub fn load() -> Self {
        let path = default_config_path();
        if let Ok(content) = std::fs::read_to_string(&path)
            && let Ok(config) = serde_json::from_str(&content)
        {
            return config;
        }
        CatalogConfig::default()
    }

    pub fn save(&self) -> Result<(), Error> {
        let path = default_config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }
}

/// Get the default path for the storefront configuration file.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var("STOREFRONT_CONFIG_PATH")
        && !path.trim().is_empty()
    {
        return PathBuf::from(path);
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("storefront")
        .join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_round_trips_through_json() {
        let config = CatalogConfig {
            manifest_path: Some(PathBuf::from("/srv/catalog.yaml")),
        };
        let serialized = serde_json::to_string(&config).expect("serialize config");
        let restored: CatalogConfig = serde_json::from_str(&serialized).expect("parse config");
        assert_eq!(restored, config);
    }

    #[test]
    fn missing_config_file_falls_back_to_default() {
        // Point the env override at a path that cannot exist.
        unsafe { env::set_var("STOREFRONT_CONFIG_PATH", "/nonexistent/storefront/config.json") };
        let config = CatalogConfig::load();
        unsafe { env::remove_var("STOREFRONT_CONFIG_PATH") };
        assert_eq!(config, CatalogConfig::default());
    }
}
