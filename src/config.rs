//! Builder configuration.
//!
//! An optional `market.toml` in the working directory overrides the stock
//! defaults. The file is sparse: set only the keys you want to change.
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! cdn_base = "https://cdn.jsdelivr.net/gh/yingshulu/content"
//! album_manifest = "album.json"
//! index_manifest = "index.json"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILENAME: &str = "market.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuilderConfig {
    /// Base URL every public file URL is built under. No trailing slash.
    pub cdn_base: String,
    /// File name of the per-album manifest inside each album folder.
    pub album_manifest: String,
    /// File name of the top-level index in the working directory.
    pub index_manifest: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            cdn_base: "https://cdn.jsdelivr.net/gh/yingshulu/content".to_string(),
            album_manifest: "album.json".to_string(),
            index_manifest: "index.json".to_string(),
        }
    }
}

impl BuilderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cdn_base.starts_with("https://") || self.cdn_base.starts_with("http://")) {
            return Err(ConfigError::Validation(
                "cdn_base must be an http:// or https:// URL".into(),
            ));
        }
        if self.cdn_base.ends_with('/') {
            return Err(ConfigError::Validation(
                "cdn_base must not end with '/'".into(),
            ));
        }
        validate_file_name("album_manifest", &self.album_manifest)?;
        validate_file_name("index_manifest", &self.index_manifest)?;
        Ok(())
    }
}

fn validate_file_name(key: &str, name: &str) -> Result<(), ConfigError> {
    if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
        return Err(ConfigError::Validation(format!(
            "{key} must be a plain, non-hidden file name, got {name:?}"
        )));
    }
    Ok(())
}

// =============================================================================
// Config loading and merging
// =============================================================================

/// Stock defaults as a `toml::Value::Table`, the base layer for merging.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(BuilderConfig::default())
        .map_err(|e| ConfigError::Validation(format!("cannot encode defaults: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read `market.toml` from `root` as a raw TOML value, `None` if absent.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load the config for a working directory: defaults, then `market.toml`,
/// then validation.
pub fn load_config(root: &Path) -> Result<BuilderConfig, ConfigError> {
    let merged = match load_raw_config(root)? {
        Some(overlay) => merge_toml(stock_defaults_value()?, overlay),
        None => stock_defaults_value()?,
    };
    let config: BuilderConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// A fully-commented stock `market.toml`, printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# Album Market Configuration
# ==========================
# Place this file as market.toml in the directory holding the album folders.
# All settings are optional; values shown below are the defaults.
# Unknown keys will cause an error.

# Base URL that album folders are published under. Song, cover and playlist
# URLs are <cdn_base>/<folder>/<file>, with both parts percent-encoded.
# Must not end with a slash.
cdn_base = "https://cdn.jsdelivr.net/gh/yingshulu/content"

# Per-album manifest written inside every album folder. Existing manifests
# are read back on the next run so song ids stay stable.
album_manifest = "album.json"

# Top-level index listing every album, rebuilt on every run.
index_manifest = "index.json"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_valid() {
        BuilderConfig::default().validate().unwrap();
    }

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(load_config(tmp.path()).unwrap(), BuilderConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            "cdn_base = \"https://cdn.example/music\"\n",
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.cdn_base, "https://cdn.example/music");
        assert_eq!(config.album_manifest, "album.json");
        assert_eq!(config.index_manifest, "index.json");
    }

    #[test]
    fn unknown_key_is_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "cdn_bsae = \"x\"\n").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn invalid_toml_is_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "cdn_base = ").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn trailing_slash_is_rejected() {
        let config = BuilderConfig {
            cdn_base: "https://cdn.example/".into(),
            ..BuilderConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn non_http_base_is_rejected() {
        let config = BuilderConfig {
            cdn_base: "ftp://cdn.example".into(),
            ..BuilderConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn manifest_names_must_be_plain() {
        for bad in ["", "sub/album.json", ".album.json"] {
            let config = BuilderConfig {
                album_manifest: bad.into(),
                ..BuilderConfig::default()
            };
            assert!(config.validate().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn merge_overlay_wins() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: BuilderConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, BuilderConfig::default());
    }
}
