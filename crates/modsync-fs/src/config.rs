//! Format-agnostic settings loading and saving

use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, Result, io};

/// Format-agnostic configuration store.
///
/// Detects the format from the file extension and handles
/// serialization/deserialization transparently.
#[derive(Debug, Default)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Load configuration from a file.
    ///
    /// Format is detected from file extension:
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    pub fn load<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let content = io::read_text(path)?;
        let extension = extension_of(path);

        match extension.as_str() {
            "toml" => toml::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.to_path_buf(),
                format: "TOML".into(),
                message: e.to_string(),
            }),
            "json" => serde_json::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.to_path_buf(),
                format: "JSON".into(),
                message: e.to_string(),
            }),
            "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.to_path_buf(),
                format: "YAML".into(),
                message: e.to_string(),
            }),
            _ => Err(Error::UnsupportedFormat { extension }),
        }
    }

    /// Load configuration if the file exists, `None` otherwise.
    pub fn load_optional<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        match self.load(path) {
            Ok(value) => Ok(Some(value)),
            Err(Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Save configuration to a file, format determined from file extension.
    pub fn save<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let extension = extension_of(path);

        let content = match extension.as_str() {
            "toml" => toml::to_string_pretty(value).map_err(|e| Error::ConfigSerialize {
                path: path.to_path_buf(),
                format: "TOML".into(),
                message: e.to_string(),
            })?,
            "json" => serde_json::to_string_pretty(value).map_err(|e| Error::ConfigSerialize {
                path: path.to_path_buf(),
                format: "JSON".into(),
                message: e.to_string(),
            })?,
            "yaml" | "yml" => serde_yaml::to_string(value).map_err(|e| Error::ConfigSerialize {
                path: path.to_path_buf(),
                format: "YAML".into(),
                message: e.to_string(),
            })?,
            _ => return Err(Error::UnsupportedFormat { extension }),
        };

        io::write_text(path, &content)
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
