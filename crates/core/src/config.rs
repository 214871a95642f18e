//! Runtime configuration
//!
//! The core reads a small TOML file for deployment-specific values: the set
//! of locations a hotel may use, the public base URL used when building
//! display links for notifications, and the no-reply sender address.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;

/// Core configuration, loadable from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Allowed values for a hotel's location field
    #[serde(default = "default_locations")]
    pub locations: Vec<String>,
    /// Public base URL used in notification links
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Sender address for outgoing notifications
    #[serde(default = "default_no_reply_email")]
    pub no_reply_email: String,
}

fn default_locations() -> Vec<String> {
    ["Berlin", "Hamburg", "Munich", "Frankfurt", "Cologne"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_no_reply_email() -> String {
    "no-reply@lodgekit.local".to_string()
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            locations: default_locations(),
            base_url: default_base_url(),
            no_reply_email: default_no_reply_email(),
        }
    }
}

impl CoreConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from a TOML file, falling back to defaults if it is missing or broken
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    path = %path.as_ref().display(),
                    error = %e,
                    "Failed to load config, using defaults"
                );
                Self::default()
            }
        }
    }

    /// Platform default config file path
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "lodgekit")
            .map(|dirs| dirs.config_dir().join("core.toml"))
    }

    /// Whether a location value is in the allowed set
    pub fn is_allowed_location(&self, location: &str) -> bool {
        self.locations.iter().any(|l| l == location)
    }

    /// Absolute display URL for a hotel detail page
    pub fn hotel_url(&self, slug: &str) -> String {
        format!("{}/hotels/{}/", self.base_url.trim_end_matches('/'), slug)
    }

    /// Absolute display URL for a chain detail page
    pub fn chain_url(&self, slug: &str) -> String {
        format!("{}/chains/{}/", self.base_url.trim_end_matches('/'), slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = CoreConfig::default();
        assert!(!config.locations.is_empty());
        assert!(config.is_allowed_location("Berlin"));
        assert!(!config.is_allowed_location("Atlantis"));
    }

    #[test]
    fn test_load_from_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("core.toml");
        fs::write(
            &path,
            r#"
locations = ["Test Land", "Berlin"]
base_url = "https://hotels.example.com/"
"#,
        )
        .unwrap();

        let config = CoreConfig::load(&path).unwrap();
        assert!(config.is_allowed_location("Test Land"));
        assert_eq!(config.no_reply_email, default_no_reply_email());
        assert_eq!(
            config.hotel_url("test-hotel"),
            "https://hotels.example.com/hotels/test-hotel/"
        );
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let temp = TempDir::new().unwrap();
        let config = CoreConfig::load_or_default(temp.path().join("nope.toml"));
        assert_eq!(config.base_url, default_base_url());
    }

    #[test]
    fn test_default_path_is_namespaced() {
        if let Some(path) = CoreConfig::default_path() {
            assert!(path.ends_with("core.toml") || path.to_string_lossy().contains("lodgekit"));
        }
    }

    #[test]
    fn test_chain_url() {
        let config = CoreConfig::default();
        assert_eq!(
            config.chain_url("test-chain"),
            "http://localhost:8000/chains/test-chain/"
        );
    }
}
