//! Configuration types for the status page service

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the remote incident API
    #[serde(default = "default_url")]
    pub url: String,
    /// Page the incidents are published under
    pub page_id: String,
    /// API key sent as the OAuth authorization header
    pub api_key: String,
    /// Text appended to every creation narrative
    #[serde(default)]
    pub footer_message: String,
    /// Mapping of service name to status page component id
    #[serde(default)]
    pub components: HashMap<String, String>,
    /// Location of the local incident mirror
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

impl Config {
    /// Component id registered for a service, if any
    pub fn component_id(&self, service_name: &str) -> Option<&str> {
        self.components.get(service_name).map(String::as_str)
    }
}

fn default_url() -> String {
    "https://api.statuspage.io/v1".to_string()
}

fn default_store_path() -> PathBuf {
    PathBuf::from("incidents.db")
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::StatusPageError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let json = r#"{
            "url": "https://statuspage.example.com/v1",
            "page_id": "pg-123",
            "api_key": "secret",
            "footer_message": "\nContact ops for details.",
            "components": {
                "db": "comp-db",
                "cache": "comp-cache"
            },
            "store_path": "/var/lib/statuspage/incidents.db"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.url, "https://statuspage.example.com/v1");
        assert_eq!(config.page_id, "pg-123");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.footer_message, "\nContact ops for details.");
        assert_eq!(config.component_id("db"), Some("comp-db"));
        assert_eq!(config.component_id("unknown"), None);
        assert_eq!(
            config.store_path,
            PathBuf::from("/var/lib/statuspage/incidents.db")
        );
    }

    #[test]
    fn parse_minimal_config_applies_defaults() {
        let json = r#"{"page_id": "pg-123", "api_key": "secret"}"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.url, "https://api.statuspage.io/v1");
        assert_eq!(config.footer_message, "");
        assert!(config.components.is_empty());
        assert_eq!(config.store_path, PathBuf::from("incidents.db"));
    }

    #[test]
    fn missing_page_id_is_an_error() {
        let json = r#"{"api_key": "secret"}"#;
        assert!(serde_json::from_str::<Config>(json).is_err());
    }

    #[test]
    fn load_config_missing_file() {
        let result = load_config(Path::new("/nonexistent/config.json"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        std::fs::write(
            &config_path,
            r#"{"page_id": "pg-123", "api_key": "secret"}"#,
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.page_id, "pg-123");
    }

    #[test]
    fn load_config_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, "not json").unwrap();

        let result = load_config(&config_path);
        assert!(result.is_err());
    }
}
