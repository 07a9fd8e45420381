// Configuration management with layered configuration (file, env)

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main settings structure containing all configuration options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub workforce_api: WorkforceApiConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Where the workforce API lives and how long to wait for it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkforceApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub page_size: i64,
    pub cache_ttl_seconds: u64,
}

impl Settings {
    /// Load configuration with layered precedence: defaults file → local
    /// overrides → environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from_path<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default configuration
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Add local configuration (not committed to git)
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            // Add environment-specific configuration
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        if self.workforce_api.base_url.is_empty() {
            return Err("Workforce API base_url cannot be empty".to_string());
        }
        if self.workforce_api.timeout_seconds == 0 {
            return Err("Workforce API timeout_seconds must be greater than 0".to_string());
        }

        if self.ui.page_size <= 0 {
            return Err("UI page_size must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            workforce_api: WorkforceApiConfig {
                base_url: "http://localhost:8000".to_string(),
                timeout_seconds: 30,
            },
            ui: UiConfig {
                page_size: 10,
                cache_ttl_seconds: 30,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validation_catches_zero_port() {
        let mut settings = Settings::default();
        settings.server.port = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validation_catches_empty_base_url() {
        let mut settings = Settings::default();
        settings.workforce_api.base_url = String::new();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validation_catches_zero_timeout() {
        let mut settings = Settings::default();
        settings.workforce_api.timeout_seconds = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validation_catches_nonpositive_page_size() {
        let mut settings = Settings::default();
        settings.ui.page_size = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_from_path_reads_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("default.toml")).unwrap();
        writeln!(
            file,
            r#"
[server]
host = "127.0.0.1"
port = 9090

[workforce_api]
base_url = "http://api.internal:8000"
timeout_seconds = 10

[ui]
page_size = 25
cache_ttl_seconds = 5
"#
        )
        .unwrap();

        let settings = Settings::load_from_path(dir.path()).unwrap();
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.workforce_api.base_url, "http://api.internal:8000");
        assert_eq!(settings.ui.page_size, 25);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_local_file_overrides_default() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.toml"),
            r#"
[server]
host = "0.0.0.0"
port = 8080

[workforce_api]
base_url = "http://localhost:8000"
timeout_seconds = 30

[ui]
page_size = 10
cache_ttl_seconds = 30
"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("local.toml"),
            r#"
[workforce_api]
base_url = "http://staging:8000"
"#,
        )
        .unwrap();

        let settings = Settings::load_from_path(dir.path()).unwrap();
        assert_eq!(settings.workforce_api.base_url, "http://staging:8000");
        assert_eq!(settings.server.port, 8080);
    }
}
