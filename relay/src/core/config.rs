//! Application configuration
//!
//! Merged from three layers, lowest to highest priority:
//! 1. Built-in defaults
//! 2. Config file (`--config` path, or `tracerelay.json` in the working
//!    directory when present)
//! 3. CLI arguments, which include environment variable fallbacks via clap

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::cli::CliConfig;
use super::constants::{
    CONFIG_FILE_NAME, DEFAULT_ENDPOINT, DEFAULT_EXPORT_MAX_ATTEMPTS, DEFAULT_EXPORT_TIMEOUT_SECS,
};

// =============================================================================
// File Config Structs (JSON deserialization)
// =============================================================================

/// Export section of the config file
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ExportFileConfig {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_attempts: Option<u32>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub input: Option<PathBuf>,
    pub export: Option<ExportFileConfig>,
    pub dry_run: Option<bool>,

    /// Captures unknown fields for typo detection
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Export configuration (final/runtime)
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub max_attempts: u32,
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Capture file to replay
    pub input: PathBuf,
    pub export: ExportConfig,
    /// Reconstruct and convert without contacting the collector
    pub dry_run: bool,
}

impl AppConfig {
    /// Load configuration from all sources
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let config_path = if let Some(ref path) = cli.config {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Some(path.clone())
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        let file_config = match config_path {
            Some(path) => {
                let config = FileConfig::load_from_file(&path)?;
                config.warn_unknown_fields();
                config
            }
            None => FileConfig::default(),
        };
        let file_export = file_config.export.unwrap_or_default();

        let input = cli
            .input
            .clone()
            .or(file_config.input)
            .context("No capture file given. Pass --input or set \"input\" in the config file")?;

        let config = Self {
            input,
            export: ExportConfig {
                endpoint: cli
                    .endpoint
                    .clone()
                    .or(file_export.endpoint)
                    .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
                timeout: Duration::from_secs(
                    cli.export_timeout_secs
                        .or(file_export.timeout_secs)
                        .unwrap_or(DEFAULT_EXPORT_TIMEOUT_SECS),
                ),
                max_attempts: cli
                    .export_attempts
                    .or(file_export.max_attempts)
                    .unwrap_or(DEFAULT_EXPORT_MAX_ATTEMPTS),
            },
            dry_run: cli.dry_run || file_config.dry_run.unwrap_or(false),
        };

        config.validate()?;

        tracing::debug!(
            input = %config.input.display(),
            endpoint = %config.export.endpoint,
            timeout_secs = config.export.timeout.as_secs(),
            max_attempts = config.export.max_attempts,
            dry_run = config.dry_run,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.export.endpoint.is_empty() {
            anyhow::bail!("Configuration error: export.endpoint must not be empty");
        }

        if self.export.max_attempts == 0 {
            anyhow::bail!("Configuration error: export.max_attempts must be greater than 0");
        }

        if self.export.timeout.is_zero() {
            anyhow::bail!("Configuration error: export.timeout_secs must be greater than 0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn cli_with_input() -> CliConfig {
        CliConfig {
            input: Some(PathBuf::from("spans.json")),
            ..Default::default()
        }
    }

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::with_suffix(".json").unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_applied() {
        let config = AppConfig::load(&cli_with_input()).unwrap();
        assert_eq!(config.input, PathBuf::from("spans.json"));
        assert_eq!(config.export.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(
            config.export.timeout,
            Duration::from_secs(DEFAULT_EXPORT_TIMEOUT_SECS)
        );
        assert_eq!(config.export.max_attempts, DEFAULT_EXPORT_MAX_ATTEMPTS);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let err = AppConfig::load(&CliConfig::default()).unwrap_err();
        assert!(err.to_string().contains("No capture file given"));
    }

    #[test]
    fn test_file_config_provides_values() {
        let file = write_config(
            r#"{
              "input": "captures/run1.json",
              "export": {"endpoint": "http://collector:4317", "timeout_secs": 5, "max_attempts": 7},
              "dry_run": true
            }"#,
        );
        let cli = CliConfig {
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        };

        let config = AppConfig::load(&cli).unwrap();
        assert_eq!(config.input, PathBuf::from("captures/run1.json"));
        assert_eq!(config.export.endpoint, "http://collector:4317");
        assert_eq!(config.export.timeout, Duration::from_secs(5));
        assert_eq!(config.export.max_attempts, 7);
        assert!(config.dry_run);
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = write_config(
            r#"{"input": "from-file.json", "export": {"endpoint": "http://file:4317"}}"#,
        );
        let cli = CliConfig {
            input: Some(PathBuf::from("from-cli.json")),
            endpoint: Some("http://cli:4317".to_string()),
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        };

        let config = AppConfig::load(&cli).unwrap();
        assert_eq!(config.input, PathBuf::from("from-cli.json"));
        assert_eq!(config.export.endpoint, "http://cli:4317");
    }

    #[test]
    fn test_explicit_config_path_must_exist() {
        let cli = CliConfig {
            config: Some(PathBuf::from("/nonexistent/tracerelay.json")),
            ..Default::default()
        };
        let err = AppConfig::load(&cli).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_malformed_config_file_is_an_error() {
        let file = write_config(r#"{"input": }"#);
        let cli = CliConfig {
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let err = AppConfig::load(&cli).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_unknown_fields_preserved_in_extra() {
        let config: FileConfig =
            serde_json::from_str(r#"{"input": "x.json", "enpoint": "typo"}"#).unwrap();
        match &config.extra {
            serde_json::Value::Object(map) => {
                assert!(map.contains_key("enpoint"));
            }
            other => panic!("expected object, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut cli = cli_with_input();
        cli.export_attempts = Some(0);
        let err = AppConfig::load(&cli).unwrap_err();
        assert!(err.to_string().contains("max_attempts"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut cli = cli_with_input();
        cli.export_timeout_secs = Some(0);
        let err = AppConfig::load(&cli).unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_empty_endpoint_rejected() {
        let mut cli = cli_with_input();
        cli.endpoint = Some(String::new());
        let err = AppConfig::load(&cli).unwrap_err();
        assert!(err.to_string().contains("endpoint"));
    }
}
