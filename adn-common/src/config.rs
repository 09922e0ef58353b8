//! Bootstrap configuration shared by adn-ds and adn-ui
//!
//! Settings sources, highest priority first:
//!
//! 1. Command-line arguments (parsed by each binary)
//! 2. Environment variables (`ADN_*`, also parsed by each binary)
//! 3. TOML configuration file
//! 4. Compiled defaults
//!
//! This module owns tiers 3 and 4. A missing or malformed TOML file never
//! stops start-up: the problem is logged and compiled defaults are used.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "ADN_CONFIG";

/// Compiled default values
pub struct CompiledDefaults;

impl CompiledDefaults {
    pub const SERVICE_HOST: &'static str = "127.0.0.1";
    pub const SERVICE_PORT: u16 = 5000;
    pub const UI_HOST: &'static str = "127.0.0.1";
    pub const UI_PORT: u16 = 8501;
    /// 64 MiB
    pub const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;
    pub const LOG_LEVEL: &'static str = "info";
    /// Fixed name of the UI's denoised output file
    pub const OUTPUT_FILE_NAME: &'static str = "denoised_output.wav";
    /// File name offered to the browser on download
    pub const DOWNLOAD_FILE_NAME: &'static str = "denoised.wav";
}

/// Bootstrap configuration loaded from TOML
///
/// Every section and field is optional in the file.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct TomlConfig {
    pub service: ServiceSection,
    pub ui: UiSection,
    pub logging: LoggingConfig,
}

/// `[service]` section: the Denoise Service listener
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceSection {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body on `/denoise`
    pub max_upload_bytes: usize,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            host: CompiledDefaults::SERVICE_HOST.to_string(),
            port: CompiledDefaults::SERVICE_PORT,
            max_upload_bytes: CompiledDefaults::MAX_UPLOAD_BYTES,
        }
    }
}

impl ServiceSection {
    /// Base URL the UI uses to reach this service
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// `[ui]` section: the Upload UI listener and its service client
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiSection {
    pub host: String,
    pub port: u16,
    /// Directory receiving the fixed-name denoised output file
    pub output_dir: PathBuf,
    /// Explicit service URL; derived from `[service]` when absent
    pub service_url: Option<String>,
    /// Client timeout for the denoise call; 0 disables the timeout
    pub request_timeout_secs: u64,
}

impl Default for UiSection {
    fn default() -> Self {
        Self {
            host: CompiledDefaults::UI_HOST.to_string(),
            port: CompiledDefaults::UI_PORT,
            output_dir: PathBuf::from("."),
            service_url: None,
            request_timeout_secs: 0,
        }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: CompiledDefaults::LOG_LEVEL.to_string(),
        }
    }
}

impl TomlConfig {
    /// Parse a config file, failing on I/O or syntax errors
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse config text
    pub fn parse(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `explicit`, else `ADN_CONFIG`, else the platform default path.
    ///
    /// Falls back to compiled defaults on any failure.
    pub fn load_or_default(explicit: Option<&Path>) -> Self {
        let path = match explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from))
            .or_else(default_config_path)
        {
            Some(path) => path,
            None => {
                info!("No config directory available, using compiled defaults");
                return Self::default();
            }
        };

        if !path.exists() {
            info!("Config file {} not found, using compiled defaults", path.display());
            return Self::default();
        }

        match Self::load(&path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.service.max_upload_bytes == 0 {
            return Err(Error::Config(
                "service.max_upload_bytes must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Platform config file location: `<config dir>/adn/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("adn").join("config.toml"))
}
