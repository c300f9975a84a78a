//! Gateway configuration.
//!
//! Configuration comes from a YAML file and environment variables;
//! environment variables always override YAML values, and built-in defaults
//! fill everything else. The module is split the same way it loads:
//!
//! - `yaml`: YAML file structure
//! - `merge`: YAML/environment merging and validation
//! - `utils`: parsing helpers
//!
//! # Example
//! ```rust,no_run
//! use tts_gateway::config::ServerConfig;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // YAML file with environment overrides
//! let config = ServerConfig::from_file(Path::new("config.yaml"))?;
//! println!("Listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

mod merge;
pub(crate) mod utils;
mod yaml;

pub use yaml::YamlConfig;

/// Environment variable naming the YAML config file.
pub const CONFIG_PATH_ENV: &str = "TTS_CONFIG_PATH";

/// Complete gateway configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // Azure Speech credentials
    pub azure_key: String,
    pub azure_region: String,
    /// Optional endpoint URL override (sovereign clouds, tests).
    pub azure_endpoint: Option<String>,

    // Synthesis defaults
    pub default_voice: String,
    pub default_style: String,
    pub default_rate: String,
    pub default_pitch: String,
    pub output_format: String,

    // Limits
    pub max_text_length: usize,
    pub segment_length: usize,

    /// Whether `/api/v1/tts` streams by default when the caller does not say.
    pub enable_streaming: bool,

    // Usage accounting
    pub cost_output_dir: PathBuf,
    pub price_per_million_chars: f64,
}

impl ServerConfig {
    /// Loads configuration from a YAML file with environment overrides.
    ///
    /// Priority order (highest to lowest): environment variables, YAML
    /// values, built-in defaults. Validation requires the Azure key and
    /// region to be present from one of those sources.
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;
        let yaml: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file {}: {e}", path.display()))?;
        merge::merge_config(Some(yaml))
    }

    /// Loads configuration from environment variables only.
    ///
    /// Also reads a `.env` file if one is present.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let _ = dotenvy::dotenv();
        merge::merge_config(None)
    }

    /// Socket address string for the listener.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
