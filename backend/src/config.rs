//! Configuration management for the EekoAI platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with EEKO_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Log output configuration
    pub logging: LoggingConfig,

    /// Weather data provider configuration
    pub nasa_power: NasaPowerConfig,

    /// Vision/text inference provider configuration
    pub groq: GroqConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// "pretty" or "json"
    pub format: String,
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct NasaPowerConfig {
    /// Base URL of the POWER API
    pub api_endpoint: String,

    /// POWER user community (controls units and defaults)
    pub community: String,

    /// Value sent as the `user` query parameter
    pub user: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GroqConfig {
    /// Base URL of the OpenAI-compatible API
    pub api_endpoint: String,

    /// API key; inference routes are disabled when empty
    #[serde(default)]
    pub api_key: String,

    /// Vision-capable model used for chat and image analysis
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Nucleus sampling cutoff
    pub top_p: f32,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GroqConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("EEKO_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("logging.format", "pretty")?
            .set_default("nasa_power.api_endpoint", "https://power.larc.nasa.gov/api")?
            .set_default("nasa_power.community", "re")?
            .set_default("nasa_power.user", "demo")?
            .set_default("nasa_power.timeout_secs", 30)?
            .set_default("groq.api_endpoint", "https://api.groq.com/openai/v1")?
            .set_default("groq.api_key", "")?
            .set_default("groq.model", "llama-3.2-11b-vision-preview")?
            .set_default("groq.temperature", 0.5)?
            .set_default("groq.top_p", 1.0)?
            .set_default("groq.timeout_secs", 60)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (EEKO_ prefix)
            .add_source(
                Environment::with_prefix("EEKO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for NasaPowerConfig {
    fn default() -> Self {
        Self {
            api_endpoint: "https://power.larc.nasa.gov/api".to_string(),
            community: "re".to_string(),
            user: "demo".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_endpoint: "https://api.groq.com/openai/v1".to_string(),
            api_key: String::new(),
            model: "llama-3.2-11b-vision-preview".to_string(),
            temperature: 0.5,
            top_p: 1.0,
            timeout_secs: 60,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            logging: LoggingConfig {
                format: "pretty".to_string(),
            },
            nasa_power: NasaPowerConfig::default(),
            groq: GroqConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_leave_inference_disabled() {
        let config = Config::default();
        assert!(!config.groq.is_configured());
        assert_eq!(config.nasa_power.community, "re");
    }

    #[test]
    fn test_logging_format() {
        let json = LoggingConfig {
            format: "JSON".to_string(),
        };
        assert!(json.is_json());
        assert!(!Config::default().logging.is_json());
    }
}
