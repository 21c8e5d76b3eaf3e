use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::{ExtractionLimits, ScoringWeights};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub extraction: ExtractionSettings,
    #[serde(default)]
    pub directory: DirectorySettings,
    #[serde(default)]
    pub documents: DocumentSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_mission_weight")]
    pub mission: f64,
    #[serde(default = "default_eligibility_weight")]
    pub eligibility: f64,
    #[serde(default = "default_funding_weight")]
    pub funding: f64,
    #[serde(default = "default_geography_weight")]
    pub geography: f64,
    #[serde(default = "default_timeline_weight")]
    pub timeline: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            mission: default_mission_weight(),
            eligibility: default_eligibility_weight(),
            funding: default_funding_weight(),
            geography: default_geography_weight(),
            timeline: default_timeline_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            mission: config.mission,
            eligibility: config.eligibility,
            funding: config.funding,
            geography: config.geography,
            timeline: config.timeline,
        }
    }
}

fn default_mission_weight() -> f64 { 0.30 }
fn default_eligibility_weight() -> f64 { 0.25 }
fn default_funding_weight() -> f64 { 0.20 }
fn default_geography_weight() -> f64 { 0.15 }
fn default_timeline_weight() -> f64 { 0.10 }

/// Per-category caps on extracted snippets
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionSettings {
    #[serde(default = "default_max_requirements")]
    pub max_requirements: usize,
    #[serde(default = "default_max_eligibility")]
    pub max_eligibility: usize,
    #[serde(default = "default_max_deadlines")]
    pub max_deadlines: usize,
    #[serde(default = "default_max_scoring_criteria")]
    pub max_scoring_criteria: usize,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            max_requirements: default_max_requirements(),
            max_eligibility: default_max_eligibility(),
            max_deadlines: default_max_deadlines(),
            max_scoring_criteria: default_max_scoring_criteria(),
        }
    }
}

impl From<&ExtractionSettings> for ExtractionLimits {
    fn from(settings: &ExtractionSettings) -> Self {
        Self {
            requirements: settings.max_requirements,
            eligibility: settings.max_eligibility,
            deadlines: settings.max_deadlines,
            scoring_criteria: settings.max_scoring_criteria,
        }
    }
}

fn default_max_requirements() -> usize { 10 }
fn default_max_eligibility() -> usize { 5 }
fn default_max_deadlines() -> usize { 3 }
fn default_max_scoring_criteria() -> usize { 5 }

#[derive(Debug, Clone, Deserialize)]
pub struct DirectorySettings {
    #[serde(default = "default_directory_url")]
    pub base_url: String,
    pub api_key: Option<String>,
    #[serde(default = "default_directory_timeout")]
    pub timeout_secs: u64,
    /// Records requested per directory search before ranking
    #[serde(default = "default_directory_page_size")]
    pub page_size: usize,
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            base_url: default_directory_url(),
            api_key: None,
            timeout_secs: default_directory_timeout(),
            page_size: default_directory_page_size(),
        }
    }
}

fn default_directory_url() -> String { "http://localhost:9000/api".to_string() }
fn default_directory_timeout() -> u64 { 30 }
fn default_directory_page_size() -> usize { 100 }

/// Where analyzed documents may be read from
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentSettings {
    #[serde(default = "default_document_root")]
    pub root: String,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            root: default_document_root(),
        }
    }
}

fn default_document_root() -> String { "documents".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with GRANT_SCOUT__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            // Local overrides for development
            .add_source(File::with_name("config/local").required(false))
            // e.g., GRANT_SCOUT__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?;

        apply_env_overrides(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        settings.try_deserialize()
    }

    pub fn scoring_weights(&self) -> ScoringWeights {
        ScoringWeights::from(&self.scoring.weights)
    }

    pub fn extraction_limits(&self) -> ExtractionLimits {
        ExtractionLimits::from(&self.extraction)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("GRANT_SCOUT")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// The directory API key may also come from the conventional GRANTS_API_KEY variable
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    let mut builder = Config::builder().add_source(settings);

    if let Ok(api_key) = std::env::var("GRANTS_API_KEY") {
        builder = builder.set_override("directory.api_key", api_key)?;
    }

    builder.build()
}
