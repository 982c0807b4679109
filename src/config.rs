use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::{site_offset, NearbyDefaults};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub firestore: FirestoreSettings,
    pub collection: CollectionSettings,
    #[serde(default)]
    pub nearby: NearbySettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FirestoreSettings {
    #[serde(default = "default_firestore_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    pub project_id: String,
    #[serde(default = "default_database_id")]
    pub database_id: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_firestore_endpoint() -> String { "https://firestore.googleapis.com/v1".to_string() }
fn default_database_id() -> String { "(default)".to_string() }
fn default_page_size() -> u32 { 300 }

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSettings {
    pub events: String,
}

/// Radius and limit defaults for nearby searches
///
/// Different pages of the site used 50, 100 and 200 km; 50 km and the
/// nearest 5 are the defaults here.
#[derive(Debug, Clone, Deserialize)]
pub struct NearbySettings {
    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
    #[serde(default = "default_true")]
    pub upcoming_only: bool,
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

impl Default for NearbySettings {
    fn default() -> Self {
        Self {
            default_radius_km: default_radius_km(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            upcoming_only: default_true(),
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

impl From<&NearbySettings> for NearbyDefaults {
    fn from(settings: &NearbySettings) -> Self {
        NearbyDefaults {
            radius_km: settings.default_radius_km,
            limit: settings.default_limit,
            max_limit: settings.max_limit.max(1),
            upcoming_only: settings.upcoming_only,
            utc_offset: site_offset(settings.utc_offset_hours),
        }
    }
}

fn default_radius_km() -> f64 { 50.0 }
fn default_limit() -> usize { 5 }
fn default_max_limit() -> usize { 50 }
fn default_true() -> bool { true }
fn default_utc_offset_hours() -> i32 { 3 }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            max_entries: default_max_entries(),
        }
    }
}

fn default_ttl_secs() -> u64 { 60 }
fn default_max_entries() -> u64 { 16 }

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
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with NEARBY__)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., NEARBY__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("NEARBY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("NEARBY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    pub fn nearby_defaults(&self) -> NearbyDefaults {
        NearbyDefaults::from(&self.nearby)
    }
}

/// Apply the Firebase variables the web build already uses
///
/// `FIREBASE_API_KEY` and `FIREBASE_PROJECT_ID` fill in the Firestore
/// section unless the prefixed variables are set.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let api_key = env::var("NEARBY__FIRESTORE__API_KEY")
        .or_else(|_| env::var("FIREBASE_API_KEY"))
        .ok();
    let project_id = env::var("NEARBY__FIRESTORE__PROJECT_ID")
        .or_else(|_| env::var("FIREBASE_PROJECT_ID"))
        .ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(api_key) = api_key {
        builder = builder.set_override("firestore.api_key", api_key)?;
    }
    if let Some(project_id) = project_id {
        builder = builder.set_override("firestore.project_id", project_id)?;
    }

    builder.build()
}
