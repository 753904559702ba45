use crate::Result;
use anyhow::anyhow;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

#[cfg(test)]
mod tests;

// TOML configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default = "default_bucket_name")]
    pub bucket_name: String,
    #[serde(default = "default_fuel_log_file")]
    pub fuel_log_file: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default = "default_fuel_log_path")]
    pub fuel_log_path: String,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_rust_log_format")]
    pub rust_log_format: String,
    #[serde(default)]
    pub log_level: String,
}

// Default values
fn default_source() -> String {
    "gcs".to_string()
}
fn default_bucket_name() -> String {
    "cloud-run-am4".to_string()
}
fn default_fuel_log_file() -> String {
    "fuel_log.json".to_string()
}
fn default_base_url() -> String {
    "https://storage.googleapis.com".to_string()
}
fn default_fuel_log_path() -> String {
    "fuel_log.json".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_rust_log_format() -> String {
    "term".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            bucket_name: default_bucket_name(),
            fuel_log_file: default_fuel_log_file(),
            base_url: default_base_url(),
            access_token: String::new(),
            fuel_log_path: default_fuel_log_path(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            rust_log_format: default_rust_log_format(),
            log_level: String::new(),
        }
    }
}

static CONFIG: Lazy<Config> = Lazy::new(|| {
    load_config().unwrap_or_else(|e| {
        eprintln!(
            "Warning: Failed to load config files: {}. Using defaults.",
            e
        );
        Config::default()
    })
});

static CONFIG_STORE: Lazy<Arc<Mutex<HashMap<String, String>>>> =
    Lazy::new(|| Arc::new(Mutex::new(HashMap::new())));

pub fn get(name: &str) -> Result<String> {
    // Priority 1: CONFIG_STORE (runtime overrides)
    if let Some(value) = get_from_store(name) {
        if value.is_empty() {
            return Err(anyhow!("{} is empty", name));
        }
        return Ok(value);
    }

    // Priority 2: Environment variables
    if let Ok(val) = std::env::var(name)
        && !val.is_empty()
    {
        return Ok(val);
    }

    // Priority 3: TOML config
    let toml_value = from_toml(&CONFIG, name);
    if let Some(value) = toml_value
        && !value.is_empty()
    {
        return Ok(value);
    }

    Err(anyhow!("Configuration key not found: {}", name))
}

fn from_toml(config: &Config, name: &str) -> Option<String> {
    match name {
        "FUEL_LOG_SOURCE" => Some(config.storage.source.clone()),
        "BUCKET_NAME" => Some(config.storage.bucket_name.clone()),
        "FUEL_LOG_FILE" => Some(config.storage.fuel_log_file.clone()),
        "STORAGE_BASE_URL" => Some(config.storage.base_url.clone()),
        "STORAGE_ACCESS_TOKEN" => Some(config.storage.access_token.clone()),
        "FUEL_LOG_PATH" => Some(config.storage.fuel_log_path.clone()),
        "PORT" => Some(config.server.port.to_string()),
        "RUST_LOG_FORMAT" => Some(config.logging.rust_log_format.clone()),
        "LOG_LEVEL" => Some(config.logging.log_level.clone()),
        _ => None,
    }
}

pub fn set(name: &str, value: &str) {
    if let Ok(mut store) = CONFIG_STORE.lock() {
        store.insert(name.to_string(), value.to_string());
    }
}

pub fn unset(name: &str) {
    if let Ok(mut store) = CONFIG_STORE.lock() {
        store.remove(name);
    }
}

fn get_from_store(name: &str) -> Option<String> {
    if let Ok(store) = CONFIG_STORE.lock() {
        store.get(name).cloned()
    } else {
        None
    }
}

/// Load configuration from TOML files with priority:
/// 1. config/config.local.toml (git-ignored, for local overrides)
/// 2. config/config.toml (git-managed template)
/// 3. Default values
fn load_config() -> Result<Config> {
    let mut table = toml::Table::new();

    let base_path = "config/config.toml";
    if Path::new(base_path).exists() {
        let content = fs::read_to_string(base_path)?;
        table = content.parse()?;
    }

    let local_path = "config/config.local.toml";
    if Path::new(local_path).exists() {
        let content = fs::read_to_string(local_path)?;
        merge_tables(&mut table, content.parse()?);
    }

    Ok(toml::Value::Table(table).try_into()?)
}

/// Merge local keys into base (local values override base values, nested
/// tables are merged key by key)
fn merge_tables(base: &mut toml::Table, local: toml::Table) {
    for (key, value) in local {
        match value {
            toml::Value::Table(local_section) => match base.get_mut(&key) {
                Some(toml::Value::Table(base_section)) => merge_tables(base_section, local_section),
                _ => {
                    base.insert(key, toml::Value::Table(local_section));
                }
            },
            value => {
                base.insert(key, value);
            }
        }
    }
}
