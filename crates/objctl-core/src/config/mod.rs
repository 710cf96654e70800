mod migrate;
mod validate;

pub use migrate::{ensure_config, migrate_config};
pub use validate::validate;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Current config schema version.
pub const CONFIG_VERSION: u32 = 3;

/// Config file name inside the config folder.
pub const CONFIG_FILE: &str = "config.toml";

/// Version 1 config file name (JSON, single host).
pub const LEGACY_CONFIG_FILE: &str = "config.json";

/// Name the version 1 file is renamed to once migrated.
pub const LEGACY_CONFIG_BACKUP: &str = "config.json.v1.bak";

pub const API_S3V2: &str = "S3v2";
pub const API_S3V4: &str = "S3v4";

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file {} does not exist", .0.display())]
    Missing(PathBuf),

    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse legacy config {}: {source}", .path.display())]
    LegacyParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config {}: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },

    #[error("alias '{0}' not found")]
    AliasNotFound(String),
}

impl ConfigError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    #[serde(default = "default_api")]
    pub api: String,
}

fn default_api() -> String {
    API_S3V4.to_string()
}

impl HostConfig {
    pub fn anonymous(api: &str) -> Self {
        Self {
            access_key_id: String::new(),
            secret_access_key: String::new(),
            api: api.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub version: u32,
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
    #[serde(default)]
    pub hosts: BTreeMap<String, HostConfig>,
}

impl Default for Config {
    fn default() -> Self {
        let mut hosts = BTreeMap::new();
        hosts.insert(
            "*.s3*.amazonaws.com".to_string(),
            HostConfig::anonymous(API_S3V4),
        );
        hosts.insert(
            "storage.googleapis.com".to_string(),
            HostConfig::anonymous(API_S3V2),
        );
        hosts.insert("localhost:*".to_string(), HostConfig::anonymous(API_S3V4));
        hosts.insert("127.0.0.1:*".to_string(), HostConfig::anonymous(API_S3V4));

        Self {
            version: CONFIG_VERSION,
            aliases: default_aliases(),
            hosts,
        }
    }
}

pub(crate) fn default_aliases() -> BTreeMap<String, String> {
    [
        ("s3", "https://s3.amazonaws.com"),
        ("gcs", "https://storage.googleapis.com"),
        ("localhost", "http://localhost:9000"),
    ]
    .into_iter()
    .map(|(name, url)| (name.to_string(), url.to_string()))
    .collect()
}

impl Config {
    pub fn path_in(config_dir: &Path) -> PathBuf {
        config_dir.join(CONFIG_FILE)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::Missing(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        crate::fs::write_atomic(path, content.as_bytes()).map_err(|e| ConfigError::io(path, e))
    }

    pub fn set_alias(&mut self, name: String, url: String) {
        self.aliases.insert(name, url);
    }

    pub fn remove_alias(&mut self, name: &str) -> Result<String> {
        self.aliases
            .remove(name)
            .ok_or_else(|| ConfigError::AliasNotFound(name.to_string()))
    }
}

/// Load `config.toml` from the config folder and check its structure.
///
/// Nothing is returned unless the whole file is valid.
pub fn load_and_validate_config(config_dir: &Path) -> Result<Config> {
    let path = Config::path_in(config_dir);
    let config = Config::load_from(&path)?;
    validate(&config, &path)?;
    Ok(config)
}
