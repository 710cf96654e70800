use super::{
    API_S3V4, CONFIG_FILE, CONFIG_VERSION, Config, ConfigError, HostConfig, LEGACY_CONFIG_BACKUP,
    LEGACY_CONFIG_FILE, Result, default_aliases,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Version 1: JSON, one set of credentials for one endpoint.
#[derive(Debug, Deserialize)]
struct ConfigV1 {
    version: String,
    #[serde(default)]
    access_key_id: String,
    #[serde(default)]
    secret_access_key: String,
    #[serde(default)]
    endpoint: String,
}

/// Version 2: TOML, credentials per host pattern, no aliases.
#[derive(Debug, Serialize, Deserialize)]
struct ConfigV2 {
    version: u32,
    #[serde(default)]
    hosts: BTreeMap<String, HostConfigV2>,
}

#[derive(Debug, Serialize, Deserialize)]
struct HostConfigV2 {
    #[serde(default)]
    access_key: String,
    #[serde(default)]
    secret_key: String,
}

#[derive(Debug, Deserialize)]
struct VersionProbe {
    version: Option<u32>,
}

/// Bring the config under `config_dir` up to the current schema.
///
/// Returns the version the config was migrated from, or `None` when there was
/// nothing to do. Running it again on its own output is a no-op.
pub fn migrate_config(config_dir: &Path) -> Result<Option<u32>> {
    let from_v1 = migrate_v1_to_v2(config_dir)?;
    let from_v2 = migrate_v2_to_v3(config_dir)?;
    Ok(from_v1.or(from_v2))
}

/// Write a default config when none exists in any schema.
///
/// Returns `true` when a config was written.
pub fn ensure_config(config_dir: &Path) -> Result<bool> {
    let path = config_dir.join(CONFIG_FILE);
    if path.exists() || config_dir.join(LEGACY_CONFIG_FILE).exists() {
        return Ok(false);
    }

    Config::default().save_to(&path)?;
    tracing::info!(path = %path.display(), "wrote default config");
    Ok(true)
}

fn migrate_v1_to_v2(config_dir: &Path) -> Result<Option<u32>> {
    let legacy_path = config_dir.join(LEGACY_CONFIG_FILE);
    if !legacy_path.exists() {
        return Ok(None);
    }

    let backup_path = config_dir.join(LEGACY_CONFIG_BACKUP);
    let path = config_dir.join(CONFIG_FILE);

    // A previous run wrote config.toml but stopped before moving the v1 file.
    if path.exists() {
        std::fs::rename(&legacy_path, &backup_path)
            .map_err(|e| ConfigError::io(&legacy_path, e))?;
        tracing::debug!(path = %legacy_path.display(), "moved stale v1 config aside");
        return Ok(None);
    }

    let content =
        std::fs::read_to_string(&legacy_path).map_err(|e| ConfigError::io(&legacy_path, e))?;
    let v1: ConfigV1 =
        serde_json::from_str(&content).map_err(|source| ConfigError::LegacyParse {
            path: legacy_path.clone(),
            source,
        })?;

    if v1.version != "1" {
        return Err(ConfigError::Invalid {
            path: legacy_path,
            reason: format!("unexpected legacy version '{}'", v1.version),
        });
    }

    let mut hosts = BTreeMap::new();
    hosts.insert(
        host_pattern(&v1.endpoint),
        HostConfigV2 {
            access_key: v1.access_key_id,
            secret_key: v1.secret_access_key,
        },
    );
    let v2 = ConfigV2 { version: 2, hosts };

    let serialized = toml::to_string_pretty(&v2)?;
    crate::fs::write_atomic(&path, serialized.as_bytes()).map_err(|e| ConfigError::io(&path, e))?;
    std::fs::rename(&legacy_path, &backup_path).map_err(|e| ConfigError::io(&legacy_path, e))?;

    tracing::info!(path = %path.display(), "migrated config from version 1 to 2");
    Ok(Some(1))
}

fn migrate_v2_to_v3(config_dir: &Path) -> Result<Option<u32>> {
    let path = config_dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::io(&path, e))?;

    // Anything we cannot recognise is left for validation to report.
    let Ok(probe) = toml::from_str::<VersionProbe>(&content) else {
        tracing::debug!(path = %path.display(), "config not recognised, skipping migration");
        return Ok(None);
    };
    if probe.version != Some(2) {
        return Ok(None);
    }

    let v2: ConfigV2 = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;

    let hosts = v2
        .hosts
        .into_iter()
        .map(|(pattern, host)| {
            (
                pattern,
                HostConfig {
                    access_key_id: host.access_key,
                    secret_access_key: host.secret_key,
                    api: API_S3V4.to_string(),
                },
            )
        })
        .collect();

    let v3 = Config {
        version: CONFIG_VERSION,
        aliases: default_aliases(),
        hosts,
    };
    v3.save_to(&path)?;

    tracing::info!(path = %path.display(), "migrated config from version 2 to 3");
    Ok(Some(2))
}

/// `https://s3.amazonaws.com/` -> `s3.amazonaws.com`; empty endpoint matches any host.
fn host_pattern(endpoint: &str) -> String {
    let trimmed = endpoint
        .strip_prefix("https://")
        .or_else(|| endpoint.strip_prefix("http://"))
        .unwrap_or(endpoint)
        .trim_end_matches('/');
    if trimmed.is_empty() {
        "*".to_string()
    } else {
        trimmed.to_string()
    }
}
