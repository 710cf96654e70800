use super::{API_S3V2, API_S3V4, CONFIG_VERSION, Config, ConfigError, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static ALIAS_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("valid alias regex"));

/// Check the structure of an already parsed config.
pub fn validate(config: &Config, path: &Path) -> Result<()> {
    let invalid = |reason: String| ConfigError::Invalid {
        path: path.to_path_buf(),
        reason,
    };

    if config.version != CONFIG_VERSION {
        return Err(invalid(format!(
            "unsupported version {} (expected {})",
            config.version, CONFIG_VERSION
        )));
    }

    for (name, url) in &config.aliases {
        if !ALIAS_NAME.is_match(name) {
            return Err(invalid(format!("alias name '{}' is not valid", name)));
        }
        if !is_http_url(url) {
            return Err(invalid(format!(
                "alias '{}' points to '{}', expected an http(s) URL",
                name, url
            )));
        }
    }

    for (pattern, host) in &config.hosts {
        if pattern.trim().is_empty() {
            return Err(invalid("host pattern must not be empty".to_string()));
        }
        if host.api != API_S3V2 && host.api != API_S3V4 {
            return Err(invalid(format!(
                "host '{}' uses unknown api '{}' (expected {} or {})",
                pattern, host.api, API_S3V2, API_S3V4
            )));
        }
    }

    Ok(())
}

pub(crate) fn is_http_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.is_empty() && !host.starts_with('/'))
}
