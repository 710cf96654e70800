use std::path::{Path, PathBuf};

/// Environment variable consulted when no explicit config folder is given.
pub const CONFIG_DIR_ENV: &str = "OBJCTL_CONFIG_DIR";

/// Directory name used under the platform config directory.
pub const APP_DIR_NAME: &str = "objctl";

/// Fallback directory name under `$HOME`.
pub const LEGACY_DIR_NAME: &str = ".objctl";

pub type Result<T> = std::result::Result<T, PathError>;

#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("could not determine config folder: no HOME directory or system config directory found")]
    NoConfigDir,

    #[error("config folder override is empty")]
    EmptyOverride,
}

/// Resolve the config directory path based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. OBJCTL_CONFIG_DIR environment variable (with tilde expansion)
/// 3. System config directory
/// 4. ~/.objctl (fallback for systems without a standard config directory)
pub fn resolve_config_dir(explicit_path: Option<&str>) -> Result<PathBuf> {
    resolve_config_dir_with(
        explicit_path,
        std::env::var(CONFIG_DIR_ENV).ok().as_deref(),
        dirs::config_dir(),
        dirs::home_dir(),
    )
}

/// Same as [`resolve_config_dir`] with every ambient input passed in.
pub fn resolve_config_dir_with(
    explicit_path: Option<&str>,
    env_path: Option<&str>,
    system_config_dir: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Result<PathBuf> {
    // Priority 1: Explicit path
    if let Some(path) = explicit_path {
        if path.is_empty() {
            return Err(PathError::EmptyOverride);
        }
        return Ok(expand_tilde_with(path, home.as_deref()));
    }

    // Priority 2: OBJCTL_CONFIG_DIR environment variable
    if let Some(path) = env_path.filter(|p| !p.is_empty()) {
        return Ok(expand_tilde_with(path, home.as_deref()));
    }

    // Priority 3: System config directory
    if let Some(config_dir) = system_config_dir {
        return Ok(config_dir.join(APP_DIR_NAME));
    }

    // Priority 4: ~/.objctl
    if let Some(home) = home {
        return Ok(home.join(LEGACY_DIR_NAME));
    }

    Err(PathError::NoConfigDir)
}

/// Expand a leading `~` to the given home directory.
fn expand_tilde_with(path: &str, home: Option<&Path>) -> PathBuf {
    if let Some(home) = home {
        if path == "~" {
            return home.to_path_buf();
        }
        if let Some(stripped) = path.strip_prefix("~/") {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
