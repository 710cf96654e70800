use super::{Result, SESSION_VERSION, SessionError, SessionFile, SessionHeader, session_files};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Version 1 session layout: flat, with the source URLs as the only arguments.
#[derive(Debug, Deserialize)]
struct SessionV1 {
    command_type: String,
    #[serde(default)]
    urls: Vec<String>,
    #[serde(default)]
    root_path: Option<PathBuf>,
    started: DateTime<Utc>,
    #[serde(default)]
    files_copied: u64,
}

impl From<SessionV1> for SessionFile {
    fn from(v1: SessionV1) -> Self {
        SessionFile::new(SessionHeader {
            command_type: v1.command_type,
            command_args: v1.urls,
            root_path: v1.root_path.unwrap_or_else(|| PathBuf::from(".")),
            when: v1.started,
            total_objects: v1.files_copied,
            total_bytes: 0,
        })
    }
}

#[derive(Debug, Deserialize)]
struct VersionProbe {
    version: Option<String>,
}

/// Rewrite every version 1 session file under the config folder.
///
/// Returns the number of files rewritten. Current files and files that are
/// not sessions at all are left untouched.
pub fn migrate_session(config_dir: &Path) -> Result<usize> {
    let mut migrated = 0;

    for path in session_files(config_dir)? {
        let content = std::fs::read_to_string(&path).map_err(|e| SessionError::io(&path, e))?;

        let version = match serde_json::from_str::<VersionProbe>(&content) {
            Ok(probe) => probe.version,
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "not a session file");
                continue;
            }
        };

        match version.as_deref() {
            Some("1") => {
                let v1: SessionV1 =
                    serde_json::from_str(&content).map_err(|source| SessionError::Parse {
                        path: path.clone(),
                        source,
                    })?;
                SessionFile::from(v1).save_to(&path)?;
                migrated += 1;
                tracing::info!(path = %path.display(), "migrated session from version 1 to {}", SESSION_VERSION);
            }
            Some(SESSION_VERSION) => {}
            other => {
                tracing::warn!(path = %path.display(), version = ?other, "unknown session version");
            }
        }
    }

    Ok(migrated)
}
