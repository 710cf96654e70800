mod migrate;

pub use migrate::migrate_session;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Current session schema version.
pub const SESSION_VERSION: &str = "2";

/// Directory holding session files, relative to the config folder.
pub const SESSION_DIR: &str = "session";

const SESSION_EXT: &str = "json";

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse session {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize session: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to scan session folder: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("session '{0}' not found")]
    NotFound(String),

    #[error("'{0}' is not a valid session id")]
    InvalidId(String),
}

impl SessionError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        SessionError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionHeader {
    pub command_type: String,
    #[serde(default)]
    pub command_args: Vec<String>,
    pub root_path: PathBuf,
    pub when: DateTime<Utc>,
    #[serde(default)]
    pub total_objects: u64,
    #[serde(default)]
    pub total_bytes: u64,
}

/// On-disk representation of a current-schema session file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFile {
    pub version: String,
    pub header: SessionHeader,
}

impl SessionFile {
    pub fn new(header: SessionHeader) -> Self {
        Self {
            version: SESSION_VERSION.to_string(),
            header,
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_vec_pretty(self)?;
        crate::fs::write_atomic(path, &content).map_err(|e| SessionError::io(path, e))
    }
}

/// A session together with its id (the file stem).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub id: String,
    #[serde(flatten)]
    pub header: SessionHeader,
}

pub fn session_dir(config_dir: &Path) -> PathBuf {
    config_dir.join(SESSION_DIR)
}

pub fn session_path(config_dir: &Path, id: &str) -> Result<PathBuf> {
    if id.is_empty() || id.contains(['/', '\\']) || id.starts_with('.') {
        return Err(SessionError::InvalidId(id.to_string()));
    }
    Ok(session_dir(config_dir).join(format!("{}.{}", id, SESSION_EXT)))
}

/// Paths of every `*.json` file directly under the session folder.
pub(crate) fn session_files(config_dir: &Path) -> Result<Vec<PathBuf>> {
    let dir = session_dir(config_dir);
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file()
            && path.extension().and_then(|e| e.to_str()) == Some(SESSION_EXT)
        {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// Current-schema sessions, oldest first.
///
/// Files in any other schema are skipped; migration runs before this is
/// reachable.
pub fn list_sessions(config_dir: &Path) -> Result<Vec<Session>> {
    let mut sessions = Vec::new();

    for path in session_files(config_dir)? {
        let content = std::fs::read_to_string(&path).map_err(|e| SessionError::io(&path, e))?;
        let file: SessionFile = match serde_json::from_str(&content) {
            Ok(file) => file,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "skipping unreadable session");
                continue;
            }
        };
        if file.version != SESSION_VERSION {
            continue;
        }

        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        sessions.push(Session {
            id,
            header: file.header,
        });
    }

    sessions.sort_by(|a, b| a.header.when.cmp(&b.header.when).then(a.id.cmp(&b.id)));
    Ok(sessions)
}

pub fn remove_session(config_dir: &Path, id: &str) -> Result<()> {
    let path = session_path(config_dir, id)?;
    if !path.exists() {
        return Err(SessionError::NotFound(id.to_string()));
    }
    std::fs::remove_file(&path).map_err(|e| SessionError::io(&path, e))
}

/// Remove every `*.json` file in the session folder, readable or not.
/// Returns the ids (file stems) of what was removed.
pub fn clear_sessions(config_dir: &Path) -> Result<Vec<String>> {
    let mut removed = Vec::new();
    for path in session_files(config_dir)? {
        std::fs::remove_file(&path).map_err(|e| SessionError::io(&path, e))?;
        removed.push(
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn header(command_type: &str, hour: u32) -> SessionHeader {
        SessionHeader {
            command_type: command_type.to_string(),
            command_args: vec!["src/".to_string(), "s3/bucket".to_string()],
            root_path: PathBuf::from("/work"),
            when: Utc.with_ymd_and_hms(2015, 6, 1, hour, 0, 0).unwrap(),
            total_objects: 3,
            total_bytes: 1024,
        }
    }

    fn write(config_dir: &Path, id: &str, header: SessionHeader) {
        SessionFile::new(header)
            .save_to(&session_path(config_dir, id).unwrap())
            .unwrap();
    }

    #[test]
    fn test_list_without_session_dir() {
        let temp_dir = TempDir::new().unwrap();
        assert!(list_sessions(temp_dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_list_sorted_by_time() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "bbb", header("cp", 9));
        write(temp_dir.path(), "aaa", header("mirror", 12));

        let sessions = list_sessions(temp_dir.path()).unwrap();
        let ids: Vec<&str> = sessions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["bbb", "aaa"]);
        assert_eq!(sessions[1].header.command_type, "mirror");
    }

    #[test]
    fn test_list_skips_foreign_files() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "good", header("cp", 9));
        let dir = session_dir(temp_dir.path());
        std::fs::write(dir.join("notes.txt"), "hello").unwrap();
        std::fs::write(dir.join("broken.json"), "{").unwrap();

        let sessions = list_sessions(temp_dir.path()).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, "good");
    }

    #[test]
    fn test_remove_session() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "abc", header("cp", 9));

        remove_session(temp_dir.path(), "abc").unwrap();
        assert!(list_sessions(temp_dir.path()).unwrap().is_empty());

        let err = remove_session(temp_dir.path(), "abc").unwrap_err();
        assert!(matches!(err, SessionError::NotFound(id) if id == "abc"));
    }

    #[test]
    fn test_session_id_cannot_escape_folder() {
        let temp_dir = TempDir::new().unwrap();
        let err = remove_session(temp_dir.path(), "../config").unwrap_err();
        assert!(matches!(err, SessionError::InvalidId(_)));
    }

    #[test]
    fn test_clear_sessions() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "one", header("cp", 9));
        write(temp_dir.path(), "two", header("cp", 10));

        assert_eq!(clear_sessions(temp_dir.path()).unwrap(), vec!["one", "two"]);
        assert!(clear_sessions(temp_dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_clear_reports_unreadable_files_it_removes() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "good", header("cp", 9));
        let dir = session_dir(temp_dir.path());
        std::fs::write(dir.join("broken.json"), "{").unwrap();
        std::fs::write(dir.join("notes.txt"), "hello").unwrap();

        let removed = clear_sessions(temp_dir.path()).unwrap();
        assert_eq!(removed, vec!["broken", "good"]);
        assert!(!dir.join("broken.json").exists());
        assert!(dir.join("notes.txt").exists());
    }
}
