// src/system/session_store.rs

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use thiserror::Error;
use uuid::Uuid;

const PRIVATE_FILE_MODE: u32 = 0o600;

#[derive(Error, Debug)]
pub enum SessionStoreError {
    #[error("Could not access session file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Session file '{path}' is corrupt: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to serialize the session: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// A Basic-auth token and the server it was issued for.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    pub server_url: String,
    /// base64 of `username:password`.
    pub token: String,
}

impl StoredSession {
    pub fn new(server_url: &str, username: &str, password: &str) -> Self {
        Self {
            server_url: server_url.to_string(),
            token: encode_token(username, password),
        }
    }

    pub fn username(&self) -> Option<String> {
        decode_username(&self.token)
    }

    /// Whether this token was issued for `server_url`. Trailing slashes are ignored.
    pub fn belongs_to(&self, server_url: &str) -> bool {
        self.server_url.trim_end_matches('/') == server_url.trim_end_matches('/')
    }
}

pub fn encode_token(username: &str, password: &str) -> String {
    STANDARD.encode(format!("{}:{}", username, password))
}

pub fn decode_username(token: &str) -> Option<String> {
    let bytes = STANDARD.decode(token).ok()?;
    let text = String::from_utf8(bytes).ok()?;
    text.split_once(':').map(|(user, _)| user.to_string())
}

#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when nobody is logged in.
    pub fn load(&self) -> Result<Option<StoredSession>, SessionStoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(SessionStoreError::Io {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };
        let session = toml::from_str(&content).map_err(|e| SessionStoreError::Parse {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(Some(session))
    }

    pub fn save(&self, session: &StoredSession) -> Result<(), SessionStoreError> {
        let content = toml::to_string_pretty(session)?;
        write_private_file_atomic(&self.path, content.as_bytes()).map_err(|e| {
            SessionStoreError::Io {
                path: self.path.clone(),
                source: e,
            }
        })?;
        log::debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    /// Removes the token. Clearing an empty store is not an error.
    pub fn clear(&self) -> Result<bool, SessionStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                log::debug!("Session cleared at {}", self.path.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(SessionStoreError::Io {
                path: self.path.clone(),
                source: e,
            }),
        }
    }
}

fn write_private_file_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("session");
    let temp_path = path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));

    fs::write(&temp_path, bytes)?;
    set_private_permissions(&temp_path)?;
    fs::rename(&temp_path, path)?;
    set_private_permissions(path)
}

fn set_private_permissions(path: &Path) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(PRIVATE_FILE_MODE))?;
    }
    #[cfg(not(unix))]
    {
        let _ = (path, PRIVATE_FILE_MODE);
    }
    Ok(())
}
