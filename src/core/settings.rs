//! # Settings
//!
//! Client-side configuration, read from `config.toml` in the client configuration
//! directory. Every field has a default, so a missing file is not an error; a file
//! that exists but does not parse is.

use crate::{
    constants::{DEFAULT_CONFIGURATION_PATH, DEFAULT_SERVER_URL, DEFAULT_TIMEOUT_SECS},
    core::paths::{self, PathError},
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("Could not read settings file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse settings file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the command service; relative endpoint paths are joined onto it.
    pub server_url: String,
    pub timeout_secs: u64,
    /// Where the session token is kept. `~` and `$VARS` are expanded.
    pub session_file: Option<String>,
    /// Show menu identifiers in `tree` output.
    pub show_identifiers: bool,
    /// Presentation document path, relative to `server_url`.
    pub configuration_path: String,
    /// Ask the service for run statistics with every command result.
    pub request_statistics: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            session_file: None,
            show_identifiers: false,
            configuration_path: DEFAULT_CONFIGURATION_PATH.to_string(),
            request_statistics: false,
        }
    }
}

impl Settings {
    /// Loads `config.toml` from the client configuration directory.
    pub fn load() -> Result<Self, SettingsError> {
        let path = paths::get_settings_path()?;
        Self::load_from(&path)
    }

    /// Loads settings from an explicit file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No settings file at {}, using defaults.", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        let settings: Self = toml::from_str(&content).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        log::debug!("Loaded settings from {}: {:?}", path.display(), settings);
        Ok(settings)
    }

    /// Applies the `--server` flag, which wins over the file.
    pub fn with_server_override(mut self, server: Option<String>) -> Self {
        if let Some(url) = server {
            self.server_url = url;
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolves the session token file: the expanded `session_file` template, or
    /// `session.toml` next to `config.toml`.
    pub fn session_path(&self) -> Result<PathBuf, SettingsError> {
        match &self.session_file {
            Some(template) => Ok(paths::expand_path_template(template)?),
            None => Ok(paths::get_default_session_path()?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "server_url = \"https://ops.example.com/commander/\"\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.server_url, "https://ops.example.com/commander/");
        assert_eq!(settings.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(!settings.show_identifiers);
        assert_eq!(settings.configuration_path, DEFAULT_CONFIGURATION_PATH);
        assert!(!settings.request_statistics);
    }

    #[test]
    fn test_configuration_path_and_statistics_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "configuration_path = \"ui/config.json\"\nrequest_statistics = true\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.configuration_path, "ui/config.json");
        assert!(settings.request_statistics);
    }

    #[test]
    fn test_malformed_file_names_the_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "timeout_secs = \"soon\"").unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_server_flag_overrides_file() {
        let settings = Settings::default().with_server_override(Some("http://10.0.0.5:8080/".into()));
        assert_eq!(settings.server_url, "http://10.0.0.5:8080/");
        let untouched = Settings::default().with_server_override(None);
        assert_eq!(untouched.server_url, DEFAULT_SERVER_URL);
    }

    #[test]
    fn test_explicit_session_file_is_used() {
        let settings = Settings {
            session_file: Some("/tmp/cdash/session.toml".to_string()),
            ..Default::default()
        };
        assert_eq!(
            settings.session_path().unwrap(),
            PathBuf::from("/tmp/cdash/session.toml")
        );
    }
}
