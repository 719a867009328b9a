//! Tracker configuration, loaded from TOML.
//!
//! ```toml
//! data_dir = "/var/lib/books"
//! rollover_check_interval_secs = 3600
//!
//! [lookup]
//! page_size = 20
//! timeout_secs = 10
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::persistence::{FileSlotStore, PersistenceError};

pub const DEFAULT_ROLLOVER_CHECK_INTERVAL_SECS: u64 = 86_400;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Directory for the file slot store. None keeps data in memory.
    pub data_dir: Option<PathBuf>,
    pub rollover_check_interval_secs: u64,
    pub lookup: LookupConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            rollover_check_interval_secs: DEFAULT_ROLLOVER_CHECK_INTERVAL_SECS,
            lookup: LookupConfig::default(),
        }
    }
}

impl TrackerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Interval between rollover checks, never shorter than one second.
    pub fn rollover_interval(&self) -> Duration {
        Duration::from_secs(self.rollover_check_interval_secs.max(1))
    }

    /// Open a file slot store in `data_dir`, if one is configured.
    pub fn file_store(&self) -> Option<Result<FileSlotStore, PersistenceError>> {
        self.data_dir.as_ref().map(|dir| FileSlotStore::open(dir.clone()))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub open_library_url: String,
    pub covers_url: String,
    pub google_books_url: String,
    pub page_size: usize,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            open_library_url: "https://openlibrary.org".to_string(),
            covers_url: "https://covers.openlibrary.org".to_string(),
            google_books_url: "https://www.googleapis.com/books/v1/volumes".to_string(),
            page_size: 10,
            timeout_secs: 6,
            user_agent: format!("book_tracker/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl LookupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = TrackerConfig::from_toml_str("").unwrap();
        assert_eq!(config, TrackerConfig::default());
        assert_eq!(config.rollover_interval(), Duration::from_secs(86_400));
        assert_eq!(config.lookup.page_size, 10);
        assert_eq!(config.lookup.timeout(), Duration::from_secs(6));
        assert!(config.file_store().is_none());
    }

    #[test]
    fn partial_lookup_section() {
        let config = TrackerConfig::from_toml_str(
            r#"
            data_dir = "/tmp/books"
            rollover_check_interval_secs = 0

            [lookup]
            page_size = 25
            "#,
        )
        .unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/books")));
        assert_eq!(config.rollover_interval(), Duration::from_secs(1));
        assert_eq!(config.lookup.page_size, 25);
        assert_eq!(config.lookup.open_library_url, "https://openlibrary.org");
    }

    #[test]
    fn malformed_config_is_parse_error() {
        let err = TrackerConfig::from_toml_str("page_size = [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracker.toml");
        std::fs::write(&path, "rollover_check_interval_secs = 60\n").unwrap();
        assert_eq!(TrackerConfig::load(&path).unwrap().rollover_check_interval_secs, 60);

        let missing = TrackerConfig::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }
}
