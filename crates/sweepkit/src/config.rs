//! `key=value` configuration files.
//!
//! Format:
//! - one `key=value` per line, split at the first `=`
//! - key and value are trimmed
//! - blank lines, `#` comments and lines without `=` are ignored
//! - a key given twice keeps the last value
//!
//! A missing file is an empty configuration, never an error.

use serde::Serialize;
use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Parsed configuration entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Config {
    entries: BTreeMap<String, String>,
}

impl Config {
    /// Parse configuration text
    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| line.split_once('='))
            .map(|(key, value)| (key.trim(), value.trim()))
            .filter(|(key, _)| !key.is_empty())
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Self { entries }
    }

    /// Load a configuration file.
    ///
    /// A missing file yields an empty configuration. A file that exists but
    /// cannot be read is logged and also yields an empty configuration.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let config = Self::parse(&text);
                log::debug!("Loaded {} config keys from {}", config.len(), path.display());
                config
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No config file at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring unreadable config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Raw value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Parse a value with `FromStr`.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig`: the key is present but its value does not parse
    pub fn parse_value<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key)
            .map(|raw| {
                raw.parse().map_err(|e: T::Err| Error::InvalidConfig {
                    key: key.to_string(),
                    value: raw.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()
    }

    /// Comma-separated list value, empty items dropped.
    pub fn list(&self, key: &str) -> Vec<&str> {
        self.get(key)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries are set
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_basic() {
        let config = Config::parse(
            "# engine settings\n\
             sample_limit = 50\n\
             \n\
             disk_info=false\r\n\
             not a pair\n\
             malware_scanner = C:\\tools\\msert.exe\n",
        );
        assert_eq!(config.len(), 3);
        assert_eq!(config.get("sample_limit"), Some("50"));
        assert_eq!(config.get("disk_info"), Some("false"));
        assert_eq!(config.get("malware_scanner"), Some("C:\\tools\\msert.exe"));
        assert_eq!(config.get("not a pair"), None);
    }

    #[test]
    fn test_split_at_first_equals() {
        let config = Config::parse("args=--scan=full\n");
        assert_eq!(config.get("args"), Some("--scan=full"));
    }

    #[test]
    fn test_last_value_wins() {
        let config = Config::parse("a=1\na=2\n");
        assert_eq!(config.get("a"), Some("2"));
    }

    #[test]
    fn test_empty_key_ignored_and_empty_value_kept() {
        let config = Config::parse("=orphan\nblank=\n   # indented comment\n");
        assert_eq!(config.len(), 1);
        assert_eq!(config.get("blank"), Some(""));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&dir.path().join("config.txt"));
        assert!(config.is_empty());
    }

    #[test]
    fn test_load_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load(dir.path()).is_empty());
    }

    #[test]
    fn test_load_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.txt");
        std::fs::write(&path, "sample_limit=7\n").unwrap();
        assert_eq!(Config::load(&path).get("sample_limit"), Some("7"));
    }

    #[test]
    fn test_parse_value() {
        let config = Config::parse("limit=12\nbad=twelve\nflag=true\n");
        assert_eq!(config.parse_value::<usize>("limit").unwrap(), Some(12));
        assert_eq!(config.parse_value::<bool>("flag").unwrap(), Some(true));
        assert_eq!(config.parse_value::<usize>("missing").unwrap(), None);

        let err = config.parse_value::<usize>("bad").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { ref key, .. } if key == "bad"));
    }

    #[test]
    fn test_list() {
        let config = Config::parse("paths = /a, /b ,, /c\n");
        assert_eq!(config.list("paths"), vec!["/a", "/b", "/c"]);
        assert!(config.list("missing").is_empty());
    }

    #[test]
    fn test_iter_is_sorted() {
        let config = Config::parse("b=2\na=1\n");
        let keys: Vec<_> = config.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
