use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use sweepkit::{Config, MalwareScanner, ScanOptions, ToolRunner};

use crate::paths;

/// Per-candidate sample bound
pub const KEY_SAMPLE_LIMIT: &str = "sample_limit";
/// Attach disk info to scan reports
pub const KEY_DISK_INFO: &str = "disk_info";
/// Extra malware scanner locations, comma-separated
pub const KEY_MALWARE_SCANNER: &str = "malware_scanner";
/// Malware scanner timeout in seconds
pub const KEY_MALWARE_TIMEOUT: &str = "malware_scanner_timeout_secs";

/// Keys this tool interprets; anything else is carried but unused.
pub const KNOWN_KEYS: &[&str] = &[
    KEY_SAMPLE_LIMIT,
    KEY_DISK_INFO,
    KEY_MALWARE_SCANNER,
    KEY_MALWARE_TIMEOUT,
];

/// Settings derived from the configuration file.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Where the configuration was looked for
    pub path: PathBuf,
    /// Raw entries as read
    pub raw: Config,
    /// Scanner tunables
    pub scan: ScanOptions,
    /// Extra malware scanner locations, checked before the defaults
    pub scanner_paths: Vec<PathBuf>,
    /// Malware scanner time bound
    pub scanner_timeout: Duration,
}

impl AppConfig {
    /// Load the configuration file, falling back to defaults when absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = paths::config_file(explicit)?;
        let raw = Config::load(&path);
        Self::from_config(path, raw)
    }

    /// Interpret raw entries.
    pub fn from_config(path: PathBuf, raw: Config) -> Result<Self> {
        let defaults = ScanOptions::default();

        let sample_limit = raw
            .parse_value::<usize>(KEY_SAMPLE_LIMIT)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?
            .unwrap_or(defaults.sample_limit);

        let disk_info = raw
            .parse_value::<bool>(KEY_DISK_INFO)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?
            .unwrap_or(defaults.disk_info);

        let scanner_timeout = raw
            .parse_value::<u64>(KEY_MALWARE_TIMEOUT)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?
            .map_or(sweepkit::tool::DEFAULT_SCAN_TIMEOUT, Duration::from_secs);

        let scanner_paths = raw
            .list(KEY_MALWARE_SCANNER)
            .into_iter()
            .map(paths::expand)
            .collect();

        for (key, _) in raw.iter() {
            if !KNOWN_KEYS.contains(&key) {
                log::debug!("Config key '{key}' is not used by neoclean");
            }
        }

        Ok(Self {
            path,
            raw,
            scan: ScanOptions {
                sample_limit,
                disk_info,
            },
            scanner_paths,
            scanner_timeout,
        })
    }

    /// Malware scanner configured with extra locations and timeout.
    pub fn malware_scanner(&self) -> MalwareScanner {
        MalwareScanner::with_extra_locations(
            self.scanner_paths.clone(),
            ToolRunner::new(self.scanner_timeout),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(text: &str) -> Result<AppConfig> {
        AppConfig::from_config(PathBuf::from("/tmp/config.txt"), Config::parse(text))
    }

    #[test]
    fn test_defaults_from_empty_config() {
        let config = app("").unwrap();
        assert_eq!(config.scan, ScanOptions::default());
        assert!(config.scanner_paths.is_empty());
        assert_eq!(config.scanner_timeout, Duration::from_secs(600));
    }

    #[test]
    fn test_known_keys() {
        let config = app(
            "sample_limit=25\n\
             disk_info=false\n\
             malware_scanner=/opt/a, /opt/b\n\
             malware_scanner_timeout_secs=30\n\
             theme=matrix\n",
        )
        .unwrap();
        assert_eq!(config.scan.sample_limit, 25);
        assert!(!config.scan.disk_info);
        assert_eq!(
            config.scanner_paths,
            vec![PathBuf::from("/opt/a"), PathBuf::from("/opt/b")]
        );
        assert_eq!(config.scanner_timeout, Duration::from_secs(30));
        assert_eq!(config.raw.get("theme"), Some("matrix"));
    }

    #[test]
    fn test_invalid_value_is_error() {
        let err = app("sample_limit=many\n").unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("/tmp/config.txt"));
        assert!(message.contains("sample_limit"));
    }

    #[test]
    fn test_scanner_locations_put_config_first() {
        let config = app("malware_scanner=/opt/msert\n").unwrap();
        let scanner = config.malware_scanner();
        assert_eq!(scanner.locations()[0], PathBuf::from("/opt/msert"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(Some(&dir.path().join("absent.txt"))).unwrap();
        assert!(config.raw.is_empty());
        assert_eq!(config.scan, ScanOptions::default());
    }
}
