use crate::scan::{DEFAULT_CHUNK_BYTES, ScanOptions};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "colltrie";
const CONFIG_FILE: &str = "config.json";

/// Application configuration stored in the user config directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Target chunk size in bytes for parallel scans
    #[serde(default = "default_scan_chunk_bytes")]
    pub scan_chunk_bytes: usize,

    /// Worker threads for scans
    /// If 0, scans run on the global rayon pool
    #[serde(default)]
    pub scan_threads: usize,

    /// Array elements per row in generated Rust source
    #[serde(default = "default_codegen_per_line")]
    pub codegen_per_line: usize,

    /// Colored lookup output (still disabled by --no-color / NO_COLOR)
    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_scan_chunk_bytes() -> usize {
    DEFAULT_CHUNK_BYTES
}

fn default_codegen_per_line() -> usize {
    8
}

fn default_color() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scan_chunk_bytes: default_scan_chunk_bytes(),
            scan_threads: 0,
            codegen_per_line: default_codegen_per_line(),
            color: default_color(),
        }
    }
}

impl AppConfig {
    /// Load config from the default location, or return default if not found
    pub fn load() -> Result<Self> {
        match get_config_path() {
            Ok(path) => Self::load_from(&path),
            // No resolvable config directory (e.g. no HOME): run with defaults
            Err(_) => Ok(Self::default()),
        }
    }

    /// Load config from an explicit path; a missing file yields the defaults
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
            let config: AppConfig = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file {}", config_path.display()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Scan options derived from this config
    pub fn scan_options(&self, progress: bool) -> ScanOptions {
        ScanOptions {
            chunk_bytes: self.scan_chunk_bytes,
            threads: self.scan_threads,
            progress,
        }
    }
}

/// Get the path to the config file
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE))
}

/// Per-user configuration directory for colltrie
pub fn get_config_dir() -> Result<PathBuf> {
    let base = if cfg!(target_os = "macos") {
        dirs::home_dir()
            .map(|h| h.join("Library").join("Application Support"))
    } else {
        // Linux/Unix: XDG_CONFIG_HOME or ~/.config; Windows: roaming AppData
        dirs::config_dir()
    };

    let base = base.context("Could not determine config directory")?;
    Ok(base.join(APP_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.scan_chunk_bytes, 1 << 20);
        assert_eq!(config.scan_threads, 0);
        assert_eq!(config.codegen_per_line, 8);
        assert!(config.color);
    }

    #[test]
    fn test_app_config_scan_threads_passed_through() {
        let mut config = AppConfig::default();

        // 0 keeps the global pool
        assert_eq!(config.scan_options(false).threads, 0);

        config.scan_threads = 4;
        let options = config.scan_options(true);
        assert_eq!(options.threads, 4);
        assert!(options.progress);
    }

    #[test]
    fn test_app_config_partial_json() {
        // Should use defaults for missing fields
        let json = r#"{"codegen_per_line": 16}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.codegen_per_line, 16);
        assert_eq!(config.scan_chunk_bytes, 1 << 20); // default
        assert!(config.color);
    }

    #[test]
    fn test_app_config_empty_json() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_app_config_load_written_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let config = AppConfig {
            scan_chunk_bytes: 4096,
            scan_threads: 2,
            codegen_per_line: 12,
            color: false,
        };
        fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_app_config_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_app_config_bad_json_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{ not json").unwrap();
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));
    }
}
