use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "VFD_VIEWER_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "vfd-viewer.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Viewer configuration
// ---------------------------------------------------------------------------

/// Settings read from `vfd-viewer.json`; every field is optional.
///
/// ```json
/// {
///   "sample_path": "logs/sample_data.csv",
///   "export_dir": "exports",
///   "highlight_column": "VFD_MODE_STATUS",
///   "window_size": [1400.0, 800.0]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// CSV loaded at start-up and by "Reload sample".
    pub sample_path: PathBuf,
    /// Initial directory of the export dialog.
    pub export_dir: PathBuf,
    /// Column whose values are colour-coded in the table; empty disables it.
    pub highlight_column: String,
    pub window_size: [f32; 2],
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            sample_path: PathBuf::from("sample_data.csv"),
            export_dir: PathBuf::from("."),
            highlight_column: "VFD_MODE_STATUS".to_string(),
            window_size: [1400.0, 800.0],
        }
    }
}

impl ViewerConfig {
    /// Read a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Config from `$VFD_VIEWER_CONFIG` or `./vfd-viewer.json`, falling back
    /// to defaults when the file is missing or broken.
    pub fn discover() -> Self {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let path = explicit
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        if explicit.is_none() && !path.exists() {
            log::debug!("no {DEFAULT_CONFIG_FILE}, using defaults");
            return Self::default();
        }

        match Self::load(&path) {
            Ok(config) => {
                log::info!("loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{e:#}; using defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn unique_test_dir(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after epoch")
            .as_nanos();
        std::env::temp_dir().join(format!("vfd-viewer-{prefix}-{nanos}"))
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let temp_dir = unique_test_dir("config");
        fs::create_dir_all(&temp_dir).expect("should create temp dir");
        let path = temp_dir.join("vfd-viewer.json");
        fs::write(&path, r#"{ "sample_path": "logs/day1.csv" }"#).expect("should write config");

        let config = ViewerConfig::load(&path).expect("config should load");

        assert_eq!(config.sample_path, PathBuf::from("logs/day1.csv"));
        assert_eq!(config.highlight_column, "VFD_MODE_STATUS");
        assert_eq!(config.export_dir, PathBuf::from("."));

        fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
    }

    #[test]
    fn malformed_config_is_an_error() {
        let temp_dir = unique_test_dir("bad-config");
        fs::create_dir_all(&temp_dir).expect("should create temp dir");
        let path = temp_dir.join("vfd-viewer.json");
        fs::write(&path, "{ not json").expect("should write config");

        let err = ViewerConfig::load(&path).expect_err("broken JSON should fail");
        assert!(matches!(err, ConfigError::Json { .. }), "unexpected error: {err:?}");

        fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
    }
}
