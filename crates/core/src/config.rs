//! TOML-based configuration for RecordMerge.
//!
//! Every section is optional; a missing file section falls back to the
//! defaults below. Configuration is passed explicitly to the components that
//! need it, never read from process-wide state.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::conflict::markers::{DEFAULT_LOCAL_LABEL, DEFAULT_REMOTE_LABEL};
use crate::conflict::MergeMarkerFormatter;
use crate::diff::{DiffEngine, DEFAULT_MAX_CELLS, DEFAULT_MAX_LINES};
use crate::errors::ConfigError;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level engine configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Diff engine limits.
    #[serde(default)]
    pub diff: DiffConfig,

    /// Merge marker labels.
    #[serde(default)]
    pub markers: MarkerConfig,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum tracing level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Diff
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffConfig {
    /// Maximum lines per side the bounded diff accepts (default 5000).
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,

    /// Maximum LCS table cells, `(local + 1) * (remote + 1)` (default 4M).
    #[serde(default = "default_max_cells")]
    pub max_cells: usize,
}

fn default_max_lines() -> usize {
    DEFAULT_MAX_LINES
}
fn default_max_cells() -> usize {
    DEFAULT_MAX_CELLS
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            max_lines: default_max_lines(),
            max_cells: default_max_cells(),
        }
    }
}

// ---------------------------------------------------------------------------
// Markers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerConfig {
    /// Header text for the local block (default "Your changes").
    #[serde(default = "default_local_label")]
    pub local_label: String,

    /// Header text for the remote block (default "Their changes").
    #[serde(default = "default_remote_label")]
    pub remote_label: String,
}

fn default_local_label() -> String {
    DEFAULT_LOCAL_LABEL.into()
}
fn default_remote_label() -> String {
    DEFAULT_REMOTE_LABEL.into()
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            local_label: default_local_label(),
            remote_label: default_remote_label(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading & validation
// ---------------------------------------------------------------------------

impl EngineConfig {
    /// Load an [`EngineConfig`] from a TOML file at the given path.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: EngineConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        debug!("configuration parsed successfully");
        Ok(config)
    }

    /// Validate that all values are sane.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".into(),
                detail: format!("expected one of {}", LOG_LEVELS.join(", ")),
            });
        }
        if self.diff.max_lines == 0 {
            return Err(ConfigError::InvalidValue {
                field: "diff.max_lines".into(),
                detail: "max lines must be > 0".into(),
            });
        }
        if self.diff.max_cells == 0 {
            return Err(ConfigError::InvalidValue {
                field: "diff.max_cells".into(),
                detail: "max cells must be > 0".into(),
            });
        }
        validate_label("markers.local_label", &self.markers.local_label)?;
        validate_label("markers.remote_label", &self.markers.remote_label)?;

        Ok(())
    }

    /// Convenience: load and validate in one call.
    pub fn load_and_validate<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn diff_engine(&self) -> DiffEngine {
        DiffEngine::new(self.diff.max_lines, self.diff.max_cells)
    }

    pub fn marker_formatter(&self) -> MergeMarkerFormatter {
        MergeMarkerFormatter::new(&self.markers.local_label, &self.markers.remote_label)
    }
}

/// Labels share a line with the sentinel, so they must be single-line.
fn validate_label(field: &str, label: &str) -> Result<(), ConfigError> {
    if label.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: field.into(),
            detail: "label must not be empty".into(),
        });
    }
    if label.contains('\n') || label.contains('\r') {
        return Err(ConfigError::InvalidValue {
            field: field.into(),
            detail: "label must be a single line".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_toml() -> &'static str {
        r#"
[logging]
level = "debug"

[diff]
max_lines = 200
max_cells = 10000

[markers]
local_label = "Draft"
remote_label = "Published"
"#
    }

    #[test]
    fn test_parse_full_config() {
        let config: EngineConfig = toml::from_str(sample_toml()).expect("failed to parse toml");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.diff.max_lines, 200);
        assert_eq!(config.markers.local_label, "Draft");
        assert_eq!(config.diff_engine().max_lines(), 200);
        assert_eq!(config.diff_engine().max_cells(), 10_000);
        assert_eq!(config.marker_formatter().remote_label, "Published");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config: EngineConfig = toml::from_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.diff.max_lines, DEFAULT_MAX_LINES);
        assert_eq!(config.diff.max_cells, DEFAULT_MAX_CELLS);
        assert_eq!(config.markers.local_label, "Your changes");
        assert_eq!(config.markers.remote_label, "Their changes");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recordmerge.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(sample_toml().as_bytes()).unwrap();

        let config = EngineConfig::load_and_validate(&path).expect("load failed");
        assert_eq!(config.diff.max_lines, 200);
    }

    #[test]
    fn test_file_not_found() {
        let result = EngineConfig::load_from_file("/nonexistent/recordmerge.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[diff]\nmax_lines = \"lots\"\n").unwrap();
        let result = EngineConfig::load_from_file(&path);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_validate_rejects_zero_max_lines() {
        let mut config = EngineConfig::default();
        config.diff.max_lines = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "diff.max_lines"
        ));
    }

    #[test]
    fn test_validate_rejects_zero_max_cells() {
        let mut config = EngineConfig::default();
        config.diff.max_cells = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "diff.max_cells"
        ));
    }

    #[test]
    fn test_validate_rejects_bad_labels() {
        let mut config = EngineConfig::default();
        config.markers.remote_label = "two\nlines".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "markers.remote_label"
        ));

        let mut config = EngineConfig::default();
        config.markers.local_label = " ".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "markers.local_label"
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_level() {
        let mut config = EngineConfig::default();
        config.logging.level = "loud".into();
        assert!(config.validate().is_err());
    }
}
