use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::MatchPolicy;

/// Error type for loading a viewer configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read viewer config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse viewer config JSON at {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to parse viewer config YAML at {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Which metrics source to aggregate from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricsSourceKind {
    /// Reports when the reports dir exists, else logs when the logs dir exists.
    #[default]
    Auto,
    Reports,
    Logs,
    None,
}

impl MetricsSourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricsSourceKind::Auto => "auto",
            MetricsSourceKind::Reports => "reports",
            MetricsSourceKind::Logs => "logs",
            MetricsSourceKind::None => "none",
        }
    }
}

impl fmt::Display for MetricsSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricsSourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(MetricsSourceKind::Auto),
            "reports" => Ok(MetricsSourceKind::Reports),
            "logs" => Ok(MetricsSourceKind::Logs),
            "none" => Ok(MetricsSourceKind::None),
            other => Err(format!(
                "Invalid metrics source '{}'. Allowed: auto, reports, logs, none",
                other
            )),
        }
    }
}

/// Serializable configuration for one viewer build.
///
/// Every field has a default, so a config file only needs to name what it
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Page `<title>` and header text.
    pub title: String,
    /// Footer line at the bottom of the page.
    pub footer: String,
    /// Test sources must start with this prefix to count as identities.
    pub test_prefix: String,
    /// Extension (without dot) of test source files.
    pub test_extension: String,
    /// Extension (without dot) of rendered CFG images.
    pub image_extension: String,
    /// Fragments removed from image stems before resolution (e.g. `.dot`).
    pub render_suffixes: Vec<String>,
    /// Function name used when an image is named exactly after its test.
    pub default_function: String,
    /// Report modes, most comprehensive first.
    pub report_modes: Vec<String>,
    /// Token marking the metrics line in a test log.
    pub log_marker: String,
    /// Binary mode compared against `_original` when metrics come from logs.
    pub log_binary_mode: String,
    pub metrics_source: MetricsSourceKind,
    pub match_policy: MatchPolicy,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Obfuscation - Visual Comparison Report".to_string(),
            footer: "Generated by obfview".to_string(),
            test_prefix: "test_".to_string(),
            test_extension: "c".to_string(),
            image_extension: "png".to_string(),
            render_suffixes: vec![".dot".to_string()],
            default_function: "main".to_string(),
            report_modes: vec!["full".to_string(), "cff".to_string(), "string".to_string()],
            log_marker: "CFF_METRICS:".to_string(),
            log_binary_mode: "cff".to_string(),
            metrics_source: MetricsSourceKind::Auto,
            match_policy: MatchPolicy::FirstMatch,
        }
    }
}

/// Load a viewer config from disk.
///
/// `.yaml`/`.yml` files are parsed as YAML, everything else as JSON.
pub fn load_viewer_config(path: &Path) -> Result<ViewerConfig, ConfigError> {
    let body = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    if matches!(ext, "yaml" | "yml") {
        serde_yaml::from_str(&body)
            .map_err(|source| ConfigError::Yaml { path: path.to_path_buf(), source })
    } else {
        serde_json::from_str(&body)
            .map_err(|source| ConfigError::Json { path: path.to_path_buf(), source })
    }
}
