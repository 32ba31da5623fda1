//! Per-test metrics aggregation.
//!
//! Metrics come from one of two differently-shaped sources:
//! - structured JSON reports, one or more per test, distinguished by a mode
//!   suffix (`<test>_full.json`, `<test>_cff.json`, ...);
//! - free-form build logs, one per test, carrying a single marker line
//!   followed by a JSON fragment.
//!
//! Whichever source is active, a successfully loaded record is augmented with
//! a `binary_metrics` entry comparing the original and obfuscated binaries.
//! Any failure is contained to the test it belongs to: the record for that
//! test is left empty and aggregation moves on.

pub mod binary;
pub mod log_marker;
pub mod report;

use std::collections::BTreeMap;
use std::path::PathBuf;

use log::{debug, info, warn};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::{MetricsSourceKind, ViewerConfig};
use crate::layout::ResultsLayout;

pub use binary::BinarySizeDelta;

/// Open-ended per-test metrics document.
pub type MetricsRecord = Map<String, Value>;

/// identity -> metrics record.
pub type MetricsMap = BTreeMap<String, MetricsRecord>;

/// Key the binary size comparison is stored under.
pub const BINARY_METRICS_KEY: &str = "binary_metrics";

/// Error type for loading a single test's metrics.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Failed to read metrics source {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse metrics JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Metrics in {path} are not a JSON object")]
    NotAnObject { path: PathBuf },
}

/// Convert a parsed document into a record, rejecting non-objects.
pub(crate) fn into_record(value: Value, path: PathBuf) -> Result<MetricsRecord, MetricsError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(MetricsError::NotAnObject { path }),
    }
}

/// A base record produced by a source, plus the binary mode it describes.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedMetrics {
    pub record: MetricsRecord,
    pub mode: String,
    pub path: PathBuf,
}

/// The closed set of metrics source strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricsSource {
    /// Structured reports; modes are probed in order and the first found wins.
    Reports { dir: PathBuf, modes: Vec<String> },
    /// Marker lines in per-test logs.
    Logs { dir: PathBuf, marker: String, binary_mode: String },
}

impl MetricsSource {
    /// Pick the source to aggregate from.
    ///
    /// `Auto` prefers reports over logs and yields `None` when neither
    /// directory exists. An explicit kind is honoured even if its directory is
    /// missing (every test then gets an empty record).
    pub fn detect(layout: &ResultsLayout, config: &ViewerConfig) -> Option<Self> {
        let reports = || MetricsSource::Reports {
            dir: layout.reports_dir.clone(),
            modes: config.report_modes.clone(),
        };
        let logs = || MetricsSource::Logs {
            dir: layout.logs_dir.clone(),
            marker: config.log_marker.clone(),
            binary_mode: config.log_binary_mode.clone(),
        };

        match config.metrics_source {
            MetricsSourceKind::Reports => Some(reports()),
            MetricsSourceKind::Logs => Some(logs()),
            MetricsSourceKind::None => None,
            MetricsSourceKind::Auto => {
                if layout.reports_dir.is_dir() {
                    Some(reports())
                } else if layout.logs_dir.is_dir() {
                    Some(logs())
                } else {
                    None
                }
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MetricsSource::Reports { .. } => "reports",
            MetricsSource::Logs { .. } => "logs",
        }
    }

    /// Load the base record for one test.
    ///
    /// `Ok(None)` means the source has nothing for this test.
    pub fn load(&self, identity: &str) -> Result<Option<LoadedMetrics>, MetricsError> {
        match self {
            MetricsSource::Reports { dir, modes } => {
                let Some((mode, path)) = report::select_report(dir, identity, modes) else {
                    return Ok(None);
                };
                let record = report::parse_report(&path)?;
                Ok(Some(LoadedMetrics { record, mode, path }))
            }
            MetricsSource::Logs { dir, marker, binary_mode } => {
                let path = dir.join(format!("{identity}.log"));
                if !path.is_file() {
                    return Ok(None);
                }
                let record = log_marker::extract_marked_metrics(&path, marker)?;
                Ok(record.map(|record| LoadedMetrics { record, mode: binary_mode.clone(), path }))
            }
        }
    }
}

/// Build the metrics record for every identity.
///
/// With no source, the map is empty. With a source, every identity gets an
/// entry; tests the source cannot describe get an empty record.
pub fn aggregate_metrics<'a, I>(
    source: Option<&MetricsSource>,
    identities: I,
    layout: &ResultsLayout,
) -> MetricsMap
where
    I: IntoIterator<Item = &'a str>,
{
    let mut metrics = MetricsMap::new();
    let Some(source) = source else {
        return metrics;
    };
    info!("Aggregating metrics from {}", source.name());

    for identity in identities {
        let record = match source.load(identity) {
            Ok(Some(mut loaded)) => {
                let delta = BinarySizeDelta::measure(&layout.binaries_dir, identity, &loaded.mode);
                loaded.record.insert(BINARY_METRICS_KEY.to_string(), delta.to_value());
                debug!("Loaded metrics for {} from {}", identity, loaded.path.display());
                loaded.record
            }
            Ok(None) => {
                debug!("No {} metrics for {}", source.name(), identity);
                MetricsRecord::new()
            }
            Err(err) => {
                warn!("{}; using empty metrics for {}", err, identity);
                MetricsRecord::new()
            }
        };
        metrics.insert(identity.to_string(), record);
    }

    metrics
}
