use std::fs;
use std::path::{Path, PathBuf};

use crate::metrics::{into_record, MetricsError, MetricsRecord};

/// Path of the `<identity>_<mode>.json` report in `dir`.
pub fn report_path(dir: &Path, identity: &str, mode: &str) -> PathBuf {
    dir.join(format!("{identity}_{mode}.json"))
}

/// Find the first existing report for `identity`, trying `modes` in order.
pub fn select_report(dir: &Path, identity: &str, modes: &[String]) -> Option<(String, PathBuf)> {
    modes.iter().find_map(|mode| {
        let path = report_path(dir, identity, mode);
        path.is_file().then(|| (mode.clone(), path))
    })
}

/// Read a report and adopt it verbatim as a metrics record.
pub fn parse_report(path: &Path) -> Result<MetricsRecord, MetricsError> {
    let body = fs::read_to_string(path)
        .map_err(|source| MetricsError::Read { path: path.to_path_buf(), source })?;
    let value = serde_json::from_str(&body)
        .map_err(|source| MetricsError::Parse { path: path.to_path_buf(), source })?;
    into_record(value, path.to_path_buf())
}
