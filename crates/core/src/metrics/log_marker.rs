use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::metrics::{into_record, MetricsError, MetricsRecord};

/// JSON fragment trailing `marker` on a line: from the first `{` after the
/// marker to end of line.
pub fn marked_fragment<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let after = line.find(marker)? + marker.len();
    let start = line[after..].find('{')? + after;
    Some(&line[start..])
}

/// Scan a log for the first line containing `marker` and parse its JSON
/// fragment.
///
/// Only the first marker line is considered; scanning stops there whether or
/// not it parses. Returns `Ok(None)` when no line carries the marker or the
/// marker line has no `{`.
pub fn extract_marked_metrics(
    path: &Path,
    marker: &str,
) -> Result<Option<MetricsRecord>, MetricsError> {
    let read_err = |source| MetricsError::Read { path: path.to_path_buf(), source };
    let mut reader = BufReader::new(File::open(path).map_err(read_err)?);

    // Lines are decoded lossily: build logs may carry non-UTF-8 compiler
    // output ahead of the marker line.
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).map_err(read_err)? == 0 {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        if !line.contains(marker) {
            continue;
        }
        let Some(fragment) = marked_fragment(line, marker) else {
            return Ok(None);
        };
        let value = serde_json::from_str(fragment)
            .map_err(|source| MetricsError::Parse { path: path.to_path_buf(), source })?;
        return into_record(value, path.to_path_buf()).map(Some);
    }
}
