use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::format::{format_bytes, format_change_pct};

/// Formatted size comparison between the original and obfuscated builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinarySizeDelta {
    pub original_size: String,
    pub obfuscated_size: String,
    pub change_pct: String,
}

impl BinarySizeDelta {
    pub fn from_sizes(original: Option<u64>, obfuscated: Option<u64>) -> Self {
        let to_signed = |size: Option<u64>| size.and_then(|s| i64::try_from(s).ok());
        Self {
            original_size: format_bytes(to_signed(original)),
            obfuscated_size: format_bytes(to_signed(obfuscated)),
            change_pct: format_change_pct(original, obfuscated),
        }
    }

    /// Measure `<identity>_original` against `<identity>_<mode>` in `binaries_dir`.
    pub fn measure(binaries_dir: &Path, identity: &str, mode: &str) -> Self {
        let (original, obfuscated) = binary_paths(binaries_dir, identity, mode);
        Self::from_sizes(file_size(&original), file_size(&obfuscated))
    }

    pub fn to_value(&self) -> Value {
        json!({
            "original_size": self.original_size,
            "obfuscated_size": self.obfuscated_size,
            "change_pct": self.change_pct,
        })
    }
}

/// Paths of the original and mode-specific binaries for a test.
pub fn binary_paths(binaries_dir: &Path, identity: &str, mode: &str) -> (PathBuf, PathBuf) {
    (
        binaries_dir.join(format!("{identity}_original")),
        binaries_dir.join(format!("{identity}_{mode}")),
    )
}

/// Size of a regular file, or `None` if it is missing or unreadable.
pub fn file_size(path: &Path) -> Option<u64> {
    fs::metadata(path).ok().filter(|meta| meta.is_file()).map(|meta| meta.len())
}
