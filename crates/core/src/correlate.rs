use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::identity::IdentityResolver;
use crate::layout::ResultsLayout;

/// Before/after render paths for one function, relative to the results root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionPair {
    pub original: String,
    pub obfuscated: String,
}

/// identity -> function -> pair.
pub type CorrelationMap = BTreeMap<String, BTreeMap<String, FunctionPair>>;

/// Remove every occurrence of each render suffix from an image stem.
pub fn strip_render_suffixes(stem: &str, suffixes: &[String]) -> String {
    suffixes
        .iter()
        .filter(|s| !s.is_empty())
        .fold(stem.to_string(), |acc, suffix| acc.replace(suffix.as_str(), ""))
}

/// List `*.<extension>` files in `dir`, sorted by file name.
///
/// A missing or unreadable directory yields an empty list.
pub fn list_images(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!("No images at {}: {}", dir.display(), err);
            return Vec::new();
        }
    };
    let mut images: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(extension)
        })
        .collect();
    images.sort();
    images
}

/// Pair every "before" render with its same-named "after" render and
/// attribute the pair to an (identity, function).
///
/// Unattributable images and images without an "after" counterpart are
/// skipped. Identities only appear in the result once they hold at least one
/// complete pair.
pub fn correlate_visualizations(
    layout: &ResultsLayout,
    resolver: &IdentityResolver,
    image_extension: &str,
    render_suffixes: &[String],
) -> CorrelationMap {
    let mut tests = CorrelationMap::new();

    for original in list_images(&layout.original_dir, image_extension) {
        let Some(stem) = original.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let candidate = strip_render_suffixes(stem, render_suffixes);
        let Some(resolved) = resolver.resolve(&candidate) else {
            debug!("Skipping unattributable image {}", original.display());
            continue;
        };

        let Some(file_name) = original.file_name() else {
            continue;
        };
        let obfuscated = layout.obfuscated_dir.join(file_name);
        if !obfuscated.is_file() {
            debug!(
                "No obfuscated counterpart for {} ({}::{})",
                original.display(),
                resolved.identity,
                resolved.function
            );
            continue;
        }

        let pair = FunctionPair {
            original: layout.relative_to_root(&original),
            obfuscated: layout.relative_to_root(&obfuscated),
        };
        tests.entry(resolved.identity).or_default().insert(resolved.function, pair);
    }

    tests
}

/// Total number of correlated functions across all identities.
pub fn function_count(tests: &CorrelationMap) -> usize {
    tests.values().map(BTreeMap::len).sum()
}
