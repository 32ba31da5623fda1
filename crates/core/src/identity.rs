//! Test-case identities and image-name resolution.
//!
//! The identity universe is the set of test source base names. Rendered images
//! are named `<identity>_<function>` (or just `<identity>`), and since test
//! names can themselves contain underscores, resolving a name back to its
//! identity is ambiguous whenever one identity is a prefix of another.
//! [`MatchPolicy`] decides how that ambiguity is broken.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

/// Order in which known identities are tried against an image name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchPolicy {
    /// Ascending lexicographic order; the first identity whose `<name>_` is a
    /// prefix wins, even if a longer identity would also match.
    #[default]
    FirstMatch,
    /// Descending length (ties lexicographic), so the most specific identity wins.
    LongestPrefix,
}

impl MatchPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchPolicy::FirstMatch => "first-match",
            MatchPolicy::LongestPrefix => "longest-prefix",
        }
    }
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first-match" => Ok(MatchPolicy::FirstMatch),
            "longest-prefix" => Ok(MatchPolicy::LongestPrefix),
            other => Err(format!(
                "Invalid match policy '{}'. Allowed: first-match, longest-prefix",
                other
            )),
        }
    }
}

/// A resolved (identity, function) pair for one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub identity: String,
    pub function: String,
}

/// Discover known identities: base names of `<prefix>*.<extension>` files in
/// `tests_dir`, sorted ascending.
///
/// A missing or unreadable directory yields an empty set.
pub fn discover_identities(tests_dir: &Path, prefix: &str, extension: &str) -> Vec<String> {
    let entries = match fs::read_dir(tests_dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!("No test sources at {}: {}", tests_dir.display(), err);
            return Vec::new();
        }
    };

    let mut names = BTreeSet::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if stem.starts_with(prefix) {
            names.insert(stem.to_string());
        }
    }
    names.into_iter().collect()
}

/// Maps candidate image names onto known identities.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    /// Identities in the order they are tried for prefix matches.
    ordered: Vec<String>,
    known: BTreeSet<String>,
    default_function: String,
}

impl IdentityResolver {
    pub fn new<I, S>(identities: I, policy: MatchPolicy, default_function: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let known: BTreeSet<String> = identities.into_iter().map(Into::into).collect();
        let mut ordered: Vec<String> = known.iter().cloned().collect();
        if policy == MatchPolicy::LongestPrefix {
            ordered.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        }
        Self { ordered, known, default_function: default_function.into() }
    }

    /// Known identities, ascending.
    pub fn identities(&self) -> impl Iterator<Item = &str> {
        self.known.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    /// Resolve a stripped image name.
    ///
    /// `<identity>_<rest>` takes precedence over an exact identity match; an
    /// exact match gets the default function name. Returns `None` when the
    /// name is unattributable.
    pub fn resolve(&self, candidate: &str) -> Option<ResolvedName> {
        for identity in &self.ordered {
            let Some(rest) = candidate.strip_prefix(identity.as_str()) else {
                continue;
            };
            if let Some(function) = rest.strip_prefix('_') {
                return Some(ResolvedName {
                    identity: identity.clone(),
                    function: function.to_string(),
                });
            }
        }

        if self.known.contains(candidate) {
            return Some(ResolvedName {
                identity: candidate.to_string(),
                function: self.default_function.clone(),
            });
        }

        None
    }
}
