use std::path::{Component, Path, PathBuf};

/// Logical layout of a test-results tree on disk.
///
/// This is derived from a chosen results root and a tests directory. It does
/// *not* perform any IO itself. Discovery code reads from these paths; the
/// page writer is the only thing that creates anything.
#[derive(Debug, Clone)]
pub struct ResultsLayout {
    /// Root directory of the test results (paths in the dataset are relative to it).
    pub root: PathBuf,
    /// Directory holding the test sources the identity set is derived from.
    pub tests_dir: PathBuf,
    /// Directory for rendered visualizations (visualizations).
    pub visualizations_dir: PathBuf,
    /// Directory for "before" CFG renders (visualizations/original).
    pub original_dir: PathBuf,
    /// Directory for "after" CFG renders (visualizations/obfuscated).
    pub obfuscated_dir: PathBuf,
    /// Directory for the generated viewer (visualizations/comparison).
    pub comparison_dir: PathBuf,
    /// Path to the generated viewer page.
    pub page_path: PathBuf,
    /// Directory for structured per-test reports (reports).
    pub reports_dir: PathBuf,
    /// Directory for free-form per-test logs (logs).
    pub logs_dir: PathBuf,
    /// Directory for compiled test binaries (binaries).
    pub binaries_dir: PathBuf,
}

impl ResultsLayout {
    /// Compute the default layout for results rooted at `root`, with test
    /// sources in `tests_dir`.
    ///
    /// This does *not* touch the filesystem.
    pub fn new(root: impl AsRef<Path>, tests_dir: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let tests_dir = tests_dir.as_ref().to_path_buf();
        let visualizations_dir = root.join("visualizations");
        let original_dir = visualizations_dir.join("original");
        let obfuscated_dir = visualizations_dir.join("obfuscated");
        let comparison_dir = visualizations_dir.join("comparison");
        let page_path = comparison_dir.join("index.html");
        let reports_dir = root.join("reports");
        let logs_dir = root.join("logs");
        let binaries_dir = root.join("binaries");

        Self {
            root,
            tests_dir,
            visualizations_dir,
            original_dir,
            obfuscated_dir,
            comparison_dir,
            page_path,
            reports_dir,
            logs_dir,
            binaries_dir,
        }
    }

    /// Replace the output page location (e.g. from a `--output` flag).
    pub fn with_page_path(mut self, page_path: impl Into<PathBuf>) -> Self {
        self.page_path = page_path.into();
        self
    }

    /// Express `path` relative to the results root, using `/` separators so
    /// the string can be dropped straight into a URL.
    ///
    /// Paths outside the root are returned unchanged.
    pub fn relative_to_root(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        path_to_slash_string(rel)
    }

    /// Prefix the viewer prepends to dataset paths so images resolve from
    /// the page's own directory.
    ///
    /// `../../` for the default page location. Both paths are normalized
    /// lexically first, so `..` in `--output` walks up before the prefix is
    /// computed. When no relative walk exists (one path absolute and the other
    /// not, or the page directory climbs above a relative root) the absolute
    /// root is used instead.
    pub fn asset_prefix(&self) -> String {
        let page_dir = normalize_lexically(self.page_path.parent().unwrap_or_else(|| Path::new("")));
        let root = normalize_lexically(&self.root);
        relative_walk(&page_dir, &root).unwrap_or_else(|| {
            let root = self.root.canonicalize().unwrap_or(root);
            let mut prefix = path_to_slash_string(&root);
            if !prefix.ends_with('/') {
                prefix.push('/');
            }
            prefix
        })
    }
}

/// Resolve `.` and `..` without touching the filesystem.
///
/// `..` at the start of a relative path is kept; `..` directly under the
/// filesystem root is dropped.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// `../` steps from `from` up to the shared ancestor, then down into `to`.
fn relative_walk(from: &Path, to: &Path) -> Option<String> {
    if from.has_root() != to.has_root() {
        return None;
    }
    let rooted = from.has_root();
    let from: Vec<Component> = from.components().collect();
    let to: Vec<Component> = to.components().collect();
    let shared = from.iter().zip(&to).take_while(|(a, b)| a == b).count();
    if rooted && shared == 0 {
        return None;
    }

    let mut prefix = String::new();
    for component in &from[shared..] {
        match component {
            Component::Normal(_) => prefix.push_str("../"),
            _ => return None,
        }
    }
    for component in &to[shared..] {
        match component {
            Component::Normal(name) => {
                prefix.push_str(&name.to_string_lossy());
                prefix.push('/');
            }
            _ => return None,
        }
    }
    Some(prefix)
}

fn path_to_slash_string(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        match component {
            Component::RootDir => out.push('/'),
            other => {
                if !out.is_empty() && !out.ends_with('/') {
                    out.push('/');
                }
                out.push_str(&other.as_os_str().to_string_lossy());
            }
        }
    }
    out
}
