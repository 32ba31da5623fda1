use std::path::Path;

use anyhow::Result;
use clap::Args;
use log::debug;
use obfview_core::viewer::load_config_or_default;
use obfview_core::{MatchPolicy, MetricsSourceKind, ResultsLayout, ViewerConfig};

use crate::canonicalize_or_current;

/// Default results root, relative to the working directory.
pub const DEFAULT_ROOT: &str = "test_results";
/// Default test sources directory, relative to the working directory.
pub const DEFAULT_TESTS_DIR: &str = "tests";

/// Inputs shared by every command that builds a dataset.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Test results root; dataset paths are relative to it.
    #[arg(long, default_value = DEFAULT_ROOT)]
    pub root: String,

    /// Directory of test sources the known test names are taken from.
    #[arg(long, default_value = DEFAULT_TESTS_DIR)]
    pub tests_dir: String,

    /// Output page. Defaults to `<root>/visualizations/comparison/index.html`.
    #[arg(long)]
    pub output: Option<String>,

    /// Optional viewer config file (JSON, or YAML by `.yaml`/`.yml` extension).
    #[arg(long)]
    pub config: Option<String>,

    /// Metrics source: auto, reports, logs or none. Overrides the config file.
    #[arg(long)]
    pub metrics_source: Option<MetricsSourceKind>,

    /// Name resolution order: first-match or longest-prefix. Overrides the config file.
    #[arg(long)]
    pub match_policy: Option<MatchPolicy>,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            root: DEFAULT_ROOT.to_string(),
            tests_dir: DEFAULT_TESTS_DIR.to_string(),
            output: None,
            config: None,
            metrics_source: None,
            match_policy: None,
        }
    }
}

/// Load the config (if any) and apply command-line overrides.
pub fn load_config(config: Option<&str>, args: Option<&RunArgs>) -> Result<ViewerConfig> {
    let mut cfg = load_config_or_default(config.map(Path::new))?;
    if let Some(args) = args {
        if let Some(kind) = args.metrics_source {
            cfg.metrics_source = kind;
        }
        if let Some(policy) = args.match_policy {
            cfg.match_policy = policy;
        }
    }
    Ok(cfg)
}

/// Resolve paths and config for a run.
pub fn resolve_run(args: &RunArgs) -> Result<(ResultsLayout, ViewerConfig)> {
    let root = canonicalize_or_current(&args.root)?;
    let tests_dir = canonicalize_or_current(&args.tests_dir)?;
    let mut layout = ResultsLayout::new(root, tests_dir);
    if let Some(output) = &args.output {
        layout = layout.with_page_path(canonicalize_or_current(output)?);
    }
    let config = load_config(args.config.as_deref(), Some(args))?;
    debug!(
        "Results root {}, tests {}, page {}, metrics source {}, match policy {}",
        layout.root.display(),
        layout.tests_dir.display(),
        layout.page_path.display(),
        config.metrics_source,
        config.match_policy
    );
    Ok((layout, config))
}
