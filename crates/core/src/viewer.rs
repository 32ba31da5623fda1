use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use crate::config::{load_viewer_config, ViewerConfig};
use crate::dataset::{build_dataset, Dataset, DatasetSummary};
use crate::layout::ResultsLayout;
use crate::page::{render_page, write_page, PageOptions};

/// Outcome of a viewer build.
#[derive(Debug, Clone)]
pub struct GeneratedViewer {
    pub page_path: PathBuf,
    pub summary: DatasetSummary,
    pub dataset: Dataset,
}

/// Load the config at `path`, or the defaults when no path is given.
pub fn load_config_or_default(path: Option<&Path>) -> Result<ViewerConfig> {
    match path {
        Some(path) => Ok(load_viewer_config(path)?),
        None => Ok(ViewerConfig::default()),
    }
}

/// Page text and asset prefix for a layout/config pair.
pub fn page_options(layout: &ResultsLayout, config: &ViewerConfig) -> PageOptions {
    PageOptions {
        title: config.title.clone(),
        footer: config.footer.clone(),
        asset_prefix: layout.asset_prefix(),
    }
}

/// Build the dataset, render the page and write it to `layout.page_path`.
///
/// Only the final write can fail; missing or malformed inputs just shrink
/// the dataset.
pub fn generate_viewer(layout: &ResultsLayout, config: &ViewerConfig) -> Result<GeneratedViewer> {
    let dataset = build_dataset(layout, config);
    let html = render_page(&dataset, &page_options(layout, config))
        .context("Failed to render viewer page")?;
    write_page(&layout.page_path, &html).with_context(|| {
        format!("Failed to emit viewer page at {}", layout.page_path.display())
    })?;
    info!("Wrote viewer page to {}", layout.page_path.display());

    Ok(GeneratedViewer { page_path: layout.page_path.clone(), summary: dataset.summary(), dataset })
}
