use anyhow::{Context, Result};
use obfview_core::build_dataset;

use crate::commands::{resolve_run, RunArgs};

/// Print the dataset as JSON without writing a page.
pub fn dataset_command(args: &RunArgs, compact: bool) -> Result<()> {
    let (layout, config) = resolve_run(args)?;
    let dataset = build_dataset(&layout, &config);

    let serialized = if compact {
        serde_json::to_string(&dataset)
    } else {
        serde_json::to_string_pretty(&dataset)
    }
    .context("Failed to serialize dataset to JSON")?;
    println!("{}", serialized);

    Ok(())
}
