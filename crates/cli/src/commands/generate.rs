use anyhow::Result;
use obfview_core::generate_viewer;

use crate::commands::{resolve_run, RunArgs};

/// Build the dataset and write the comparison viewer page.
pub fn generate_command(args: &RunArgs) -> Result<()> {
    let (layout, config) = resolve_run(args)?;
    let generated = generate_viewer(&layout, &config)?;

    println!("Created comparison viewer at {}", generated.page_path.display());
    println!(
        "Found {} tests with {} functions",
        generated.summary.tests, generated.summary.functions
    );
    println!("Metrics records: {}", generated.summary.metrics_records);

    Ok(())
}
