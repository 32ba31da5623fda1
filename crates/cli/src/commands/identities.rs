use anyhow::{Context, Result};
use obfview_core::identity::discover_identities;

use crate::canonicalize_or_current;
use crate::commands::load_config;

/// List the known test identities.
pub fn identities_command(tests_dir: &str, config: Option<&str>, json: bool) -> Result<()> {
    let tests_path = canonicalize_or_current(tests_dir)?;
    let cfg = load_config(config, None)?;
    let names = discover_identities(&tests_path, &cfg.test_prefix, &cfg.test_extension);

    if json {
        let serialized =
            serde_json::to_string_pretty(&names).context("Failed to serialize identities")?;
        println!("{}", serialized);
        return Ok(());
    }

    println!("Test identities ({}):", names.len());
    if names.is_empty() {
        println!("  (none)");
        return Ok(());
    }
    for name in names {
        println!("  - {}", name);
    }

    Ok(())
}
