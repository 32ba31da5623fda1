use anyhow::Result;
use clap::{Parser, Subcommand};
use obfview::commands::{dataset_command, generate_command, identities_command, RunArgs};
use obfview::init_logging;

/// Before/after CFG comparison viewer builder.
///
/// This CLI is a thin wrapper around `obfview-core` (exposed in code as `obfview_core`).
/// All substantive logic lives in the library so it can be tested thoroughly
/// and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "obfview",
    version,
    about = "Build an interactive before/after CFG comparison page from obfuscation test results",
    long_about = None
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the dataset and write the comparison viewer page.
    ///
    /// This will:
    /// - Pair `visualizations/original` renders with `visualizations/obfuscated` ones.
    /// - Aggregate per-test metrics from `reports/` or `logs/`.
    /// - Write `visualizations/comparison/index.html` under the results root.
    Generate(RunArgs),

    /// Print the assembled dataset as JSON instead of writing a page.
    Dataset {
        #[command(flatten)]
        run: RunArgs,

        /// Emit single-line JSON.
        #[arg(long, default_value_t = false)]
        compact: bool,
    },

    /// List the test names images and metrics are attributed to.
    Identities {
        /// Directory of test sources.
        #[arg(long, default_value = obfview::commands::DEFAULT_TESTS_DIR)]
        tests_dir: String,

        /// Optional viewer config file.
        #[arg(long)]
        config: Option<String>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Default to Generate with default paths if no command is provided.
    match cli.command.unwrap_or_else(|| Command::Generate(RunArgs::default())) {
        Command::Generate(args) => generate_command(&args)?,
        Command::Dataset { run, compact } => dataset_command(&run, compact)?,
        Command::Identities { tests_dir, config, json } => {
            identities_command(&tests_dir, config.as_deref(), json)?
        }
    }

    Ok(())
}
