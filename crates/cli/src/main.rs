use anyhow::Result;
use asm_difftest::commands::{
    generate_command, list_formats_command, run_command, scan_command, show_inventory_command,
};
use clap::{Parser, Subcommand};

/// Differential test-suite generator for retro game disassemblies.
///
/// Thin wrapper around `difftest_core`.
#[derive(Parser, Debug)]
#[command(
    name = "asm-difftest",
    version,
    about = "Recover a function inventory from assembly and generate differential tests",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan an assembly listing and write the function inventory.
    ///
    /// Prints label/call-target counts and the leaf / non-leaf tables.
    Scan {
        /// Path to the assembly listing.
        #[arg(long)]
        corpus: String,

        /// Optional config file (.yaml, .yml or .json).
        #[arg(long)]
        config: Option<String>,

        /// Where to write the inventory listing.
        #[arg(long, default_value = "functions.txt")]
        out: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Generate a test suite from an inventory listing.
    Generate {
        /// Path to the inventory listing written by `scan`.
        #[arg(long)]
        inventory: String,

        /// Optional config file (.yaml, .yml or .json).
        #[arg(long)]
        config: Option<String>,

        /// Randomized trials per function (overrides config).
        #[arg(long)]
        trials: Option<u32>,

        /// Suite format: rust, kotlin or json (overrides config).
        #[arg(long)]
        format: Option<String>,

        /// Output file. Defaults to `<Suite>DifferentialTest.<ext>` in the current directory.
        #[arg(long)]
        out: Option<String>,
    },

    /// Run the full pipeline: scan, listing, descriptor, rendered suite, manifest.
    Run {
        /// Path to the assembly listing.
        #[arg(long)]
        corpus: String,

        /// Optional config file (.yaml, .yml or .json).
        #[arg(long)]
        config: Option<String>,

        /// Randomized trials per function (overrides config).
        #[arg(long)]
        trials: Option<u32>,

        /// Suite format: rust, kotlin or json (overrides config).
        #[arg(long)]
        format: Option<String>,

        /// Output directory for all artifacts.
        #[arg(long, default_value = "difftest-out")]
        out_dir: String,

        /// Overwrite an existing output directory.
        #[arg(long, default_value_t = false)]
        force: bool,
    },

    /// Show the contents of an inventory listing.
    ShowInventory {
        /// Path to the inventory listing.
        #[arg(long)]
        inventory: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List available suite formats.
    ListFormats {
        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Scan { corpus, config, out, json } => {
            scan_command(&corpus, config.as_deref(), &out, json)?
        }
        Command::Generate { inventory, config, trials, format, out } => generate_command(
            &inventory,
            config.as_deref(),
            trials,
            format.as_deref(),
            out.as_deref(),
        )?,
        Command::Run { corpus, config, trials, format, out_dir, force } => {
            run_command(&corpus, config.as_deref(), trials, format.as_deref(), &out_dir, force)?
        }
        Command::ShowInventory { inventory, json } => show_inventory_command(&inventory, json)?,
        Command::ListFormats { json } => list_formats_command(json)?,
    }

    Ok(())
}
