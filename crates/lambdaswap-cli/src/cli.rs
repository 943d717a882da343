use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "lambdaswap - grand-canonical Monte Carlo with continuous fractional component swap moves.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to run replicas concurrently.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a grand-canonical CFCMC simulation described by a TOML file.
    Run(RunArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    // --- Core Arguments ---
    /// Path to the simulation file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Directory the lambda histograms and TMMC distribution are written to.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output: PathBuf,

    // --- Force Field Overrides ---
    /// Override the force field parameter file named in the simulation file.
    #[arg(long, value_name = "PATH")]
    pub forcefield: Option<PathBuf>,

    // --- Run Overrides ---
    /// Override the number of production cycles.
    #[arg(long, value_name = "INT")]
    pub cycles: Option<usize>,

    /// Override the number of equilibration cycles.
    #[arg(long, value_name = "INT")]
    pub equilibration_cycles: Option<usize>,

    /// Override the random seed.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Number of independent replicas, seeded consecutively from the seed.
    #[arg(short, long, value_name = "INT")]
    pub replicas: Option<usize>,

    /// Skip insertion attempts (Widom-style sampling of the fractional molecule).
    #[arg(long)]
    pub no_insertion: bool,

    /// Skip deletion attempts.
    #[arg(long)]
    pub no_deletion: bool,

    /// Set a specific configuration value, overriding the simulation file.
    /// Can be used multiple times. Example: -S simulation.temperature=250
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
