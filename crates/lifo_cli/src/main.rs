//! `lifo` — command-line front end for the LIFO stack simulator.
//!
//! Provides `lifo init` for project scaffolding, `lifo sim` for running a
//! stimulus script, and `lifo test` for running the built-in testbenches.

#![warn(missing_docs)]

mod init;
mod project;
mod sim;
mod test;

use std::process;

use clap::{Parser, Subcommand};

/// Cycle-level simulator for a 16-deep LIFO hardware stack.
#[derive(Parser, Debug)]
#[command(name = "lifo", version, about = "LIFO stack simulator")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `lifo.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new project with a config file and an example stimulus.
    Init {
        /// Project name (creates a subdirectory). If omitted, initializes in
        /// the current directory.
        name: Option<String>,
    },
    /// Run a stimulus script.
    Sim(SimArgs),
    /// Run the built-in testbenches.
    Test(TestArgs),
}

/// Arguments for the `lifo sim` subcommand.
#[derive(Parser, Debug)]
pub struct SimArgs {
    /// Stimulus file path, or a script name in the stimulus directory.
    pub stimulus: String,

    /// Simulation time limit (e.g., "100ns", "1us", "10ms").
    #[arg(long)]
    pub time: Option<String>,

    /// Output path for the waveform file.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Disable waveform recording.
    #[arg(long)]
    pub no_waveform: bool,
}

/// Arguments for the `lifo test` subcommand.
#[derive(Parser, Debug)]
pub struct TestArgs {
    /// Specific testbench name to run (optional).
    pub name: Option<String>,

    /// Substring filter for testbench names.
    #[arg(long)]
    pub filter: Option<String>,

    /// Disable waveform recording.
    #[arg(long)]
    pub no_waveform: bool,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

impl GlobalArgs {
    /// Log level used when `RUST_LOG` is unset.
    fn default_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(global.default_log_level()),
    )
    .format_timestamp(None)
    .init();

    let result = match cli.command {
        Command::Init { name } => init::run(name),
        Command::Sim(ref args) => sim::run(args, &global),
        Command::Test(ref args) => test::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
