//! Uabrowse CLI application entry point
//!
//! This is the main executable for the uabrowse OPC UA address-space
//! browser. It provides a command-line interface for walking a server's
//! address space and exporting the result as CSV, JSON or XML.
//!
//! # Usage
//!
//! ```bash
//! # Browse the built-in demo space (default command)
//! uabrowse browse -s demo
//!
//! # Start somewhere else, deeper, with values
//! uabrowse browse -s demo -n ns=1;i=10 -d 5 --include-values
//!
//! # Export to an artifact
//! uabrowse export -s demo -f json -o space.json
//! uabrowse export -s demo -f csv --full
//!
//! # Re-browse a previous JSON export offline
//! uabrowse browse -s space.json
//!
//! # Quiet mode (only output results)
//! uabrowse -q export -s demo
//! ```
//!
//! # Configuration
//!
//! Defaults (endpoint, depth, export directory, quiet) are read from the
//! user's config directory (`~/.config/uabrowse/config.toml` on Linux).
//! Logging is controlled through `RUST_LOG`.

use colored::Colorize;
use tracing_subscriber::EnvFilter;

use uabrowse::UaBrowseError;
use uabrowse::cli::{Cli, Commands};
use uabrowse::commands;
use uabrowse::config::UabrowseConfig;

type Result<T> = std::result::Result<T, UaBrowseError>;

fn run() -> Result<()> {
    let config = UabrowseConfig::load()?;
    let cli = Cli::parse_args();
    let quiet = cli.quiet || config.quiet;
    let command = cli.get_command();

    match &command {
        Commands::Browse { session, security } => {
            commands::browse(session, security, &config, quiet)
        }
        Commands::Export {
            session,
            security,
            format,
            output,
            full,
        } => commands::export(
            session,
            security,
            &config,
            *format,
            output.as_deref(),
            *full,
            quiet,
        ),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".red().bold());
        if let Some(hint) = e.remediation() {
            eprintln!("{} {hint}", "Hint:".yellow());
        }
        std::process::exit(e.exit_code());
    }
}
