//! gres CLI entry point.

use clap::{Parser, Subcommand};
use gres::config::GresConfig;
use tracing_subscriber::EnvFilter;

mod cli;

/// gres - embed resource directories inside executables
#[derive(Parser, Debug)]
#[command(name = "gres")]
#[command(about = "Embed resource directories inside executables")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack a directory into an executable (this one by default).
    Pack(cli::pack::PackCmd),

    /// Extract the embedded resources into a directory.
    Extract(cli::extract::ExtractCmd),

    /// Remove the embedded resources from an executable.
    Strip(cli::strip::StripCmd),

    /// List the embedded resources.
    #[command(alias = "ls")]
    List(cli::list::ListCmd),

    /// Manage gres configuration.
    #[command(subcommand)]
    Config(cli::config::ConfigCmd),
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging based on RUST_LOG or default to warn
    init_logging();

    tracing::debug!(version = gres::VERSION, "starting gres");

    let config = match GresConfig::load() {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "failed to load config, using defaults");
            GresConfig::default()
        }
    };

    let result = match cli.command {
        Commands::Pack(cmd) => cmd.run(&config),
        Commands::Extract(cmd) => cmd.run(&config),
        Commands::Strip(cmd) => cmd.run(),
        Commands::List(cmd) => cmd.run(),
        Commands::Config(cmd) => cmd.run(&config),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize the tracing subscriber.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("gres=warn,gres_pack=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
