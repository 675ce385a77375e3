//! Configuration CLI commands.

use clap::{Args, Subcommand};
use gres::config::GresConfig;
use gres::Result;

/// Configuration commands
#[derive(Subcommand, Debug)]
pub enum ConfigCmd {
    /// Show current configuration
    Show(ShowCmd),

    /// Write the current configuration to the config file
    Init(InitCmd),
}

impl ConfigCmd {
    pub fn run(self, config: &GresConfig) -> Result<()> {
        match self {
            ConfigCmd::Show(cmd) => cmd.run(config),
            ConfigCmd::Init(cmd) => cmd.run(config),
        }
    }
}

/// Show current configuration
#[derive(Args, Debug)]
pub struct ShowCmd {}

impl ShowCmd {
    pub fn run(self, config: &GresConfig) -> Result<()> {
        println!("Configuration:");
        if let Ok(path) = GresConfig::path() {
            println!("  Config file: {}", path.display());
            if !path.exists() {
                println!("  Status: not configured (using defaults)");
            }
        }
        println!("  Default policy: {}", config.default_policy);
        println!("  Compression level: {}", config.compression_level);
        if config.exclude.is_empty() {
            println!("  Exclude: (none)");
        } else {
            println!("  Exclude: {}", config.exclude.join(", "));
        }
        Ok(())
    }
}

/// Write the current configuration to the config file
#[derive(Args, Debug)]
pub struct InitCmd {
    /// Overwrite an existing config file.
    #[arg(short, long)]
    pub force: bool,
}

impl InitCmd {
    pub fn run(self, config: &GresConfig) -> Result<()> {
        let path = GresConfig::path()?;
        if path.exists() && !self.force {
            println!("Config already exists at {} (use --force)", path.display());
            return Ok(());
        }
        config.save()?;
        println!("Wrote {}", path.display());
        Ok(())
    }
}
