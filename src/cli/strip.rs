//! Strip command implementation.

use clap::Args;
use std::path::PathBuf;

/// Remove embedded resources.
#[derive(Args, Debug)]
pub struct StripCmd {
    /// Executable to strip (defaults to this gres binary).
    #[arg(short, long, value_name = "PATH")]
    pub target: Option<PathBuf>,
}

impl StripCmd {
    /// Execute the strip command.
    pub fn run(&self) -> gres::Result<()> {
        let info = match &self.target {
            Some(target) => gres::pack::strip_file(target)?,
            None => gres::pack::strip()?,
        };

        match info.removed_payload {
            Some(len) => println!("Removed {} byte payload", len),
            None => println!("No embedded payload found"),
        }
        Ok(())
    }
}
