//! Pack command implementation.

use clap::Args;
use gres::config::GresConfig;
use gres::pack::Packer;
use gres::Error;
use std::path::PathBuf;

/// Pack a resource directory into an executable.
#[derive(Args, Debug)]
pub struct PackCmd {
    /// Directory whose files are embedded.
    pub root: PathBuf,

    /// Executable to pack into (defaults to this gres binary).
    #[arg(short, long, value_name = "PATH")]
    pub target: Option<PathBuf>,

    /// zstd compression level (overrides config).
    #[arg(short, long, value_name = "N")]
    pub level: Option<i32>,
}

impl PackCmd {
    /// Execute the pack command.
    pub fn run(&self, config: &GresConfig) -> gres::Result<()> {
        if !self.root.is_dir() {
            return Err(Error::RootNotFound {
                path: self.root.clone(),
            });
        }

        let level = self.level.unwrap_or(config.compression_level);
        let target = match &self.target {
            Some(t) => t.clone(),
            None => gres::pack::current_exe()?,
        };

        tracing::debug!(
            root = %self.root.display(),
            target = %target.display(),
            level,
            "packing"
        );

        let info = Packer::new(&self.root)
            .with_compression_level(level)
            .pack(&target)?;

        println!(
            "Packed {} files ({} bytes compressed) into {}",
            info.entry_count,
            info.payload_size,
            target.display()
        );
        Ok(())
    }
}
