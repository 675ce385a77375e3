//! Extract command implementation.

use clap::Args;
use gres::config::GresConfig;
use gres::filter::PathFilter;
use gres::pack::{ExtractFilter, ExtractPolicy};
use std::path::PathBuf;

/// Extract embedded resources.
#[derive(Args, Debug)]
pub struct ExtractCmd {
    /// Destination directory.
    pub dest: PathBuf,

    /// Read the payload from this file instead of the running binary.
    #[arg(long, value_name = "PATH")]
    pub from: Option<PathBuf>,

    /// Merge policy: no-overwrite, overwrite-if-newer, always-overwrite, verbatim.
    #[arg(short, long, value_name = "POLICY")]
    pub policy: Option<ExtractPolicy>,

    /// Only extract paths containing this substring (repeatable).
    #[arg(long, value_name = "SUBSTR")]
    pub include: Vec<String>,

    /// Skip paths containing this substring (repeatable).
    #[arg(long, value_name = "SUBSTR")]
    pub exclude: Vec<String>,
}

impl ExtractCmd {
    /// Execute the extract command.
    pub fn run(&self, config: &GresConfig) -> gres::Result<()> {
        let policy = self.policy.unwrap_or(config.default_policy);

        let mut exclude = config.exclude.clone();
        exclude.extend(self.exclude.iter().cloned());
        let filter = PathFilter::new(self.include.clone(), exclude);
        let accept: ExtractFilter<'_> = &|path: &str| filter.accepts(path);
        let filter_fn = if filter.is_empty() { None } else { Some(accept) };

        let info = match &self.from {
            Some(exe) => gres::pack::extract_from(exe, &self.dest, policy, filter_fn)?,
            None => gres::pack::extract(&self.dest, policy, filter_fn)?,
        };

        println!(
            "Extracted {} files to {} ({} kept, {} filtered, policy {})",
            info.written,
            self.dest.display(),
            info.skipped,
            info.filtered,
            policy
        );
        Ok(())
    }
}
