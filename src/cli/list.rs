//! List command implementation.

use clap::Args;
use std::path::PathBuf;

/// List embedded resources.
#[derive(Args, Debug)]
pub struct ListCmd {
    /// Read the payload from this file instead of the running binary.
    #[arg(long, value_name = "PATH")]
    pub from: Option<PathBuf>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

impl ListCmd {
    /// Execute the list command.
    pub fn run(&self) -> gres::Result<()> {
        let exe = match &self.from {
            Some(p) => p.clone(),
            None => gres::pack::current_exe()?,
        };
        let entries = gres::pack::list_entries(&exe)?;

        if self.json {
            let json_entries: Vec<_> = entries
                .iter()
                .map(|e| {
                    serde_json::json!({
                        "path": e.path,
                        "size": e.size,
                        "mode": format!("{:o}", e.mode),
                        "modified": humantime::format_rfc3339_seconds(e.modified).to_string(),
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&json_entries).unwrap_or_default()
            );
            return Ok(());
        }

        if entries.is_empty() {
            println!("No files in payload");
            return Ok(());
        }

        println!("{:<12} {:<22} PATH", "SIZE", "MODIFIED");
        println!("{}", "-".repeat(60));
        for e in &entries {
            println!(
                "{:<12} {:<22} {}",
                e.size,
                humantime::format_rfc3339_seconds(e.modified).to_string(),
                e.path
            );
        }
        Ok(())
    }
}
