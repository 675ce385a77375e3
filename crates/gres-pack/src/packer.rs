//! Packer for embedding a directory tree into an executable.
//!
//! The tree is streamed into a zstd-compressed tar archive in an anonymous
//! temp file, then appended together with a footer to a stripped copy of the
//! target, which finally replaces the target.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Seek, SeekFrom};
use std::path::{Component, Path, PathBuf};
use std::time::UNIX_EPOCH;

use walkdir::WalkDir;

use crate::format::{write_footer, FOOTER_SIZE};
use crate::mutator::{finalize, strip_to_temp};
use crate::{PackError, Result};

/// Compression level for zstd (19 = high compression).
pub const ZSTD_LEVEL: i32 = 19;

/// Permission bits recorded for every archived file.
pub const ENTRY_MODE: u32 = 0o600;

/// Packer for embedding a resource directory into a target file.
#[derive(Debug, Clone)]
pub struct Packer {
    root: PathBuf,
    level: i32,
}

/// Information about a packed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedInfo {
    /// Size of the host bytes the payload was appended to.
    pub host_size: u64,
    /// Size of the compressed payload.
    pub payload_size: u64,
    /// Number of files in the payload.
    pub entry_count: usize,
    /// Total size of the target after packing.
    pub total_size: u64,
}

impl Packer {
    /// Create a packer for the tree rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            level: ZSTD_LEVEL,
        }
    }

    /// Set the zstd compression level.
    pub fn with_compression_level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    /// Root of the tree being packed.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Pack the tree into `target`, replacing any payload it already has.
    ///
    /// The archive is fully built before `target` is read, so a failure while
    /// walking the tree never leaves a staging copy behind.
    pub fn pack(&self, target: impl AsRef<Path>) -> Result<PackedInfo> {
        let target = target.as_ref();

        let (mut archive, entry_count) = self.write_archive()?;
        let payload_size = archive.metadata()?.len();
        let payload_len =
            u32::try_from(payload_size).map_err(|_| PackError::PayloadTooLarge(payload_size))?;

        let (tmp, stripped) = strip_to_temp(target)?;

        let mut staged = OpenOptions::new().append(true).open(&tmp)?;
        io::copy(&mut archive, &mut staged)?;
        write_footer(&mut staged, payload_len)?;
        staged.sync_all()?;
        drop(staged);

        finalize(&tmp, target)?;

        let info = PackedInfo {
            host_size: stripped.host_size,
            payload_size,
            entry_count,
            total_size: stripped.host_size + payload_size + FOOTER_SIZE as u64,
        };

        tracing::info!(
            root = %self.root.display(),
            target = %target.display(),
            entries = info.entry_count,
            payload_size = info.payload_size,
            replaced_payload = ?stripped.removed_payload,
            "packed resources"
        );

        Ok(info)
    }

    /// Stream every regular file under the root into a compressed archive.
    ///
    /// Returns the archive rewound to its start, and the entry count.
    fn write_archive(&self) -> Result<(File, usize)> {
        if !fs::metadata(&self.root)?.is_dir() {
            return Err(PackError::Walk(format!(
                "not a directory: {}",
                self.root.display()
            )));
        }

        let output = tempfile::tempfile()?;
        let encoder = zstd::stream::Encoder::new(output, self.level)?;
        let mut builder = tar::Builder::new(encoder);
        let mut entry_count = 0;

        // Symlinks are not followed and not archived.
        for entry in WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let name = archive_path(&self.root, entry.path())?;
            let metadata = entry.metadata()?;
            let mtime = metadata
                .modified()
                .ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_secs())
                .unwrap_or(0);

            let mut header = tar::Header::new_gnu();
            header.set_entry_type(tar::EntryType::Regular);
            header.set_size(metadata.len());
            header.set_mode(ENTRY_MODE);
            header.set_mtime(mtime);

            tracing::trace!(entry = %name, size = metadata.len(), "adding entry");
            let file = File::open(entry.path())?;
            builder.append_data(&mut header, &name, file)?;
            entry_count += 1;
        }

        let encoder = builder.into_inner()?;
        let mut output = encoder.finish()?;
        output.seek(SeekFrom::Start(0))?;
        Ok((output, entry_count))
    }
}

/// Relative, `/`-separated archive name of `path` under `root`.
fn archive_path(root: &Path, path: &Path) -> Result<String> {
    let rel = path
        .strip_prefix(root)
        .map_err(|_| PackError::Walk(format!("{} is outside the root", path.display())))?;

    let mut parts = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str().ok_or_else(|| {
                PackError::Walk(format!("non UTF-8 path: {}", path.display()))
            })?),
            _ => {
                return Err(PackError::Walk(format!(
                    "unexpected path component in {}",
                    path.display()
                )))
            }
        }
    }
    Ok(parts.join("/"))
}
