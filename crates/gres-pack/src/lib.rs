//! Self-extracting resource payloads for executables.
//!
//! A directory tree is packed into a zstd-compressed tar stream and appended
//! to an executable, followed by a fixed 8-byte footer that makes the payload
//! discoverable from the end of the file.
//!
//! # Binary Format
//!
//! ```text
//! +---------------------------+
//! | Host Executable           |  unchanged bytes
//! +---------------------------+
//! | Payload (tar + zstd)      |  payload_len bytes
//! +---------------------------+
//! | Footer (8 bytes)          |
//! |  - magic: "GRES"          |
//! |  - payload_len (u32 BE)   |
//! +---------------------------+
//! ```
//!
//! The running executable is never written in place. Every mutation happens
//! on a sibling `<exe>.tmp` copy which is renamed over the original as the
//! final step.

#![deny(missing_docs)]

pub mod extract;
pub mod format;
pub mod mutator;
pub mod packer;

pub use extract::{
    extract_from, has_payload, list_entries, EntryInfo, ExtractFilter, ExtractInfo, ExtractPolicy,
};
pub use format::{Footer, FOOTER_SIZE, MAGIC};
pub use mutator::{strip_file, StripInfo};
pub use packer::{PackedInfo, Packer, ZSTD_LEVEL};

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during pack, extract and strip operations.
#[derive(Debug, Error)]
pub enum PackError {
    /// Extraction destination is empty or the filesystem root.
    #[error("invalid destination: {} (must not be empty or the filesystem root)", .0.display())]
    InvalidDestination(PathBuf),

    /// No footer was found where one is required.
    #[error("no embedded payload in {}", .0.display())]
    MissingPayload(PathBuf),

    /// The footer is present but describes an impossible payload.
    #[error("corrupt footer: {0}")]
    CorruptFooter(String),

    /// The file is too short to carry a footer at all.
    #[error("file truncated: {len} bytes is shorter than the footer")]
    Truncated {
        /// Length of the file that was inspected.
        len: u64,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The compressed archive stream could not be decoded.
    #[error("archive decode error: {0}")]
    ArchiveDecode(String),

    /// An archive entry would escape the destination directory.
    #[error("unsafe entry path: {0}")]
    UnsafeEntryPath(String),

    /// The compressed payload does not fit the 32-bit footer length.
    #[error("payload too large: {0} bytes exceeds the 4 GiB footer limit")]
    PayloadTooLarge(u64),

    /// Directory traversal error while packing or reconciling.
    #[error("walk error: {0}")]
    Walk(String),
}

impl From<walkdir::Error> for PackError {
    fn from(e: walkdir::Error) -> Self {
        let msg = e.to_string();
        match e.into_io_error() {
            Some(io) => PackError::Io(io),
            None => PackError::Walk(msg),
        }
    }
}

/// Result type for pack operations.
pub type Result<T> = std::result::Result<T, PackError>;

/// Path of the currently running executable.
pub fn current_exe() -> Result<PathBuf> {
    Ok(std::env::current_exe()?)
}

/// Pack `root` into `target`, replacing any payload it already carries.
///
/// With `target` set to `None` the running executable updates itself.
pub fn pack(root: impl AsRef<Path>, target: Option<&Path>) -> Result<PackedInfo> {
    let target = match target {
        Some(t) => t.to_path_buf(),
        None => current_exe()?,
    };
    Packer::new(root.as_ref()).pack(&target)
}

/// Extract the running executable's payload into `dest`.
///
/// `dest` is validated before the executable is even located, so an empty
/// or root destination fails without touching the filesystem.
pub fn extract(
    dest: impl AsRef<Path>,
    policy: ExtractPolicy,
    filter: Option<ExtractFilter<'_>>,
) -> Result<ExtractInfo> {
    let dest = dest.as_ref();
    extract::validate_destination(dest)?;
    extract_from(current_exe()?, dest, policy, filter)
}

/// Remove the payload and footer from the running executable.
pub fn strip() -> Result<StripInfo> {
    strip_file(current_exe()?)
}
