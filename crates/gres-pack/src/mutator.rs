//! Copy-truncate-replace handling for files that may carry a payload.
//!
//! The target is often the executable that is currently running, so it is
//! only ever read. All edits go to a sibling `<target>.tmp` copy, and the
//! single `rename` in [`finalize`] is the commit point. A failure before
//! that rename leaves the target intact and a `.tmp` file behind.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use crate::format::read_footer;
use crate::Result;

/// Suffix of the staging copy written next to the target.
pub const TMP_SUFFIX: &str = ".tmp";

/// Result of stripping a payload from a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripInfo {
    /// Size of the host bytes that remain.
    pub host_size: u64,
    /// Length of the payload that was removed, if one was present.
    pub removed_payload: Option<u32>,
}

/// Get the staging path for a target: the file name with `.tmp` appended.
pub fn tmp_path_for(path: impl AsRef<Path>) -> PathBuf {
    // components() drops a trailing separator, keeping the copy a sibling
    let mut name: OsString = path.as_ref().components().as_path().as_os_str().to_owned();
    name.push(TMP_SUFFIX);
    PathBuf::from(name)
}

/// Copy `source` to its staging path and cut off any embedded payload.
///
/// Only the copy is truncated; `source` is opened read-only.
pub fn strip_to_temp(source: impl AsRef<Path>) -> Result<(PathBuf, StripInfo)> {
    let source = source.as_ref();
    let tmp_path = tmp_path_for(source);

    let mut input = File::open(source)?;
    let mut staged = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(&tmp_path)?;
    let copied = io::copy(&mut input, &mut staged)?;

    let removed = read_footer(&mut staged)?;
    let host_size = match removed {
        Some(footer) => {
            let host_size = copied - footer.trailer_len();
            staged.set_len(host_size)?;
            host_size
        }
        None => copied,
    };
    staged.sync_all()?;

    tracing::debug!(
        source = %source.display(),
        staged = %tmp_path.display(),
        host_size,
        removed_payload = ?removed.map(|f| f.payload_len),
        "staged host copy"
    );

    Ok((
        tmp_path,
        StripInfo {
            host_size,
            removed_payload: removed.map(|f| f.payload_len),
        },
    ))
}

/// Replace `target` with the staged copy at `tmp` and mark it executable.
///
/// Must only be called once everything has been written and synced to
/// `tmp`.
pub fn finalize(tmp: impl AsRef<Path>, target: impl AsRef<Path>) -> Result<()> {
    let tmp = tmp.as_ref();
    let target = target.as_ref();

    // rename cannot replace an existing file here
    #[cfg(not(unix))]
    {
        match fs::remove_file(target) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }

    fs::rename(tmp, target)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(target)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(target, perms)?;
    }

    tracing::debug!(target = %target.display(), "replaced target with staged copy");
    Ok(())
}

/// Remove the payload and footer from `target`, keeping only host bytes.
///
/// A file without a payload is rewritten unchanged.
pub fn strip_file(target: impl AsRef<Path>) -> Result<StripInfo> {
    let target = target.as_ref();
    let (tmp, info) = strip_to_temp(target)?;
    finalize(&tmp, target)?;
    tracing::info!(
        target = %target.display(),
        host_size = info.host_size,
        "stripped payload"
    );
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{write_footer, FOOTER_SIZE};
    use crate::PackError;

    #[test]
    fn test_tmp_path_for_appends_suffix() {
        assert_eq!(
            tmp_path_for("/path/to/my-app"),
            PathBuf::from("/path/to/my-app.tmp")
        );
        assert_eq!(tmp_path_for("app.exe"), PathBuf::from("app.exe.tmp"));
        assert_eq!(tmp_path_for("out/"), PathBuf::from("out.tmp"));
    }

    #[test]
    fn test_strip_to_temp_leaves_source_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("app");

        let mut data = b"#!/bin/sh\necho host\n".to_vec();
        data.extend_from_slice(b"PAYLOAD");
        write_footer(&mut data, 7).unwrap();
        fs::write(&target, &data).unwrap();

        let (tmp, info) = strip_to_temp(&target).unwrap();

        assert_eq!(tmp, dir.path().join("app.tmp"));
        assert_eq!(fs::read(&target).unwrap(), data);
        assert_eq!(fs::read(&tmp).unwrap(), b"#!/bin/sh\necho host\n");
        assert_eq!(info.removed_payload, Some(7));
        assert_eq!(info.host_size, 20);
    }

    #[test]
    fn test_strip_to_temp_plain_file_is_copied_whole() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("plain");
        fs::write(&target, b"no payload in here").unwrap();

        let (tmp, info) = strip_to_temp(&target).unwrap();
        assert_eq!(fs::read(tmp).unwrap(), b"no payload in here");
        assert_eq!(info.removed_payload, None);
    }

    #[test]
    fn test_strip_file_removes_payload_and_sets_exec_bit() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("app");

        let mut data = b"host-bytes".to_vec();
        data.extend_from_slice(&[0xAB; 32]);
        write_footer(&mut data, 32).unwrap();
        fs::write(&target, &data).unwrap();

        let info = strip_file(&target).unwrap();
        assert_eq!(info.removed_payload, Some(32));
        assert_eq!(fs::read(&target).unwrap(), b"host-bytes");
        assert!(!tmp_path_for(&target).exists());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&target).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }

    #[test]
    fn test_strip_file_twice_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("app");

        let mut data = b"host-bytes".to_vec();
        data.extend_from_slice(b"xyz");
        write_footer(&mut data, 3).unwrap();
        fs::write(&target, &data).unwrap();

        strip_file(&target).unwrap();
        let info = strip_file(&target).unwrap();
        assert_eq!(info.removed_payload, None);
        assert_eq!(fs::read(&target).unwrap(), b"host-bytes");
    }

    #[test]
    fn test_strip_short_file_fails_and_keeps_original() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("short");
        fs::write(&target, b"abc").unwrap();

        let result = strip_file(&target);
        assert!(matches!(result, Err(PackError::Truncated { len: 3 })));
        assert_eq!(fs::read(&target).unwrap(), b"abc");
    }

    #[test]
    fn test_strip_corrupt_footer_fails_and_keeps_original() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("corrupt");
        let mut data = b"ab".to_vec();
        write_footer(&mut data, 1_000).unwrap();
        fs::write(&target, &data).unwrap();

        assert!(matches!(
            strip_file(&target),
            Err(PackError::CorruptFooter(_))
        ));
        assert_eq!(fs::read(&target).unwrap().len(), 2 + FOOTER_SIZE);
    }
}
