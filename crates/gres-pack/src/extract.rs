//! Extraction of an embedded payload onto a destination directory.
//!
//! [`ExtractPolicy::Verbatim`] wipes the destination and unpacks straight
//! into it. Every other policy first unpacks into a sibling `<dest>.tmp`
//! staging tree, then moves staged files into the destination one by one
//! when [`ExtractPolicy::should_replace`] allows it.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::format::{payload_offset, read_footer, Footer};
use crate::mutator::tmp_path_for;
use crate::{PackError, Result};

/// How extraction merges into files already present at the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractPolicy {
    /// Keep existing files; only create missing ones.
    #[default]
    NoOverwrite,
    /// Replace a file only when the archived copy is strictly newer.
    OverwriteIfNewer,
    /// Replace every file.
    AlwaysOverwrite,
    /// Delete the destination and recreate it from the payload.
    Verbatim,
}

impl ExtractPolicy {
    /// Decide whether an incoming file replaces the one at its destination.
    ///
    /// `existing` is the modification time of the destination file, or
    /// `None` when there is no file there yet.
    pub fn should_replace(&self, existing: Option<SystemTime>, incoming: SystemTime) -> bool {
        match (self, existing) {
            (_, None) => true,
            (ExtractPolicy::NoOverwrite, Some(_)) => false,
            (ExtractPolicy::OverwriteIfNewer, Some(current)) => incoming > current,
            (ExtractPolicy::AlwaysOverwrite | ExtractPolicy::Verbatim, Some(_)) => true,
        }
    }
}

impl fmt::Display for ExtractPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractPolicy::NoOverwrite => write!(f, "no-overwrite"),
            ExtractPolicy::OverwriteIfNewer => write!(f, "overwrite-if-newer"),
            ExtractPolicy::AlwaysOverwrite => write!(f, "always-overwrite"),
            ExtractPolicy::Verbatim => write!(f, "verbatim"),
        }
    }
}

impl FromStr for ExtractPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "no-overwrite" => Ok(ExtractPolicy::NoOverwrite),
            "overwrite-if-newer" | "newer" => Ok(ExtractPolicy::OverwriteIfNewer),
            "always-overwrite" | "always" => Ok(ExtractPolicy::AlwaysOverwrite),
            "verbatim" => Ok(ExtractPolicy::Verbatim),
            other => Err(format!(
                "unknown extract policy '{}': expected no-overwrite, overwrite-if-newer, always-overwrite or verbatim",
                other
            )),
        }
    }
}

/// Predicate over an entry's archive path; entries it rejects are skipped.
pub type ExtractFilter<'a> = &'a dyn Fn(&str) -> bool;

/// Counts reported by an extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractInfo {
    /// Files written to the destination.
    pub written: usize,
    /// Files left untouched because the policy kept the existing copy.
    pub skipped: usize,
    /// Entries rejected by the filter.
    pub filtered: usize,
}

/// Metadata of one entry in an embedded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// Archive path, relative and `/`-separated.
    pub path: String,
    /// Uncompressed size in bytes.
    pub size: u64,
    /// Recorded permission bits.
    pub mode: u32,
    /// Recorded modification time.
    pub modified: SystemTime,
}

/// Reject destinations that are empty or resolve to the filesystem root.
pub fn validate_destination(dest: &Path) -> Result<()> {
    let is_root = dest.has_root()
        && dest.components().all(|c| {
            matches!(
                c,
                Component::Prefix(_) | Component::RootDir | Component::CurDir | Component::ParentDir
            )
        });
    if dest.as_os_str().is_empty() || is_root {
        return Err(PackError::InvalidDestination(dest.to_path_buf()));
    }
    Ok(())
}

/// Check whether `path` ends with a payload footer.
pub fn has_payload(path: impl AsRef<Path>) -> Result<bool> {
    let mut file = File::open(path.as_ref())?;
    Ok(read_footer(&mut file)?.is_some())
}

/// List the entries of the payload embedded in `exe` without extracting.
pub fn list_entries(exe: impl AsRef<Path>) -> Result<Vec<EntryInfo>> {
    let exe = exe.as_ref();
    let (mut file, footer) = open_payload(exe)?;
    let mut archive = tar::Archive::new(payload_decoder(&mut file, &footer)?);

    let mut entries = Vec::new();
    for entry in archive.entries().map_err(decode_err)? {
        let entry = entry.map_err(decode_err)?;
        let header = entry.header();
        if !header.entry_type().is_file() {
            continue;
        }
        entries.push(EntryInfo {
            path: String::from_utf8_lossy(&entry.path_bytes()).into_owned(),
            size: header.size().map_err(decode_err)?,
            mode: header.mode().map_err(decode_err)?,
            modified: UNIX_EPOCH + Duration::from_secs(header.mtime().map_err(decode_err)?),
        });
    }
    Ok(entries)
}

/// Extract the payload embedded in `exe` into `dest`.
pub fn extract_from(
    exe: impl AsRef<Path>,
    dest: impl AsRef<Path>,
    policy: ExtractPolicy,
    filter: Option<ExtractFilter<'_>>,
) -> Result<ExtractInfo> {
    let exe = exe.as_ref();
    let dest = dest.as_ref();
    validate_destination(dest)?;

    let (mut file, footer) = open_payload(exe)?;

    let info = if policy == ExtractPolicy::Verbatim {
        remove_dir_if_exists(dest)?;
        unpack(&mut file, &footer, dest, filter)?
    } else {
        let staging = tmp_path_for(dest);
        remove_dir_if_exists(&staging)?;
        let unpacked = unpack(&mut file, &footer, &staging, filter)?;
        let mut info = reconcile(&staging, dest, policy)?;
        info.filtered = unpacked.filtered;
        fs::remove_dir_all(&staging)?;
        info
    };

    tracing::info!(
        exe = %exe.display(),
        dest = %dest.display(),
        %policy,
        written = info.written,
        skipped = info.skipped,
        filtered = info.filtered,
        "extracted resources"
    );
    Ok(info)
}

/// Open `exe` and read the footer that must be present.
fn open_payload(exe: &Path) -> Result<(File, Footer)> {
    let mut file = File::open(exe)?;
    let footer = read_footer(&mut file)?
        .ok_or_else(|| PackError::MissingPayload(exe.to_path_buf()))?;
    tracing::debug!(exe = %exe.display(), payload_len = footer.payload_len, "found payload");
    Ok((file, footer))
}

/// Position `file` at the payload and wrap it in a bounded zstd decoder.
fn payload_decoder<'a>(file: &'a mut File, footer: &Footer) -> Result<impl Read + 'a> {
    let file_len = file.metadata()?.len();
    file.seek(SeekFrom::Start(payload_offset(file_len, footer)))?;
    let limited = file.take(footer.payload_len as u64);
    zstd::stream::Decoder::new(limited).map_err(decode_err)
}

/// Write every accepted entry under `dir`, restoring recorded mtimes.
fn unpack(
    file: &mut File,
    footer: &Footer,
    dir: &Path,
    filter: Option<ExtractFilter<'_>>,
) -> Result<ExtractInfo> {
    fs::create_dir_all(dir)?;
    let mut archive = tar::Archive::new(payload_decoder(file, footer)?);
    let mut info = ExtractInfo::default();

    for entry in archive.entries().map_err(decode_err)? {
        let mut entry = entry.map_err(decode_err)?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
        if let Some(accept) = filter {
            if !accept(&name) {
                info.filtered += 1;
                continue;
            }
        }

        let dst = dir.join(safe_relative_path(&name)?);
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }

        let mtime = UNIX_EPOCH + Duration::from_secs(entry.header().mtime().map_err(decode_err)?);
        let mut out = File::create(&dst)?;
        io::copy(&mut entry, &mut out).map_err(copy_err)?;
        out.set_modified(mtime)?;
        info.written += 1;
    }

    Ok(info)
}

/// Move staged files into `dest` where the policy allows it.
fn reconcile(staging: &Path, dest: &Path, policy: ExtractPolicy) -> Result<ExtractInfo> {
    fs::create_dir_all(dest)?;
    let mut info = ExtractInfo::default();

    // Sorted walks read each directory fully before yielding, so moving
    // files out of it mid-walk is safe.
    for entry in WalkDir::new(staging).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let rel = entry
            .path()
            .strip_prefix(staging)
            .map_err(|_| PackError::Walk(format!("{} escaped staging", entry.path().display())))?;
        let dst = dest.join(rel);
        let incoming = entry.metadata()?.modified()?;

        if policy.should_replace(modified_time(&dst)?, incoming) {
            replace_file(entry.path(), &dst)?;
            info.written += 1;
        } else {
            tracing::debug!(path = %dst.display(), %policy, "keeping existing file");
            info.skipped += 1;
        }
    }

    Ok(info)
}

/// Modification time of `path`, or `None` if nothing is there.
fn modified_time(path: &Path) -> Result<Option<SystemTime>> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(Some(metadata.modified()?)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Rename `src` over `dst`, creating parent directories as needed.
fn replace_file(src: &Path, dst: &Path) -> Result<()> {
    match fs::remove_file(dst) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::rename(src, dst)?;
    Ok(())
}

fn remove_dir_if_exists(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Turn an archive name into a relative path that stays under the target.
fn safe_relative_path(name: &str) -> Result<PathBuf> {
    if name.starts_with('/') {
        return Err(PackError::UnsafeEntryPath(name.to_string()));
    }

    let mut path = PathBuf::new();
    for part in name.split('/') {
        match part {
            "" | "." => {}
            ".." => return Err(PackError::UnsafeEntryPath(name.to_string())),
            part => path.push(part),
        }
    }

    // Reject anything that parses as absolute or prefixed on this platform.
    if path.as_os_str().is_empty()
        || path
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
    {
        return Err(PackError::UnsafeEntryPath(name.to_string()));
    }
    Ok(path)
}

fn decode_err(e: io::Error) -> PackError {
    PackError::ArchiveDecode(e.to_string())
}

/// Classify an error from streaming entry content to disk.
fn copy_err(e: io::Error) -> PackError {
    match e.kind() {
        io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => decode_err(e),
        _ => PackError::Io(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::write_footer;
    use crate::packer::Packer;

    const T0: u64 = 1_000_000_000;
    const T1: u64 = 1_500_000_000;

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    fn set_mtime(path: &Path, secs: u64) {
        let file = File::options().write(true).open(path).unwrap();
        file.set_modified(at(secs)).unwrap();
    }

    fn write_file(path: &Path, content: &[u8], secs: u64) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
        set_mtime(path, secs);
    }

    /// Build a packed host in `dir` from `files` (name, content) at `secs`.
    fn packed_host(dir: &Path, files: &[(&str, &[u8])], secs: u64) -> PathBuf {
        let root = dir.join("res");
        fs::create_dir_all(&root).unwrap();
        for (name, content) in files {
            write_file(&root.join(name), content, secs);
        }
        let exe = dir.join("app");
        fs::write(&exe, b"\x7fELF-host-bytes").unwrap();
        Packer::new(&root)
            .with_compression_level(3)
            .pack(&exe)
            .unwrap();
        exe
    }

    #[test]
    fn test_should_replace_matrix() {
        let old = at(T0);
        let new = at(T1);

        for policy in [
            ExtractPolicy::NoOverwrite,
            ExtractPolicy::OverwriteIfNewer,
            ExtractPolicy::AlwaysOverwrite,
        ] {
            assert!(policy.should_replace(None, old), "{policy} must create missing files");
        }

        assert!(!ExtractPolicy::NoOverwrite.should_replace(Some(old), new));
        assert!(ExtractPolicy::OverwriteIfNewer.should_replace(Some(old), new));
        assert!(!ExtractPolicy::OverwriteIfNewer.should_replace(Some(new), old));
        assert!(!ExtractPolicy::OverwriteIfNewer.should_replace(Some(new), new));
        assert!(ExtractPolicy::AlwaysOverwrite.should_replace(Some(new), old));
    }

    #[test]
    fn test_policy_parse_and_display() {
        for policy in [
            ExtractPolicy::NoOverwrite,
            ExtractPolicy::OverwriteIfNewer,
            ExtractPolicy::AlwaysOverwrite,
            ExtractPolicy::Verbatim,
        ] {
            assert_eq!(policy.to_string().parse::<ExtractPolicy>().unwrap(), policy);
        }
        assert_eq!(
            "Always".parse::<ExtractPolicy>().unwrap(),
            ExtractPolicy::AlwaysOverwrite
        );
        assert!("sometimes".parse::<ExtractPolicy>().is_err());
    }

    #[test]
    fn test_validate_destination() {
        assert!(validate_destination(Path::new("")).is_err());
        assert!(validate_destination(Path::new("/")).is_err());
        assert!(validate_destination(Path::new("/..")).is_err());
        assert!(validate_destination(Path::new("out")).is_ok());
        assert!(validate_destination(Path::new("/var/lib/app")).is_ok());
    }

    #[test]
    fn test_invalid_destination_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let exe = packed_host(dir.path(), &[("a.txt", b"a")], T0);

        for dest in ["", "/"] {
            let result = extract_from(&exe, dest, ExtractPolicy::Verbatim, None);
            assert!(matches!(result, Err(PackError::InvalidDestination(_))));
        }
        assert!(!Path::new("/.tmp").exists());
    }

    #[test]
    fn test_round_trip_restores_content_and_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let files: &[(&str, &[u8])] = &[
            ("a.txt", b"alpha"),
            ("empty", b""),
            ("nested/deeper/b.bin", &[0, 1, 2, 3, 255]),
        ];
        let exe = packed_host(dir.path(), files, T1);

        let dest = dir.path().join("out");
        let info = extract_from(&exe, &dest, ExtractPolicy::AlwaysOverwrite, None).unwrap();
        assert_eq!(info.written, 3);

        for (name, content) in files {
            let path = dest.join(name);
            assert_eq!(fs::read(&path).unwrap(), *content, "{name}");
            assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), at(T1));
        }
        assert!(!tmp_path_for(&dest).exists());
    }

    #[test]
    fn test_no_overwrite_keeps_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let exe = packed_host(dir.path(), &[("a.txt", b"archived"), ("b.txt", b"new")], T1);

        let dest = dir.path().join("out");
        write_file(&dest.join("a.txt"), b"local", T0);

        let info = extract_from(&exe, &dest, ExtractPolicy::NoOverwrite, None).unwrap();
        assert_eq!(info.written, 1);
        assert_eq!(info.skipped, 1);
        assert_eq!(fs::read(dest.join("a.txt")).unwrap(), b"local");
        assert_eq!(fs::read(dest.join("b.txt")).unwrap(), b"new");
    }

    #[test]
    fn test_overwrite_if_newer_replaces_older_file() {
        let dir = tempfile::tempdir().unwrap();
        let exe = packed_host(dir.path(), &[("a.txt", b"archived")], T1);

        let dest = dir.path().join("out");
        write_file(&dest.join("a.txt"), b"local", T0);

        extract_from(&exe, &dest, ExtractPolicy::OverwriteIfNewer, None).unwrap();
        assert_eq!(fs::read(dest.join("a.txt")).unwrap(), b"archived");
        assert_eq!(
            fs::metadata(dest.join("a.txt")).unwrap().modified().unwrap(),
            at(T1)
        );
    }

    #[test]
    fn test_overwrite_if_newer_keeps_newer_or_equal_file() {
        let dir = tempfile::tempdir().unwrap();
        let exe = packed_host(dir.path(), &[("a.txt", b"archived"), ("b.txt", b"archived")], T0);

        let dest = dir.path().join("out");
        write_file(&dest.join("a.txt"), b"local-newer", T1);
        write_file(&dest.join("b.txt"), b"local-same", T0);

        let info = extract_from(&exe, &dest, ExtractPolicy::OverwriteIfNewer, None).unwrap();
        assert_eq!(info.skipped, 2);
        assert_eq!(fs::read(dest.join("a.txt")).unwrap(), b"local-newer");
        assert_eq!(fs::read(dest.join("b.txt")).unwrap(), b"local-same");
    }

    #[test]
    fn test_always_overwrite_replaces_newer_file() {
        let dir = tempfile::tempdir().unwrap();
        let exe = packed_host(dir.path(), &[("a.txt", b"archived")], T0);

        let dest = dir.path().join("out");
        write_file(&dest.join("a.txt"), b"local", T1);
        write_file(&dest.join("stray.txt"), b"stray", T1);

        extract_from(&exe, &dest, ExtractPolicy::AlwaysOverwrite, None).unwrap();
        assert_eq!(fs::read(dest.join("a.txt")).unwrap(), b"archived");
        // merge policies never delete
        assert!(dest.join("stray.txt").exists());
    }

    #[test]
    fn test_verbatim_removes_stray_files() {
        let dir = tempfile::tempdir().unwrap();
        let exe = packed_host(dir.path(), &[("a.txt", b"archived")], T0);

        let dest = dir.path().join("out");
        write_file(&dest.join("stray.txt"), b"stray", T1);
        write_file(&dest.join("sub/also-stray"), b"stray", T1);

        let info = extract_from(&exe, &dest, ExtractPolicy::Verbatim, None).unwrap();
        assert_eq!(info.written, 1);
        assert!(!dest.join("stray.txt").exists());
        assert!(!dest.join("sub").exists());
        assert_eq!(fs::read(dest.join("a.txt")).unwrap(), b"archived");
        assert_eq!(
            fs::metadata(dest.join("a.txt")).unwrap().modified().unwrap(),
            at(T0)
        );
    }

    #[test]
    fn test_filter_excludes_paths_under_every_policy() {
        let dir = tempfile::tempdir().unwrap();
        let exe = packed_host(
            dir.path(),
            &[("keep.txt", b"k"), ("logs/skip.log", b"s"), ("skip.log", b"s")],
            T1,
        );
        let no_logs: ExtractFilter<'_> = &|name: &str| !name.ends_with(".log");

        for (i, policy) in [
            ExtractPolicy::NoOverwrite,
            ExtractPolicy::OverwriteIfNewer,
            ExtractPolicy::AlwaysOverwrite,
            ExtractPolicy::Verbatim,
        ]
        .into_iter()
        .enumerate()
        {
            let dest = dir.path().join(format!("out-{i}"));
            let info = extract_from(&exe, &dest, policy, Some(no_logs)).unwrap();
            assert_eq!(info.filtered, 2, "{policy}");
            assert!(dest.join("keep.txt").exists(), "{policy}");
            assert!(!dest.join("skip.log").exists(), "{policy}");
            assert!(!dest.join("logs/skip.log").exists(), "{policy}");
        }
    }

    #[test]
    fn test_stale_staging_directory_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let exe = packed_host(dir.path(), &[("a.txt", b"a")], T0);

        let dest = dir.path().join("out");
        write_file(&tmp_path_for(&dest).join("leftover.txt"), b"old run", T0);

        extract_from(&exe, &dest, ExtractPolicy::NoOverwrite, None).unwrap();
        assert!(!dest.join("leftover.txt").exists());
        assert!(!tmp_path_for(&dest).exists());
    }

    #[test]
    fn test_plain_executable_is_missing_payload() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("plain");
        fs::write(&exe, b"just a plain host binary").unwrap();

        let dest = dir.path().join("out");
        let result = extract_from(&exe, &dest, ExtractPolicy::AlwaysOverwrite, None);
        assert!(matches!(result, Err(PackError::MissingPayload(_))));
        assert!(!dest.exists());
        assert!(!has_payload(&exe).unwrap());
    }

    #[test]
    fn test_garbage_payload_is_decode_failure() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("garbage");
        let mut data = b"host".to_vec();
        data.extend_from_slice(b"not zstd at all!");
        write_footer(&mut data, 16).unwrap();
        fs::write(&exe, &data).unwrap();

        let result = extract_from(&exe, dir.path().join("out"), ExtractPolicy::Verbatim, None);
        assert!(matches!(result, Err(PackError::ArchiveDecode(_))));
    }

    #[test]
    fn test_entry_escaping_destination_is_rejected() {
        let dir = tempfile::tempdir().unwrap();

        let mut payload = Vec::new();
        {
            let encoder = zstd::stream::Encoder::new(&mut payload, 1).unwrap();
            let mut builder = tar::Builder::new(encoder);
            let mut header = tar::Header::new_gnu();
            let name = b"../evil.txt";
            header.as_gnu_mut().unwrap().name[..name.len()].copy_from_slice(name);
            header.set_entry_type(tar::EntryType::Regular);
            header.set_size(4);
            header.set_mode(0o600);
            header.set_cksum();
            builder.append(&header, &b"evil"[..]).unwrap();
            builder.into_inner().unwrap().finish().unwrap();
        }

        let exe = dir.path().join("app");
        let mut data = b"host".to_vec();
        data.extend_from_slice(&payload);
        write_footer(&mut data, payload.len() as u32).unwrap();
        fs::write(&exe, &data).unwrap();

        let dest = dir.path().join("out");
        let result = extract_from(&exe, &dest, ExtractPolicy::Verbatim, None);
        assert!(matches!(result, Err(PackError::UnsafeEntryPath(_))));
        assert!(!dir.path().join("evil.txt").exists());
    }

    #[test]
    fn test_safe_relative_path() {
        assert_eq!(
            safe_relative_path("a/./b.txt").unwrap(),
            Path::new("a").join("b.txt")
        );
        assert!(safe_relative_path("/etc/passwd").is_err());
        assert!(safe_relative_path("a/../../b").is_err());
        assert!(safe_relative_path("").is_err());
    }

    #[test]
    fn test_list_entries_reports_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let exe = packed_host(dir.path(), &[("a.txt", b"alpha"), ("sub/b", b"bb")], T1);

        assert!(has_payload(&exe).unwrap());
        let entries = list_entries(&exe).unwrap();
        assert_eq!(
            entries,
            vec![
                EntryInfo {
                    path: "a.txt".to_string(),
                    size: 5,
                    mode: 0o600,
                    modified: at(T1),
                },
                EntryInfo {
                    path: "sub/b".to_string(),
                    size: 2,
                    mode: 0o600,
                    modified: at(T1),
                },
            ]
        );
    }

    #[test]
    fn test_repack_then_extract_sees_only_latest_payload() {
        let dir = tempfile::tempdir().unwrap();
        let exe = packed_host(dir.path(), &[("first.txt", b"1")], T0);

        let second = dir.path().join("second");
        write_file(&second.join("second.txt"), b"2", T1);
        Packer::new(&second).pack(&exe).unwrap();

        let dest = dir.path().join("out");
        extract_from(&exe, &dest, ExtractPolicy::Verbatim, None).unwrap();
        assert!(!dest.join("first.txt").exists());
        assert_eq!(fs::read(dest.join("second.txt")).unwrap(), b"2");
    }
}
