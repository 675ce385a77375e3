//! Footer codec for embedded payloads.
//!
//! The footer is the last 8 bytes of any file carrying a payload and is the
//! only index into it: the payload occupies the `payload_len` bytes that
//! immediately precede the footer.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};

use crate::{PackError, Result};

/// Magic bytes identifying an embedded payload.
pub const MAGIC: &[u8; 4] = b"GRES";

/// Footer size in bytes (fixed).
pub const FOOTER_SIZE: usize = 8;

/// Fixed-size footer at the end of a file that carries a payload.
///
/// Layout (8 bytes total):
/// ```text
/// Offset  Size  Field
/// 0       4     magic ("GRES")
/// 4       4     payload_len (u32 BE)
/// ```
///
/// Payloads of 4 GiB or more cannot be described; the packer refuses them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footer {
    /// Exact byte count of the payload preceding the footer.
    pub payload_len: u32,
}

impl Footer {
    /// Serialize footer to bytes.
    pub fn to_bytes(&self) -> [u8; FOOTER_SIZE] {
        let mut buf = [0u8; FOOTER_SIZE];
        buf[0..4].copy_from_slice(MAGIC);
        buf[4..8].copy_from_slice(&self.payload_len.to_be_bytes());
        buf
    }

    /// Deserialize footer from bytes.
    ///
    /// Returns `None` when the magic does not match, meaning the bytes are
    /// just the tail of a plain file.
    pub fn from_bytes(buf: &[u8; FOOTER_SIZE]) -> Option<Self> {
        if &buf[0..4] != MAGIC {
            return None;
        }
        Some(Self {
            payload_len: u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]),
        })
    }

    /// Total bytes occupied by payload plus footer.
    pub fn trailer_len(&self) -> u64 {
        self.payload_len as u64 + FOOTER_SIZE as u64
    }
}

/// Append a footer for a payload of `payload_len` bytes.
pub fn write_footer<W: Write>(writer: &mut W, payload_len: u32) -> Result<()> {
    writer.write_all(&Footer { payload_len }.to_bytes())?;
    Ok(())
}

/// Read the footer from the end of `file`.
///
/// `Ok(None)` means the file carries no payload. A file shorter than the
/// footer is [`PackError::Truncated`]; a footer that claims more bytes than
/// the file holds is [`PackError::CorruptFooter`].
pub fn read_footer(file: &mut File) -> Result<Option<Footer>> {
    let file_len = file.metadata()?.len();
    if file_len < FOOTER_SIZE as u64 {
        return Err(PackError::Truncated { len: file_len });
    }

    file.seek(SeekFrom::End(-(FOOTER_SIZE as i64)))?;
    let mut buf = [0u8; FOOTER_SIZE];
    file.read_exact(&mut buf)?;

    let Some(footer) = Footer::from_bytes(&buf) else {
        return Ok(None);
    };

    if footer.trailer_len() > file_len {
        return Err(PackError::CorruptFooter(format!(
            "payload length {} exceeds the {} bytes before the footer",
            footer.payload_len,
            file_len - FOOTER_SIZE as u64
        )));
    }

    Ok(Some(footer))
}

/// Offset at which the payload described by `footer` starts.
pub fn payload_offset(file_len: u64, footer: &Footer) -> u64 {
    file_len - footer.trailer_len()
}
