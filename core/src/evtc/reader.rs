//! Byte-stream access for evtc logs.
//!
//! `ByteCursor` is the little-endian cursor the record decoders consume.
//! `open_log_file` handles the on-disk entry points: a bare `.evtc` file
//! is memory mapped and copied out, a `.zevtc`/`.evtc.zip` wrapper must
//! contain exactly one archive entry.

use std::fs;
use std::io::Read;
use std::path::Path;

use memmap2::Mmap;

use super::error::EvtcError;

/// Little-endian cursor over a byte slice.
pub struct ByteCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, n: usize, what: &'static str) -> Result<&'a [u8], EvtcError> {
        if self.remaining() < n {
            return Err(EvtcError::Truncated {
                what,
                offset: self.pos,
            });
        }
        let out = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn u8(&mut self, what: &'static str) -> Result<u8, EvtcError> {
        Ok(self.take(1, what)?[0])
    }

    pub fn u16(&mut self, what: &'static str) -> Result<u16, EvtcError> {
        let b = self.take(2, what)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn u32(&mut self, what: &'static str) -> Result<u32, EvtcError> {
        let b = self.take(4, what)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn i32(&mut self, what: &'static str) -> Result<i32, EvtcError> {
        Ok(self.u32(what)? as i32)
    }

    pub fn u64(&mut self, what: &'static str) -> Result<u64, EvtcError> {
        let b = self.take(8, what)?;
        Ok(u64::from_le_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    pub fn i64(&mut self, what: &'static str) -> Result<i64, EvtcError> {
        Ok(self.u64(what)? as i64)
    }

    pub fn skip(&mut self, n: usize, what: &'static str) -> Result<(), EvtcError> {
        self.take(n, what).map(|_| ())
    }

    /// Fixed-width string field. When `nul_terminated` the string stops at
    /// the first NUL byte, otherwise only trailing NULs are stripped and
    /// interior NULs survive (player names embed account and subgroup
    /// separated by NUL).
    pub fn fixed_string(
        &mut self,
        len: usize,
        nul_terminated: bool,
        what: &'static str,
    ) -> Result<String, EvtcError> {
        let raw = self.take(len, what)?;
        let end = if nul_terminated {
            raw.iter().position(|&b| b == 0).unwrap_or(len)
        } else {
            raw.iter().rposition(|&b| b != 0).map_or(0, |p| p + 1)
        };
        Ok(String::from_utf8_lossy(&raw[..end]).into_owned())
    }
}

const SUPPORTED_SUFFIXES: &[&str] = &[".evtc", ".zevtc", ".evtc.zip"];

fn is_compressed(name: &str) -> bool {
    name.ends_with(".zevtc") || name.ends_with(".evtc.zip")
}

/// Open an on-disk log and return the raw evtc byte stream, unwrapping the
/// single-entry zip archive when the extension asks for it.
pub fn open_log_file(path: &Path) -> Result<Vec<u8>, EvtcError> {
    if !path.exists() {
        return Err(EvtcError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    if !SUPPORTED_SUFFIXES.iter().any(|s| name.ends_with(s)) {
        return Err(EvtcError::UnsupportedExtension {
            path: path.to_path_buf(),
        });
    }

    let file = fs::File::open(path).map_err(|source| EvtcError::OpenFile {
        path: path.to_path_buf(),
        source,
    })?;
    let mmap = unsafe {
        Mmap::map(&file).map_err(|source| EvtcError::MemoryMap {
            path: path.to_path_buf(),
            source,
        })?
    };

    if is_compressed(&name) {
        return unwrap_archive(&mmap);
    }
    Ok(mmap.to_vec())
}

fn unwrap_archive(bytes: &[u8]) -> Result<Vec<u8>, EvtcError> {
    let cursor = std::io::Cursor::new(bytes);
    let mut archive = zip::ZipArchive::new(cursor).map_err(|e| EvtcError::InvalidArchive {
        reason: e.to_string(),
    })?;
    if archive.len() != 1 {
        return Err(EvtcError::InvalidArchive {
            reason: format!("expected exactly one entry, found {}", archive.len()),
        });
    }
    let mut entry = archive.by_index(0).map_err(|e| EvtcError::InvalidArchive {
        reason: e.to_string(),
    })?;
    let mut out = Vec::with_capacity(entry.size() as usize);
    entry
        .read_to_end(&mut out)
        .map_err(|e| EvtcError::InvalidArchive {
            reason: e.to_string(),
        })?;
    Ok(out)
}
