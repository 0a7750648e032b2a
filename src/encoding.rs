//! Text encoding detection for LTSpice output files
//!
//! LTSpice writes its files in a mix of encodings depending on platform and
//! version: UTF-8, UTF-16LE (with or without BOM) and Windows-1252. Every
//! file is sniffed once before reading, and any file this tool writes reuses
//! the encoding detected on its input.

use std::fs;
use std::path::Path;

use encoding_rs::{UTF_8, UTF_16BE, UTF_16LE, WINDOWS_1252};
use tracing::debug;

use crate::error::{LtstepsError, Result};

/// Encodings this tool can read and write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
    Windows1252,
}

impl FileEncoding {
    /// Decode a whole file's bytes, stripping any BOM
    pub fn decode(self, bytes: &[u8]) -> String {
        let encoding = match self {
            FileEncoding::Utf8 => UTF_8,
            FileEncoding::Utf16Le => UTF_16LE,
            FileEncoding::Utf16Be => UTF_16BE,
            FileEncoding::Windows1252 => WINDOWS_1252,
        };
        // Lossy decode: a stray undecodable byte must not abort the parse
        let (text, _, _) = encoding.decode(bytes);
        text.into_owned()
    }

    /// Encode output text in this encoding
    ///
    /// UTF-16 output starts with a BOM when `with_bom` is set, which callers
    /// request when writing a file from the start rather than appending.
    pub fn encode(self, text: &str, with_bom: bool) -> Vec<u8> {
        match self {
            FileEncoding::Utf8 => text.as_bytes().to_vec(),
            FileEncoding::Windows1252 => WINDOWS_1252.encode(text).0.into_owned(),
            FileEncoding::Utf16Le => {
                let mut bytes = Vec::with_capacity(text.len() * 2 + 2);
                if with_bom {
                    bytes.extend_from_slice(&[0xFF, 0xFE]);
                }
                for unit in text.encode_utf16() {
                    bytes.extend_from_slice(&unit.to_le_bytes());
                }
                bytes
            }
            FileEncoding::Utf16Be => {
                let mut bytes = Vec::with_capacity(text.len() * 2 + 2);
                if with_bom {
                    bytes.extend_from_slice(&[0xFE, 0xFF]);
                }
                for unit in text.encode_utf16() {
                    bytes.extend_from_slice(&unit.to_be_bytes());
                }
                bytes
            }
        }
    }
}

/// Detect the encoding of an input file
///
/// Detection is BOM-first. Without a BOM, a caller-provided marker (the text
/// a well-formed file is known to start with, e.g. `Circuit:` for log files)
/// distinguishes BOM-less UTF-16LE from 8-bit text. Files that are neither
/// are taken as UTF-8 when they decode strictly, Windows-1252 otherwise.
pub fn detect_encoding(path: &Path, marker: Option<&str>) -> Result<FileEncoding> {
    let bytes = fs::read(path)?;
    let encoding = sniff_bytes(&bytes, marker).ok_or_else(|| {
        LtstepsError::encoding(path, "file starts with an unrecognizable byte sequence")
    })?;
    debug!("Detected {:?} for {}", encoding, path.display());
    Ok(encoding)
}

/// Read a whole input file through its detected encoding
pub fn read_to_string(path: &Path, encoding: FileEncoding) -> Result<String> {
    let bytes = fs::read(path)?;
    Ok(encoding.decode(&bytes))
}

fn sniff_bytes(bytes: &[u8], marker: Option<&str>) -> Option<FileEncoding> {
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return Some(FileEncoding::Utf8);
    }
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Some(FileEncoding::Utf16Le);
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Some(FileEncoding::Utf16Be);
    }

    if let Some(marker) = marker {
        // A BOM-less UTF-16LE file interleaves the marker's ASCII bytes
        // with NULs
        let interleaved: Vec<u8> = marker.bytes().flat_map(|b| [b, 0x00]).collect();
        if bytes.starts_with(&interleaved) {
            return Some(FileEncoding::Utf16Le);
        }
        if bytes.starts_with(marker.as_bytes()) {
            return sniff_eight_bit(bytes);
        }
        // Marker missing entirely: fall through to the generic heuristics
        // rather than rejecting the file
    }

    if looks_like_utf16le(bytes) {
        return Some(FileEncoding::Utf16Le);
    }
    sniff_eight_bit(bytes)
}

fn sniff_eight_bit(bytes: &[u8]) -> Option<FileEncoding> {
    if std::str::from_utf8(bytes).is_ok() {
        Some(FileEncoding::Utf8)
    } else {
        Some(FileEncoding::Windows1252)
    }
}

/// ASCII-heavy UTF-16LE text has a NUL in every odd position of its first
/// bytes
fn looks_like_utf16le(bytes: &[u8]) -> bool {
    let sample = &bytes[..bytes.len().min(64)];
    if sample.len() < 4 {
        return false;
    }
    sample
        .chunks_exact(2)
        .all(|pair| pair[1] == 0x00 && pair[0] != 0x00)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(bytes: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_detect_utf8_plain() {
        let file = write_temp(b"Circuit: * test\n.step Ton=1\n");
        let enc = detect_encoding(file.path(), Some("Circuit:")).unwrap();
        assert_eq!(enc, FileEncoding::Utf8);
    }

    #[test]
    fn test_detect_utf8_bom() {
        let file = write_temp(b"\xEF\xBB\xBFCircuit: * test\n");
        let enc = detect_encoding(file.path(), Some("Circuit:")).unwrap();
        assert_eq!(enc, FileEncoding::Utf8);
    }

    #[test]
    fn test_detect_utf16le_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "Circuit: * test\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let file = write_temp(&bytes);
        let enc = detect_encoding(file.path(), Some("Circuit:")).unwrap();
        assert_eq!(enc, FileEncoding::Utf16Le);

        let text = read_to_string(file.path(), enc).unwrap();
        assert_eq!(text, "Circuit: * test\n");
    }

    #[test]
    fn test_detect_utf16le_bomless_by_marker() {
        let bytes: Vec<u8> = "Circuit: x\n".bytes().flat_map(|b| [b, 0x00]).collect();
        let file = write_temp(&bytes);
        let enc = detect_encoding(file.path(), Some("Circuit:")).unwrap();
        assert_eq!(enc, FileEncoding::Utf16Le);
    }

    #[test]
    fn test_detect_windows_1252() {
        // 0xB0 is the degree sign in Windows-1252 and invalid UTF-8
        let file = write_temp(b"vout: v(out)=1 at 0.001 \xB0\n");
        let enc = detect_encoding(file.path(), None).unwrap();
        assert_eq!(enc, FileEncoding::Windows1252);

        let text = read_to_string(file.path(), enc).unwrap();
        assert!(text.contains('°'));
    }

    #[test]
    fn test_encode_round_trip_utf16() {
        let text = "step\tTon\tgain\n1\t400m\t1.99\n";
        let bytes = FileEncoding::Utf16Le.encode(text, true);
        assert_eq!(&bytes[..2], &[0xFF, 0xFE]);
        assert_eq!(FileEncoding::Utf16Le.decode(&bytes), text);
    }
}
