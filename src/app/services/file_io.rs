//! Reading and writing plain-text files.
//!
//! Files are decoded as UTF-8 (with or without BOM) and fall back to the
//! Windows "ANSI" code page (1252). The editor buffer always holds
//! `\n`-separated text; the original encoding and line ending are kept on the
//! document so saving an unmodified file reproduces it byte for byte.

use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::app::infrastructure::error::{AppError, Result};

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Windows-1252 bytes 0x80..=0x9F. The five bytes the code page leaves
/// undefined map to the C1 control with the same value, so every byte
/// sequence decodes and re-encodes unchanged.
const CP1252_HIGH: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
    '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Utf8Bom,
    Windows1252,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        }
    }

    /// Line ending for new documents
    pub fn native() -> Self {
        if cfg!(windows) {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        }
    }

    /// Convert `\n`-separated buffer text to this line ending.
    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self {
            LineEnding::Lf => Cow::Borrowed(text),
            LineEnding::CrLf => Cow::Owned(text.replace('\n', "\r\n")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedText {
    /// `\n`-separated content
    pub text: String,
    pub encoding: TextEncoding,
    pub line_ending: LineEnding,
}

/// Decode raw file bytes. Returns `None` for binary content.
pub fn decode(bytes: &[u8]) -> Option<(String, TextEncoding)> {
    if bytes.contains(&0) {
        return None;
    }

    if let Some(rest) = bytes.strip_prefix(&UTF8_BOM) {
        if let Ok(text) = std::str::from_utf8(rest) {
            return Some((text.to_string(), TextEncoding::Utf8Bom));
        }
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => Some((text.to_string(), TextEncoding::Utf8)),
        Err(_) => Some((decode_cp1252(bytes), TextEncoding::Windows1252)),
    }
}

fn decode_cp1252(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            0x80..=0x9F => CP1252_HIGH[(b - 0x80) as usize],
            _ => b as char,
        })
        .collect()
}

fn encode_cp1252(text: &str) -> Option<Vec<u8>> {
    text.chars()
        .map(|c| match c as u32 {
            0x00..=0x7F | 0xA0..=0xFF => Some(c as u8),
            _ => CP1252_HIGH
                .iter()
                .position(|&high| high == c)
                .map(|i| 0x80 + i as u8),
        })
        .collect()
}

/// Encode text for disk. Text that Windows-1252 cannot represent is written
/// as UTF-8 instead; the returned encoding is the one actually used.
pub fn encode(text: &str, encoding: TextEncoding) -> (Vec<u8>, TextEncoding) {
    match encoding {
        TextEncoding::Utf8 => (text.as_bytes().to_vec(), TextEncoding::Utf8),
        TextEncoding::Utf8Bom => {
            let mut bytes = Vec::with_capacity(text.len() + UTF8_BOM.len());
            bytes.extend_from_slice(&UTF8_BOM);
            bytes.extend_from_slice(text.as_bytes());
            (bytes, TextEncoding::Utf8Bom)
        }
        TextEncoding::Windows1252 => match encode_cp1252(text) {
            Some(bytes) => (bytes, TextEncoding::Windows1252),
            None => {
                tracing::warn!("Text no longer fits Windows-1252, saving as UTF-8");
                (text.as_bytes().to_vec(), TextEncoding::Utf8)
            }
        },
    }
}

/// Read a file as plain text for the editor.
pub fn read_text_file(path: &Path) -> Result<LoadedText> {
    let read_error = |source: io::Error| AppError::Read {
        path: path.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(path).map_err(read_error)?;
    if metadata.is_dir() {
        return Err(read_error(io::Error::new(
            io::ErrorKind::IsADirectory,
            "is a directory",
        )));
    }

    let bytes = fs::read(path).map_err(read_error)?;
    let (raw, encoding) = decode(&bytes).ok_or_else(|| AppError::NotText(path.to_path_buf()))?;

    let line_ending = LineEnding::detect(&raw);
    let text = match line_ending {
        LineEnding::CrLf => raw.replace("\r\n", "\n"),
        LineEnding::Lf => raw,
    };

    tracing::debug!(path = %path.display(), ?encoding, ?line_ending, "loaded file");
    Ok(LoadedText {
        text,
        encoding,
        line_ending,
    })
}

/// Write buffer text back to disk in the document's format.
///
/// A symlink is followed so the file it points at gets the content. The
/// content goes to a temporary sibling file carrying the original's
/// permissions and is renamed over the target, so a failed write never
/// truncates the original. Files with other hard links are rewritten in
/// place instead, since a rename would detach them.
pub fn write_text_file(
    path: &Path,
    text: &str,
    encoding: TextEncoding,
    line_ending: LineEnding,
) -> Result<TextEncoding> {
    let write_error = |source: io::Error| AppError::Write {
        path: path.to_path_buf(),
        source,
    };

    let (bytes, used) = encode(&line_ending.apply(text), encoding);

    let target = resolve_link(path);
    let existing = fs::metadata(&target).ok();

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }

    if existing.as_ref().is_some_and(has_other_links) {
        fs::write(&target, &bytes).map_err(write_error)?;
    } else {
        let temp_path = temp_path_for(&target);
        fs::write(&temp_path, &bytes).map_err(write_error)?;
        if let Some(metadata) = &existing {
            if let Err(e) = fs::set_permissions(&temp_path, metadata.permissions()) {
                tracing::debug!("Could not copy permissions to {}: {}", temp_path.display(), e);
            }
        }
        if let Err(e) = fs::rename(&temp_path, &target) {
            let _ = fs::remove_file(&temp_path);
            return Err(write_error(e));
        }
    }

    tracing::debug!(path = %target.display(), bytes = bytes.len(), "saved file");
    Ok(used)
}

/// The file a symlink points at; any other path unchanged.
fn resolve_link(path: &Path) -> PathBuf {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => fs::canonicalize(path).unwrap_or_else(|e| {
            tracing::debug!("Cannot resolve link {}: {}", path.display(), e);
            path.to_path_buf()
        }),
        _ => path.to_path_buf(),
    }
}

#[cfg(unix)]
fn has_other_links(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    metadata.nlink() > 1
}

#[cfg(not(unix))]
fn has_other_links(_metadata: &fs::Metadata) -> bool {
    false
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_decode_utf8() {
        let (text, enc) = decode("héllo".as_bytes()).unwrap();
        assert_eq!(text, "héllo");
        assert_eq!(enc, TextEncoding::Utf8);
    }

    #[test]
    fn test_decode_bom() {
        let (text, enc) = decode(b"\xEF\xBB\xBFabc").unwrap();
        assert_eq!(text, "abc");
        assert_eq!(enc, TextEncoding::Utf8Bom);
    }

    #[test]
    fn test_decode_ansi_fallback() {
        // "café €5" in Windows-1252
        let (text, enc) = decode(b"caf\xE9 \x805").unwrap();
        assert_eq!(text, "café €5");
        assert_eq!(enc, TextEncoding::Windows1252);
    }

    #[test]
    fn test_decode_rejects_binary() {
        assert!(decode(b"PNG\x00\x01\x02").is_none());
    }

    #[test]
    fn test_cp1252_is_reversible_for_every_byte() {
        let bytes: Vec<u8> = (1..=255u8).collect();
        let text = decode_cp1252(&bytes);
        assert_eq!(encode_cp1252(&text).unwrap(), bytes);
    }

    #[test]
    fn test_encode_falls_back_to_utf8() {
        let (bytes, used) = encode("日本", TextEncoding::Windows1252);
        assert_eq!(used, TextEncoding::Utf8);
        assert_eq!(bytes, "日本".as_bytes());
    }

    #[test]
    fn test_line_ending_detection() {
        assert_eq!(LineEnding::detect("a\r\nb"), LineEnding::CrLf);
        assert_eq!(LineEnding::detect("a\nb"), LineEnding::Lf);
        assert_eq!(LineEnding::detect(""), LineEnding::Lf);
        assert_eq!(LineEnding::CrLf.apply("a\nb\n"), "a\r\nb\r\n");
    }

    #[test]
    fn test_read_normalizes_crlf() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dos.txt");
        fs::write(&path, b"one\r\ntwo\r\n").unwrap();

        let loaded = read_text_file(&path).unwrap();
        assert_eq!(loaded.text, "one\ntwo\n");
        assert_eq!(loaded.line_ending, LineEnding::CrLf);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = read_text_file(&dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, AppError::Read { .. }));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_read_directory_fails() {
        let dir = TempDir::new().unwrap();
        let err = read_text_file(dir.path()).unwrap_err();
        assert!(err.to_string().contains("is a directory"));
    }

    #[test]
    fn test_read_binary_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blob.bin");
        fs::write(&path, [0u8, 159, 146, 150]).unwrap();
        assert!(matches!(read_text_file(&path), Err(AppError::NotText(_))));
    }

    #[test]
    fn test_open_save_round_trip_is_identical() {
        let dir = TempDir::new().unwrap();
        let samples: [&[u8]; 4] = [
            b"plain\nunix\n",
            b"windows\r\nlines\r\n",
            b"\xEF\xBB\xBFbom \xC3\xA9\n",
            b"ansi caf\xE9\r\n\x93quoted\x94",
        ];

        for (i, original) in samples.iter().enumerate() {
            let path = dir.path().join(format!("sample{}.txt", i));
            fs::write(&path, original).unwrap();

            let loaded = read_text_file(&path).unwrap();
            write_text_file(&path, &loaded.text, loaded.encoding, loaded.line_ending).unwrap();

            assert_eq!(&fs::read(&path).unwrap(), original, "sample {}", i);
        }
    }

    #[test]
    fn test_write_creates_parent_and_leaves_no_temp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("new.txt");

        let used = write_text_file(&path, "hi\n", TextEncoding::Utf8, LineEnding::Lf).unwrap();
        assert_eq!(used, TextEncoding::Utf8);
        assert_eq!(fs::read_to_string(&path).unwrap(), "hi\n");

        let leftovers = fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.sh");
        fs::write(&path, "echo hi\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

        let loaded = read_text_file(&path).unwrap();
        write_text_file(&path, "echo bye\n", loaded.encoding, loaded.line_ending).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o755);
        assert_eq!(fs::read_to_string(&path).unwrap(), "echo bye\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_save_through_symlink_updates_target() {
        let dir = TempDir::new().unwrap();
        let real = dir.path().join("real.txt");
        let link = dir.path().join("link.txt");
        fs::write(&real, "a\n").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        write_text_file(&link, "b\n", TextEncoding::Utf8, LineEnding::Lf).unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&real).unwrap(), "b\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_hard_links_together() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("first.txt");
        let second = dir.path().join("second.txt");
        fs::write(&first, "old\n").unwrap();
        fs::hard_link(&first, &second).unwrap();

        write_text_file(&first, "new\n", TextEncoding::Utf8, LineEnding::Lf).unwrap();

        assert_eq!(fs::read_to_string(&second).unwrap(), "new\n");
    }
}
