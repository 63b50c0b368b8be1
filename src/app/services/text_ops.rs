use std::path::{Path, PathBuf};

use crate::app::infrastructure::error::{AppError, Result};

/// Characters Windows refuses in a file name.
const FORBIDDEN_NAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Extension added by Save As when the user types a bare name.
pub const DEFAULT_EXTENSION: &str = "txt";

/// Extract filename from a file path
///
/// Returns the filename component of a path, or "Unknown" if it can't be extracted.
pub fn extract_filename(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty() && *s != ".")
        .map(|s| s.to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Reject empty names and names containing characters the filesystem forbids.
pub fn validate_file_name(name: &str) -> Result<()> {
    if name.trim().is_empty() || name.contains(FORBIDDEN_NAME_CHARS) {
        return Err(AppError::InvalidFileName(name.to_string()));
    }
    Ok(())
}

/// Append `.txt` to a path chosen without an extension.
///
/// Dotfiles such as `.gitignore` count as already named.
pub fn with_default_extension(path: PathBuf) -> PathBuf {
    let is_dotfile = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.len() > 1 && n.starts_with('.') && !n[1..].contains('.'));
    if path.extension().is_some() || is_dotfile {
        path
    } else {
        path.with_extension(DEFAULT_EXTENSION)
    }
}

/// Whether adding the default extension turned the chosen path into one
/// that already exists. The save dialog only checked the name as typed.
pub fn extension_hits_existing(chosen: &Path, final_path: &Path) -> bool {
    chosen != final_path && final_path.exists()
}

/// Status bar position from the number of lines above the cursor and the
/// text between the line start and the cursor: 1-based line, 0-based
/// column in characters.
pub fn line_col(lines_before: usize, line_prefix: &str) -> (usize, usize) {
    (lines_before + 1, line_prefix.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_filename_from_path() {
        assert_eq!(extract_filename(Path::new("/home/user/test.txt")), "test.txt");
        assert_eq!(extract_filename(Path::new("notes")), "notes");
        assert_eq!(extract_filename(Path::new("/")), "Unknown");
    }

    #[test]
    fn test_validate_file_name() {
        assert!(validate_file_name("todo.txt").is_ok());
        assert!(validate_file_name("my notes (1).md").is_ok());
        assert!(validate_file_name("").is_err());
        assert!(validate_file_name("   ").is_err());
        for bad in ["a/b", "a\\b", "c:d", "wh*t", "why?", "\"q\"", "<x>", "a|b"] {
            assert!(
                matches!(validate_file_name(bad), Err(AppError::InvalidFileName(_))),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_default_extension() {
        assert_eq!(
            with_default_extension(PathBuf::from("/tmp/notes")),
            PathBuf::from("/tmp/notes.txt")
        );
        assert_eq!(
            with_default_extension(PathBuf::from("/tmp/main.rs")),
            PathBuf::from("/tmp/main.rs")
        );
    }

    #[test]
    fn test_dotfiles_keep_their_name() {
        assert_eq!(
            with_default_extension(PathBuf::from("/repo/.gitignore")),
            PathBuf::from("/repo/.gitignore")
        );
        assert_eq!(
            with_default_extension(PathBuf::from("/home/u/.config.bak")),
            PathBuf::from("/home/u/.config.bak")
        );
    }

    #[test]
    fn test_extension_hits_existing() {
        let dir = tempfile::TempDir::new().unwrap();
        let typed = dir.path().join("notes");
        let extended = with_default_extension(typed.clone());
        assert!(!extension_hits_existing(&typed, &extended));

        std::fs::write(&extended, "keep me").unwrap();
        assert!(extension_hits_existing(&typed, &extended));
        // Name typed in full: the dialog already asked
        assert!(!extension_hits_existing(&extended, &extended));
    }

    #[test]
    fn test_line_col() {
        assert_eq!(line_col(0, ""), (1, 0));
        assert_eq!(line_col(1, "cd"), (2, 2));
        // é is two bytes but one column
        assert_eq!(line_col(1, "cdé"), (2, 3));
    }
}
