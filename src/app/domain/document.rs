use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::app::services::file_io::{LineEnding, LoadedText, TextEncoding};
use crate::app::services::text_ops::extract_filename;

pub const APP_NAME: &str = "Shard";
pub const UNTITLED: &str = "Untitled";

/// The text file shown in one editor window. The text itself lives in the
/// window's FLTK buffer; this holds everything needed to save it back.
pub struct Document {
    pub file_path: Option<PathBuf>,
    pub display_name: String,
    /// Shared with the buffer's modify callback
    pub has_unsaved_changes: Rc<Cell<bool>>,
    pub encoding: TextEncoding,
    pub line_ending: LineEnding,
}

impl Document {
    pub fn new_untitled() -> Self {
        Self {
            file_path: None,
            display_name: UNTITLED.to_string(),
            has_unsaved_changes: Rc::new(Cell::new(false)),
            encoding: TextEncoding::Utf8,
            line_ending: LineEnding::native(),
        }
    }

    pub fn from_file(path: PathBuf, loaded: &LoadedText) -> Self {
        Self {
            display_name: extract_filename(&path),
            file_path: Some(path),
            has_unsaved_changes: Rc::new(Cell::new(false)),
            encoding: loaded.encoding,
            line_ending: loaded.line_ending,
        }
    }

    /// Replace an empty untitled document with a freshly loaded file.
    pub fn load(&mut self, path: PathBuf, loaded: &LoadedText) {
        self.display_name = extract_filename(&path);
        self.file_path = Some(path);
        self.encoding = loaded.encoding;
        self.line_ending = loaded.line_ending;
        self.mark_clean();
    }

    pub fn is_dirty(&self) -> bool {
        self.has_unsaved_changes.get()
    }

    pub fn mark_dirty(&self) {
        self.has_unsaved_changes.set(true);
    }

    pub fn mark_clean(&self) {
        self.has_unsaved_changes.set(false);
    }

    pub fn is_untitled(&self) -> bool {
        self.file_path.is_none()
    }

    pub fn is_at(&self, path: &Path) -> bool {
        self.file_path.as_deref() == Some(path)
    }

    /// Rebind after Save As.
    pub fn bind_path(&mut self, path: PathBuf) {
        self.display_name = extract_filename(&path);
        self.file_path = Some(path);
    }

    /// Directory dialogs should start in: the file's folder, else the working directory.
    pub fn directory(&self) -> Option<PathBuf> {
        self.file_path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .or_else(|| std::env::current_dir().ok())
    }

    pub fn window_title(&self) -> String {
        let prefix = if self.is_dirty() { "*" } else { "" };
        format!("{}{} - {}", prefix, self.display_name, APP_NAME)
    }

    /// Whether closing should ask to save. An untitled document the user
    /// typed into and then cleared again is discarded silently.
    pub fn needs_save_prompt(&self, buffer_is_empty: bool) -> bool {
        self.is_dirty() && !(self.is_untitled() && buffer_is_empty)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new_untitled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(text: &str) -> LoadedText {
        LoadedText {
            text: text.to_string(),
            encoding: TextEncoding::Windows1252,
            line_ending: LineEnding::CrLf,
        }
    }

    #[test]
    fn test_untitled_title() {
        let doc = Document::new_untitled();
        assert_eq!(doc.window_title(), "Untitled - Shard");
        assert!(doc.is_untitled());
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_dirty_title_has_star() {
        let doc = Document::from_file(PathBuf::from("/tmp/notes.txt"), &loaded("hi"));
        assert_eq!(doc.window_title(), "notes.txt - Shard");
        doc.mark_dirty();
        assert_eq!(doc.window_title(), "*notes.txt - Shard");
        doc.mark_clean();
        assert_eq!(doc.window_title(), "notes.txt - Shard");
    }

    #[test]
    fn test_from_file_keeps_encoding() {
        let doc = Document::from_file(PathBuf::from("/tmp/old.txt"), &loaded("caf\u{e9}"));
        assert_eq!(doc.encoding, TextEncoding::Windows1252);
        assert_eq!(doc.line_ending, LineEnding::CrLf);
        assert!(doc.is_at(Path::new("/tmp/old.txt")));
    }

    #[test]
    fn test_dirty_flag_is_shared() {
        let doc = Document::new_untitled();
        let flag = doc.has_unsaved_changes.clone();
        flag.set(true);
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_load_into_untitled_clears_dirty() {
        let mut doc = Document::new_untitled();
        doc.mark_dirty();
        doc.load(PathBuf::from("/tmp/a.txt"), &loaded("x"));
        assert!(!doc.is_dirty());
        assert_eq!(doc.display_name, "a.txt");
        assert_eq!(doc.encoding, TextEncoding::Windows1252);
    }

    #[test]
    fn test_bind_path_renames() {
        let mut doc = Document::new_untitled();
        doc.bind_path(PathBuf::from("/home/user/todo.md"));
        assert_eq!(doc.display_name, "todo.md");
        assert!(!doc.is_untitled());
        assert_eq!(doc.directory(), Some(PathBuf::from("/home/user")));
    }

    #[test]
    fn test_save_prompt_rules() {
        let doc = Document::new_untitled();
        assert!(!doc.needs_save_prompt(true));

        doc.mark_dirty();
        assert!(!doc.needs_save_prompt(true));
        assert!(doc.needs_save_prompt(false));

        let titled = Document::from_file(PathBuf::from("/tmp/b.txt"), &loaded(""));
        titled.mark_dirty();
        assert!(titled.needs_save_prompt(true));
    }
}
