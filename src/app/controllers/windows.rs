use std::path::Path;

use fltk::prelude::*;

use crate::app::domain::document::Document;
use crate::app::domain::messages::WindowId;
use crate::app::infrastructure::buffer::buffer_text;
use crate::app::services::text_ops::line_col;
use crate::ui::main_window::EditorWidgets;

/// One top-level editor window and the document it shows.
pub struct EditorWindow {
    pub id: WindowId,
    pub document: Document,
    pub widgets: EditorWidgets,
    pub pinned: bool,
}

impl EditorWindow {
    pub fn text(&self) -> String {
        buffer_text(&self.widgets.buffer)
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.buffer.length() == 0
    }

    /// An untitled window nobody has typed into yet; Open reuses it.
    pub fn is_pristine(&self) -> bool {
        self.document.is_untitled() && !self.document.is_dirty() && self.is_empty()
    }

    pub fn refresh_title(&mut self) {
        let title = self.document.window_title();
        if self.widgets.window.label() != title {
            self.widgets.window.set_label(&title);
        }
    }

    /// Only the current line is copied out of the buffer.
    pub fn refresh_cursor(&mut self) {
        let buffer = &self.widgets.buffer;
        let pos = self.widgets.editor.insert_position().clamp(0, buffer.length());
        let lines_before = buffer.count_lines(0, pos, false).max(0) as usize;
        let line_start = buffer.line_start(pos);
        let prefix = buffer.text_range(line_start, pos).unwrap_or_default();
        let (line, col) = line_col(lines_before, &prefix);
        self.widgets
            .cursor_label
            .set_label(&format!("Ln: {}  Col: {}", line, col));
    }
}

/// Owns every open editor window, in the order they were opened.
pub struct WindowManager {
    windows: Vec<EditorWindow>,
    next_id: u64,
}

impl WindowManager {
    pub fn new() -> Self {
        Self {
            windows: Vec::new(),
            next_id: 1,
        }
    }

    pub fn next_window_id(&mut self) -> WindowId {
        let id = WindowId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn add(&mut self, window: EditorWindow) {
        self.windows.push(window);
    }

    pub fn get(&self, id: WindowId) -> Option<&EditorWindow> {
        self.windows.iter().find(|w| w.id == id)
    }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut EditorWindow> {
        self.windows.iter_mut().find(|w| w.id == id)
    }

    pub fn remove(&mut self, id: WindowId) -> Option<EditorWindow> {
        let idx = self.windows.iter().position(|w| w.id == id)?;
        Some(self.windows.remove(idx))
    }

    pub fn find_by_path(&self, path: &Path) -> Option<WindowId> {
        self.windows
            .iter()
            .find(|w| w.document.is_at(path))
            .map(|w| w.id)
    }

    pub fn count(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut EditorWindow> {
        self.windows.iter_mut()
    }
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_ids_are_unique() {
        let mut manager = WindowManager::new();
        let a = manager.next_window_id();
        let b = manager.next_window_id();
        assert_ne!(a, b);
        assert_eq!(b, WindowId(2));
        assert!(manager.is_empty());
        assert_eq!(manager.count(), 0);
    }

    #[test]
    fn test_lookups_on_empty_manager() {
        let mut manager = WindowManager::default();
        assert!(manager.get(WindowId(1)).is_none());
        assert!(manager.get_mut(WindowId(1)).is_none());
        assert!(manager.remove(WindowId(1)).is_none());
        assert!(manager.find_by_path(Path::new("/tmp/a.txt")).is_none());
    }
}
