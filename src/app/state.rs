use std::path::{Path, PathBuf};

use fltk::{app::Sender, dialog, prelude::*, window::Window};

use super::controllers::windows::{EditorWindow, WindowManager};
use super::domain::document::{Document, UNTITLED};
use super::domain::messages::{Message, WindowId};
use super::domain::settings::EditorSettings;
use super::infrastructure::platform::{
    bring_to_front, set_always_on_top, set_titlebar_dark, set_window_opacity,
};
use super::services::file_io::{read_text_file, write_text_file};
use super::services::instance::InstanceChannel;
use super::services::text_ops::{
    extension_hits_existing, extract_filename, validate_file_name, with_default_extension,
    DEFAULT_EXTENSION,
};
use crate::ui::dialogs::settings_dialog::show_settings_dialog;
use crate::ui::file_dialogs::{native_open_dialog, native_save_dialog};
use crate::ui::main_window::build_editor_window;
use crate::ui::menu::{set_menu_checkbox, PIN_MENU_PATH};
use crate::ui::theme::apply_editor_settings;

/// Everything the dispatch loop in `main` acts on.
pub struct AppState {
    pub windows: WindowManager,
    pub settings: EditorSettings,
    pub sender: Sender<Message>,
    /// Present while this process is the primary instance.
    pub instance: Option<InstanceChannel>,
}

impl AppState {
    pub fn new(
        settings: EditorSettings,
        sender: Sender<Message>,
        instance: Option<InstanceChannel>,
    ) -> Self {
        Self {
            windows: WindowManager::new(),
            settings,
            sender,
            instance,
        }
    }

    // --- Windows ---

    fn open_window(&mut self, document: Document, text: &str) -> WindowId {
        let id = self.windows.next_window_id();
        let pinned = self.settings.always_on_top;
        let mut widgets = build_editor_window(id, &self.sender, pinned);

        // Fill before hooking the callback so loading does not count as an edit
        widgets.buffer.set_text(text);
        let changes = document.has_unsaved_changes.clone();
        let s = self.sender;
        widgets
            .buffer
            .add_modify_callback(move |_pos, inserted, deleted, _restyled, _deleted_text| {
                if inserted > 0 || deleted > 0 {
                    changes.set(true);
                    s.send(Message::BufferModified(id));
                }
            });

        apply_editor_settings(&mut widgets, &self.settings);
        widgets.window.show();
        set_window_opacity(&widgets.window, self.settings.opacity);
        set_titlebar_dark(&widgets.window, self.settings.background.is_dark());
        set_always_on_top(&widgets.window, pinned);
        if self.settings.maximized {
            widgets.window.maximize();
        }

        let mut window = EditorWindow {
            id,
            document,
            widgets,
            pinned,
        };
        window.refresh_title();
        window.refresh_cursor();
        let _ = window.widgets.editor.take_focus();
        bring_to_front(&mut window.widgets.window);
        self.windows.add(window);

        tracing::debug!(window = id.0, open = self.windows.count(), "window opened");
        id
    }

    pub fn new_untitled_window(&mut self) -> WindowId {
        self.open_window(Document::new_untitled(), "")
    }

    /// Open every path, each in its own window. Returns how many opened.
    pub fn open_paths(&mut self, paths: &[PathBuf]) -> usize {
        paths
            .iter()
            .filter(|path| self.open_path(path, None))
            .count()
    }

    /// Show `path` in a window.
    ///
    /// A file already open elsewhere is brought to the front. `target` is
    /// reused when it still holds an empty untitled document.
    pub fn open_path(&mut self, path: &Path, target: Option<WindowId>) -> bool {
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

        if let Some(existing) = self.windows.find_by_path(&path) {
            if let Some(w) = self.windows.get_mut(existing) {
                bring_to_front(&mut w.widgets.window);
            }
            return true;
        }

        let loaded = match read_text_file(&path) {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!("{}", e);
                dialog::alert_default(&e.to_string());
                return false;
            }
        };
        tracing::info!(
            path = %path.display(),
            encoding = ?loaded.encoding,
            line_ending = ?loaded.line_ending,
            "opened file"
        );

        let reusable = target
            .and_then(|id| self.windows.get_mut(id))
            .filter(|w| w.is_pristine());
        if let Some(w) = reusable {
            w.widgets.buffer.set_text(&loaded.text);
            w.document.load(path, &loaded);
            w.widgets.editor.set_insert_position(0);
            w.refresh_title();
            w.refresh_cursor();
            return true;
        }

        self.open_window(Document::from_file(path, &loaded), &loaded.text);
        true
    }

    /// Keep at least one window on screen.
    pub fn ensure_window(&mut self) {
        if self.windows.is_empty() {
            self.new_untitled_window();
        }
    }

    /// Close one window, asking to save first if needed.
    /// Returns true when no windows remain and the app should exit.
    pub fn close_window(&mut self, id: WindowId) -> bool {
        let (needs_prompt, name) = match self.windows.get(id) {
            Some(w) => (
                w.document.needs_save_prompt(w.is_empty()),
                w.document.display_name.clone(),
            ),
            None => return self.windows.is_empty(),
        };

        if needs_prompt {
            let choice = dialog::choice2_default(
                &format!("Save changes to \"{}\"?", name),
                "Save",
                "Don't Save",
                "Cancel",
            );
            match choice {
                Some(0) => {
                    if !self.file_save(id) {
                        return false;
                    }
                }
                Some(1) => {}
                _ => return false,
            }
        }

        if let Some(mut closed) = self.windows.remove(id) {
            let maximized = closed.widgets.window.maximize_active();
            if maximized != self.settings.maximized {
                self.settings.maximized = maximized;
                self.persist_settings();
            }
            closed.widgets.window.hide();
            Window::delete(closed.widgets.window);
            tracing::debug!(window = id.0, open = self.windows.count(), "window closed");
        }

        self.windows.is_empty()
    }

    // --- File operations ---

    pub fn file_new(&mut self) {
        self.new_untitled_window();
    }

    pub fn file_open(&mut self, id: WindowId) {
        let directory = self.windows.get(id).and_then(|w| w.document.directory());
        if let Some(path) = native_open_dialog(directory.as_deref()) {
            self.open_path(&path, Some(id));
        }
    }

    /// Returns true when the document ends up saved.
    pub fn file_save(&mut self, id: WindowId) -> bool {
        let (dirty, path) = match self.windows.get(id) {
            Some(w) => (w.document.is_dirty(), w.document.file_path.clone()),
            None => return false,
        };
        if !dirty {
            return true;
        }
        match path {
            Some(path) => self.write_document(id, &path),
            None => self.file_save_as(id),
        }
    }

    /// Returns true when the document was written to a newly chosen path.
    pub fn file_save_as(&mut self, id: WindowId) -> bool {
        let (directory, preset) = match self.windows.get(id) {
            Some(w) => {
                let directory = self
                    .settings
                    .save_directory()
                    .map(Path::to_path_buf)
                    .or_else(|| w.document.directory());
                let preset = if w.document.is_untitled() {
                    format!("{}.{}", UNTITLED, DEFAULT_EXTENSION)
                } else {
                    w.document.display_name.clone()
                };
                (directory, preset)
            }
            None => return false,
        };

        let Some(chosen) = native_save_dialog(directory.as_deref(), &preset) else {
            return false;
        };
        if let Err(e) = validate_file_name(&extract_filename(&chosen)) {
            dialog::alert_default(&e.to_string());
            return false;
        }
        let path = with_default_extension(chosen.clone());
        if extension_hits_existing(&chosen, &path) {
            let choice = dialog::choice2_default(
                &format!("\"{}\" already exists. Replace it?", extract_filename(&path)),
                "Cancel",
                "Replace",
                "",
            );
            if choice != Some(1) {
                return false;
            }
        }

        if !self.write_document(id, &path) {
            return false;
        }
        if let Some(w) = self.windows.get_mut(id) {
            w.document.bind_path(path.clone());
            w.refresh_title();
        }

        self.settings.last_save_directory = path.parent().map(Path::to_path_buf);
        self.persist_settings();
        true
    }

    fn write_document(&mut self, id: WindowId, path: &Path) -> bool {
        let Some(w) = self.windows.get_mut(id) else {
            return false;
        };
        let text = w.text();
        match write_text_file(path, &text, w.document.encoding, w.document.line_ending) {
            Ok(encoding) => {
                if encoding != w.document.encoding {
                    tracing::info!(
                        path = %path.display(),
                        from = ?w.document.encoding,
                        to = ?encoding,
                        "text does not fit the original encoding"
                    );
                    w.document.encoding = encoding;
                }
                w.document.mark_clean();
                w.refresh_title();
                tracing::info!(path = %path.display(), bytes = text.len(), "saved file");
                true
            }
            Err(e) => {
                tracing::error!("{}", e);
                dialog::alert_default(&e.to_string());
                false
            }
        }
    }

    // --- Settings & window chrome ---

    pub fn open_settings(&mut self, id: WindowId) {
        let Some(parent) = self.windows.get(id).map(|w| w.widgets.window.clone()) else {
            return;
        };
        if let Some(new_settings) = show_settings_dialog(&self.settings, &parent) {
            self.settings = new_settings;
            if let Err(e) = self.settings.save() {
                dialog::alert_default(&format!("Failed to save settings: {}", e));
            }
            self.apply_settings();
        }
    }

    /// Push the current settings to every open window.
    pub fn apply_settings(&mut self) {
        for w in self.windows.iter_mut() {
            apply_editor_settings(&mut w.widgets, &self.settings);
        }
    }

    pub fn toggle_pin(&mut self, id: WindowId) {
        let Some(w) = self.windows.get_mut(id) else {
            return;
        };
        w.pinned = !w.pinned;
        set_always_on_top(&w.widgets.window, w.pinned);
        w.widgets.pin_toggle.set_value(w.pinned);
        set_menu_checkbox(&w.widgets.menu, PIN_MENU_PATH, w.pinned);

        let pinned = w.pinned;
        tracing::debug!(window = id.0, pinned, "toggled always on top");
        self.settings.always_on_top = pinned;
        self.persist_settings();
    }

    fn persist_settings(&self) {
        if let Err(e) = self.settings.save() {
            tracing::warn!("Failed to save settings: {}", e);
        }
    }

    // --- Editor feedback ---

    pub fn on_buffer_modified(&mut self, id: WindowId) {
        if let Some(w) = self.windows.get_mut(id) {
            w.refresh_title();
            w.refresh_cursor();
        }
    }

    pub fn on_cursor_moved(&mut self, id: WindowId) {
        if let Some(w) = self.windows.get_mut(id) {
            w.refresh_cursor();
        }
    }

    // --- Single instance ---

    /// Open whatever other launches forwarded.
    pub fn poll_instance_queue(&mut self) {
        let Some(instance) = self.instance.as_ref() else {
            return;
        };
        let requests = match instance.drain() {
            Ok(requests) => requests,
            Err(e) => {
                tracing::warn!("Failed to read hand-off queue: {}", e);
                return;
            }
        };

        for request in requests {
            tracing::info!(files = request.paths.len(), "received hand-off");
            if request.paths.is_empty() {
                self.new_untitled_window();
            } else if self.open_paths(&request.paths) == 0 {
                self.ensure_window();
            }
        }
    }

    pub fn shutdown(&mut self) {
        if let Some(instance) = self.instance.take() {
            instance.release();
        }
    }
}
