use fltk::{
    app,
    enums::{Color, Font},
    prelude::*,
    text::WrapMode,
};

use crate::app::domain::settings::{EditorColor, EditorFont, EditorSettings};
use crate::app::infrastructure::platform::{set_titlebar_dark, set_window_opacity};

use super::main_window::EditorWidgets;

/// Chrome around the text area keeps the terminal look regardless of the
/// editor colours.
const CHROME_BG: (u8, u8, u8) = (0, 0, 0);
const CHROME_FG: (u8, u8, u8) = (255, 255, 255);
const CHROME_HOVER: (u8, u8, u8) = (48, 48, 48);
const STATUS_SIZE: i32 = 13;

pub fn to_fltk_color(color: EditorColor) -> Color {
    let (r, g, b) = color.to_rgb();
    Color::from_rgb(r, g, b)
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::from_rgb(r, g, b)
}

/// Find a font in FLTK's loaded font table.
///
/// Depending on the platform the table either lists `"Consolas Bold"` or
/// marks styles with a one-letter prefix (`" Consolas"`, `"BConsolas"`).
/// If no bold face exists the regular face is used.
pub fn pick_font_index(names: &[String], family: &str, bold: bool) -> Option<usize> {
    let face = |name: &str| -> Option<bool> {
        let name = name.trim_end();
        if let Some(base) = name.strip_suffix(" Bold").or_else(|| name.strip_suffix(" bold")) {
            return base.trim().eq_ignore_ascii_case(family).then_some(true);
        }
        if name.trim().eq_ignore_ascii_case(family) {
            return Some(false);
        }
        match name.strip_prefix('B') {
            Some(rest) if rest.eq_ignore_ascii_case(family) => Some(true),
            _ => None,
        }
    };

    names
        .iter()
        .position(|n| face(n) == Some(bold))
        .or_else(|| names.iter().position(|n| face(n) == Some(false)))
}

pub fn resolve_font(font: EditorFont, bold: bool) -> Font {
    match pick_font_index(&app::fonts(), font.family_name(), bold) {
        Some(idx) => Font::by_index(idx),
        None => {
            tracing::debug!("Font {} not installed, using Courier", font.family_name());
            if bold { Font::CourierBold } else { Font::Courier }
        }
    }
}

/// Apply colours, font, wrapping and tab width to one editor window.
/// Opacity and title bar colour need a native handle and are only applied
/// once the window is shown.
pub fn apply_editor_settings(widgets: &mut EditorWidgets, settings: &EditorSettings) {
    let bg = to_fltk_color(settings.background);
    let fg = to_fltk_color(settings.foreground);
    let font = resolve_font(settings.font, settings.bold);

    let editor = &mut widgets.editor;
    editor.set_color(bg);
    editor.set_text_color(fg);
    editor.set_cursor_color(fg);
    editor.set_selection_color(rgb(CHROME_HOVER).lighter());
    editor.set_text_font(font);
    editor.set_text_size(settings.font_size as i32);
    if settings.word_wrap {
        editor.wrap_mode(WrapMode::AtBounds, 0);
    } else {
        editor.wrap_mode(WrapMode::None, 0);
    }
    widgets.buffer.set_tab_distance(settings.tab_size as i32);

    widgets.window.set_color(bg);

    widgets.menu.set_color(rgb(CHROME_BG));
    widgets.menu.set_text_color(rgb(CHROME_FG));
    widgets.menu.set_selection_color(rgb(CHROME_HOVER));

    widgets.status_bar.set_color(rgb(CHROME_BG));
    widgets.cursor_label.set_label_color(rgb(CHROME_FG));
    widgets.cursor_label.set_label_size(STATUS_SIZE);
    widgets.pin_toggle.set_color(rgb(CHROME_BG));
    widgets.pin_toggle.set_label_color(Color::Yellow);
    widgets.pin_toggle.set_selection_color(Color::Green);
    widgets.pin_toggle.set_label_size(STATUS_SIZE);

    if widgets.window.shown() {
        set_window_opacity(&widgets.window, settings.opacity);
        set_titlebar_dark(&widgets.window, settings.background.is_dark());
    }

    widgets.window.redraw();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pick_regular_with_prefix_table() {
        let table = names(&[" Helvetica", "BHelvetica", " Consolas", "BConsolas", "IConsolas"]);
        assert_eq!(pick_font_index(&table, "Consolas", false), Some(2));
        assert_eq!(pick_font_index(&table, "Consolas", true), Some(3));
    }

    #[test]
    fn test_pick_with_suffix_table() {
        let table = names(&["Courier New", "Courier New Bold", "Lucida Console"]);
        assert_eq!(pick_font_index(&table, "courier new", true), Some(1));
        assert_eq!(pick_font_index(&table, "Courier New", false), Some(0));
    }

    #[test]
    fn test_bold_falls_back_to_regular() {
        let table = names(&["Lucida Console"]);
        assert_eq!(pick_font_index(&table, "Lucida Console", true), Some(0));
    }

    #[test]
    fn test_missing_font() {
        let table = names(&["Arial", "BArial"]);
        assert_eq!(pick_font_index(&table, "Consolas", false), None);
    }
}
