use fltk::{
    app::{self, Sender},
    button::CheckButton,
    enums::{Align, Event, FrameType},
    frame::Frame,
    group::{Flex, FlexType},
    menu::MenuBar,
    prelude::*,
    text::{TextBuffer, TextEditor},
    window::Window,
};

use crate::app::domain::messages::{Message, WindowId};

use super::menu::build_menu;

pub const DEFAULT_WIDTH: i32 = 500;
pub const DEFAULT_HEIGHT: i32 = 300;
pub const MIN_WIDTH: i32 = 430;
pub const MIN_HEIGHT: i32 = 100;

const MENU_HEIGHT: i32 = 28;
const STATUS_HEIGHT: i32 = 24;
const PIN_WIDTH: i32 = 150;

pub struct EditorWidgets {
    pub window: Window,
    pub menu: MenuBar,
    pub editor: TextEditor,
    pub buffer: TextBuffer,
    pub status_bar: Flex,
    pub cursor_label: Frame,
    pub pin_toggle: CheckButton,
}

/// Build one editor window: menu bar, text area, and a status bar with the
/// cursor position and the always-on-top toggle. The window is not shown.
pub fn build_editor_window(
    id: WindowId,
    sender: &Sender<Message>,
    pinned: bool,
) -> EditorWidgets {
    let mut window = Window::default()
        .with_size(DEFAULT_WIDTH, DEFAULT_HEIGHT)
        .center_screen();
    window.set_xclass("Shard");
    window.size_range(MIN_WIDTH, MIN_HEIGHT, 0, 0);

    let mut flex = Flex::default_fill();
    flex.set_type(FlexType::Column);

    let mut menu = MenuBar::default();
    flex.fixed(&menu, MENU_HEIGHT);
    build_menu(&mut menu, sender, id, pinned);

    let buffer = TextBuffer::default();
    let mut editor = TextEditor::default();
    editor.set_buffer(buffer.clone());
    editor.set_scrollbar_size(12);

    // Status bar
    let mut status_bar = Flex::default();
    status_bar.set_type(FlexType::Row);
    status_bar.set_frame(FrameType::FlatBox);
    status_bar.set_margins(8, 0, 8, 0);

    let mut cursor_label = Frame::default().with_label("Ln: 1  Col: 0");
    cursor_label.set_align(Align::Left | Align::Inside);

    let mut pin_toggle = CheckButton::default().with_label("always on top");
    pin_toggle.set_value(pinned);
    status_bar.fixed(&pin_toggle, PIN_WIDTH);
    status_bar.end();
    flex.fixed(&status_bar, STATUS_HEIGHT);

    flex.end();
    window.end();
    window.resizable(&flex);

    pin_toggle.set_callback({
        let s = *sender;
        move |_| s.send(Message::TogglePin(id))
    });

    editor.handle({
        let s = *sender;
        move |_, ev| {
            if matches!(ev, Event::KeyUp | Event::Released) {
                s.send(Message::CursorMoved(id));
            }
            false
        }
    });

    // Escape also fires the window callback; only the close button closes.
    window.set_callback({
        let s = *sender;
        move |_| {
            if app::event() == Event::Close {
                s.send(Message::WindowClose(id));
            }
        }
    });

    EditorWidgets {
        window,
        menu,
        editor,
        buffer,
        status_bar,
        cursor_label,
        pin_toggle,
    }
}
