use fltk::{
    app::Sender,
    enums::Shortcut,
    menu::{MenuBar, MenuFlag},
    prelude::*,
};

use crate::app::domain::messages::{Message, WindowId};

pub const PIN_MENU_PATH: &str = "View/Always on Top";

pub fn build_menu(menu: &mut MenuBar, sender: &Sender<Message>, id: WindowId, pinned: bool) {
    let s = sender;

    // File
    menu.add("File/New", Shortcut::Ctrl | 'n', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileNew(id)) });
    menu.add("File/Open...", Shortcut::Ctrl | 'o', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileOpen(id)) });
    menu.add("File/Save", Shortcut::Ctrl | 's', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileSave(id)) });
    menu.add("File/Save As...", Shortcut::Ctrl | Shortcut::Shift | 's', MenuFlag::MenuDivider, { let s = *s; move |_| s.send(Message::FileSaveAs(id)) });
    menu.add("File/Settings...", Shortcut::Ctrl | 'w', MenuFlag::MenuDivider, { let s = *s; move |_| s.send(Message::OpenSettings(id)) });
    menu.add("File/Close", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::WindowClose(id)) });

    // View
    let pin_flag = if pinned { MenuFlag::Toggle | MenuFlag::Value } else { MenuFlag::Toggle };
    menu.add(PIN_MENU_PATH, Shortcut::Ctrl | 'q', pin_flag, { let s = *s; move |_| s.send(Message::TogglePin(id)) });
}

/// Sync a toggle item with state changed elsewhere (e.g. the status bar check button).
pub fn set_menu_checkbox(menu: &MenuBar, path: &str, checked: bool) {
    let idx = menu.find_index(path);
    if idx >= 0 {
        if let Some(mut item) = menu.at(idx) {
            if checked {
                item.set();
            } else {
                item.clear();
            }
        }
    }
}
