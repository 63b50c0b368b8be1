use fltk::{
    button::{Button, CheckButton, ReturnButton},
    enums::{Align, Color, FrameType},
    frame::Frame,
    menu::Choice,
    prelude::*,
    valuator::HorValueSlider,
    window::Window,
};
use std::cell::RefCell;
use std::rc::Rc;

use crate::app::domain::settings::{
    EditorColor, EditorFont, EditorSettings, FONT_SIZES, MAX_OPACITY, MIN_OPACITY, TAB_SIZES,
};
use crate::app::infrastructure::platform::set_window_opacity;
use crate::ui::theme::{resolve_font, to_fltk_color};

const LABEL_X: i32 = 15;
const LABEL_W: i32 = 110;
const FIELD_X: i32 = 135;
const FIELD_W: i32 = 200;
const ROW_H: i32 = 25;

fn row_label(y: i32, text: &str) {
    Frame::default()
        .with_pos(LABEL_X, y)
        .with_size(LABEL_W, ROW_H)
        .with_label(text)
        .with_align(Align::Right | Align::Inside);
}

fn choice_row<T: ToString>(y: i32, label: &str, items: impl Iterator<Item = T>, selected: usize) -> Choice {
    row_label(y, label);
    let mut choice = Choice::default().with_pos(FIELD_X, y).with_size(FIELD_W, ROW_H);
    for item in items {
        choice.add_choice(&item.to_string());
    }
    choice.set_value(selected as i32);
    choice
}

fn position_of<T: PartialEq>(items: &[T], value: &T) -> usize {
    items.iter().position(|v| v == value).unwrap_or(0)
}

fn selected<T: Copy>(items: &[T], choice: &Choice, fallback: T) -> T {
    usize::try_from(choice.value())
        .ok()
        .and_then(|i| items.get(i).copied())
        .unwrap_or(fallback)
}

/// Show the settings dialog and return the new settings if the user saved.
///
/// Moving the opacity slider previews the value on `parent`; cancelling
/// restores the original opacity.
pub fn show_settings_dialog(current: &EditorSettings, parent: &Window) -> Option<EditorSettings> {
    let mut dialog = Window::default()
        .with_size(350, 395)
        .with_label("Shard Settings")
        .center_screen();
    dialog.make_modal(true);

    let mut sample = Frame::default()
        .with_pos(15, 15)
        .with_size(320, 50)
        .with_label("Shard Editor Settings")
        .with_align(Align::Left | Align::Inside);
    sample.set_frame(FrameType::FlatBox);

    let bg_choice = choice_row(
        80,
        "Background:",
        EditorColor::ALL.iter().map(|c| c.display_name()),
        position_of(&EditorColor::ALL, &current.background),
    );
    let fg_choice = choice_row(
        112,
        "Foreground:",
        EditorColor::ALL.iter().map(|c| c.display_name()),
        position_of(&EditorColor::ALL, &current.foreground),
    );
    let font_choice = choice_row(
        144,
        "Font:",
        EditorFont::ALL.iter().map(|f| f.family_name()),
        position_of(&EditorFont::ALL, &current.font),
    );
    let size_choice = choice_row(
        176,
        "Font Size:",
        FONT_SIZES.iter(),
        position_of(&FONT_SIZES, &current.font_size),
    );
    let tab_choice = choice_row(
        208,
        "Tab Size:",
        TAB_SIZES.iter(),
        position_of(&TAB_SIZES, &current.tab_size),
    );

    let mut bold_check = CheckButton::default()
        .with_pos(FIELD_X, 240)
        .with_size(95, ROW_H)
        .with_label("Bold Font");
    bold_check.set_value(current.bold);
    let mut wrap_check = CheckButton::default()
        .with_pos(FIELD_X + 100, 240)
        .with_size(100, ROW_H)
        .with_label("Wrap Text");
    wrap_check.set_value(current.word_wrap);

    row_label(272, "Opacity:");
    let mut opacity = HorValueSlider::default()
        .with_pos(FIELD_X, 272)
        .with_size(FIELD_W, ROW_H);
    opacity.set_bounds(MIN_OPACITY as f64, MAX_OPACITY as f64);
    opacity.set_step(1.0, 1);
    opacity.set_precision(0);
    opacity.set_value(current.opacity as f64);

    let mut hint = Frame::default()
        .with_pos(15, 310)
        .with_size(320, 30)
        .with_label("Enter: save    Escape: cancel");
    hint.set_label_size(11);
    hint.set_label_color(Color::from_rgb(100, 100, 100));

    let mut save_btn = ReturnButton::default()
        .with_pos(145, 350)
        .with_size(90, 30)
        .with_label("OK");
    let mut cancel_btn = Button::default()
        .with_pos(245, 350)
        .with_size(90, 30)
        .with_label("Cancel");

    dialog.end();

    let update_sample: Rc<dyn Fn()> = Rc::new({
        let (bg, fg, font, size, bold) = (
            bg_choice.clone(),
            fg_choice.clone(),
            font_choice.clone(),
            size_choice.clone(),
            bold_check.clone(),
        );
        let sample = sample.clone();
        move || {
            let mut sample = sample.clone();
            let font_name = selected(&EditorFont::ALL, &font, EditorFont::default());
            let size = selected(&FONT_SIZES, &size, 20).min(32);
            sample.set_color(to_fltk_color(selected(&EditorColor::ALL, &bg, EditorColor::Black)));
            sample.set_label_color(to_fltk_color(selected(&EditorColor::ALL, &fg, EditorColor::White)));
            sample.set_label_font(resolve_font(font_name, bold.value()));
            sample.set_label_size(size as i32);
            sample.redraw();
        }
    });
    update_sample();

    for mut choice in [bg_choice.clone(), fg_choice.clone(), font_choice.clone(), size_choice.clone()] {
        let update = update_sample.clone();
        choice.set_callback(move |_| update());
    }
    bold_check.set_callback({
        let update = update_sample.clone();
        move |_| update()
    });

    opacity.set_callback({
        let parent = parent.clone();
        move |s| set_window_opacity(&parent, s.value() as u8)
    });

    let result = Rc::new(RefCell::new(None));

    save_btn.set_callback({
        let result = result.clone();
        let dialog = dialog.clone();
        let current = current.clone();
        let opacity = opacity.clone();
        let wrap_check = wrap_check.clone();
        let bold_check = bold_check.clone();
        move |_| {
            let mut settings = EditorSettings {
                background: selected(&EditorColor::ALL, &bg_choice, current.background),
                foreground: selected(&EditorColor::ALL, &fg_choice, current.foreground),
                font: selected(&EditorFont::ALL, &font_choice, current.font),
                bold: bold_check.value(),
                font_size: selected(&FONT_SIZES, &size_choice, current.font_size),
                tab_size: selected(&TAB_SIZES, &tab_choice, current.tab_size),
                opacity: opacity.value() as u8,
                word_wrap: wrap_check.value(),
                ..current.clone()
            };
            settings.sanitize();
            *result.borrow_mut() = Some(settings);
            dialog.clone().hide();
        }
    });

    // Cancel button, Escape and the close button all revert
    let revert = {
        let parent = parent.clone();
        let original = current.opacity;
        move |dialog: &mut Window| {
            set_window_opacity(&parent, original);
            dialog.hide();
        }
    };
    cancel_btn.set_callback({
        let revert = revert.clone();
        let dialog = dialog.clone();
        move |_| revert(&mut dialog.clone())
    });
    dialog.set_callback(move |w| revert(w));

    dialog.show();
    super::run_dialog(&dialog);

    result.borrow_mut().take()
}
