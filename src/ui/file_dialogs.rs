use std::path::{Path, PathBuf};

use fltk::dialog::{FileDialogOptions, FileDialogType, NativeFileChooser};

/// FLTK filter format: "Description\tPattern", one per line.
pub const TEXT_FILES_FILTER: &str = "Text Files\t*.txt\nAll Files\t*";

fn chooser(kind: FileDialogType, directory: Option<&Path>) -> NativeFileChooser {
    let mut nfc = NativeFileChooser::new(kind);
    nfc.set_filter(TEXT_FILES_FILTER);
    if let Some(dir) = directory {
        if let Err(e) = nfc.set_directory(&dir) {
            tracing::debug!("Ignoring dialog directory {}: {:?}", dir.display(), e);
        }
    }
    nfc
}

fn chosen_path(nfc: &NativeFileChooser) -> Option<PathBuf> {
    let filename = nfc.filename();
    if filename.as_os_str().is_empty() { None } else { Some(filename) }
}

pub fn native_open_dialog(directory: Option<&Path>) -> Option<PathBuf> {
    let mut nfc = chooser(FileDialogType::BrowseFile, directory);
    nfc.show(); // blocks until closed
    chosen_path(&nfc)
}

/// Save dialog pre-filled with the current file name; asks before overwriting.
pub fn native_save_dialog(directory: Option<&Path>, preset_name: &str) -> Option<PathBuf> {
    let mut nfc = chooser(FileDialogType::BrowseSaveFile, directory);
    nfc.set_option(FileDialogOptions::SaveAsConfirm);
    nfc.set_preset_file(preset_name);
    nfc.show();
    chosen_path(&nfc)
}
