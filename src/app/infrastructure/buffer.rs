/// Copy the text of an FLTK `TextBuffer` into a Rust `String`.
///
/// `TextBuffer::text()` in fltk-rs copies the `malloc()`'d string returned by
/// `Fl_Text_Buffer_text()` but never frees it, leaking the whole document on
/// every call. Shard reads the buffer on every save and cursor move, so it
/// goes through the C API directly and frees the copy itself.
pub fn buffer_text(buf: &fltk::text::TextBuffer) -> String {
    unsafe extern "C" {
        fn Fl_Text_Buffer_text(buf: *mut std::ffi::c_void) -> *mut std::ffi::c_char;
        fn free(ptr: *mut std::ffi::c_void);
    }

    // SAFETY: `buf.as_ptr()` is the live Fl_Text_Buffer owned by `buf`.
    // Fl_Text_Buffer_text returns a NUL-terminated malloc'd copy (or null),
    // which is read once and released with the matching free().
    unsafe {
        let ptr = Fl_Text_Buffer_text(buf.as_ptr() as *mut std::ffi::c_void);
        if ptr.is_null() {
            return String::new();
        }
        let text = std::ffi::CStr::from_ptr(ptr).to_string_lossy().into_owned();
        free(ptr as *mut std::ffi::c_void);
        text
    }
}
