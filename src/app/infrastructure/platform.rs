//! Window-manager pass-throughs: transparency, always-on-top, focus and
//! title bar colour. Only Windows has native implementations; elsewhere the
//! calls are logged and ignored so the editor keeps working.
//!
//! All functions need a native handle, so call them after `window.show()`.

use fltk::{prelude::*, window::Window};

use crate::app::domain::settings::{MAX_OPACITY, MIN_OPACITY};

/// Convert an opacity percentage to an 8-bit alpha, clamping to the visible range.
pub fn opacity_to_alpha(percent: u8) -> u8 {
    let percent = percent.clamp(MIN_OPACITY, MAX_OPACITY) as u32;
    ((percent * 255 + 50) / 100) as u8
}

#[cfg(target_os = "windows")]
fn hwnd(window: &Window) -> windows::Win32::Foundation::HWND {
    windows::Win32::Foundation::HWND(window.raw_handle() as *mut std::ffi::c_void)
}

/// Apply an opacity percentage (30..=100) to the window.
pub fn set_window_opacity(window: &Window, percent: u8) {
    let alpha = opacity_to_alpha(percent);

    #[cfg(target_os = "windows")]
    {
        use windows::Win32::Foundation::COLORREF;
        use windows::Win32::UI::WindowsAndMessaging::{
            GWL_EXSTYLE, GetWindowLongW, LWA_ALPHA, SetLayeredWindowAttributes, SetWindowLongW,
            WS_EX_LAYERED,
        };

        // SAFETY: the HWND belongs to a shown FLTK window that outlives this call.
        unsafe {
            let hwnd = hwnd(window);
            let style = GetWindowLongW(hwnd, GWL_EXSTYLE);
            if style & WS_EX_LAYERED.0 as i32 == 0 {
                SetWindowLongW(hwnd, GWL_EXSTYLE, style | WS_EX_LAYERED.0 as i32);
            }
            if let Err(e) = SetLayeredWindowAttributes(hwnd, COLORREF(0), alpha, LWA_ALPHA) {
                tracing::warn!("Failed to set window opacity: {}", e);
            }
        }
    }

    #[cfg(not(target_os = "windows"))]
    {
        let _ = window;
        tracing::debug!(alpha, "window opacity is only supported on Windows");
    }
}

/// Pin the window above all others, or release the pin.
pub fn set_always_on_top(window: &Window, on_top: bool) {
    #[cfg(target_os = "windows")]
    {
        use windows::Win32::UI::WindowsAndMessaging::{
            HWND_NOTOPMOST, HWND_TOPMOST, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOSIZE, SetWindowPos,
        };

        let insert_after = if on_top { HWND_TOPMOST } else { HWND_NOTOPMOST };
        // SAFETY: see set_window_opacity.
        unsafe {
            if let Err(e) = SetWindowPos(
                hwnd(window),
                insert_after,
                0,
                0,
                0,
                0,
                SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE,
            ) {
                tracing::warn!("Failed to change always-on-top state: {}", e);
            }
        }
    }

    #[cfg(not(target_os = "windows"))]
    {
        let _ = window;
        tracing::debug!(on_top, "always-on-top is only supported on Windows");
    }
}

/// Raise and focus a window, e.g. one opened by another process's hand-off.
pub fn bring_to_front(window: &mut Window) {
    window.show();
    let _ = window.take_focus();

    #[cfg(target_os = "windows")]
    {
        use windows::Win32::UI::WindowsAndMessaging::SetForegroundWindow;
        // SAFETY: see set_window_opacity.
        unsafe {
            let _ = SetForegroundWindow(hwnd(window));
        }
    }
}

/// Set Windows title bar theme (Windows 10 build 1809+)
#[cfg(target_os = "windows")]
pub fn set_titlebar_dark(window: &Window, is_dark: bool) {
    use std::mem::size_of;
    use std::ptr::from_ref;
    use windows::Win32::Graphics::Dwm::{DWMWINDOWATTRIBUTE, DwmSetWindowAttribute};

    let on: i32 = if is_dark { 1 } else { 0 };

    // SAFETY: see set_window_opacity; `on` lives across both calls.
    unsafe {
        let hwnd = hwnd(window);
        // DWMWA_USE_IMMERSIVE_DARK_MODE: 20 on Windows 11 / 10 2004+, 19 before
        for attribute in [20, 19] {
            let _ = DwmSetWindowAttribute(
                hwnd,
                DWMWINDOWATTRIBUTE(attribute),
                from_ref(&on).cast(),
                size_of::<i32>() as u32,
            );
        }
    }
}

#[cfg(not(target_os = "windows"))]
pub fn set_titlebar_dark(_window: &Window, _is_dark: bool) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opacity_bounds() {
        assert_eq!(opacity_to_alpha(100), 255);
        assert_eq!(opacity_to_alpha(30), 77);
    }

    #[test]
    fn test_opacity_is_clamped() {
        assert_eq!(opacity_to_alpha(0), opacity_to_alpha(30));
        assert_eq!(opacity_to_alpha(255), 255);
    }

    #[test]
    fn test_opacity_midpoint() {
        assert_eq!(opacity_to_alpha(50), 128);
    }
}
