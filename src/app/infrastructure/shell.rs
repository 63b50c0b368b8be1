//! Explorer "Open With" registration, kept per-user under HKEY_CURRENT_USER
//! so no elevation is needed.

use std::path::Path;

use super::error::Result;

pub const EXE_NAME: &str = "shard.exe";
pub const FRIENDLY_NAME: &str = "Shard";

/// `Software\Classes\Applications\shard.exe`
pub fn application_key() -> String {
    format!("Software\\Classes\\Applications\\{}", EXE_NAME)
}

/// `Software\Classes\*\OpenWithList\shard.exe`
pub fn open_with_list_key() -> String {
    format!("Software\\Classes\\*\\OpenWithList\\{}", EXE_NAME)
}

/// Command line Explorer runs for "Open With": `"<exe>" "%1"`.
pub fn open_command(exe: &Path) -> String {
    format!("\"{}\" \"%1\"", exe.display())
}

#[cfg(target_os = "windows")]
pub fn register_open_with(exe: &Path) -> Result<()> {
    use winreg::RegKey;
    use winreg::enums::HKEY_CURRENT_USER;

    let hkcu = RegKey::predef(HKEY_CURRENT_USER);

    let (app_key, _) = hkcu.create_subkey(application_key())?;
    app_key.set_value("FriendlyAppName", &FRIENDLY_NAME)?;

    let (command_key, _) = app_key.create_subkey("shell\\open\\command")?;
    command_key.set_value("", &open_command(exe))?;

    hkcu.create_subkey(open_with_list_key())?;

    tracing::info!("Registered {} for \"Open With\"", exe.display());
    Ok(())
}

#[cfg(target_os = "windows")]
pub fn unregister_open_with() -> Result<()> {
    use std::io::ErrorKind;
    use winreg::RegKey;
    use winreg::enums::HKEY_CURRENT_USER;

    let hkcu = RegKey::predef(HKEY_CURRENT_USER);
    for key in [application_key(), open_with_list_key()] {
        match hkcu.delete_subkey_all(&key) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }

    tracing::info!("Removed \"Open With\" registration");
    Ok(())
}

#[cfg(not(target_os = "windows"))]
pub fn register_open_with(_exe: &Path) -> Result<()> {
    Err(super::error::AppError::Unsupported("Shell registration"))
}

#[cfg(not(target_os = "windows"))]
pub fn unregister_open_with() -> Result<()> {
    Err(super::error::AppError::Unsupported("Shell registration"))
}
